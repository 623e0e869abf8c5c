use anyhow::{anyhow, Result};
use derive_more::{BitAnd, BitOr, Deref, From};
use std::fmt;

/// Refines how a type id's data is laid out.
#[derive(From, Deref, BitOr, BitAnd, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct ModifierFlags(u8);

impl ModifierFlags {
    pub const NONE: Self = Self(0);
    /// Without [`Self::FIXED`], the data starts with a 7-bit encoded element count.
    /// With it, the count follows the type header inside the Format instead.
    pub const ARRAY: Self = Self(0x01);
    pub const FIXED: Self = Self(0x02);
    /// Constant data trails the type header. Combined with [`Self::ARRAY`], requires [`Self::FIXED`].
    pub const CONSTANT: Self = Self(0x04);
    pub const BIG_ENDIAN: Self = Self(0x08);
    /// memcmp-orderable encoding. Requires [`Self::BIG_ENDIAN`].
    pub const SEQUENCE: Self = Self(0x10);

    const ALL: u8 = 0x1F;

    pub const fn bits(self) -> u8 {
        self.0
    }
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn validate(self) -> Result<Self> {
        if self.0 & !Self::ALL != 0 {
            return Err(anyhow!("Unknown modifier bits in {:?}", self));
        }
        if self.contains(Self::SEQUENCE) && !self.contains(Self::BIG_ENDIAN) {
            return Err(anyhow!("{:?} sets Sequence without BigEndian", self));
        }
        if self.contains(Self::CONSTANT)
            && self.contains(Self::ARRAY)
            && !self.contains(Self::FIXED)
        {
            return Err(anyhow!("{:?} sets Constant Array without Fixed", self));
        }
        Ok(self)
    }
}

impl fmt::Debug for ModifierFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "None");
        }
        let names = [
            (Self::ARRAY, "Array"),
            (Self::FIXED, "Fixed"),
            (Self::CONSTANT, "Constant"),
            (Self::BIG_ENDIAN, "BigEndian"),
            (Self::SEQUENCE, "Sequence"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        let unknown = self.0 & !Self::ALL;
        if unknown != 0 {
            if !first {
                write!(f, "|")?;
            }
            write!(f, "{:#04x}", unknown)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validate() {
        let ok = [
            ModifierFlags::NONE,
            ModifierFlags::ARRAY,
            ModifierFlags::ARRAY | ModifierFlags::FIXED,
            ModifierFlags::BIG_ENDIAN | ModifierFlags::SEQUENCE,
            ModifierFlags::CONSTANT | ModifierFlags::ARRAY | ModifierFlags::FIXED,
        ];
        for flags in ok {
            assert!(flags.validate().is_ok(), "{:?}", flags);
        }

        let bad = [
            ModifierFlags::SEQUENCE,
            ModifierFlags::CONSTANT | ModifierFlags::ARRAY,
            ModifierFlags::from(0x20),
        ];
        for flags in bad {
            assert!(flags.validate().is_err(), "{:?}", flags);
        }
    }

    #[test]
    fn debug() {
        assert_eq!("None", format!("{:?}", ModifierFlags::NONE));
        assert_eq!(
            "Array|Fixed",
            format!("{:?}", ModifierFlags::ARRAY | ModifierFlags::FIXED)
        );
        assert_eq!("Sequence|0x80", format!("{:?}", ModifierFlags::from(0x90)));
    }
}
