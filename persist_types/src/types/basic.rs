use crate::serde::BasicTypeId;
use anyhow::{anyhow, Result};
use derive_more::{From, Into};
use std::fmt::{self, Debug, Display};
use std::mem;

/// Largest [`Basic::SIZE`].
pub const MAX_BASIC_SIZE: usize = 16;

/// A scalar with a fixed-width little-endian wire representation.
pub trait Basic: Copy + Default + PartialEq + Debug + 'static {
    const TYPE_ID: BasicTypeId;
    const SIZE: usize;

    /// `dst.len() == Self::SIZE`.
    fn put(&self, dst: &mut [u8]);
    /// `src.len() == Self::SIZE`.
    fn get(src: &[u8]) -> Result<Self>;
}

macro_rules! impl_basic_num {
    ($($t:ty => $id:ident),* $(,)?) => {
        $(
            impl Basic for $t {
                const TYPE_ID: BasicTypeId = BasicTypeId::$id;
                const SIZE: usize = mem::size_of::<$t>();
                fn put(&self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_le_bytes());
                }
                fn get(src: &[u8]) -> Result<Self> {
                    Ok(<$t>::from_le_bytes(src.try_into()?))
                }
            }
        )*
    };
}
impl_basic_num! {
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Single,
    f64 => Double,
}

impl Basic for bool {
    const TYPE_ID: BasicTypeId = BasicTypeId::Boolean;
    const SIZE: usize = 1;
    fn put(&self, dst: &mut [u8]) {
        dst[0] = *self as u8;
    }
    fn get(src: &[u8]) -> Result<Self> {
        match src {
            [0] => Ok(false),
            [1] => Ok(true),
            _ => Err(anyhow!("Invalid {} bytes {:?}", "bool", src)),
        }
    }
}

/* Scalars without a dedicated Rust primitive */

/// A narrow character, one byte.
#[derive(From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct Char(pub u8);

/// A UTF-16 code unit.
#[derive(From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct WChar(pub u16);

/// A duration in 100ns ticks.
#[derive(From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct TimeSpan(pub i64);

/// A point in time in 100ns ticks since 0001-01-01.
#[derive(From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct DateTime(pub i64);

/// A fixed-point amount scaled by 10,000.
#[derive(From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct Currency(pub i64);

#[derive(From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct Guid(pub [u8; 16]);

macro_rules! impl_basic_newtype {
    ($($t:ident($inner:ty) => $id:ident),* $(,)?) => {
        $(
            impl Basic for $t {
                const TYPE_ID: BasicTypeId = BasicTypeId::$id;
                const SIZE: usize = mem::size_of::<$inner>();
                fn put(&self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.0.to_le_bytes());
                }
                fn get(src: &[u8]) -> Result<Self> {
                    Ok(Self(<$inner>::from_le_bytes(src.try_into()?)))
                }
            }
        )*
    };
}
impl_basic_newtype! {
    Char(u8) => Char,
    WChar(u16) => WChar,
    TimeSpan(i64) => TimeSpan,
    DateTime(i64) => DateTime,
    Currency(i64) => Currency,
}

impl Basic for Guid {
    const TYPE_ID: BasicTypeId = BasicTypeId::Guid;
    const SIZE: usize = 16;
    fn put(&self, dst: &mut [u8]) {
        dst.copy_from_slice(&self.0);
    }
    fn get(src: &[u8]) -> Result<Self> {
        Ok(Self(src.try_into()?))
    }
}

impl Display for Char {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}
impl Display for WChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = char::decode_utf16([self.0])
            .next()
            .and_then(|r| r.ok())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        write!(f, "{}", c)
    }
}
impl Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:04}", sign, abs / 10_000, abs % 10_000)
    }
}
impl Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                write!(f, "-")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
