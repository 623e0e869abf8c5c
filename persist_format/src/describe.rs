use anyhow::{anyhow, Result};
use persist_types::serde::{DescriptorCursor, Reader, SevenBitEncoded, SCHEMA_VERSION};
use persist_types::types::TypeTraits;

/// Longest Format [`read_descriptor`] accepts.
pub const MAX_FORMAT_LEN: usize = 1 << 16;

/// Produces the Format of a type. Formats depend on the type alone, never on a value.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no Format",
    note = "optional, owning-pointer, variant, and constant types are classified but cannot be persisted"
)]
pub trait Describe: TypeTraits {
    /// Appends this type's Format to `out`.
    fn format(out: &mut Vec<u8>);

    fn format_bytes() -> Vec<u8> {
        let mut out = vec![];
        Self::format(&mut out);
        out
    }

    /// `(7-bit Format len, schema version, Format)`.
    fn descriptor() -> Vec<u8> {
        wrap_format(&Self::format_bytes())
    }
}

pub fn wrap_format(format: &[u8]) -> Vec<u8> {
    let len = SevenBitEncoded::new(format.len() as u64);
    let mut descriptor = Vec::with_capacity(len.len() + 1 + format.len());
    descriptor.extend_from_slice(&len);
    descriptor.push(SCHEMA_VERSION);
    descriptor.extend_from_slice(format);
    descriptor
}

/// Reads one descriptor from a data stream, where it was written as plain bytes.
pub fn read_descriptor<R: Reader + ?Sized>(r: &mut R) -> Result<Vec<u8>> {
    let format_len = r.read_7bit_encoded()?;
    let len = SevenBitEncoded::new(format_len);
    let format_len = usize::try_from(format_len)
        .ok()
        .filter(|len| *len <= MAX_FORMAT_LEN)
        .ok_or(anyhow!("Format of {} bytes is too long", format_len))?;
    let mut descriptor = len.to_vec();
    let start = descriptor.len();
    descriptor.resize(start + 1 + format_len, 0);
    r.read_bytes(&mut descriptor[start..])?;
    DescriptorCursor::new(&descriptor)?;
    Ok(descriptor)
}

pub(crate) fn push_header<T: TypeTraits + ?Sized>(out: &mut Vec<u8>) {
    out.push(T::TYPE_ID.to_u8());
    out.push(T::MODIFIERS.bits());
}

pub(crate) fn push_7bit(out: &mut Vec<u8>, n: u64) {
    out.extend_from_slice(&SevenBitEncoded::new(n));
}

/// Appends `(type id, modifiers, members len, members count, members)` for an aggregate.
pub fn push_members<T: TypeTraits + ?Sized>(
    out: &mut Vec<u8>,
    count: usize,
    members: impl FnOnce(&mut Vec<u8>),
) {
    let mut inner = vec![];
    members(&mut inner);
    push_header::<T>(out);
    push_7bit(out, inner.len() as u64);
    push_7bit(out, count as u64);
    out.extend_from_slice(&inner);
}

/* Borrows */

impl<T: Describe + ?Sized> Describe for &T {
    fn format(out: &mut Vec<u8>) {
        T::format(out)
    }
}
impl<T: Describe + ?Sized> Describe for &mut T {
    fn format(out: &mut Vec<u8>) {
        T::format(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wrap() {
        assert_eq!(vec![0x02, 0x01, 0x08, 0x00], wrap_format(&[0x08, 0x00]));

        let long = vec![0u8; 200];
        let descriptor = wrap_format(&long);
        assert_eq!(&[0xC8, 0x01, 0x01], &descriptor[..3]);
        assert_eq!(203, descriptor.len());
    }

    #[test]
    fn read_back() -> Result<()> {
        let descriptor = <(i32, String)>::descriptor();
        let mut stream = descriptor.clone();
        stream.extend_from_slice(&[1, 2, 3]);

        let mut r = &stream[..];
        assert_eq!(descriptor, read_descriptor(&mut r)?);
        assert_eq!(&[1, 2, 3], r);

        let mut bad_version = descriptor.clone();
        bad_version[1] = 7;
        assert!(read_descriptor(&mut &bad_version[..]).is_err());

        let huge = [0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 0x01];
        assert!(read_descriptor(&mut &huge[..]).is_err());
        Ok(())
    }

    #[test]
    fn members() {
        let mut out = vec![];
        push_members::<(i32, f64)>(&mut out, 2, |inner| {
            i32::format(inner);
            f64::format(inner);
        });
        assert_eq!(vec![202, 0x00, 0x04, 0x02, 0x08, 0x00, 0x0D, 0x00], out);
    }
}
