use crate::describe::{push_7bit, push_header, Describe};
use anyhow::{anyhow, Result};
use persist_types::serde::{size_of_7bit_encoded, Reader, Writer};
use persist_types::types::{
    check_zero_sized_count, Basic, Char, Currency, DateTime, Guid, TimeSpan, TypeTraits, WChar,
    WideCString,
};
use std::ffi::{CStr, CString};

/// Elements allocated ahead of reading them. Counts come from the data stream, so are not trusted.
pub(crate) const MAX_PREALLOC: usize = 1 << 12;

/// Sizes and writes a value's data.
///
/// `buffer_size` must equal the number of bytes `write` produces.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be persisted",
    note = "optional, owning-pointer, variant, and constant types are classified but cannot be persisted"
)]
pub trait Persistent: Describe {
    fn buffer_size(&self) -> usize;

    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()>;

    /// Array and vector bodies go through here, so that basics may write in bulk.
    fn slice_buffer_size(items: &[Self]) -> usize
    where
        Self: Sized,
    {
        items.iter().map(Self::buffer_size).sum()
    }

    fn write_slice<W: Writer + ?Sized>(items: &[Self], w: &mut W) -> Result<()>
    where
        Self: Sized,
    {
        for item in items {
            item.write(w)?;
        }
        Ok(())
    }
}

/// Reads a value's data in place. Mirror of [`Persistent::write`].
pub trait Restore: Persistent {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()>;

    fn read_slice<R: Reader + ?Sized>(items: &mut [Self], r: &mut R) -> Result<()>
    where
        Self: Sized,
    {
        for item in items {
            item.read(r)?;
        }
        Ok(())
    }
}

fn read_count<R: Reader + ?Sized>(r: &mut R) -> Result<usize> {
    let count = r.read_7bit_encoded()?;
    usize::try_from(count).map_err(|_| anyhow!("Element count {} overflows usize", count))
}

/// Reads `count` raw bytes without trusting `count` for allocation.
pub(crate) fn read_byte_vec<R: Reader + ?Sized>(r: &mut R, count: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(count.min(MAX_PREALLOC));
    while bytes.len() < count {
        let start = bytes.len();
        let chunk = (count - start).min(MAX_PREALLOC);
        bytes.resize(start + chunk, 0);
        r.read_bytes(&mut bytes[start..])?;
    }
    Ok(bytes)
}

/* Basic scalars */

macro_rules! impl_basic_persistent {
    ($($t:ty),* $(,)?) => {
        $(
            impl Describe for $t {
                fn format(out: &mut Vec<u8>) {
                    push_header::<Self>(out);
                }
            }
            impl Persistent for $t {
                fn buffer_size(&self) -> usize {
                    <$t as Basic>::SIZE
                }
                fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
                    w.write_basic(*self)
                }
                fn slice_buffer_size(items: &[Self]) -> usize {
                    items.len() * <$t as Basic>::SIZE
                }
                fn write_slice<W: Writer + ?Sized>(items: &[Self], w: &mut W) -> Result<()> {
                    w.write_basic_slice(items)
                }
            }
            impl Restore for $t {
                fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
                    *self = r.read_basic()?;
                    Ok(())
                }
                fn read_slice<R: Reader + ?Sized>(items: &mut [Self], r: &mut R) -> Result<()> {
                    r.read_basic_slice(items)
                }
            }
        )*
    };
}
impl_basic_persistent!(
    bool, i8, u8, i16, u16, i32, u32, i64, u64, f32, f64, Char, WChar, TimeSpan, DateTime,
    Currency, Guid,
);

/* Fixed-size arrays. The count lives in the Format, so the data is the elements alone. */

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn format(out: &mut Vec<u8>) {
        push_header::<Self>(out);
        if !T::IS_PLAIN_BASIC {
            out.extend_from_slice(&T::descriptor());
        }
        push_7bit(out, N as u64);
    }
}
impl<T: Persistent, const N: usize> Persistent for [T; N] {
    fn buffer_size(&self) -> usize {
        T::slice_buffer_size(self)
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        T::write_slice(self, w)
    }
}
impl<T: Restore, const N: usize> Restore for [T; N] {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        T::read_slice(self, r)
    }
}

/* Vectors. The data is the 7-bit encoded element count, then the elements. */

impl<T: Describe> Describe for [T] {
    fn format(out: &mut Vec<u8>) {
        push_header::<Self>(out);
        if !T::IS_PLAIN_BASIC {
            out.extend_from_slice(&T::descriptor());
        }
    }
}
impl<T: Persistent> Persistent for [T] {
    fn buffer_size(&self) -> usize {
        size_of_7bit_encoded(self.len() as u64) + T::slice_buffer_size(self)
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        w.write_7bit_encoded(self.len() as u64)?;
        T::write_slice(self, w)
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn format(out: &mut Vec<u8>) {
        <[T]>::format(out)
    }
}
impl<T: Persistent> Persistent for Vec<T> {
    fn buffer_size(&self) -> usize {
        self.as_slice().buffer_size()
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.as_slice().write(w)
    }
}
impl<T: Restore + Default> Restore for Vec<T> {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        let count = read_count(r)?;
        if T::IS_FIXED_SIZE && T::default().buffer_size() == 0 {
            check_zero_sized_count(count)?;
        }
        self.clear();
        self.reserve(count.min(MAX_PREALLOC));
        while self.len() < count {
            let start = self.len();
            let chunk = (count - start).min(MAX_PREALLOC);
            self.resize_with(start + chunk, T::default);
            T::read_slice(&mut self[start..], r)?;
        }
        Ok(())
    }
}

/* UTF-8 strings, as Char vectors */

impl Describe for str {
    fn format(out: &mut Vec<u8>) {
        push_header::<Self>(out);
    }
}
impl Persistent for str {
    fn buffer_size(&self) -> usize {
        size_of_7bit_encoded(self.len() as u64) + self.len()
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        w.write_7bit_encoded(self.len() as u64)?;
        w.write_bytes(self.as_bytes())
    }
}

impl Describe for String {
    fn format(out: &mut Vec<u8>) {
        str::format(out)
    }
}
impl Persistent for String {
    fn buffer_size(&self) -> usize {
        self.as_str().buffer_size()
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.as_str().write(w)
    }
}
impl Restore for String {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        let count = read_count(r)?;
        *self = String::from_utf8(read_byte_vec(r, count)?)?;
        Ok(())
    }
}

/* Null-terminated strings. The terminator is not written. */

impl Describe for CStr {
    fn format(out: &mut Vec<u8>) {
        push_header::<Self>(out);
    }
}
impl Persistent for CStr {
    fn buffer_size(&self) -> usize {
        let len = self.to_bytes().len();
        size_of_7bit_encoded(len as u64) + len
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        let bytes = self.to_bytes();
        w.write_7bit_encoded(bytes.len() as u64)?;
        w.write_bytes(bytes)
    }
}

impl Describe for CString {
    fn format(out: &mut Vec<u8>) {
        CStr::format(out)
    }
}
impl Persistent for CString {
    fn buffer_size(&self) -> usize {
        self.as_c_str().buffer_size()
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.as_c_str().write(w)
    }
}
impl Restore for CString {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        let count = read_count(r)?;
        *self = CString::new(read_byte_vec(r, count)?)?;
        Ok(())
    }
}

impl Describe for WideCString {
    fn format(out: &mut Vec<u8>) {
        push_header::<Self>(out);
    }
}
impl Persistent for WideCString {
    fn buffer_size(&self) -> usize {
        self.as_units().buffer_size()
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.as_units().write(w)
    }
}
impl Restore for WideCString {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        let mut units = Vec::<u16>::new();
        units.read(r)?;
        *self = WideCString::new(units)?;
        Ok(())
    }
}

/// Reads a string written as a [`CStr`] into a caller-sized buffer, then null-terminates it.
///
/// Returns the string's length, excluding the terminator.
/// Fails without reading the string's bytes if `dst` cannot hold them plus the terminator.
pub fn read_c_str<R: Reader + ?Sized>(r: &mut R, dst: &mut [u8]) -> Result<usize> {
    let count = read_count(r)?;
    if count >= dst.len() {
        return Err(anyhow!(
            "A string of {} bytes and its terminator do not fit in {} bytes",
            count,
            dst.len()
        ));
    }
    r.read_bytes(&mut dst[..count])?;
    dst[count] = 0;
    Ok(count)
}

/// Wide flavor of [`read_c_str`].
pub fn read_wide_c_str<R: Reader + ?Sized>(r: &mut R, dst: &mut [u16]) -> Result<usize> {
    let count = read_count(r)?;
    if count >= dst.len() {
        return Err(anyhow!(
            "A wide string of {} units and its terminator do not fit in {} units",
            count,
            dst.len()
        ));
    }
    r.read_basic_slice(&mut dst[..count])?;
    dst[count] = 0;
    Ok(count)
}

/* Borrows */

impl<T: Persistent + ?Sized> Persistent for &T {
    fn buffer_size(&self) -> usize {
        (**self).buffer_size()
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        (**self).write(w)
    }
}
impl<T: Persistent + ?Sized> Persistent for &mut T {
    fn buffer_size(&self) -> usize {
        (**self).buffer_size()
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        (**self).write(w)
    }
}
impl<T: Restore + ?Sized> Restore for &mut T {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        (**self).read(r)
    }
}

/// Whether every value of `T` has the same [`Persistent::buffer_size`].
pub const fn is_fixed_size_type<T: TypeTraits + ?Sized>() -> bool {
    T::IS_FIXED_SIZE
}
