use crate::describe::{push_header, Describe};
use crate::persistent::{Persistent, Restore};
use anyhow::Result;
use persist_types::serde::{
    read_ordered, read_sequence, sequence_encoded_len, write_ordered, write_sequence, Reader,
    Writer,
};
use persist_types::types::{
    Basic, Char, Currency, DateTime, Guid, Ordered, TimeSpan, WChar,
};

macro_rules! impl_ordered_basic {
    ($($t:ty),* $(,)?) => {
        $(
            impl Describe for Ordered<$t> {
                fn format(out: &mut Vec<u8>) {
                    push_header::<Self>(out);
                }
            }
            impl Persistent for Ordered<$t> {
                fn buffer_size(&self) -> usize {
                    <$t as Basic>::SIZE
                }
                fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
                    write_ordered(w, &self.0)
                }
            }
            impl Restore for Ordered<$t> {
                fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
                    self.0 = read_ordered(r)?;
                    Ok(())
                }
            }
        )*
    };
}
impl_ordered_basic!(
    bool, i8, u8, i16, u16, i32, u32, i64, u64, f32, f64, Char, WChar, TimeSpan, DateTime,
    Currency, Guid,
);

/* Byte strings, as blocks */

impl Describe for Ordered<Vec<u8>> {
    fn format(out: &mut Vec<u8>) {
        push_header::<Self>(out);
    }
}
impl Persistent for Ordered<Vec<u8>> {
    fn buffer_size(&self) -> usize {
        sequence_encoded_len(self.0.len())
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_sequence(w, &self.0)
    }
}
impl Restore for Ordered<Vec<u8>> {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        self.0 = read_sequence(r)?;
        Ok(())
    }
}

impl Describe for Ordered<String> {
    fn format(out: &mut Vec<u8>) {
        push_header::<Self>(out);
    }
}
impl Persistent for Ordered<String> {
    fn buffer_size(&self) -> usize {
        sequence_encoded_len(self.0.len())
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        write_sequence(w, self.0.as_bytes())
    }
}
impl Restore for Ordered<String> {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        self.0 = String::from_utf8(read_sequence(r)?)?;
        Ok(())
    }
}
