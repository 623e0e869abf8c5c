//! memcmp-orderable encodings, used by Formats that set `BigEndian|Sequence`.
//!
//! Scalars are written big-endian, with signed integers' sign bit flipped
//! and floats' bits rearranged so that negative values sort first.
//!
//! Byte strings are split into blocks. Each block is 8 data bytes followed by
//! the number of those bytes that are used. A full block (count 8) is always
//! followed by another block, so the last block has a count below 8.
//!
//! ```text
//! ""          => 00 00 00 00 00 00 00 00 | 00
//! "ab"        => 61 62 00 00 00 00 00 00 | 02
//! "abcdefgh"  => 61 62 63 64 65 66 67 68 | 08
//!                00 00 00 00 00 00 00 00 | 00
//! ```

use crate::serde::{Reader, Writer};
use crate::types::{Basic, Char, Currency, DateTime, Guid, TimeSpan, WChar, MAX_BASIC_SIZE};
use anyhow::{anyhow, Result};

pub const SEQUENCE_BLOCK_LEN: usize = 8;

/// A basic scalar with an order-preserving big-endian form.
pub trait OrderedBasic: Basic {
    fn put_ordered(&self, dst: &mut [u8]);
    fn get_ordered(src: &[u8]) -> Result<Self>;
}

macro_rules! impl_ordered_unsigned {
    ($($t:ty),*) => {
        $(
            impl OrderedBasic for $t {
                fn put_ordered(&self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_be_bytes());
                }
                fn get_ordered(src: &[u8]) -> Result<Self> {
                    Ok(<$t>::from_be_bytes(src.try_into()?))
                }
            }
        )*
    };
}
impl_ordered_unsigned!(u8, u16, u32, u64);

macro_rules! impl_ordered_signed {
    ($($t:ty => $u:ty),*) => {
        $(
            impl OrderedBasic for $t {
                fn put_ordered(&self, dst: &mut [u8]) {
                    let flipped = (*self as $u) ^ (1 << (<$u>::BITS - 1));
                    dst.copy_from_slice(&flipped.to_be_bytes());
                }
                fn get_ordered(src: &[u8]) -> Result<Self> {
                    let flipped = <$u>::from_be_bytes(src.try_into()?);
                    Ok((flipped ^ (1 << (<$u>::BITS - 1))) as $t)
                }
            }
        )*
    };
}
impl_ordered_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);

macro_rules! impl_ordered_float {
    ($($t:ty => $u:ty),*) => {
        $(
            impl OrderedBasic for $t {
                fn put_ordered(&self, dst: &mut [u8]) {
                    let bits = self.to_bits();
                    let sign = 1 << (<$u>::BITS - 1);
                    let ordered = if bits & sign != 0 { !bits } else { bits ^ sign };
                    dst.copy_from_slice(&ordered.to_be_bytes());
                }
                fn get_ordered(src: &[u8]) -> Result<Self> {
                    let ordered = <$u>::from_be_bytes(src.try_into()?);
                    let sign = 1 << (<$u>::BITS - 1);
                    let bits = if ordered & sign != 0 { ordered ^ sign } else { !ordered };
                    Ok(<$t>::from_bits(bits))
                }
            }
        )*
    };
}
impl_ordered_float!(f32 => u32, f64 => u64);

macro_rules! impl_ordered_newtype {
    ($($t:ident($inner:ty)),*) => {
        $(
            impl OrderedBasic for $t {
                fn put_ordered(&self, dst: &mut [u8]) {
                    self.0.put_ordered(dst)
                }
                fn get_ordered(src: &[u8]) -> Result<Self> {
                    Ok(Self(<$inner>::get_ordered(src)?))
                }
            }
        )*
    };
}
impl_ordered_newtype!(Char(u8), WChar(u16), TimeSpan(i64), DateTime(i64), Currency(i64));

impl OrderedBasic for bool {
    fn put_ordered(&self, dst: &mut [u8]) {
        self.put(dst)
    }
    fn get_ordered(src: &[u8]) -> Result<Self> {
        Self::get(src)
    }
}
impl OrderedBasic for Guid {
    fn put_ordered(&self, dst: &mut [u8]) {
        self.put(dst)
    }
    fn get_ordered(src: &[u8]) -> Result<Self> {
        Self::get(src)
    }
}

pub fn write_ordered<W: Writer + ?Sized, T: OrderedBasic>(w: &mut W, value: &T) -> Result<()> {
    let mut buf = [0u8; MAX_BASIC_SIZE];
    let buf = &mut buf[..T::SIZE];
    value.put_ordered(buf);
    w.write_bytes(buf)
}

pub fn read_ordered<R: Reader + ?Sized, T: OrderedBasic>(r: &mut R) -> Result<T> {
    let mut buf = [0u8; MAX_BASIC_SIZE];
    let buf = &mut buf[..T::SIZE];
    r.read_bytes(buf)?;
    T::get_ordered(buf)
}

pub fn sequence_encoded_len(data_len: usize) -> usize {
    (data_len / SEQUENCE_BLOCK_LEN + 1) * (SEQUENCE_BLOCK_LEN + 1)
}

pub fn write_sequence<W: Writer + ?Sized>(w: &mut W, data: &[u8]) -> Result<()> {
    let mut block = [0u8; SEQUENCE_BLOCK_LEN + 1];
    let mut chunks = data.chunks_exact(SEQUENCE_BLOCK_LEN);
    for chunk in &mut chunks {
        block[..SEQUENCE_BLOCK_LEN].copy_from_slice(chunk);
        block[SEQUENCE_BLOCK_LEN] = SEQUENCE_BLOCK_LEN as u8;
        w.write_bytes(&block)?;
    }
    let rest = chunks.remainder();
    block = [0u8; SEQUENCE_BLOCK_LEN + 1];
    block[..rest.len()].copy_from_slice(rest);
    block[SEQUENCE_BLOCK_LEN] = rest.len() as u8;
    w.write_bytes(&block)
}

pub fn read_sequence<R: Reader + ?Sized>(r: &mut R) -> Result<Vec<u8>> {
    let mut data = vec![];
    loop {
        let mut block = [0u8; SEQUENCE_BLOCK_LEN + 1];
        r.read_bytes(&mut block)?;
        let used = block[SEQUENCE_BLOCK_LEN] as usize;
        if used > SEQUENCE_BLOCK_LEN {
            return Err(anyhow!("Sequence block claims {} used bytes", used));
        }
        data.extend_from_slice(&block[..used]);
        if used < SEQUENCE_BLOCK_LEN {
            if block[used..SEQUENCE_BLOCK_LEN].iter().any(|b| *b != 0) {
                return Err(anyhow!("Sequence block has non-zero padding"));
            }
            return Ok(data);
        }
    }
}
