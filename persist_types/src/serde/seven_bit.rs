use anyhow::{anyhow, Result};
use std::io::{self, Read, Write};
use std::ops::Deref;

/// The 9th byte carries a full 8 bits, so no value needs more than this.
pub const MAX_7BIT_ENCODED_LEN: usize = 9;

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7F;

pub const fn size_of_7bit_encoded(n: u64) -> usize {
    if n <= 0x7F {
        1
    } else if n <= 0x3FFF {
        2
    } else if n <= 0x1F_FFFF {
        3
    } else if n <= 0xFFF_FFFF {
        4
    } else if n <= 0x7_FFFF_FFFF {
        5
    } else if n <= 0x3FF_FFFF_FFFF {
        6
    } else if n <= 0x1_FFFF_FFFF_FFFF {
        7
    } else if n <= 0xFF_FFFF_FFFF_FFFF {
        8
    } else {
        9
    }
}

/// The encoded bytes of one value. Usable in const contexts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SevenBitEncoded {
    buf: [u8; MAX_7BIT_ENCODED_LEN],
    len: u8,
}
impl Deref for SevenBitEncoded {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }
}

impl SevenBitEncoded {
    pub const fn new(mut n: u64) -> Self {
        let mut buf = [0u8; MAX_7BIT_ENCODED_LEN];
        let mut i = 0;
        while i < MAX_7BIT_ENCODED_LEN - 1 {
            if n <= PAYLOAD as u64 {
                buf[i] = n as u8;
                return Self {
                    buf,
                    len: (i + 1) as u8,
                };
            }
            buf[i] = (n as u8 & PAYLOAD) | CONTINUATION;
            n >>= 7;
            i += 1;
        }
        buf[i] = n as u8;
        Self {
            buf,
            len: MAX_7BIT_ENCODED_LEN as u8,
        }
    }

    pub const fn len(&self) -> usize {
        self.len as usize
    }
    pub const fn byte(&self, i: usize) -> u8 {
        self.buf[i]
    }
}

pub fn write_7bit_encoded(w: &mut impl Write, n: u64) -> Result<usize, io::Error> {
    let enc = SevenBitEncoded::new(n);
    w.write_all(&enc)?;
    Ok(enc.len())
}

/// Returns `(bytes consumed, value)`.
pub fn read_7bit_encoded(r: &mut impl Read) -> Result<(usize, u64), io::Error> {
    decode_7bit_from(|_| {
        let mut buf = [0u8; 1];
        r.read_exact(&mut buf)?;
        Ok(buf[0])
    })
}

/// The one decoding loop every reader shares.
///
/// `next(i)` yields the `i`th encoded byte. Returns `(bytes consumed, value)`.
pub fn decode_7bit_from<E>(
    mut next: impl FnMut(usize) -> Result<u8, E>,
) -> Result<(usize, u64), E> {
    let mut n = 0u64;
    for i in 0..MAX_7BIT_ENCODED_LEN - 1 {
        let byte = next(i)?;
        n |= ((byte & PAYLOAD) as u64) << (7 * i);
        if byte & CONTINUATION == 0 {
            return Ok((i + 1, n));
        }
    }
    let last = MAX_7BIT_ENCODED_LEN - 1;
    n |= (next(last)? as u64) << (7 * last);
    Ok((MAX_7BIT_ENCODED_LEN, n))
}

/// Slice flavor of [`read_7bit_encoded`]. Never reads past `buf`.
pub fn decode_7bit(buf: &[u8]) -> Result<(usize, u64)> {
    decode_7bit_from(|i| {
        buf.get(i)
            .copied()
            .ok_or(anyhow!("Truncated 7-bit encoded value after {} bytes", i))
    })
}
