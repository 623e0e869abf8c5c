use crate::serde::{decode_7bit_from, SevenBitEncoded};
use crate::types::{Basic, MAX_BASIC_SIZE};
use anyhow::{anyhow, Result};
use derive_more::Deref;
use std::io::{Read, Write};

/// Bytes that one or more write calls produced.
#[derive(Deref, PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct WriteLen(usize);
impl WriteLen {
    pub fn new_manual(i: usize) -> Self {
        Self(i)
    }
}

/// Bytes that one or more read calls consumed.
#[derive(Deref, PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct ReadLen(usize);

/// Byte sink that codecs write to.
///
/// Only [`Writer::write_bytes`] is required.
/// The provided methods are fast paths that sinks may override with native implementations.
pub trait Writer {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;

    fn write_7bit_encoded(&mut self, n: u64) -> Result<()> {
        self.write_bytes(&SevenBitEncoded::new(n))
    }

    fn write_basic<T: Basic>(&mut self, value: T) -> Result<()> {
        let mut buf = [0u8; MAX_BASIC_SIZE];
        let buf = &mut buf[..T::SIZE];
        value.put(buf);
        self.write_bytes(buf)
    }

    fn write_basic_slice<T: Basic>(&mut self, values: &[T]) -> Result<()> {
        for value in values {
            self.write_basic(*value)?;
        }
        Ok(())
    }
}

/// Byte source that codecs read from. Mirror of [`Writer`].
pub trait Reader {
    /// Fills all of `buf`, or fails.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()>;

    fn read_7bit_encoded(&mut self) -> Result<u64> {
        let (_, n) = decode_7bit_from(|_| {
            let mut buf = [0u8; 1];
            self.read_bytes(&mut buf)?;
            Ok::<_, anyhow::Error>(buf[0])
        })?;
        Ok(n)
    }

    fn read_basic<T: Basic>(&mut self) -> Result<T> {
        let mut buf = [0u8; MAX_BASIC_SIZE];
        let buf = &mut buf[..T::SIZE];
        self.read_bytes(buf)?;
        T::get(buf)
    }

    fn read_basic_slice<T: Basic>(&mut self, dst: &mut [T]) -> Result<()> {
        for value in dst.iter_mut() {
            *value = self.read_basic()?;
        }
        Ok(())
    }
}

/* In-memory sinks and sources */

impl Writer for Vec<u8> {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
    fn write_basic_slice<T: Basic>(&mut self, values: &[T]) -> Result<()> {
        let start = self.len();
        self.resize(start + values.len() * T::SIZE, 0);
        for (value, dst) in values.iter().zip(self[start..].chunks_exact_mut(T::SIZE)) {
            value.put(dst);
        }
        Ok(())
    }
}

impl<'a> Reader for &'a [u8] {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.len() < buf.len() {
            return Err(anyhow!(
                "Unexpected end of buffer. Wanted {} bytes, {} remain.",
                buf.len(),
                self.len()
            ));
        }
        let data: &'a [u8] = *self;
        let (head, tail) = data.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

/* Stream adaptors */

const CHUNK_LEN: usize = 512;

/// A [`Writer`] over any [`Write`], tracking how much was written.
pub struct BinaryWriter<W: Write> {
    w: W,
    w_len: usize,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w, w_len: 0 }
    }
    pub fn write_len(&self) -> WriteLen {
        WriteLen(self.w_len)
    }
    pub fn get_ref(&self) -> &W {
        &self.w
    }
    pub fn into_inner(self) -> W {
        self.w
    }
}

impl<W: Write> Writer for BinaryWriter<W> {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.w.write_all(buf)?;
        self.w_len += buf.len();
        Ok(())
    }

    /// Batches elements so that the stream sees few large writes.
    fn write_basic_slice<T: Basic>(&mut self, values: &[T]) -> Result<()> {
        let mut chunk = [0u8; CHUNK_LEN];
        for group in values.chunks(CHUNK_LEN / T::SIZE) {
            let len = group.len() * T::SIZE;
            for (value, dst) in group.iter().zip(chunk[..len].chunks_exact_mut(T::SIZE)) {
                value.put(dst);
            }
            self.write_bytes(&chunk[..len])?;
        }
        Ok(())
    }
}

/// A [`Reader`] over any [`Read`], tracking how much was read.
pub struct BinaryReader<R: Read> {
    r: R,
    r_len: usize,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(r: R) -> Self {
        Self { r, r_len: 0 }
    }
    pub fn read_len(&self) -> ReadLen {
        ReadLen(self.r_len)
    }
    pub fn into_inner(self) -> R {
        self.r
    }
}

impl<R: Read> Reader for BinaryReader<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.r.read_exact(buf)?;
        self.r_len += buf.len();
        Ok(())
    }

    fn read_basic_slice<T: Basic>(&mut self, dst: &mut [T]) -> Result<()> {
        let mut chunk = [0u8; CHUNK_LEN];
        for group in dst.chunks_mut(CHUNK_LEN / T::SIZE) {
            let len = group.len() * T::SIZE;
            self.read_bytes(&mut chunk[..len])?;
            for (value, src) in group.iter_mut().zip(chunk[..len].chunks_exact(T::SIZE)) {
                *value = T::get(src)?;
            }
        }
        Ok(())
    }
}
