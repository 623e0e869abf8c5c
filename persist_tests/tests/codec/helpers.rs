use anyhow::{anyhow, Result};
use persist_format::{Describe, Persistent, Restore};
use persist_types::serde::Shape;
use persist_types::types::Value;
use std::fmt::Debug;

/// Writes `val`, checking that exactly `buffer_size` bytes were produced.
pub fn write_exact<T: Persistent + ?Sized>(val: &T) -> Result<Vec<u8>> {
    let mut buf = vec![];
    val.write(&mut buf)?;
    if buf.len() != val.buffer_size() {
        return Err(anyhow!(
            "Wrote {} bytes, but buffer_size is {}",
            buf.len(),
            val.buffer_size()
        ));
    }
    Ok(buf)
}

/// Checks, for one value:
/// - Write produces `buffer_size` bytes.
/// - Read consumes all of them and reproduces the value.
/// - A reader knowing only the descriptor decodes the data and re-encodes the same bytes.
pub fn verify_round_trip<T>(val: &T) -> Result<()>
where
    T: Restore + Default + PartialEq + Debug,
{
    let buf = write_exact(val)?;

    let mut r = &buf[..];
    let mut out = T::default();
    out.read(&mut r)?;
    assert_eq!(val, &out);
    assert!(r.is_empty(), "{} bytes left unread", r.len());

    let shape = Shape::parse(&T::descriptor())?;
    let mut r = &buf[..];
    let generic = Value::read(&shape, &mut r)?;
    assert!(r.is_empty());
    let mut rewritten = vec![];
    generic.write(&shape, &mut rewritten)?;
    assert_eq!(buf, rewritten, "{} rewrote differently", generic);

    if let Some(fixed) = shape.fixed_buffer_size() {
        assert_eq!(fixed, buf.len());
    }
    Ok(())
}
