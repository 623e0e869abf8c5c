use anyhow::{anyhow, Result};
use derive_more::{Deref, DerefMut, From};
use std::marker::PhantomData;
use std::str::FromStr;

/// Two named members. Shaped like a 2-tuple but tagged as a pair.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct Pair<A, B> {
    pub first: A,
    pub second: B,
}
impl<A, B> From<(A, B)> for Pair<A, B> {
    fn from((first, second): (A, B)) -> Self {
        Self { first, second }
    }
}

/// A grouping of the member types of tuple `T`. Has no data of its own.
pub struct TypeList<T>(PhantomData<T>);

/// A value embedded in the Format instead of the data stream.
/// Classified, but Formats for it are not produced yet.
#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct Constant<T>(pub T);

/// Serializes `T` so that encoded values compare with memcmp in the same order as `T`.
#[derive(From, Deref, DerefMut, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct Ordered<T>(pub T);

/// A null-terminated UTF-16 string, held without its terminator.
/// The wide counterpart of [`std::ffi::CString`].
#[derive(Deref, PartialEq, Eq, Hash, Clone, Default, Debug)]
pub struct WideCString(Vec<u16>);

impl WideCString {
    /// Fails if `units` contains a null unit.
    pub fn new(units: impl Into<Vec<u16>>) -> Result<Self> {
        let units = units.into();
        if let Some(i) = units.iter().position(|u| *u == 0) {
            return Err(anyhow!("Null unit at {} in a wide C string", i));
        }
        Ok(Self(units))
    }

    pub fn as_units(&self) -> &[u16] {
        &self.0
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }
}

impl FromStr for WideCString {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.encode_utf16().collect::<Vec<_>>())
    }
}
