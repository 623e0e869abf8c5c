use crate::serde::{
    read_ordered, read_sequence, write_ordered, write_sequence, BasicTypeId, ModifierFlags,
    OrderedBasic, Reader, Shape, Writer,
};
use crate::types::{Char, Currency, DateTime, Guid, TimeSpan, WChar};
use anyhow::{anyhow, Result};
use itertools::Itertools;
use std::fmt;

/// Upper bound on elements reserved ahead of reading them.
const MAX_PREALLOC: usize = 1 << 12;

/// Most elements a sequence of zero-byte elements may declare.
/// Reading such elements consumes no input, so the input cannot bound the count.
pub const MAX_ZERO_SIZED_COUNT: usize = 1 << 16;

pub fn check_zero_sized_count(count: usize) -> Result<()> {
    if count > MAX_ZERO_SIZED_COUNT {
        return Err(anyhow!(
            "{} zero-byte elements exceed the limit of {}",
            count,
            MAX_ZERO_SIZED_COUNT
        ));
    }
    Ok(())
}

/// A value decoded by [`Shape`] alone, without the Rust type that wrote it.
#[derive(PartialEq, Clone, Debug)]
pub enum Value {
    Boolean(bool),
    Char(Char),
    SByte(i8),
    Byte(u8),
    WChar(WChar),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    TimeSpan(TimeSpan),
    DateTime(DateTime),
    Currency(Currency),
    Guid(Guid),
    /// A dynamically sized character array.
    Str(String),
    /// A memcmp-ordered byte string.
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
}

macro_rules! dispatch_basic {
    ($id:expr, $mac:ident) => {
        match $id {
            BasicTypeId::Boolean => $mac!(Boolean, bool),
            BasicTypeId::Char => $mac!(Char, Char),
            BasicTypeId::SByte => $mac!(SByte, i8),
            BasicTypeId::Byte => $mac!(Byte, u8),
            BasicTypeId::WChar => $mac!(WChar, WChar),
            BasicTypeId::Int16 => $mac!(Int16, i16),
            BasicTypeId::UInt16 => $mac!(UInt16, u16),
            BasicTypeId::Int32 => $mac!(Int32, i32),
            BasicTypeId::UInt32 => $mac!(UInt32, u32),
            BasicTypeId::Int64 => $mac!(Int64, i64),
            BasicTypeId::UInt64 => $mac!(UInt64, u64),
            BasicTypeId::Single => $mac!(Single, f32),
            BasicTypeId::Double => $mac!(Double, f64),
            BasicTypeId::TimeSpan => $mac!(TimeSpan, TimeSpan),
            BasicTypeId::DateTime => $mac!(DateTime, DateTime),
            BasicTypeId::Currency => $mac!(Currency, Currency),
            BasicTypeId::Guid => $mac!(Guid, Guid),
            BasicTypeId::Unknown => Err(anyhow!("Cannot move data of {:?}", BasicTypeId::Unknown)),
        }
    };
}

fn is_ordered(modifiers: ModifierFlags) -> bool {
    modifiers.contains(ModifierFlags::SEQUENCE)
}

impl Value {
    pub fn read<R: Reader + ?Sized>(shape: &Shape, r: &mut R) -> Result<Self> {
        match shape {
            Shape::Basic { id, modifiers } => Self::read_basic(*id, is_ordered(*modifiers), r),
            Shape::BasicArray {
                id,
                modifiers,
                count,
            } => {
                if is_ordered(*modifiers) {
                    return Self::read_ordered_array(*id, r);
                }
                let count = match count {
                    Some(count) => *count,
                    None => r.read_7bit_encoded()?,
                };
                let count = usize::try_from(count)?;
                let vals = Self::read_elements(count, r, |r| Self::read_basic(*id, false, r))?;
                if count_is_dynamic(shape) {
                    if let Some(s) = Self::chars_to_str(&vals) {
                        return Ok(Value::Str(s));
                    }
                }
                Ok(Value::Array(vals))
            }
            Shape::Container { element, count, .. } => {
                let count = match count {
                    Some(count) => *count,
                    None => r.read_7bit_encoded()?,
                };
                let count = usize::try_from(count)?;
                if element.fixed_buffer_size() == Some(0) {
                    check_zero_sized_count(count)?;
                }
                let vals = Self::read_elements(count, r, |r| Self::read(element, r))?;
                Ok(Value::Array(vals))
            }
            Shape::Members { members, .. } => {
                let vals = members
                    .iter()
                    .map(|m| Self::read(m, r))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Tuple(vals))
            }
        }
    }

    fn read_basic<R: Reader + ?Sized>(id: BasicTypeId, ordered: bool, r: &mut R) -> Result<Self> {
        macro_rules! read_as {
            ($variant:ident, $t:ty) => {
                if ordered {
                    read_ordered::<R, $t>(r).map(Value::$variant)
                } else {
                    r.read_basic::<$t>().map(Value::$variant)
                }
            };
        }
        dispatch_basic!(id, read_as)
    }

    fn read_ordered_array<R: Reader + ?Sized>(id: BasicTypeId, r: &mut R) -> Result<Self> {
        let data = read_sequence(r)?;
        match id {
            BasicTypeId::Char => Ok(Value::Str(String::from_utf8(data)?)),
            BasicTypeId::Byte => Ok(Value::Bytes(data)),
            _ => Err(anyhow!("No ordered array encoding for {:?}", id)),
        }
    }

    fn read_elements<R: Reader + ?Sized>(
        count: usize,
        r: &mut R,
        mut read_one: impl FnMut(&mut R) -> Result<Value>,
    ) -> Result<Vec<Value>> {
        let mut vals = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            vals.push(read_one(r)?);
        }
        Ok(vals)
    }

    fn chars_to_str(vals: &[Value]) -> Option<String> {
        match vals.first() {
            None => None,
            Some(Value::Char(_)) => {
                let bytes = vals
                    .iter()
                    .map(|v| match v {
                        Value::Char(c) => Some(c.0),
                        _ => None,
                    })
                    .collect::<Option<Vec<u8>>>()?;
                String::from_utf8(bytes).ok()
            }
            Some(Value::WChar(_)) => {
                let units = vals
                    .iter()
                    .map(|v| match v {
                        Value::WChar(c) => Some(c.0),
                        _ => None,
                    })
                    .collect::<Option<Vec<u16>>>()?;
                String::from_utf16(&units).ok()
            }
            Some(_) => None,
        }
    }

    pub fn write<W: Writer + ?Sized>(&self, shape: &Shape, w: &mut W) -> Result<()> {
        match (shape, self) {
            (Shape::Basic { id, modifiers }, val) => {
                val.write_basic(*id, is_ordered(*modifiers), w)
            }
            (Shape::BasicArray { id, modifiers, .. }, Value::Str(s)) if is_ordered(*modifiers) => {
                expect_id(*id, BasicTypeId::Char)?;
                write_sequence(w, s.as_bytes())
            }
            (Shape::BasicArray { id, modifiers, .. }, Value::Bytes(b)) if is_ordered(*modifiers) => {
                expect_id(*id, BasicTypeId::Byte)?;
                write_sequence(w, b)
            }
            (Shape::BasicArray { id, count, .. }, Value::Str(s)) => match id {
                BasicTypeId::Char => {
                    write_count(w, *count, s.len())?;
                    w.write_bytes(s.as_bytes())
                }
                BasicTypeId::WChar => {
                    let units = s.encode_utf16().collect::<Vec<_>>();
                    write_count(w, *count, units.len())?;
                    for unit in units {
                        w.write_basic(WChar(unit))?;
                    }
                    Ok(())
                }
                _ => Err(anyhow!("A string cannot be written as {:?} elements", id)),
            },
            (Shape::BasicArray { id, count, .. }, Value::Array(vals)) => {
                write_count(w, *count, vals.len())?;
                for val in vals {
                    val.write_basic(*id, false, w)?;
                }
                Ok(())
            }
            (Shape::Container { element, count, .. }, Value::Array(vals)) => {
                write_count(w, *count, vals.len())?;
                for val in vals {
                    val.write(element, w)?;
                }
                Ok(())
            }
            (Shape::Members { members, .. }, Value::Tuple(vals)) => {
                if members.len() != vals.len() {
                    return Err(anyhow!(
                        "Shape has {} members, value has {}",
                        members.len(),
                        vals.len()
                    ));
                }
                for (member, val) in members.iter().zip(vals) {
                    val.write(member, w)?;
                }
                Ok(())
            }
            (shape, val) => Err(anyhow!("{:?} does not fit {:?}", val, shape)),
        }
    }

    fn write_basic<W: Writer + ?Sized>(&self, id: BasicTypeId, ordered: bool, w: &mut W) -> Result<()> {
        macro_rules! write_as {
            ($variant:ident, $t:ty) => {
                match self {
                    Value::$variant(v) => put_basic::<W, $t>(w, v, ordered),
                    _ => Err(anyhow!("{:?} is not a {:?}", self, id)),
                }
            };
        }
        dispatch_basic!(id, write_as)
    }

    /// The integer value, for any integral variant.
    pub fn as_i128(&self) -> Option<i128> {
        let i = match self {
            Value::Boolean(v) => *v as i128,
            Value::Char(v) => v.0 as i128,
            Value::SByte(v) => *v as i128,
            Value::Byte(v) => *v as i128,
            Value::WChar(v) => v.0 as i128,
            Value::Int16(v) => *v as i128,
            Value::UInt16(v) => *v as i128,
            Value::Int32(v) => *v as i128,
            Value::UInt32(v) => *v as i128,
            Value::Int64(v) => *v as i128,
            Value::UInt64(v) => *v as i128,
            Value::TimeSpan(v) => v.0 as i128,
            Value::DateTime(v) => v.0 as i128,
            Value::Currency(v) => v.0 as i128,
            _ => return None,
        };
        Some(i)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Single(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => self.as_i128().map(|i| i as f64),
        }
    }
}

fn count_is_dynamic(shape: &Shape) -> bool {
    matches!(shape, Shape::BasicArray { count: None, .. })
}

fn expect_id(actual: BasicTypeId, expected: BasicTypeId) -> Result<()> {
    if actual != expected {
        return Err(anyhow!("Expected {:?} elements, shape has {:?}", expected, actual));
    }
    Ok(())
}

fn write_count<W: Writer + ?Sized>(w: &mut W, fixed: Option<u64>, len: usize) -> Result<()> {
    match fixed {
        Some(count) if count != len as u64 => Err(anyhow!(
            "Fixed-size array of {} cannot hold {} elements",
            count,
            len
        )),
        Some(_) => Ok(()),
        None => w.write_7bit_encoded(len as u64),
    }
}

fn put_basic<W: Writer + ?Sized, T: OrderedBasic>(w: &mut W, v: &T, ordered: bool) -> Result<()> {
    if ordered {
        write_ordered(w, v)
    } else {
        w.write_basic(*v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::SByte(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::WChar(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Single(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::TimeSpan(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v),
            Value::Currency(v) => write!(f, "{}", v),
            Value::Guid(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "{{{}}}", v.iter().join(";")),
            Value::Array(vals) => write!(f, "{{{}}}", vals.iter().join(";")),
            Value::Tuple(vals) => write!(f, "({})", vals.iter().join(";")),
        }
    }
}
