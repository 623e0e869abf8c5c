use crate::serde::{
    BasicTypeId, ContainerTypeId, DescriptorCursor, ModifierFlags, TypeElement, TypeId,
};
use anyhow::{anyhow, Result};
use log::{debug, trace};

const MAX_DEPTH: usize = 64;

/// An owned, fully parsed descriptor. What a reader without the Rust types knows about the data.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Shape {
    Basic {
        id: BasicTypeId,
        modifiers: ModifierFlags,
    },
    /// Basic elements. `count` is present iff the Format fixes it.
    BasicArray {
        id: BasicTypeId,
        modifiers: ModifierFlags,
        count: Option<u64>,
    },
    Container {
        id: ContainerTypeId,
        element: Box<Shape>,
        count: Option<u64>,
    },
    /// Tuples, type lists and adapted types.
    Members { id: TypeId, members: Vec<Shape> },
}

impl Shape {
    pub fn parse(descriptor: &[u8]) -> Result<Self> {
        let mut cursor = DescriptorCursor::new(descriptor)?;
        let shape = Self::read(&mut cursor, 0)?;
        if cursor.offset() < cursor.byte_size() {
            debug!(
                "Descriptor has {} trailing Format bytes after {:?}",
                cursor.byte_size() - cursor.offset(),
                shape
            );
        }
        trace!("Parsed {:?}", shape);
        Ok(shape)
    }

    fn read(cursor: &mut DescriptorCursor, depth: usize) -> Result<Self> {
        if depth > MAX_DEPTH {
            return Err(anyhow!("Descriptor nests deeper than {}", MAX_DEPTH));
        }
        let shape = match cursor.read_type()? {
            TypeElement::Basic(basic) => Shape::Basic {
                id: basic.basic_type_id(),
                modifiers: basic.modifiers(),
            },
            TypeElement::BasicArray(basic) => Shape::BasicArray {
                id: basic.basic_type_id(),
                modifiers: basic.modifiers(),
                count: None,
            },
            TypeElement::FixedSizeBasicArray(array) => Shape::BasicArray {
                id: array.basic_type_id(),
                modifiers: array.header().modifiers(),
                count: Some(array.array_size()),
            },
            TypeElement::Container(container) => {
                let id = container
                    .header()
                    .container_type_id()
                    .ok_or(anyhow!("Container without a container id"))?;
                let element = Self::read(&mut container.element(), depth + 1)?;
                Shape::Container {
                    id,
                    element: Box::new(element),
                    count: container.count(),
                }
            }
            TypeElement::Tuple(tuple) => {
                let mut members_cursor = tuple.cursor();
                let members = (0..tuple.member_count())
                    .map(|_| Self::read(&mut members_cursor, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Shape::Members {
                    id: tuple.header().type_id(),
                    members,
                }
            }
        };
        Ok(shape)
    }

    /// The member shapes, or empty for non-members shapes.
    pub fn members(&self) -> &[Shape] {
        match self {
            Shape::Members { members, .. } => members,
            _ => &[],
        }
    }

    /// Bytes every value of this shape occupies, if that does not depend on the value.
    pub fn fixed_buffer_size(&self) -> Option<usize> {
        match self {
            Shape::Basic { id, .. } => basic_size(*id),
            Shape::BasicArray {
                id,
                modifiers,
                count: Some(count),
            } if !modifiers.contains(ModifierFlags::SEQUENCE) => {
                basic_size(*id)?.checked_mul(usize::try_from(*count).ok()?)
            }
            Shape::BasicArray { .. } => None,
            Shape::Container {
                element,
                count: Some(count),
                ..
            } => element
                .fixed_buffer_size()?
                .checked_mul(usize::try_from(*count).ok()?),
            Shape::Container { .. } => None,
            Shape::Members { members, .. } => members
                .iter()
                .try_fold(0usize, |acc, m| acc.checked_add(m.fixed_buffer_size()?)),
        }
    }
}

pub fn basic_size(id: BasicTypeId) -> Option<usize> {
    let size = match id {
        BasicTypeId::Unknown => return None,
        BasicTypeId::Boolean | BasicTypeId::Char | BasicTypeId::SByte | BasicTypeId::Byte => 1,
        BasicTypeId::WChar | BasicTypeId::Int16 | BasicTypeId::UInt16 => 2,
        BasicTypeId::Int32 | BasicTypeId::UInt32 | BasicTypeId::Single => 4,
        BasicTypeId::Int64
        | BasicTypeId::UInt64
        | BasicTypeId::Double
        | BasicTypeId::TimeSpan
        | BasicTypeId::DateTime
        | BasicTypeId::Currency => 8,
        BasicTypeId::Guid => 16,
    };
    Some(size)
}
