use crate::types::Category;
use anyhow::{anyhow, Result};
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::any;
use std::fmt;

/// The raw byte a [`TypeId`] is stored as.
#[derive(From, Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct TypeIdInt(u8);
impl From<TypeId> for TypeIdInt {
    fn from(type_id: TypeId) -> Self {
        Self(type_id.to_u8())
    }
}

/// Ids are part of the wire format. Never renumber.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum BasicTypeId {
    Unknown = 0,
    Boolean = 1,
    Char = 2,
    SByte = 3,
    Byte = 4,
    WChar = 5,
    Int16 = 6,
    UInt16 = 7,
    Int32 = 8,
    UInt32 = 9,
    Int64 = 10,
    UInt64 = 11,
    Single = 12,
    Double = 13,
    TimeSpan = 14,
    DateTime = 15,
    Currency = 16,
    Guid = 17,
}
pub const BASIC_TYPE_ID_MIN: BasicTypeId = BasicTypeId::Boolean;
pub const BASIC_TYPE_ID_MAX: BasicTypeId = BasicTypeId::Guid;

impl BasicTypeId {
    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            Self::Unknown | Self::Boolean | Self::Char | Self::WChar | Self::Single | Self::Double
        )
    }
}

#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum ContainerTypeId {
    StdArray = 128,
    StdVector = 129,
    StdVectorBool = 130,
    StdDeque = 131,
    StdForwardList = 132,
    StdList = 133,
    StdSet = 134,
    StdMap = 135,
    StdMultiset = 136,
    StdMultimap = 137,
    StdUnorderedSet = 138,
    StdUnorderedMap = 139,
    StdUnorderedMultiset = 140,
    StdUnorderedMultimap = 141,
    StdStack = 142,
    StdQueue = 143,
    StdPriorityQueue = 144,
    StdSpan = 145,
    StdBasicString = 146,
    StdBasicStringView = 147,
    BasicString = 148,
    BasicStringView = 149,
    Vector = 150,
}

#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum TupleTypeId {
    StdPair = 200,
    StdTuple = 201,
    Tuple = 202,
}

#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum UtilityTypeId {
    Pointer = 210,
    Array = 211,
    StdSharedPtr = 212,
    StdUniquePtr = 213,
    StdVariant = 214,
    StdOptional = 215,
    StdAny = 216,
    TypeList = 217,
    Adapted = 218,
}

/// Any id that may lead a Format.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum TypeId {
    Basic(BasicTypeId),
    Container(ContainerTypeId),
    Tuple(TupleTypeId),
    Utility(UtilityTypeId),
}

impl TypeId {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Basic(id) => id as u8,
            Self::Container(id) => id as u8,
            Self::Tuple(id) => id as u8,
            Self::Utility(id) => id as u8,
        }
    }

    pub const fn basic(self) -> Option<BasicTypeId> {
        match self {
            Self::Basic(id) => Some(id),
            _ => None,
        }
    }

    /// The shape category a Format led by this id belongs to.
    /// Basic ids are refined further by their modifiers.
    pub fn category(self) -> Category {
        match self {
            Self::Basic(_) => Category::Basic,
            Self::Container(_) => Category::Container,
            Self::Tuple(_) => Category::Tuple,
            Self::Utility(id) => match id {
                UtilityTypeId::Pointer => Category::Pointer,
                UtilityTypeId::Array => Category::Array,
                UtilityTypeId::StdSharedPtr => Category::SharedPtr,
                UtilityTypeId::StdUniquePtr => Category::UniquePtr,
                UtilityTypeId::StdVariant => Category::Variant,
                UtilityTypeId::StdOptional => Category::Optional,
                UtilityTypeId::StdAny => Category::Variant,
                UtilityTypeId::TypeList => Category::TypeList,
                UtilityTypeId::Adapted => Category::Adapted,
            },
        }
    }
}

impl TryFrom<TypeIdInt> for TypeId {
    type Error = anyhow::Error;
    fn try_from(int: TypeIdInt) -> Result<Self> {
        let id = int.0;
        let type_id = if let Some(id) = BasicTypeId::from_u8(id) {
            TypeId::Basic(id)
        } else if let Some(id) = ContainerTypeId::from_u8(id) {
            TypeId::Container(id)
        } else if let Some(id) = TupleTypeId::from_u8(id) {
            TypeId::Tuple(id)
        } else if let Some(id) = UtilityTypeId::from_u8(id) {
            TypeId::Utility(id)
        } else {
            return Err(anyhow!("Unknown {} {}", any::type_name::<TypeIdInt>(), id));
        };
        Ok(type_id)
    }
}

impl From<BasicTypeId> for TypeId {
    fn from(id: BasicTypeId) -> Self {
        Self::Basic(id)
    }
}
impl From<ContainerTypeId> for TypeId {
    fn from(id: ContainerTypeId) -> Self {
        Self::Container(id)
    }
}
impl From<TupleTypeId> for TypeId {
    fn from(id: TupleTypeId) -> Self {
        Self::Tuple(id)
    }
}
impl From<UtilityTypeId> for TypeId {
    fn from(id: UtilityTypeId) -> Self {
        Self::Utility(id)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(id) => write!(f, "{:?}", id),
            Self::Container(id) => write!(f, "{:?}", id),
            Self::Tuple(id) => write!(f, "{:?}", id),
            Self::Utility(id) => write!(f, "{:?}", id),
        }
    }
}
