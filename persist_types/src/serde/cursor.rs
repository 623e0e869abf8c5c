use crate::serde::{
    decode_7bit, BasicTypeId, ContainerTypeId, ModifierFlags, TupleTypeId, TypeId, TypeIdInt,
    UtilityTypeId,
};
use crate::types::Category;
use anyhow::{anyhow, Result};

/// The only schema version written so far.
pub const SCHEMA_VERSION: u8 = 1;

/// The `(type id, modifiers)` pair that leads every Format.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TypeHeader {
    type_id: TypeId,
    modifiers: ModifierFlags,
}

impl TypeHeader {
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
    pub fn modifiers(&self) -> ModifierFlags {
        self.modifiers
    }
    pub fn basic_type_id(&self) -> Option<BasicTypeId> {
        self.type_id.basic()
    }
    pub fn tuple_type_id(&self) -> Option<TupleTypeId> {
        match self.type_id {
            TypeId::Tuple(id) => Some(id),
            _ => None,
        }
    }
    pub fn container_type_id(&self) -> Option<ContainerTypeId> {
        match self.type_id {
            TypeId::Container(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_basic_type(&self) -> bool {
        self.basic_type_id().is_some() && !self.modifiers.contains(ModifierFlags::ARRAY)
    }
    /// Strings and vectors of basic elements.
    pub fn is_basic_array_type(&self) -> bool {
        self.basic_type_id().is_some()
            && self.modifiers.contains(ModifierFlags::ARRAY)
            && !self.modifiers.contains(ModifierFlags::FIXED)
    }
    pub fn is_fixed_size_basic_array_type(&self) -> bool {
        self.basic_type_id().is_some()
            && self
                .modifiers
                .contains(ModifierFlags::ARRAY.union(ModifierFlags::FIXED))
    }
    pub fn is_container_type(&self) -> bool {
        self.container_type_id().is_some()
    }
    pub fn is_tuple_type(&self) -> bool {
        self.tuple_type_id().is_some()
    }
    pub fn is_type_list_type(&self) -> bool {
        self.type_id == TypeId::Utility(UtilityTypeId::TypeList)
    }
    pub fn is_adapted_type(&self) -> bool {
        self.type_id == TypeId::Utility(UtilityTypeId::Adapted)
    }
    /// Whether members follow as `(byte size, count, member Formats...)`.
    pub fn has_members(&self) -> bool {
        self.is_tuple_type() || self.is_type_list_type() || self.is_adapted_type()
    }

    pub fn category(&self) -> Category {
        if self.is_fixed_size_basic_array_type() {
            Category::Array
        } else if self.is_basic_array_type() {
            Category::Container
        } else {
            self.type_id.category()
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct BasicType {
    header: TypeHeader,
}
impl BasicType {
    pub fn header(&self) -> TypeHeader {
        self.header
    }
    pub fn is_basic_type(&self) -> bool {
        self.header.is_basic_type()
    }
    pub fn basic_type_id(&self) -> BasicTypeId {
        self.header.basic_type_id().unwrap_or(BasicTypeId::Unknown)
    }
    pub fn modifiers(&self) -> ModifierFlags {
        self.header.modifiers
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct FixedSizeBasicArrayType {
    element: BasicType,
    array_size: u64,
}
impl FixedSizeBasicArrayType {
    pub fn header(&self) -> TypeHeader {
        self.element.header
    }
    pub fn basic_type_id(&self) -> BasicTypeId {
        self.element.basic_type_id()
    }
    pub fn array_size(&self) -> u64 {
        self.array_size
    }
}

/// A container of non-basic elements. The element's shape is a complete nested descriptor.
#[derive(Clone, Debug)]
pub struct ContainerType<'a> {
    header: TypeHeader,
    element: DescriptorCursor<'a>,
    count: Option<u64>,
}
impl<'a> ContainerType<'a> {
    pub fn header(&self) -> TypeHeader {
        self.header
    }
    pub fn element(&self) -> DescriptorCursor<'a> {
        self.element.clone()
    }
    /// The element count of fixed-size containers.
    pub fn count(&self) -> Option<u64> {
        self.count
    }
}

/// A tuple, type list, or adapted type.
#[derive(Clone, Debug)]
pub struct TupleType<'a> {
    header: TypeHeader,
    members: DescriptorCursor<'a>,
}
impl<'a> TupleType<'a> {
    pub fn header(&self) -> TypeHeader {
        self.header
    }
    pub fn tuple_type_id(&self) -> Option<TupleTypeId> {
        self.header.tuple_type_id()
    }
    pub fn member_count(&self) -> usize {
        self.members.size
    }
    /// A cursor over the members.
    pub fn cursor(&self) -> DescriptorCursor<'a> {
        self.members.clone()
    }
}

/// Any one element a cursor can read.
#[derive(Clone, Debug)]
pub enum TypeElement<'a> {
    Basic(BasicType),
    BasicArray(BasicType),
    FixedSizeBasicArray(FixedSizeBasicArrayType),
    Container(ContainerType<'a>),
    Tuple(TupleType<'a>),
}

/// Walks the Formats in a descriptor without allocating.
///
/// A cursor spans [`Self::size`] consecutive Formats within [`Self::byte_size`] bytes.
/// All reads are bounds-checked against that span.
#[derive(Clone, Debug)]
pub struct DescriptorCursor<'a> {
    format: &'a [u8],
    pos: usize,
    size: usize,
    read: usize,
}

impl<'a> DescriptorCursor<'a> {
    /// Opens a descriptor: `(7-bit Format len, version, Format)`. Trailing bytes are ignored.
    pub fn new(descriptor: &'a [u8]) -> Result<Self> {
        let (len_len, format_len) = decode_7bit(descriptor)?;
        let version = *descriptor
            .get(len_len)
            .ok_or(anyhow!("Descriptor ends before its version byte"))?;
        if version != SCHEMA_VERSION {
            return Err(anyhow!("Unsupported descriptor version {}", version));
        }
        let start = len_len + 1;
        let format = usize::try_from(format_len)
            .ok()
            .and_then(|len| descriptor.get(start..start.checked_add(len)?))
            .ok_or(anyhow!(
                "Descriptor declares {} Format bytes, but only {} follow",
                format_len,
                descriptor.len().saturating_sub(start)
            ))?;
        Ok(Self::over(format, 1))
    }

    fn over(format: &'a [u8], size: usize) -> Self {
        Self {
            format,
            pos: 0,
            size,
            read: 0,
        }
    }

    /// Length of the whole descriptor `new()` would accept at the front of `descriptor`.
    pub fn descriptor_len(descriptor: &[u8]) -> Result<usize> {
        let (len_len, format_len) = decode_7bit(descriptor)?;
        usize::try_from(format_len)
            .ok()
            .and_then(|len| len_len.checked_add(1)?.checked_add(len))
            .ok_or(anyhow!("Descriptor declares {} Format bytes", format_len))
    }

    pub fn byte_size(&self) -> usize {
        self.format.len()
    }
    pub fn size(&self) -> usize {
        self.size
    }
    pub fn remaining(&self) -> usize {
        self.size - self.read
    }
    pub fn is_at_end(&self) -> bool {
        self.read == self.size
    }
    /// Byte offset of the next Format within the span.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn current_type(&self) -> Result<TypeHeader> {
        if self.is_at_end() {
            return Err(anyhow!("All {} types have been read", self.size));
        }
        match self.format.get(self.pos..self.pos + 2) {
            Some(&[id, modifiers]) => {
                let type_id = TypeId::try_from(TypeIdInt::from(id))?;
                let modifiers = ModifierFlags::from(modifiers).validate()?;
                Ok(TypeHeader {
                    type_id,
                    modifiers,
                })
            }
            _ => Err(anyhow!("Format truncated at type header, offset {}", self.pos)),
        }
    }

    /* Peeks. Malformed input reads as false/None. */

    pub fn is_basic_type(&self) -> bool {
        self.current_type().is_ok_and(|h| h.is_basic_type())
    }
    pub fn is_fixed_size_basic_array_type(&self) -> bool {
        self.current_type()
            .is_ok_and(|h| h.is_fixed_size_basic_array_type())
    }
    pub fn is_tuple_type(&self) -> bool {
        self.current_type().is_ok_and(|h| h.is_tuple_type())
    }
    pub fn modifiers(&self) -> ModifierFlags {
        self.current_type()
            .map(|h| h.modifiers)
            .unwrap_or_default()
    }
    pub fn tuple_type_id(&self) -> Option<TupleTypeId> {
        self.current_type().ok().and_then(|h| h.tuple_type_id())
    }

    /* Reads */

    pub fn read_basic_type(&mut self) -> Result<BasicType> {
        let header = self.expect(TypeHeader::is_basic_type, "basic")?;
        self.advance_header();
        Ok(BasicType { header })
    }

    pub fn read_basic_array_type(&mut self) -> Result<BasicType> {
        let header = self.expect(TypeHeader::is_basic_array_type, "basic array")?;
        self.advance_header();
        Ok(BasicType { header })
    }

    pub fn read_fixed_size_basic_array_type(&mut self) -> Result<FixedSizeBasicArrayType> {
        let header = self.expect(
            TypeHeader::is_fixed_size_basic_array_type,
            "fixed-size basic array",
        )?;
        let mut pos = self.pos + 2;
        let array_size = self.varint(&mut pos)?;
        self.finish(pos);
        Ok(FixedSizeBasicArrayType {
            element: BasicType { header },
            array_size,
        })
    }

    pub fn read_container_type(&mut self) -> Result<ContainerType<'a>> {
        let header = self.expect(TypeHeader::is_container_type, "container")?;
        let mut pos = self.pos + 2;
        let nested = &self.format[pos..];
        let element = DescriptorCursor::new(nested)?;
        let nested_len = Self::descriptor_len(nested)?;
        pos += nested_len;
        let count = if header.modifiers.contains(ModifierFlags::FIXED) {
            Some(self.varint(&mut pos)?)
        } else {
            None
        };
        self.finish(pos);
        Ok(ContainerType {
            header,
            element,
            count,
        })
    }

    pub fn read_tuple_type(&mut self) -> Result<TupleType<'a>> {
        let header = self.expect(TypeHeader::is_tuple_type, "tuple")?;
        self.read_members(header)
    }
    pub fn read_type_list_type(&mut self) -> Result<TupleType<'a>> {
        let header = self.expect(TypeHeader::is_type_list_type, "type list")?;
        self.read_members(header)
    }
    pub fn read_adapted_type(&mut self) -> Result<TupleType<'a>> {
        let header = self.expect(TypeHeader::is_adapted_type, "adapted")?;
        self.read_members(header)
    }

    pub fn read_type(&mut self) -> Result<TypeElement<'a>> {
        let header = self.current_type()?;
        if header.is_basic_type() {
            Ok(TypeElement::Basic(self.read_basic_type()?))
        } else if header.is_fixed_size_basic_array_type() {
            Ok(TypeElement::FixedSizeBasicArray(
                self.read_fixed_size_basic_array_type()?,
            ))
        } else if header.is_basic_array_type() {
            Ok(TypeElement::BasicArray(self.read_basic_array_type()?))
        } else if header.is_container_type() {
            Ok(TypeElement::Container(self.read_container_type()?))
        } else if header.has_members() {
            self.read_members(header).map(TypeElement::Tuple)
        } else {
            Err(anyhow!(
                "{} ({:?}) has no readable Format",
                header.type_id,
                header.category()
            ))
        }
    }

    pub fn skip(&mut self) -> Result<()> {
        self.read_type().map(|_| ())
    }

    fn expect(&self, pred: fn(&TypeHeader) -> bool, what: &str) -> Result<TypeHeader> {
        let header = self.current_type()?;
        if !pred(&header) {
            return Err(anyhow!(
                "Expected {} type at offset {}, found {} with {:?}",
                what,
                self.pos,
                header.type_id,
                header.modifiers
            ));
        }
        Ok(header)
    }

    fn read_members(&mut self, header: TypeHeader) -> Result<TupleType<'a>> {
        let mut pos = self.pos + 2;
        let inner_len = usize::try_from(self.varint(&mut pos)?)?;
        let count = usize::try_from(self.varint(&mut pos)?)?;
        let members = pos
            .checked_add(inner_len)
            .and_then(|end| self.format.get(pos..end))
            .ok_or(anyhow!(
                "Members declare {} bytes, but only {} remain",
                inner_len,
                self.format.len().saturating_sub(pos)
            ))?;
        if count > members.len() / 2 {
            return Err(anyhow!(
                "{} members cannot fit in {} bytes",
                count,
                members.len()
            ));
        }
        self.finish(pos + inner_len);
        Ok(TupleType {
            header,
            members: Self::over(members, count),
        })
    }

    fn varint(&self, pos: &mut usize) -> Result<u64> {
        let rest = self.format.get(*pos..).unwrap_or(&[]);
        let (len, n) = decode_7bit(rest)?;
        *pos += len;
        Ok(n)
    }

    fn advance_header(&mut self) {
        self.finish(self.pos + 2);
    }
    fn finish(&mut self, pos: usize) {
        self.pos = pos;
        self.read += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn nested_tuple() -> Result<()> {
        // (Tuple(i32, f64), Tuple(bool, i64))
        let descriptor = [
            0x14, 0x01, 202, 0x00, 0x10, 0x02, //
            202, 0x00, 0x04, 0x02, 0x08, 0x00, 0x0D, 0x00, //
            202, 0x00, 0x04, 0x02, 0x01, 0x00, 0x0A, 0x00,
        ];
        let mut cursor = DescriptorCursor::new(&descriptor)?;
        assert_eq!(20, cursor.byte_size());
        assert_eq!(1, cursor.size());
        assert!(cursor.is_tuple_type());

        let outer = cursor.read_tuple_type()?;
        assert_eq!(Some(TupleTypeId::Tuple), outer.tuple_type_id());
        assert_eq!(2, outer.member_count());
        assert!(cursor.is_at_end());

        let mut members = outer.cursor();
        let first = members.read_tuple_type()?;
        let mut first = first.cursor();
        assert_eq!(BasicTypeId::Int32, first.read_basic_type()?.basic_type_id());
        assert_eq!(BasicTypeId::Double, first.read_basic_type()?.basic_type_id());
        assert!(first.read_basic_type().is_err());

        let second = members.read_tuple_type()?;
        let mut second = second.cursor();
        assert_eq!(BasicTypeId::Boolean, second.read_basic_type()?.basic_type_id());
        assert_eq!(BasicTypeId::Int64, second.read_basic_type()?.basic_type_id());
        assert!(members.is_at_end());
        Ok(())
    }

    #[test]
    fn fixed_array() -> Result<()> {
        let descriptor = [0x04, 0x01, 0x02, 0x03, 0x80, 0x10];
        let mut cursor = DescriptorCursor::new(&descriptor)?;
        assert_eq!(4, cursor.byte_size());
        let header = cursor.current_type()?;
        assert!(header.is_fixed_size_basic_array_type());
        assert_eq!(Category::Array, header.category());
        let array = cursor.read_fixed_size_basic_array_type()?;
        assert_eq!(BasicTypeId::Char, array.basic_type_id());
        assert_eq!(2048, array.array_size());
        Ok(())
    }

    #[test]
    fn container_of_tuples() -> Result<()> {
        // Vec<(u8, bool)>
        let descriptor = [
            0x0C, 0x01, 129, 0x01, //
            0x08, 0x01, 202, 0x00, 0x04, 0x02, 0x04, 0x00, 0x01, 0x00,
        ];
        let mut cursor = DescriptorCursor::new(&descriptor)?;
        let container = cursor.read_container_type()?;
        assert_eq!(
            Some(ContainerTypeId::StdVector),
            container.header().container_type_id()
        );
        assert_eq!(None, container.count());
        let mut element = container.element();
        let tuple = element.read_tuple_type()?;
        assert_eq!(2, tuple.member_count());
        assert!(cursor.is_at_end());
        Ok(())
    }

    #[test]
    fn malformed() {
        // Wrong version
        assert!(DescriptorCursor::new(&[0x02, 0x02, 0x01, 0x00]).is_err());
        // Declared length past the end
        assert!(DescriptorCursor::new(&[0x05, 0x01, 0x01, 0x00]).is_err());
        // Unknown type id
        let mut cursor = DescriptorCursor::new(&[0x02, 0x01, 0x63, 0x00]).unwrap();
        assert!(cursor.current_type().is_err());
        assert!(!cursor.is_basic_type());
        assert!(cursor.skip().is_err());
        // Sequence without BigEndian
        let cursor = DescriptorCursor::new(&[0x02, 0x01, 0x08, 0x10]).unwrap();
        assert!(cursor.current_type().is_err());
        // Member count larger than member bytes allow
        let mut cursor =
            DescriptorCursor::new(&[0x06, 0x01, 202, 0x00, 0x02, 0x05, 0x01, 0x00]).unwrap();
        assert!(cursor.read_tuple_type().is_err());
    }

    #[test]
    fn oversized_nested_length() {
        assert!(DescriptorCursor::descriptor_len(&[0xFF; 9]).is_err());

        // Vec of an element whose descriptor declares u64::MAX Format bytes
        let mut descriptor = vec![11, 0x01, 129, 0x01];
        descriptor.extend_from_slice(&[0xFF; 9]);
        let mut cursor = DescriptorCursor::new(&descriptor).unwrap();
        assert!(cursor.read_container_type().is_err());

        let mut cursor = DescriptorCursor::new(&descriptor).unwrap();
        assert!(cursor.read_type().is_err());
    }
}
