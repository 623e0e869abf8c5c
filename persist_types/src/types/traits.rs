use crate::serde::{BasicTypeId, ContainerTypeId, ModifierFlags, TupleTypeId, TypeId, UtilityTypeId};
use crate::types::{
    Char, Constant, Currency, DateTime, Guid, Ordered, Pair, TimeSpan, TypeList, WChar, WideCString,
};
use std::ffi::{CStr, CString};
use std::rc::Rc;
use std::sync::Arc;

/// Shape categories, in classification precedence order.
///
/// A Rust type lands in exactly one category through its [`TypeTraits`] impl.
/// Types with no impl are unsupported and fail to compile wherever a Format or codec is needed.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Category {
    Basic,
    /// Fixed-size array of basic elements.
    Array,
    /// Null-terminated character string: [`CStr`]/[`CString`] for narrow characters,
    /// [`WideCString`] for wide ones. `Vec<WChar>` is a vector, not a pointer.
    Pointer,
    /// Fixed-size array of non-basic elements, vectors, and strings.
    Container,
    Tuple,
    Optional,
    UniquePtr,
    SharedPtr,
    Variant,
    TypeList,
    Constant,
    Adapted,
}

impl Category {
    pub const fn is_basic(self) -> bool {
        matches!(self, Self::Basic)
    }

    /// Whether Formats and codecs exist for the category.
    /// The others are classified so that they can be recognized and rejected.
    pub const fn is_supported(self) -> bool {
        !matches!(
            self,
            Self::Optional | Self::UniquePtr | Self::SharedPtr | Self::Variant | Self::Constant
        )
    }
}

/// Static classification of a type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no persistent shape",
    note = "supported shapes are basic scalars, arrays, strings, vectors, tuples, and types declared with `adapt!`"
)]
pub trait TypeTraits {
    const CATEGORY: Category;
    /// Leads this type's Format.
    const TYPE_ID: TypeId;
    /// Modifiers in this type's Format header.
    const MODIFIERS: ModifierFlags = ModifierFlags::NONE;
    /// Whether every value of the type serializes to the same number of bytes.
    const IS_FIXED_SIZE: bool;

    /// A basic scalar in its default little-endian form.
    /// Arrays and vectors of these are described by the element's id alone.
    const IS_PLAIN_BASIC: bool = Self::CATEGORY.is_basic() && Self::MODIFIERS.bits() == 0;
}

macro_rules! impl_basic_traits {
    ($($t:ty),* $(,)?) => {
        $(
            impl TypeTraits for $t {
                const CATEGORY: Category = Category::Basic;
                const TYPE_ID: TypeId = TypeId::Basic(<$t as crate::types::Basic>::TYPE_ID);
                const IS_FIXED_SIZE: bool = true;
            }
        )*
    };
}
impl_basic_traits!(
    bool, i8, u8, i16, u16, i32, u32, i64, u64, f32, f64, Char, WChar, TimeSpan, DateTime,
    Currency, Guid,
);

/* Arrays and containers */

impl<T: TypeTraits, const N: usize> TypeTraits for [T; N] {
    const CATEGORY: Category = if T::IS_PLAIN_BASIC {
        Category::Array
    } else {
        Category::Container
    };
    const TYPE_ID: TypeId = if T::IS_PLAIN_BASIC {
        T::TYPE_ID
    } else {
        TypeId::Container(ContainerTypeId::StdArray)
    };
    const MODIFIERS: ModifierFlags = ModifierFlags::ARRAY.union(ModifierFlags::FIXED);
    const IS_FIXED_SIZE: bool = T::IS_FIXED_SIZE;
}

impl<T: TypeTraits> TypeTraits for [T] {
    const CATEGORY: Category = Category::Container;
    const TYPE_ID: TypeId = if T::IS_PLAIN_BASIC {
        T::TYPE_ID
    } else {
        TypeId::Container(ContainerTypeId::StdVector)
    };
    const MODIFIERS: ModifierFlags = ModifierFlags::ARRAY;
    const IS_FIXED_SIZE: bool = false;
}
impl<T: TypeTraits> TypeTraits for Vec<T> {
    const CATEGORY: Category = <[T] as TypeTraits>::CATEGORY;
    const TYPE_ID: TypeId = <[T] as TypeTraits>::TYPE_ID;
    const MODIFIERS: ModifierFlags = <[T] as TypeTraits>::MODIFIERS;
    const IS_FIXED_SIZE: bool = false;
}

impl TypeTraits for str {
    const CATEGORY: Category = Category::Container;
    const TYPE_ID: TypeId = TypeId::Basic(BasicTypeId::Char);
    const MODIFIERS: ModifierFlags = ModifierFlags::ARRAY;
    const IS_FIXED_SIZE: bool = false;
}
impl TypeTraits for String {
    const CATEGORY: Category = <str as TypeTraits>::CATEGORY;
    const TYPE_ID: TypeId = <str as TypeTraits>::TYPE_ID;
    const MODIFIERS: ModifierFlags = <str as TypeTraits>::MODIFIERS;
    const IS_FIXED_SIZE: bool = false;
}

impl TypeTraits for CStr {
    const CATEGORY: Category = Category::Pointer;
    const TYPE_ID: TypeId = TypeId::Basic(BasicTypeId::Char);
    const MODIFIERS: ModifierFlags = ModifierFlags::ARRAY;
    const IS_FIXED_SIZE: bool = false;
}
impl TypeTraits for CString {
    const CATEGORY: Category = <CStr as TypeTraits>::CATEGORY;
    const TYPE_ID: TypeId = <CStr as TypeTraits>::TYPE_ID;
    const MODIFIERS: ModifierFlags = <CStr as TypeTraits>::MODIFIERS;
    const IS_FIXED_SIZE: bool = false;
}
impl TypeTraits for WideCString {
    const CATEGORY: Category = Category::Pointer;
    const TYPE_ID: TypeId = TypeId::Basic(BasicTypeId::WChar);
    const MODIFIERS: ModifierFlags = ModifierFlags::ARRAY;
    const IS_FIXED_SIZE: bool = false;
}

/* Borrows classify as what they point at */

impl<T: TypeTraits + ?Sized> TypeTraits for &T {
    const CATEGORY: Category = T::CATEGORY;
    const TYPE_ID: TypeId = T::TYPE_ID;
    const MODIFIERS: ModifierFlags = T::MODIFIERS;
    const IS_FIXED_SIZE: bool = T::IS_FIXED_SIZE;
}
impl<T: TypeTraits + ?Sized> TypeTraits for &mut T {
    const CATEGORY: Category = T::CATEGORY;
    const TYPE_ID: TypeId = T::TYPE_ID;
    const MODIFIERS: ModifierFlags = T::MODIFIERS;
    const IS_FIXED_SIZE: bool = T::IS_FIXED_SIZE;
}

/* Tuples */

macro_rules! impl_tuple_traits {
    ($($name:ident)*) => {
        impl<$($name: TypeTraits),*> TypeTraits for ($($name,)*) {
            const CATEGORY: Category = Category::Tuple;
            const TYPE_ID: TypeId = TypeId::Tuple(TupleTypeId::Tuple);
            const IS_FIXED_SIZE: bool = true $(&& $name::IS_FIXED_SIZE)*;
        }
    };
}
impl_tuple_traits!();
impl_tuple_traits!(A);
impl_tuple_traits!(A B);
impl_tuple_traits!(A B C);
impl_tuple_traits!(A B C D);
impl_tuple_traits!(A B C D E);
impl_tuple_traits!(A B C D E F);
impl_tuple_traits!(A B C D E F G);
impl_tuple_traits!(A B C D E F G H);
impl_tuple_traits!(A B C D E F G H I);
impl_tuple_traits!(A B C D E F G H I J);
impl_tuple_traits!(A B C D E F G H I J K);
impl_tuple_traits!(A B C D E F G H I J K L);

impl<A: TypeTraits, B: TypeTraits> TypeTraits for Pair<A, B> {
    const CATEGORY: Category = Category::Tuple;
    const TYPE_ID: TypeId = TypeId::Tuple(TupleTypeId::StdPair);
    const IS_FIXED_SIZE: bool = A::IS_FIXED_SIZE && B::IS_FIXED_SIZE;
}

impl<T: TypeTraits> TypeTraits for TypeList<T> {
    const CATEGORY: Category = Category::TypeList;
    const TYPE_ID: TypeId = TypeId::Utility(UtilityTypeId::TypeList);
    const IS_FIXED_SIZE: bool = T::IS_FIXED_SIZE;
}

impl<T: TypeTraits> TypeTraits for Ordered<T> {
    const CATEGORY: Category = T::CATEGORY;
    const TYPE_ID: TypeId = T::TYPE_ID;
    const MODIFIERS: ModifierFlags = T::MODIFIERS
        .union(ModifierFlags::BIG_ENDIAN)
        .union(ModifierFlags::SEQUENCE);
    const IS_FIXED_SIZE: bool = T::IS_FIXED_SIZE;
}

/* Recognized, but without a codec */

impl<T> TypeTraits for Option<T> {
    const CATEGORY: Category = Category::Optional;
    const TYPE_ID: TypeId = TypeId::Utility(UtilityTypeId::StdOptional);
    const IS_FIXED_SIZE: bool = false;
}
impl<T: ?Sized> TypeTraits for Box<T> {
    const CATEGORY: Category = Category::UniquePtr;
    const TYPE_ID: TypeId = TypeId::Utility(UtilityTypeId::StdUniquePtr);
    const IS_FIXED_SIZE: bool = false;
}
impl<T: ?Sized> TypeTraits for Rc<T> {
    const CATEGORY: Category = Category::SharedPtr;
    const TYPE_ID: TypeId = TypeId::Utility(UtilityTypeId::StdSharedPtr);
    const IS_FIXED_SIZE: bool = false;
}
impl<T: ?Sized> TypeTraits for Arc<T> {
    const CATEGORY: Category = Category::SharedPtr;
    const TYPE_ID: TypeId = TypeId::Utility(UtilityTypeId::StdSharedPtr);
    const IS_FIXED_SIZE: bool = false;
}
impl<T: TypeTraits> TypeTraits for Constant<T> {
    const CATEGORY: Category = Category::Constant;
    const TYPE_ID: TypeId = T::TYPE_ID;
    const MODIFIERS: ModifierFlags = T::MODIFIERS.union(ModifierFlags::CONSTANT);
    const IS_FIXED_SIZE: bool = true;
}
