use crate::describe::{push_members, Describe};
use crate::persistent::{Persistent, Restore};
use anyhow::Result;
use persist_types::serde::{Reader, Writer};
use persist_types::types::{Pair, TypeList, TypeTraits};

/// A fixed, ordered list of member types.
///
/// Aggregates are written member by member in declaration order, with no count,
/// since the count is already in the Format.
pub trait Fields {
    const COUNT: usize;

    /// Appends each member's Format, in order.
    fn fields_format(out: &mut Vec<u8>);
}

macro_rules! count {
    () => { 0 };
    ($head:ident $($tail:ident)*) => { 1 + count!($($tail)*) };
}

macro_rules! impl_tuple {
    ($($name:ident $idx:tt)*) => {
        impl<$($name: Describe),*> Fields for ($($name,)*) {
            const COUNT: usize = count!($($name)*);
            #[allow(unused_variables)]
            fn fields_format(out: &mut Vec<u8>) {
                $($name::format(out);)*
            }
        }
        impl<$($name: Describe),*> Describe for ($($name,)*) {
            fn format(out: &mut Vec<u8>) {
                push_members::<Self>(out, <Self as Fields>::COUNT, <Self as Fields>::fields_format);
            }
        }
        impl<$($name: Persistent),*> Persistent for ($($name,)*) {
            fn buffer_size(&self) -> usize {
                0 $(+ self.$idx.buffer_size())*
            }
            #[allow(unused_variables)]
            fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
                $(self.$idx.write(w)?;)*
                Ok(())
            }
        }
        impl<$($name: Restore),*> Restore for ($($name,)*) {
            #[allow(unused_variables)]
            fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
                $(self.$idx.read(r)?;)*
                Ok(())
            }
        }
    };
}
impl_tuple!();
impl_tuple!(A 0);
impl_tuple!(A 0 B 1);
impl_tuple!(A 0 B 1 C 2);
impl_tuple!(A 0 B 1 C 2 D 3);
impl_tuple!(A 0 B 1 C 2 D 3 E 4);
impl_tuple!(A 0 B 1 C 2 D 3 E 4 F 5);
impl_tuple!(A 0 B 1 C 2 D 3 E 4 F 5 G 6);
impl_tuple!(A 0 B 1 C 2 D 3 E 4 F 5 G 6 H 7);
impl_tuple!(A 0 B 1 C 2 D 3 E 4 F 5 G 6 H 7 I 8);
impl_tuple!(A 0 B 1 C 2 D 3 E 4 F 5 G 6 H 7 I 8 J 9);
impl_tuple!(A 0 B 1 C 2 D 3 E 4 F 5 G 6 H 7 I 8 J 9 K 10);
impl_tuple!(A 0 B 1 C 2 D 3 E 4 F 5 G 6 H 7 I 8 J 9 K 10 L 11);

/* Pair */

impl<A: Describe, B: Describe> Fields for Pair<A, B> {
    const COUNT: usize = 2;
    fn fields_format(out: &mut Vec<u8>) {
        A::format(out);
        B::format(out);
    }
}
impl<A: Describe, B: Describe> Describe for Pair<A, B> {
    fn format(out: &mut Vec<u8>) {
        push_members::<Self>(out, 2, <Self as Fields>::fields_format);
    }
}
impl<A: Persistent, B: Persistent> Persistent for Pair<A, B> {
    fn buffer_size(&self) -> usize {
        self.first.buffer_size() + self.second.buffer_size()
    }
    fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
        self.first.write(w)?;
        self.second.write(w)
    }
}
impl<A: Restore, B: Restore> Restore for Pair<A, B> {
    fn read<R: Reader + ?Sized>(&mut self, r: &mut R) -> Result<()> {
        self.first.read(r)?;
        self.second.read(r)
    }
}

/* TypeList. Only a Format; a type list has no data of its own. */

impl<T: Fields + TypeTraits> Describe for TypeList<T> {
    fn format(out: &mut Vec<u8>) {
        push_members::<Self>(out, T::COUNT, T::fields_format);
    }
}
