//! Entry points over argument lists.
//!
//! An argument list is a tuple. Its descriptor is the descriptor of the
//! `TypeList` of its member types, and its data is the members' data in order.
//! The macros accept the arguments themselves and borrow them into such a tuple.

use crate::describe::Describe;
use crate::persistent::{Persistent, Restore};
use crate::tuple::Fields;
use anyhow::Result;
use log::{log_enabled, trace, Level};
use persist_types::serde::{Reader, Writer};
use persist_types::types::{TypeList, TypeTraits};

/// The descriptor of the argument list type `Args`.
/// The empty list `()` yields `04 01 D9 00 00 00`.
pub fn descriptor<Args: Fields + TypeTraits>() -> Vec<u8> {
    TypeList::<Args>::descriptor()
}

/// The descriptor of the argument list `args`. Depends only on its type.
pub fn descriptor_of<Args: Fields + TypeTraits>(_args: &Args) -> Vec<u8> {
    descriptor::<Args>()
}

/// Whether every argument's type has a value-independent buffer size.
/// The empty list is fixed size.
pub fn is_fixed_size<Args: TypeTraits>(_args: &Args) -> bool {
    Args::IS_FIXED_SIZE
}

/// Sum of the arguments' buffer sizes.
pub fn buffer_size<Args: Persistent>(args: &Args) -> usize {
    args.buffer_size()
}

/// Writes each argument, first to last.
pub fn write<W: Writer + ?Sized, Args: Persistent>(w: &mut W, args: &Args) -> Result<()> {
    if log_enabled!(Level::Trace) {
        trace!(
            "Writing {} argument bytes, fixed size: {}",
            args.buffer_size(),
            Args::IS_FIXED_SIZE
        );
    }
    args.write(w)
}

/// Reads each argument in place, first to last.
pub fn read<R: Reader + ?Sized, Args: Restore>(r: &mut R, args: &mut Args) -> Result<()> {
    args.read(r)
}

/// `descriptor!(a, b, ...)`: the descriptor of the arguments' types.
#[macro_export]
macro_rules! descriptor {
    ($($arg:expr),* $(,)?) => {
        $crate::descriptor_of(&($(&$arg,)*))
    };
}

/// `is_fixed_size!(a, b, ...)`
#[macro_export]
macro_rules! is_fixed_size {
    ($($arg:expr),* $(,)?) => {
        $crate::is_fixed_size(&($(&$arg,)*))
    };
}

/// `buffer_size!(a, b, ...)`
#[macro_export]
macro_rules! buffer_size {
    ($($arg:expr),* $(,)?) => {
        $crate::buffer_size(&($(&$arg,)*))
    };
}

/// `write_args!(writer, a, b, ...)`
#[macro_export]
macro_rules! write_args {
    ($w:expr $(, $arg:expr)* $(,)?) => {
        $crate::write($w, &($(&$arg,)*))
    };
}

/// `read_args!(reader, a, b, ...)`, where each argument is a place to read into.
#[macro_export]
macro_rules! read_args {
    ($r:expr $(, $arg:expr)* $(,)?) => {
        $crate::read($r, &mut ($(&mut $arg,)*))
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use persist_types::serde::{
        BasicTypeId, BinaryReader, BinaryWriter, DescriptorCursor, TypeId,
    };
    use persist_types::types::{Category, DateTime};
    use std::cell::Cell;

    #[test]
    fn empty() {
        assert_eq!(vec![0x04, 0x01, 217, 0x00, 0x00, 0x00], descriptor::<()>());
        assert_eq!(descriptor::<()>(), crate::descriptor!());
        assert!(crate::is_fixed_size!());
        assert_eq!(0, crate::buffer_size!());
    }

    #[test]
    fn descriptor_sizes() -> Result<()> {
        let cases = [
            (descriptor::<()>(), 4),
            (descriptor::<(bool,)>(), 6),
            (descriptor::<(bool, f64)>(), 8),
            (descriptor::<(bool, f64, (i16, i64))>(), 16),
            (descriptor::<(bool, f64, (i16, i64), DateTime)>(), 18),
        ];
        for (descriptor, format_len) in cases {
            let cursor = DescriptorCursor::new(&descriptor)?;
            assert_eq!(format_len, cursor.byte_size());
            assert_eq!(1, cursor.size());
            assert_eq!(format_len + 2, descriptor.len());
        }
        Ok(())
    }

    #[test]
    fn from_values() {
        let (a, b, c) = (1i32, 2.0f64, "s".to_string());
        assert_eq!(descriptor::<(i32, f64, String)>(), crate::descriptor!(a, b, c));
        assert_ne!(crate::descriptor!(a, b), crate::descriptor!(b, a));
        assert!(crate::is_fixed_size!(a, b));
        assert!(!crate::is_fixed_size!(a, c));
    }

    #[test]
    fn write_then_read() -> Result<()> {
        let (flag, n, s) = (true, 42i32, "ok".to_string());
        let mut w = BinaryWriter::new(vec![]);
        crate::write_args!(&mut w, flag, n, s)?;
        assert_eq!(crate::buffer_size!(flag, n, s), *w.write_len());
        assert_eq!(8, *w.write_len());

        let (mut flag2, mut n2, mut s2) = (false, 0i32, String::new());
        let data = w.into_inner();
        let mut r = BinaryReader::new(&data[..]);
        crate::read_args!(&mut r, flag2, n2, s2)?;
        assert_eq!((flag, n, s), (flag2, n2, s2));
        Ok(())
    }

    /// Counts how often its size is asked for.
    #[derive(Default)]
    struct SizeCounter(Cell<usize>);
    impl TypeTraits for SizeCounter {
        const CATEGORY: Category = Category::Basic;
        const TYPE_ID: TypeId = TypeId::Basic(BasicTypeId::Byte);
        const IS_FIXED_SIZE: bool = true;
    }
    impl Describe for SizeCounter {
        fn format(out: &mut Vec<u8>) {
            u8::format(out)
        }
    }
    impl Persistent for SizeCounter {
        fn buffer_size(&self) -> usize {
            self.0.set(self.0.get() + 1);
            1
        }
        fn write<W: Writer + ?Sized>(&self, w: &mut W) -> Result<()> {
            w.write_basic(0u8)
        }
    }

    #[test]
    fn write_does_not_size_without_trace_logging() -> Result<()> {
        let counter = SizeCounter::default();
        let mut buf = vec![];
        crate::write_args!(&mut buf, counter)?;
        assert_eq!(vec![0], buf);
        assert_eq!(0, counter.0.get());
        Ok(())
    }
}
