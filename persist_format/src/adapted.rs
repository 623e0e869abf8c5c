/// Persists a struct as its fields, in the listed order.
///
/// The struct's Format is tagged `Adapted` and lists each field's Format.
/// Its data is the fields' data back to back, like a tuple.
///
/// ```
/// use persist_format::{adapt, Describe, Persistent};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: f64,
/// }
/// adapt!(Point { x: i32, y: f64 });
///
/// assert_eq!(vec![218, 0x00, 0x04, 0x02, 0x08, 0x00, 0x0D, 0x00], Point::format_bytes());
/// assert_eq!(12, Point::default().buffer_size());
/// ```
#[macro_export]
macro_rules! adapt {
    ($name:ty { $($field:ident : $ty:ty),* $(,)? }) => {
        impl $crate::persist_types::types::TypeTraits for $name {
            const CATEGORY: $crate::persist_types::types::Category =
                $crate::persist_types::types::Category::Adapted;
            const TYPE_ID: $crate::persist_types::serde::TypeId =
                $crate::persist_types::serde::TypeId::Utility(
                    $crate::persist_types::serde::UtilityTypeId::Adapted,
                );
            const IS_FIXED_SIZE: bool =
                true $(&& <$ty as $crate::persist_types::types::TypeTraits>::IS_FIXED_SIZE)*;
        }

        impl $crate::Fields for $name {
            const COUNT: usize = <[&str]>::len(&[$(stringify!($field)),*]);
            fn fields_format(out: &mut Vec<u8>) {
                $(<$ty as $crate::Describe>::format(out);)*
            }
        }

        impl $crate::Describe for $name {
            fn format(out: &mut Vec<u8>) {
                $crate::push_members::<Self>(
                    out,
                    <Self as $crate::Fields>::COUNT,
                    <Self as $crate::Fields>::fields_format,
                );
            }
        }

        impl $crate::Persistent for $name {
            fn buffer_size(&self) -> usize {
                0 $(+ <$ty as $crate::Persistent>::buffer_size(&self.$field))*
            }
            #[allow(unused_variables)]
            fn write<W: $crate::persist_types::serde::Writer + ?Sized>(
                &self,
                w: &mut W,
            ) -> $crate::anyhow::Result<()> {
                $(<$ty as $crate::Persistent>::write(&self.$field, w)?;)*
                Ok(())
            }
        }

        impl $crate::Restore for $name {
            #[allow(unused_variables)]
            fn read<R: $crate::persist_types::serde::Reader + ?Sized>(
                &mut self,
                r: &mut R,
            ) -> $crate::anyhow::Result<()> {
                $(<$ty as $crate::Restore>::read(&mut self.$field, r)?;)*
                Ok(())
            }
        }
    };
}

#[cfg(test)]
mod test {
    use crate::{Describe, Persistent, Restore};
    use anyhow::Result;
    use persist_types::types::{Guid, TypeTraits};

    #[derive(PartialEq, Default, Debug)]
    struct Record {
        id: Guid,
        name: String,
        scores: Vec<u16>,
    }
    adapt!(Record {
        id: Guid,
        name: String,
        scores: Vec<u16>,
    });

    #[derive(PartialEq, Default, Debug)]
    struct Span {
        start: i64,
        end: i64,
    }
    adapt!(Span { start: i64, end: i64 });

    #[test]
    fn format() {
        assert_eq!(
            vec![218, 0x00, 0x06, 0x03, 0x11, 0x00, 0x02, 0x01, 0x07, 0x01],
            Record::format_bytes()
        );
        assert!(!Record::IS_FIXED_SIZE);
        assert!(Span::IS_FIXED_SIZE);
    }

    #[test]
    fn round_trip() -> Result<()> {
        let val = Record {
            id: Guid([7; 16]),
            name: "adapted".into(),
            scores: vec![1, 200, 3000],
        };
        let mut buf = vec![];
        val.write(&mut buf)?;
        assert_eq!(16 + 8 + 7, buf.len());
        assert_eq!(val.buffer_size(), buf.len());

        let mut out = Record::default();
        out.read(&mut &buf[..])?;
        assert_eq!(val, out);
        Ok(())
    }

    #[test]
    fn nested_in_vectors() -> Result<()> {
        let val = vec![Span { start: 1, end: 2 }, Span { start: -5, end: 5 }];
        assert_eq!(
            vec![129, 0x01, 0x08, 0x01, 218, 0x00, 0x04, 0x02, 0x0A, 0x00, 0x0A, 0x00],
            Vec::<Span>::format_bytes()
        );
        let mut buf = vec![];
        val.write(&mut buf)?;
        let mut out = Vec::<Span>::new();
        out.read(&mut &buf[..])?;
        assert_eq!(val, out);
        Ok(())
    }
}
