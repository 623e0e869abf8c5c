use anyhow::Result;
use persist_format::persist_types::types::{Char, DateTime, Pair, TypeList};
use persist_format::{descriptor, is_basic_type_descriptor, is_integer_basic_type_descriptor, Describe};
use persist_types::serde::{
    BasicTypeId, DescriptorCursor, ModifierFlags, TupleTypeId, TypeElement,
};

pub fn test_descriptors() -> Result<()> {
    test_empty_argument_list()?;
    test_determinism_and_order()?;
    test_tuple_vectors()?;
    test_array_sizes()?;
    test_argument_list_walk()?;
    test_fixed_size()?;
    test_sniffing()?;
    Ok(())
}

fn test_empty_argument_list() -> Result<()> {
    let empty = descriptor::<()>();
    assert_eq!(vec![0x04, 0x01, 217, 0x00, 0x00, 0x00], empty);
    assert_eq!(empty, persist_format::descriptor!());
    assert_eq!(empty, TypeList::<()>::descriptor());

    // Same structure as the empty tuple, but tagged as a type list.
    assert_eq!(vec![0x04, 0x01, 202, 0x00, 0x00, 0x00], <()>::descriptor());
    Ok(())
}

fn test_determinism_and_order() -> Result<()> {
    assert_eq!(descriptor::<(u16, String)>(), descriptor::<(u16, String)>());
    assert_ne!(descriptor::<(u16, String)>(), descriptor::<(String, u16)>());
    assert_ne!(descriptor::<(i32,)>(), descriptor::<(u32,)>());
    assert_ne!(descriptor::<((i32, f64),)>(), descriptor::<(Pair<i32, f64>,)>());

    let (a, b) = (1u8, vec![2i64]);
    assert_eq!(descriptor::<(u8, Vec<i64>)>(), persist_format::descriptor!(a, b));
    Ok(())
}

fn test_tuple_vectors() -> Result<()> {
    assert_eq!(
        vec![0x08, 0x01, 202, 0x00, 0x04, 0x02, 0x08, 0x00, 0x0D, 0x00],
        <(i32, f64)>::descriptor()
    );

    let nested = <((i32, f64), (bool, i64))>::descriptor();
    let cursor = DescriptorCursor::new(&nested)?;
    assert_eq!(20, cursor.byte_size());
    assert_eq!(1, cursor.size());
    Ok(())
}

fn test_array_sizes() -> Result<()> {
    let cases = [
        (<[bool; 100]>::descriptor(), 3, 100),
        (<[bool; 128]>::descriptor(), 4, 128),
        (<[Char; 2048]>::descriptor(), 4, 2048),
    ];
    for (descriptor, format_len, count) in cases {
        let mut cursor = DescriptorCursor::new(&descriptor)?;
        assert_eq!(format_len, cursor.byte_size());
        assert_eq!(1, cursor.size());
        let array = cursor.read_fixed_size_basic_array_type()?;
        assert_eq!(count, array.array_size());
        assert!(array
            .header()
            .modifiers()
            .contains(ModifierFlags::ARRAY | ModifierFlags::FIXED));
        assert!(cursor.is_at_end());
    }
    Ok(())
}

fn test_argument_list_walk() -> Result<()> {
    let cases = [
        (descriptor::<()>(), 4, 0),
        (descriptor::<(bool,)>(), 6, 1),
        (descriptor::<(bool, f64)>(), 8, 2),
        (descriptor::<(bool, f64, (i16, i64))>(), 16, 3),
        (descriptor::<(bool, f64, (i16, i64), DateTime)>(), 18, 4),
    ];
    for (descriptor, format_len, member_count) in cases {
        let mut cursor = DescriptorCursor::new(&descriptor)?;
        assert_eq!(format_len, cursor.byte_size());
        assert_eq!(1, cursor.size());
        let list = cursor.read_type_list_type()?;
        assert_eq!(member_count, list.member_count());
        assert_eq!(member_count, list.cursor().size());
    }

    let descriptor = descriptor::<(bool, f64, (i16, i64), DateTime)>();
    let mut cursor = DescriptorCursor::new(&descriptor)?;
    let mut members = cursor.read_type_list_type()?.cursor();
    let mut ids = vec![];
    while !members.is_at_end() {
        match members.read_type()? {
            TypeElement::Basic(basic) => ids.push(basic.basic_type_id()),
            TypeElement::Tuple(tuple) => {
                assert_eq!(Some(TupleTypeId::Tuple), tuple.tuple_type_id());
                let mut inner = tuple.cursor();
                while !inner.is_at_end() {
                    ids.push(inner.read_basic_type()?.basic_type_id());
                }
            }
            other => panic!("Unexpected {:?}", other),
        }
    }
    assert_eq!(
        vec![
            BasicTypeId::Boolean,
            BasicTypeId::Double,
            BasicTypeId::Int16,
            BasicTypeId::Int64,
            BasicTypeId::DateTime,
        ],
        ids
    );
    Ok(())
}

fn test_fixed_size() -> Result<()> {
    assert!(persist_format::is_fixed_size!());
    assert!(persist_format::is_fixed_size!(0i32, 0.0f64));
    assert!(!persist_format::is_fixed_size!(String::from("x")));
    assert!(persist_format::is_fixed_size!([0u8; 16], (1i8, DateTime(0))));
    assert!(!persist_format::is_fixed_size!(0i32, vec![0i32]));
    Ok(())
}

fn test_sniffing() -> Result<()> {
    assert!(is_integer_basic_type_descriptor(&descriptor::<(u64,)>()));
    assert!(!is_integer_basic_type_descriptor(&descriptor::<(f32,)>()));
    assert!(!is_integer_basic_type_descriptor(&descriptor::<(u64, u64)>()));
    assert!(!is_basic_type_descriptor(&descriptor::<(Vec<u8>,)>()));
    assert!(!is_basic_type_descriptor(&descriptor::<(String,)>()));
    Ok(())
}
