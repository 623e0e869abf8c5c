use super::helpers::{verify_round_trip, write_exact};
use anyhow::Result;
use persist_format::adapt;
use persist_format::persist_types::types::{
    Char, Currency, DateTime, Guid, Ordered, Pair, TimeSpan, WChar,
};
use std::ffi::CString;

#[derive(PartialEq, Default, Debug)]
struct Sample {
    taken_at: DateTime,
    elapsed: TimeSpan,
    price: Currency,
    tags: Vec<String>,
    readings: [f32; 4],
}
adapt!(Sample {
    taken_at: DateTime,
    elapsed: TimeSpan,
    price: Currency,
    tags: Vec<String>,
    readings: [f32; 4],
});

pub fn test_round_trips() -> Result<()> {
    test_exact_bytes()?;
    test_basics()?;
    test_containers()?;
    test_aggregates()?;
    Ok(())
}

fn test_exact_bytes() -> Result<()> {
    assert_eq!(vec![0x78, 0x56, 0x34, 0x12], write_exact(&0x12345678u32)?);

    let vec = write_exact(&vec![1i32, 2, 3, 4, 5])?;
    assert_eq!(1 + 5 * 4, vec.len());
    assert_eq!(5, vec[0]);

    assert_eq!(b"\x05hello".to_vec(), write_exact(&"hello".to_string())?);
    assert_eq!(6, write_exact("hello")?.len());

    let args = write_exact(&(true, 42i32, "ok".to_string()))?;
    assert_eq!(vec![1, 42, 0, 0, 0, 2, b'o', b'k'], args);

    assert_eq!(8, write_exact(&1.5f64)?.len());
    assert_eq!(0, write_exact(&())?.len());

    let c_str = CString::new("abc")?;
    assert_eq!(b"\x03abc".to_vec(), write_exact(c_str.as_c_str())?);
    Ok(())
}

fn test_basics() -> Result<()> {
    verify_round_trip(&true)?;
    verify_round_trip(&-7i8)?;
    verify_round_trip(&200u8)?;
    verify_round_trip(&i16::MIN)?;
    verify_round_trip(&u16::MAX)?;
    verify_round_trip(&-123456i32)?;
    verify_round_trip(&0xDEADBEEFu32)?;
    verify_round_trip(&i64::MIN)?;
    verify_round_trip(&u64::MAX)?;
    verify_round_trip(&3.25f32)?;
    verify_round_trip(&-1e300f64)?;
    verify_round_trip(&Char(b'z'))?;
    verify_round_trip(&WChar(0x263A))?;
    verify_round_trip(&TimeSpan(-10_000))?;
    verify_round_trip(&DateTime(637_000_000_000_000_000))?;
    verify_round_trip(&Currency(123_400))?;
    verify_round_trip(&Guid(*b"0123456789abcdef"))?;
    Ok(())
}

fn test_containers() -> Result<()> {
    verify_round_trip(&Vec::<i32>::new())?;
    verify_round_trip(&(0..1000u16).collect::<Vec<_>>())?;
    verify_round_trip(&vec![true, false, true])?;
    verify_round_trip(&"ünïcödé".to_string())?;
    verify_round_trip(&String::new())?;
    verify_round_trip(&[7u64; 3])?;
    verify_round_trip(&[[1i32, 2], [3, 4], [5, 6]])?;
    verify_round_trip(&vec![vec![1u8], vec![], vec![2, 3]])?;
    verify_round_trip(&vec!["a".to_string(), String::new(), "ccc".to_string()])?;
    verify_round_trip(&vec![WChar(0x48), WChar(0x69)])?;
    verify_round_trip(&vec![(1i8, "x".to_string()), (2, "yy".to_string())])?;
    Ok(())
}

fn test_aggregates() -> Result<()> {
    verify_round_trip(&(1u8, (2u16, (3u32, 4u64))))?;
    verify_round_trip(&Pair {
        first: "key".to_string(),
        second: vec![1.0f64, 2.0],
    })?;
    verify_round_trip(&(
        Ordered("sortable".to_string()),
        Ordered(-42i64),
        Ordered(vec![0u8, 1, 255]),
    ))?;
    verify_round_trip(&Sample {
        taken_at: DateTime(1),
        elapsed: TimeSpan(2),
        price: Currency(3),
        tags: vec!["north".into(), "south".into()],
        readings: [0.5, 1.5, -2.5, 0.0],
    })?;
    verify_round_trip(&vec![Sample::default(), Sample::default()])?;
    Ok(())
}
