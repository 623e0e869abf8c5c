use super::helpers::{verify_round_trip, write_exact};
use persist_format::persist_types::serde::{Reader, SevenBitEncoded};
use persist_format::persist_types::types::{DateTime, Ordered};
use persist_format::{Persistent, Restore};
use proptest::prelude::*;

const VARINT_CASES: [(u64, usize); 8] = [
    (0, 1),
    (1, 1),
    (127, 1),
    (128, 2),
    (16383, 2),
    (16384, 3),
    (u32::MAX as u64, 5),
    (u64::MAX, 9),
];

#[test]
fn varints_are_canonical() {
    for (n, len) in VARINT_CASES {
        let encoded = SevenBitEncoded::new(n);
        assert_eq!(len, encoded.len(), "{}", n);
        let mut r = &encoded[..];
        assert_eq!(n, r.read_7bit_encoded().unwrap());
        assert!(r.is_empty());
    }
}

proptest! {
    #[test]
    fn varints_round_trip(n: u64) {
        let encoded = SevenBitEncoded::new(n);
        let mut r = &encoded[..];
        prop_assert_eq!(n, r.read_7bit_encoded().unwrap());
        prop_assert!(r.is_empty());
    }

    #[test]
    fn scalar_lists_round_trip(a: i64, b: u16, c: f64, d: bool) {
        prop_assume!(!c.is_nan());
        verify_round_trip(&(a, b, c, d, DateTime(a))).unwrap();
    }

    #[test]
    fn nested_containers_round_trip(
        val in prop::collection::vec((any::<String>(), prop::collection::vec(any::<u32>(), 0..8)), 0..8)
    ) {
        verify_round_trip(&val).unwrap();
    }

    #[test]
    fn buffer_size_adds_over_members(a: String, b: Vec<i16>, c: [u8; 3]) {
        let whole = write_exact(&(a.clone(), b.clone(), c)).unwrap();
        prop_assert_eq!(
            a.buffer_size() + b.buffer_size() + c.buffer_size(),
            whole.len()
        );
    }

    #[test]
    fn ordered_strings_sort_like_values(a: String, b: String) {
        let (enc_a, enc_b) = (
            write_exact(&Ordered(a.clone())).unwrap(),
            write_exact(&Ordered(b.clone())).unwrap(),
        );
        prop_assert_eq!(a.as_bytes().cmp(b.as_bytes()), enc_a.cmp(&enc_b));

        let mut out = Ordered(String::new());
        out.read(&mut &enc_a[..]).unwrap();
        prop_assert_eq!(a, out.0);
    }
}
