//! Record types whose descriptors are derived at build time.
//!
//! Readers compare a stream's descriptor against these constants instead of
//! deriving Formats at runtime.

mod records;
pub use records::*;

// See `build.rs`.
include!(concat!(env!("OUT_DIR"), "/const_gen.rs"));

#[cfg(feature = "log_records")]
pub mod log_file;

#[cfg(feature = "key_records")]
pub mod row_key;
