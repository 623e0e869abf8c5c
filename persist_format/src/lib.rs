//! Descriptors and codecs derived from Rust types.
//!
//! A type's [`Describe`] impl yields its Format, and its [`Persistent`] and
//! [`Restore`] impls write and read its data. The entry points in [`args`]
//! treat a tuple of arguments as one `TypeList`.

mod adapted;
pub mod args;
mod describe;
mod ordered;
mod persistent;
pub mod predicates;
pub mod printer;
mod tuple;

pub use args::*;
pub use describe::*;
pub use persistent::*;
pub use predicates::*;
pub use printer::Printer;
pub use tuple::*;

#[doc(hidden)]
pub use anyhow;
pub use persist_types;
