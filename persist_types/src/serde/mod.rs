//! # Serialization format
//!
//! Every persisted value is paired with a *descriptor*: a self-describing byte
//! string naming the value's type structure. A reader that holds only the
//! descriptor can walk the data with [`DescriptorCursor`] or [`Shape`].
//!
//! All lengths and counts below are unsigned 7-bit encoded integers
//! (see [`seven_bit`]), written least-significant group first.
//!
//! ```text
//! struct Descriptor {
//!     format_len:     varint,
//!     schema_version: u8,             // always 1
//!     format:         Format,
//! }
//!
//! struct Format::Basic {
//!     type_id:        u8,             // 1..=17
//!     modifiers:      u8,             // None, or BigEndian|Sequence
//! }
//!
//! struct Format::FixedSizeBasicArray {
//!     type_id:        u8,             // element's basic id
//!     modifiers:      u8,             // Array|Fixed
//!     count:          varint,
//! }
//!
//! struct Format::Vector or Format::String {
//!     type_id:        u8,             // element's basic id; Char for strings
//!     modifiers:      u8,             // Array
//! }
//!
//! struct Format::Container {
//!     type_id:        u8,             // StdArray or StdVector
//!     modifiers:      u8,             // Array|Fixed, or Array
//!     element:        Descriptor,     // a whole Descriptor, not a bare Format
//!     count:          varint,         // present iff Fixed
//! }
//!
//! struct Format::Tuple or Format::TypeList or Format::Adapted or Format::Pair {
//!     type_id:        u8,
//!     modifiers:      u8,             // None
//!     members_len:    varint,         // byte length of `members`
//!     members_count:  varint,
//!     members:        [Format; members_count],
//! }
//! ```
//!
//! Data follows the same structure with no tags. Basics are fixed-width and
//! little-endian. Vectors and strings are prefixed by their element count.
//! Fixed-size arrays and tuple members are written back to back.
//! Formats with the Sequence modifier use the orderable encodings in [`sequence`].

mod cursor;
mod io;
mod modifiers;
pub mod sequence;
pub mod seven_bit;
mod shape;
mod type_ids;

pub use cursor::*;
pub use io::*;
pub use modifiers::*;
pub use sequence::*;
pub use seven_bit::*;
pub use shape::*;
pub use type_ids::*;
