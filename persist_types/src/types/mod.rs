mod basic;
mod traits;
mod value;
mod wrappers;

pub use basic::*;
pub use traits::*;
pub use value::*;
pub use wrappers::*;
