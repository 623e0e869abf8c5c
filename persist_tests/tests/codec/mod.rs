pub mod descriptors;
pub mod helpers;
pub mod properties;
pub mod round_trip;
pub mod streams;
