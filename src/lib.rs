pub mod domain;
pub mod serializer;

pub use serializer::*;
