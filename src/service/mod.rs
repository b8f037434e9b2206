//! The generation service: typed addresses in, encoded thumbnail bytes out,
//! with the cache as a write-through layer.

pub mod address;
pub mod generate;
pub mod notify;
pub mod resolver;
