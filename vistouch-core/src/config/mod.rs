//! Configuration types
//!
//! Engine configuration, optionally decoded from postcard binary data.

pub mod types;

pub use types::*;
