//! Pretty printers for the surface and core languages.
//!
//! Types render through [`crate::types::Type::pretty`]; this module adds
//! the `Display` implementations for terms.

mod core;
mod surface;
