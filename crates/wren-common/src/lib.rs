//! Common utilities for wren.
//!
//! This crate provides shared infrastructure used by all wren components:
//! - **Warning System** - deduplicated diagnostics for recovered markup problems
//! - **Encoding** - decoding raw document bytes into UTF-8 text

/// Byte decoding with BOM sniffing and encoding labels.
pub mod encoding;
/// Deduplicated warnings for recovered markup problems.
pub mod warning;
