//! Format-level extraction helpers shared by the decomposers.
//!
//! - [`archive`] walks tar and zip entries.
//! - [`ooxml`] streams Office Open XML parts into text and property listeners.

pub mod archive;
pub mod ooxml;
