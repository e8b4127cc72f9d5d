//! Domain layer — pure types, validation, and derivation rules.
//!
//! Nothing in this module performs I/O. All functions take data in and
//! return data out, which keeps them trivially unit-testable.

pub mod app;
pub mod error;
pub mod response;
