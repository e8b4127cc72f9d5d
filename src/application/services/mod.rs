//! Use-case services. Each service imports only from `crate::domain` and
//! `crate::application::ports`; all I/O goes through injected port traits.

pub mod control;
pub mod probe;
pub mod provision;
