//! Infrastructure layer — production implementations of the application ports.

pub mod broker;
pub mod clock;
pub mod command_runner;
pub mod config;
pub mod dns;
pub mod git;
pub mod health;
pub mod prompt;
pub mod ssh;
