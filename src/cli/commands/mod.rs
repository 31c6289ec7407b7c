//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod file;
pub mod init;
pub mod serve;
pub mod validate;
