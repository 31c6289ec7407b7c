//! Audit logging module
//!
//! Records what was replaced in each text, with replaced values hashed.

pub mod logger;

pub use logger::AuditLogger;
