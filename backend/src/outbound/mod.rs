//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local repositories for development and tests
//! - **security**: bcrypt password hashing
//!
//! Adapters translate between domain types and infrastructure formats and
//! hold no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
