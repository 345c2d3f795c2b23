//! Domain rules for the dailies production tracker.
//!
//! This crate has no I/O. Everything here is shared by the repository layer
//! (`dailies-db`) and the HTTP layer (`dailies-api`).

pub mod access;
pub mod audit;
pub mod codes;
pub mod error;
pub mod hashing;
pub mod playlist;
pub mod query;
pub mod roles;
pub mod shot;
pub mod status;
pub mod storage;
pub mod types;
