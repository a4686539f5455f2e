//! Storage abstraction and implementations for the academy.
//!
//! This crate provides the persistence port for learning state with a
//! JSON file implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::{load_catalog, JsonStorage};
pub use memory::MemoryStorage;
