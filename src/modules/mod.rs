//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the object-storage adapter used for document payloads.

pub mod storage;
