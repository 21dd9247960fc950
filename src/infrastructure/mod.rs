//! # Infrastructure Layer
//!
//! Adapters for external systems.

pub mod carrier;
