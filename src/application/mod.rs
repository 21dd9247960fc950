//! # Application Layer
//!
//! Use cases built on the domain and the carrier adapters.

pub mod services;
