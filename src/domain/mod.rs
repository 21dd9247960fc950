//! # Domain Layer
//!
//! Shipping-rate concepts and the local estimator. Nothing here performs I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
