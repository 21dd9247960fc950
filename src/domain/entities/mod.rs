//! # Domain Entities
//!
//! - [`Package`]: the parcel being priced
//! - [`ShippingQuote`]: a priced shipping option with its breakdown

pub mod package;
pub mod quote;

pub use package::Package;
pub use quote::{
    BreakdownLine, ShippingQuote, ShippingQuoteBuilder, TransitEstimate, nominal_transit,
};
