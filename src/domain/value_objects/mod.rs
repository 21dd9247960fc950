//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Address and Package Types
//!
//! - [`PostalCode`]: validated 5-digit ZIP code
//! - [`Dimensions`]: package sides in inches
//!
//! ## Pricing Types
//!
//! - [`Money`]: non-negative, cent-rounded currency amount
//! - [`Zone`]: distance tier 1-9 or unknown
//!
//! ## Domain Enums
//!
//! - [`ServiceTier`]: carrier products
//! - [`ShippingOption`]: calculated, flat or free
//! - [`QuoteSource`]: estimated, live or fixed
//! - [`CostComponent`]: breakdown lines

pub mod dimensions;
pub mod enums;
pub mod money;
pub mod postal_code;
pub mod timestamp;
pub mod zone;

pub use dimensions::Dimensions;
pub use enums::{CostComponent, ParseEnumError, QuoteSource, ServiceTier, ShippingOption};
pub use money::Money;
pub use postal_code::PostalCode;
pub use timestamp::Timestamp;
pub use zone::Zone;
