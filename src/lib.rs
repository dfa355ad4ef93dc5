//! Stackcheck
//!
//! Stackcheck is the merchant-side toolkit for testing discount stacks: building product and
//! collection ID sets from pasted text, validating simulated carts, and turning the calculation
//! service's results into readable breakdowns.

pub mod config;
pub mod ids;
pub mod modal;
pub mod money;
pub mod observability;
pub mod prelude;
pub mod render;
pub mod simulation;
