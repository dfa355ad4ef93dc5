//! Discount test simulations
//!
//! A simulation is a dry run of a discount stack against a hypothetical cart. The form collects
//! raw input, validation turns it into a [`SimulationRequest`], a [`DiscountTester`] computes the
//! [`SimulationResult`].

pub mod errors;
pub mod form;
pub mod request;
pub mod result;
pub mod tester;

pub use errors::{ComputeError, FieldErrors, GENERIC_COMPUTE_FAILURE, InvalidInput};
pub use form::{FormField, SimulationForm};
pub use request::SimulationRequest;
pub use result::{AppliedDiscount, BogoDetails, DiscountKind, SimulationResult};
pub use tester::{DiscountTester, MockDiscountTester, ReplayTester};
