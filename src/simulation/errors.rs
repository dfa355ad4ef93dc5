//! Simulation Errors

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::simulation::form::FormField;

/// Banner text used when a failed test run reports no usable message.
pub const GENERIC_COMPUTE_FAILURE: &str = "Failed to run discount test";

/// A form value that blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// Cart total is missing, not a number, or not above zero.
    #[error("Cart total must be greater than 0")]
    CartTotal,

    /// Item quantity parsed to a negative number.
    #[error("Quantity cannot be negative")]
    NegativeQuantity,
}

impl InvalidInput {
    /// The form field this error belongs next to.
    pub fn field(self) -> FormField {
        match self {
            InvalidInput::CartTotal => FormField::CartTotal,
            InvalidInput::NegativeQuantity => FormField::Quantity,
        }
    }
}

/// Every validation failure found in a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: SmallVec<[InvalidInput; 2]>,
}

impl FieldErrors {
    /// Record a validation failure.
    pub fn push(&mut self, error: InvalidInput) {
        self.errors.push(error);
    }

    /// Check if no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The failure recorded against `field`, if any.
    pub fn get(&self, field: FormField) -> Option<InvalidInput> {
        self.errors.iter().copied().find(|error| error.field() == field)
    }

    /// Iterate over recorded failures.
    pub fn iter(&self) -> impl Iterator<Item = InvalidInput> + '_ {
        self.errors.iter().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{}: {error}", error.field())?;
        }

        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// A failed call to the discount calculation service.
///
/// [`Display`](fmt::Display) yields the text shown in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputeError {
    /// The service rejected the request with a structured message.
    #[error("{0}")]
    Rejected(String),

    /// The call failed with its own message (transport, decoding, ...).
    #[error("{0}")]
    Failed(String),

    /// Nothing usable was reported.
    #[error("Failed to run discount test")]
    Unknown,
}

impl ComputeError {
    /// Build an error from whatever messages a failure carries.
    ///
    /// A structured service message wins over the failure's own message; blank messages count as
    /// absent.
    pub fn from_parts(service_message: Option<&str>, own_message: Option<&str>) -> Self {
        let present = |message: Option<&str>| {
            message
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(ToString::to_string)
        };

        if let Some(message) = present(service_message) {
            ComputeError::Rejected(message)
        } else if let Some(message) = present(own_message) {
            ComputeError::Failed(message)
        } else {
            ComputeError::Unknown
        }
    }

    /// Wrap any error, using its own message.
    pub fn from_error(error: &(dyn std::error::Error + '_)) -> Self {
        Self::from_parts(None, Some(&error.to_string()))
    }

    /// Banner text for this failure.
    pub fn banner_message(&self) -> String {
        self.to_string()
    }
}
