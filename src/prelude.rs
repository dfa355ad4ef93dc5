//! Stackcheck prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    ids::{IdentifierEditor, IdentifierSet, parse_batch},
    modal::{PendingTest, PhaseEvent, SubmitError, TestModal, TestPhase, Ticket},
    money::format_amount,
    render::{
        Badge, BadgeTone, DiscountRow, DiscountSection, ResultSummary, ShippingLine, summarize,
        write_summary,
    },
    simulation::{
        AppliedDiscount, BogoDetails, ComputeError, DiscountKind, DiscountTester, FieldErrors,
        FormField, InvalidInput, ReplayTester, SimulationForm, SimulationRequest,
        SimulationResult,
    },
};
