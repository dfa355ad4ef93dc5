//! Discount test modal
//!
//! The state behind the "test this discount stack" surface: raw form input, per-field validation
//! errors and the [`TestPhase`] of the current run.
//!
//! A run moves `Idle → Loading → Succeeded | Failed`. Each submission gets a ticket; completions
//! carrying a ticket other than the one currently loading are ignored, so closing the modal
//! mid-flight discards the late result.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    render::{ResultSummary, summarize},
    simulation::{
        ComputeError, DiscountTester, FieldErrors, FormField, InvalidInput, SimulationForm,
        SimulationRequest, SimulationResult,
    },
};

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Phase of the current test run.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TestPhase {
    /// Nothing submitted, or the last error was dismissed.
    #[default]
    Idle,

    /// Waiting on the discount tester.
    Loading {
        /// Submission being waited on.
        ticket: Ticket,
    },

    /// The last run produced a result.
    Succeeded(SimulationResult),

    /// The last run failed.
    Failed {
        /// Banner text.
        message: String,
    },
}

/// Inputs that move a [`TestPhase`].
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseEvent {
    /// A validated request was handed to the tester.
    Submitted(Ticket),

    /// The tester returned a result.
    Resolved(Ticket, SimulationResult),

    /// The tester failed.
    Rejected(Ticket, String),

    /// The error banner was dismissed.
    Dismissed,

    /// The modal was closed.
    Closed,
}

impl TestPhase {
    /// Apply an event, returning the next phase.
    ///
    /// Events that don't apply to the current phase leave it unchanged.
    #[must_use]
    pub fn next(self, event: PhaseEvent) -> Self {
        match (self, event) {
            (_, PhaseEvent::Closed) => TestPhase::Idle,
            (TestPhase::Loading { ticket }, PhaseEvent::Submitted(_)) => {
                TestPhase::Loading { ticket }
            }
            (_, PhaseEvent::Submitted(ticket)) => TestPhase::Loading { ticket },
            (TestPhase::Loading { ticket }, PhaseEvent::Resolved(resolved, result))
                if ticket == resolved =>
            {
                TestPhase::Succeeded(result)
            }
            (TestPhase::Loading { ticket }, PhaseEvent::Rejected(rejected, message))
                if ticket == rejected =>
            {
                TestPhase::Failed { message }
            }
            (TestPhase::Failed { .. }, PhaseEvent::Dismissed) => TestPhase::Idle,
            (
                phase,
                PhaseEvent::Resolved(..) | PhaseEvent::Rejected(..) | PhaseEvent::Dismissed,
            ) => phase,
        }
    }

    /// Check if a run is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, TestPhase::Loading { .. })
    }
}

/// Reasons a submission never reaches the tester.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The modal is closed.
    #[error("the discount test modal is closed")]
    Closed,

    /// A run is already in flight.
    #[error("a discount test is already running")]
    Busy,

    /// The form failed validation.
    #[error("invalid simulation form: {0}")]
    Invalid(FieldErrors),
}

/// A validated submission waiting to be sent to a tester.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTest {
    /// Ticket to complete the run with.
    pub ticket: Ticket,

    /// Normalised request.
    pub request: SimulationRequest,
}

/// Discount test modal state.
#[derive(Debug, Clone, Default)]
pub struct TestModal {
    label: String,
    open: bool,
    form: SimulationForm,
    field_errors: FieldErrors,
    phase: TestPhase,
    next_ticket: u64,
}

impl TestModal {
    /// Create a closed modal for the named discount stack.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Name of the discount stack under test.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check if the modal is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the modal.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the modal, resetting the form, errors, result and any run in flight.
    ///
    /// Owners that react to closing (hiding a dialog, refreshing a list) do so after this returns;
    /// the modal holds no callbacks into its owner.
    pub fn close(&mut self) {
        debug!(stack = %self.label, "closing discount test modal");

        self.open = false;
        self.form = SimulationForm::default();
        self.field_errors = FieldErrors::default();
        self.phase = std::mem::take(&mut self.phase).next(PhaseEvent::Closed);
    }

    /// Raw form input.
    pub fn form(&self) -> &SimulationForm {
        &self.form
    }

    /// Replace the raw value of a form field.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Validation error shown next to `field`, if any.
    pub fn field_error(&self, field: FormField) -> Option<InvalidInput> {
        self.field_errors.get(field)
    }

    /// Current phase.
    pub fn phase(&self) -> &TestPhase {
        &self.phase
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.phase.is_loading()
    }

    /// Result of the last successful run.
    pub fn result(&self) -> Option<&SimulationResult> {
        match &self.phase {
            TestPhase::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Error banner text of the last failed run.
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            TestPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Display summary of the last result. `None` renders nothing.
    pub fn summary(&self, currency: &'static Currency) -> Option<ResultSummary> {
        self.result().map(|result| summarize(result, currency))
    }

    /// Dismiss the error banner. Form values are kept.
    pub fn dismiss_error(&mut self) {
        self.phase = std::mem::take(&mut self.phase).next(PhaseEvent::Dismissed);
    }

    /// Validate the form and start a run.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Closed`] if the modal isn't open.
    /// - [`SubmitError::Busy`] if a run is already in flight.
    /// - [`SubmitError::Invalid`] if validation fails; the errors are also kept per field.
    pub fn begin_submit(&mut self) -> Result<PendingTest, SubmitError> {
        if !self.open {
            debug!(stack = %self.label, "discount test modal is closed");

            return Err(SubmitError::Closed);
        }

        if self.phase.is_loading() {
            debug!(stack = %self.label, "discount test already running");

            return Err(SubmitError::Busy);
        }

        let request = match self.form.validate() {
            Ok(request) => request,
            Err(errors) => {
                debug!(stack = %self.label, %errors, "discount test form invalid");

                self.field_errors = errors.clone();

                return Err(SubmitError::Invalid(errors));
            }
        };

        self.next_ticket += 1;

        let ticket = Ticket(self.next_ticket);

        self.field_errors = FieldErrors::default();
        self.phase = std::mem::take(&mut self.phase).next(PhaseEvent::Submitted(ticket));

        Ok(PendingTest { ticket, request })
    }

    /// Finish a run started by [`begin_submit`](Self::begin_submit).
    ///
    /// Stale tickets are ignored.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<SimulationResult, ComputeError>) {
        let event = match outcome {
            Ok(result) => {
                info!(
                    stack = %self.label,
                    final_total = %result.final_total,
                    applied = result.applied_discounts.as_ref().map_or(0, Vec::len),
                    "discount test completed"
                );

                PhaseEvent::Resolved(ticket, result)
            }
            Err(error) => {
                warn!(stack = %self.label, %error, "discount test failed");

                PhaseEvent::Rejected(ticket, error.banner_message())
            }
        };

        self.phase = std::mem::take(&mut self.phase).next(event);
    }

    /// Validate, run the tester and record the outcome.
    ///
    /// Tester failures are recorded in the phase, never returned.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] if the submission was blocked; the tester is not called.
    #[tracing::instrument(name = "modal.submit", skip(self, tester), fields(stack = %self.label))]
    pub async fn submit<T>(&mut self, tester: &T) -> Result<(), SubmitError>
    where
        T: DiscountTester + ?Sized,
    {
        let PendingTest { ticket, request } = self.begin_submit()?;

        let outcome = tester.test_stack(request).await;

        self.complete(ticket, outcome);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::simulation::MockDiscountTester;

    use super::*;

    fn result_with_total(total: i64) -> SimulationResult {
        SimulationResult {
            final_total: Decimal::from(total),
            ..SimulationResult::default()
        }
    }

    fn filled_modal() -> TestModal {
        let mut modal = TestModal::new("Summer stack");

        modal.open();
        modal.set_field(FormField::CartTotal, "100");

        modal
    }

    #[test]
    fn phase_transitions() {
        let first = Ticket(1);
        let second = Ticket(2);

        let loading = TestPhase::Idle.next(PhaseEvent::Submitted(first));

        assert_eq!(loading, TestPhase::Loading { ticket: first });
        assert_eq!(
            loading.clone().next(PhaseEvent::Submitted(second)),
            TestPhase::Loading { ticket: first }
        );
        assert_eq!(
            loading.clone().next(PhaseEvent::Resolved(second, result_with_total(1))),
            TestPhase::Loading { ticket: first }
        );
        assert_eq!(
            loading.clone().next(PhaseEvent::Resolved(first, result_with_total(1))),
            TestPhase::Succeeded(result_with_total(1))
        );

        let failed = loading.next(PhaseEvent::Rejected(first, "nope".to_string()));

        assert_eq!(
            failed,
            TestPhase::Failed {
                message: "nope".to_string()
            }
        );
        assert_eq!(failed.next(PhaseEvent::Dismissed), TestPhase::Idle);
    }

    #[test]
    fn close_resets_any_phase() {
        let succeeded = TestPhase::Succeeded(result_with_total(5));

        assert_eq!(succeeded.next(PhaseEvent::Closed), TestPhase::Idle);
        assert_eq!(
            TestPhase::Loading { ticket: Ticket(9) }.next(PhaseEvent::Closed),
            TestPhase::Idle
        );
    }

    #[test]
    fn dismiss_does_not_clear_a_result() {
        let succeeded = TestPhase::Succeeded(result_with_total(5));

        assert_eq!(succeeded.clone().next(PhaseEvent::Dismissed), succeeded);
    }

    #[tokio::test]
    async fn invalid_cart_total_never_calls_tester() {
        let mut tester = MockDiscountTester::new();
        tester.expect_test_stack().never();

        let mut modal = filled_modal();
        modal.set_field(FormField::CartTotal, "0");

        let outcome = modal.submit(&tester).await;

        assert!(matches!(outcome, Err(SubmitError::Invalid(_))));
        assert_eq!(
            modal.field_error(FormField::CartTotal),
            Some(InvalidInput::CartTotal)
        );
        assert_eq!(modal.phase(), &TestPhase::Idle);
    }

    #[tokio::test]
    async fn successful_run_stores_result() -> TestResult {
        let mut tester = MockDiscountTester::new();
        tester
            .expect_test_stack()
            .once()
            .withf(|request| request.cart_total == Decimal::from(100) && request.quantity == 1)
            .return_once(|_| Ok(result_with_total(90)));

        let mut modal = filled_modal();

        modal.submit(&tester).await?;

        assert_eq!(modal.result(), Some(&result_with_total(90)));
        assert!(modal.can_submit());

        let summary = modal.summary(USD);

        assert_eq!(summary.map(|summary| summary.final_total).as_deref(), Some("$90.00"));

        Ok(())
    }

    #[tokio::test]
    async fn compute_failure_is_shown_and_form_kept() -> TestResult {
        let mut tester = MockDiscountTester::new();
        tester
            .expect_test_stack()
            .once()
            .return_once(|_| Err(ComputeError::from_parts(Some("Stack has no rules"), None)));

        let mut modal = filled_modal();

        modal.submit(&tester).await?;

        assert_eq!(modal.error_message(), Some("Stack has no rules"));
        assert_eq!(modal.form().cart_total, "100");
        assert_eq!(modal.summary(USD), None);

        modal.dismiss_error();

        assert_eq!(modal.error_message(), None);
        assert_eq!(modal.form().cart_total, "100");

        Ok(())
    }

    #[tokio::test]
    async fn closed_modal_never_calls_tester() {
        let mut tester = MockDiscountTester::new();
        tester.expect_test_stack().never();

        let mut modal = TestModal::new("Summer stack");
        modal.set_field(FormField::CartTotal, "100");

        assert_eq!(modal.submit(&tester).await, Err(SubmitError::Closed));
        assert_eq!(modal.phase(), &TestPhase::Idle);

        modal.open();
        modal.close();

        assert_eq!(modal.begin_submit(), Err(SubmitError::Closed));
    }

    #[test]
    fn second_submission_while_loading_is_busy() -> TestResult {
        let mut modal = filled_modal();

        let pending = modal.begin_submit()?;

        assert!(!modal.can_submit());
        assert_eq!(modal.begin_submit(), Err(SubmitError::Busy));

        modal.complete(pending.ticket, Ok(result_with_total(1)));

        assert!(modal.can_submit());

        Ok(())
    }

    #[test]
    fn close_mid_flight_discards_late_result() -> TestResult {
        let mut modal = filled_modal();

        let pending = modal.begin_submit()?;

        modal.close();
        modal.complete(pending.ticket, Ok(result_with_total(1)));

        assert!(!modal.is_open());
        assert_eq!(modal.phase(), &TestPhase::Idle);
        assert_eq!(modal.form(), &SimulationForm::default());

        Ok(())
    }

    #[test]
    fn successful_submission_clears_previous_field_errors() -> TestResult {
        let mut modal = filled_modal();
        modal.set_field(FormField::Quantity, "-1");

        assert!(modal.begin_submit().is_err());
        assert!(modal.field_error(FormField::Quantity).is_some());

        modal.set_field(FormField::Quantity, "2");

        let pending = modal.begin_submit()?;

        assert_eq!(pending.request.quantity, 2);
        assert_eq!(modal.field_error(FormField::Quantity), None);

        Ok(())
    }
}
