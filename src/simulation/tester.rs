//! Discount Testers
//!
//! The boundary to the discount calculation service. Transport, authentication and retries belong
//! to implementations of [`DiscountTester`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use tracing::debug;

use crate::simulation::{errors::ComputeError, request::SimulationRequest, result::SimulationResult};

/// Runs a discount stack against a simulated cart.
#[automock]
#[async_trait]
pub trait DiscountTester: Send + Sync {
    /// Compute the outcome of applying the stack to the requested cart.
    async fn test_stack(
        &self,
        request: SimulationRequest,
    ) -> Result<SimulationResult, ComputeError>;
}

/// A [`DiscountTester`] that replays a recorded JSON response from disk.
///
/// The file holds either a result object or a rejection. Any body with an `error` key is a
/// rejection, whatever the key's value; its message is taken from `error` itself when it is a
/// string, then `error.message`, then a top-level `message`.
#[derive(Debug, Clone)]
pub struct ReplayTester {
    path: PathBuf,
}

impl ReplayTester {
    /// Create a tester replaying the response stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the recorded response.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DiscountTester for ReplayTester {
    async fn test_stack(
        &self,
        request: SimulationRequest,
    ) -> Result<SimulationResult, ComputeError> {
        debug!(
            path = %self.path.display(),
            cart_total = %request.cart_total,
            "replaying recorded discount test response"
        );

        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| ComputeError::from_error(&error))?;

        let body: Value =
            serde_json::from_str(&body).map_err(|error| ComputeError::from_error(&error))?;

        if let Some(error) = body.get("error") {
            return Err(ComputeError::from_parts(rejection_message(&body, error), None));
        }

        serde_json::from_value(body).map_err(|error| ComputeError::from_error(&error))
    }
}

fn rejection_message<'a>(body: &'a Value, error: &'a Value) -> Option<&'a str> {
    error
        .as_str()
        .or_else(|| error.get("message").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal::Decimal;
    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use crate::simulation::form::SimulationForm;

    use super::*;

    fn request() -> SimulationRequest {
        let form = SimulationForm {
            cart_total: "50".to_string(),
            ..SimulationForm::default()
        };

        form.validate().unwrap_or_else(|errors| unreachable!("{errors}"))
    }

    fn recorded(body: &str) -> TestResult<NamedTempFile> {
        let mut file = NamedTempFile::new()?;

        file.write_all(body.as_bytes())?;

        Ok(file)
    }

    #[tokio::test]
    async fn replays_recorded_result() -> TestResult {
        let file = recorded(r#"{"finalTotal": 42.5, "appliedDiscounts": []}"#)?;

        let result = ReplayTester::new(file.path()).test_stack(request()).await?;

        assert_eq!(result.final_total, Decimal::new(425, 1));
        assert_eq!(result.applied_discounts, Some(Vec::new()));

        Ok(())
    }

    #[tokio::test]
    async fn recorded_error_is_a_rejection() -> TestResult {
        let file = recorded(r#"{"error": "Discount stack is archived"}"#)?;

        let result = ReplayTester::new(file.path()).test_stack(request()).await;

        assert_eq!(
            result,
            Err(ComputeError::Rejected("Discount stack is archived".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn structured_error_object_is_a_rejection() -> TestResult {
        let file = recorded(r#"{"error": {"code": 404, "message": "Stack not found"}}"#)?;

        let result = ReplayTester::new(file.path()).test_stack(request()).await;

        assert_eq!(
            result,
            Err(ComputeError::Rejected("Stack not found".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn null_error_falls_back_to_top_level_message() -> TestResult {
        let file = recorded(r#"{"error": null, "message": "boom"}"#)?;

        let result = ReplayTester::new(file.path()).test_stack(request()).await;

        assert_eq!(result, Err(ComputeError::Rejected("boom".to_string())));

        Ok(())
    }

    #[tokio::test]
    async fn error_without_message_is_never_a_success() -> TestResult {
        let file = recorded(r#"{"error": true}"#)?;

        let result = ReplayTester::new(file.path()).test_stack(request()).await;

        assert_eq!(result, Err(ComputeError::Unknown));

        Ok(())
    }

    #[tokio::test]
    async fn mistyped_result_is_a_failure_with_the_parse_message() -> TestResult {
        let file = recorded(r#"{"finalTotal": {"amount": 10}}"#)?;

        let result = ReplayTester::new(file.path()).test_stack(request()).await;

        let Err(ComputeError::Failed(message)) = &result else {
            return Err(format!("unexpected: {result:?}").into());
        };

        assert!(message.starts_with("invalid type"), "unexpected: {message}");

        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_a_failure_with_its_own_message() {
        let tester = ReplayTester::new("/definitely/not/here.json");

        let result = tester.test_stack(request()).await;

        assert!(
            matches!(result, Err(ComputeError::Failed(_))),
            "unexpected: {result:?}"
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_failure() -> TestResult {
        let file = recorded("{not json")?;

        let result = ReplayTester::new(file.path()).test_stack(request()).await;

        assert!(matches!(result, Err(ComputeError::Failed(_))), "unexpected: {result:?}");

        Ok(())
    }
}
