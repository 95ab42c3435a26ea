use serde::Serialize;

use crate::testing::{JudgeError, JudgedTestcase, Verdict};

/// What the frontend shows for one judged testcase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestReport {
    pub name: String,
    pub verdict: Verdict,
    pub elapsed_secs: f64,
    pub exit_status: Option<i32>,
    pub output: String,
    pub input: String,
    pub expected: String,
    /// Why no verdict could be obtained, for `IE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TestReport {
    /// Failures other than a spawn failure are recorded as `InternalError`.
    pub async fn from_judged(judged: JudgedTestcase) -> Result<Self, JudgeError> {
        let JudgedTestcase { testcase, result } = judged;
        let input = shown_or_empty(testcase.name(), testcase.read_input().await);
        let expected = shown_or_empty(testcase.name(), testcase.read_expected().await);

        let report = match result {
            Ok(outcome) => Self {
                name: testcase.name().to_owned(),
                verdict: outcome.verdict,
                elapsed_secs: outcome.elapsed_secs(),
                exit_status: outcome.exit_status,
                output: outcome.output,
                input,
                expected,
                message: None,
            },
            Err(e) if e.is_fatal_for_batch() => return Err(e),
            Err(e) => {
                log::error!("Testcase {}: {:#}", testcase.name(), e);
                let elapsed_secs = match &e {
                    JudgeError::ProcessTimeout { timeout, .. } => timeout.as_secs_f64(),
                    _ => 0.0,
                };
                Self {
                    name: testcase.name().to_owned(),
                    verdict: Verdict::InternalError,
                    elapsed_secs,
                    exit_status: None,
                    output: String::new(),
                    input,
                    expected,
                    message: Some(e.to_string()),
                }
            }
        };
        Ok(report)
    }

    pub fn elapsed_millis(&self) -> u128 {
        (self.elapsed_secs * 1000.0).round() as u128
    }
}

fn shown_or_empty(name: &str, text: Result<String, JudgeError>) -> String {
    text.unwrap_or_else(|e| {
        log::debug!("Testcase {}: {:#}", name, e);
        String::new()
    })
}
