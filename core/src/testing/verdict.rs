use std::time::Duration;

use serde::Serialize;

/// Outcome of judging one testcase.
///
/// Displayed and serialized as the short judge code (`AC`, `WA`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[serde(into = "&'static str")]
pub enum Verdict {
    #[strum(serialize = "AC")]
    Accepted,

    #[strum(serialize = "WA")]
    WrongAnswer,

    #[strum(serialize = "TLE")]
    TimeLimitExceeded,

    #[strum(serialize = "RE")]
    RuntimeError,

    #[strum(serialize = "CE")]
    CompileError,

    #[strum(serialize = "MLE")]
    MemoryLimitExceeded,

    #[strum(serialize = "OLE")]
    OutputLimitExceeded,

    #[strum(serialize = "IE")]
    InternalError,
}

impl Verdict {
    /// First matching rule wins: non-zero exit, then time limit, then output mismatch.
    pub fn classify(
        exited_successfully: bool,
        elapsed: Duration,
        time_limit: Duration,
        output_matched: bool,
    ) -> Self {
        use Verdict::*;
        if !exited_successfully {
            RuntimeError
        } else if elapsed > time_limit {
            TimeLimitExceeded
        } else if !output_matched {
            WrongAnswer
        } else {
            Accepted
        }
    }

    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }

    pub fn long_name(self) -> &'static str {
        use Verdict::*;
        match self {
            Accepted => "Accepted",
            WrongAnswer => "Wrong Answer",
            TimeLimitExceeded => "Time Limit Exceeded",
            RuntimeError => "Runtime Error",
            CompileError => "Compile Error",
            MemoryLimitExceeded => "Memory Limit Exceeded",
            OutputLimitExceeded => "Output Limit Exceeded",
            InternalError => "Internal Error",
        }
    }
}

/// Result of running the solution against one testcase. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeOutcome {
    pub verdict: Verdict,
    pub elapsed: Duration,
    /// `None` when the process was terminated by a signal.
    pub exit_status: Option<i32>,
    /// Captured stdout, lossily decoded.
    pub output: String,
}

impl JudgeOutcome {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    const LIMIT: Duration = Duration::from_secs(2);
    const FAST: Duration = Duration::from_millis(100);
    const SLOW: Duration = Duration::from_millis(2500);

    #[test]
    fn runtime_error_has_top_priority() {
        for elapsed in [FAST, SLOW] {
            for matched in [true, false] {
                assert_eq!(
                    Verdict::classify(false, elapsed, LIMIT, matched),
                    Verdict::RuntimeError
                );
            }
        }
    }

    #[test]
    fn tle_wins_over_wrong_answer() {
        assert_eq!(
            Verdict::classify(true, SLOW, LIMIT, false),
            Verdict::TimeLimitExceeded
        );
        assert_eq!(
            Verdict::classify(true, SLOW, LIMIT, true),
            Verdict::TimeLimitExceeded
        );
    }

    #[test]
    fn exactly_at_limit_is_not_tle() {
        assert_eq!(Verdict::classify(true, LIMIT, LIMIT, true), Verdict::Accepted);
        assert_eq!(Verdict::classify(true, FAST, LIMIT, false), Verdict::WrongAnswer);
    }

    #[test]
    fn judge_codes_should_roundtrip_through_display() {
        for v in Verdict::iter() {
            assert_eq!(Verdict::from_str(&v.to_string()).unwrap(), v);
        }
        assert_eq!(Verdict::TimeLimitExceeded.to_string(), "TLE");
        assert!(Verdict::from_str("Accepted").is_err());
    }

    #[test]
    fn serialize_as_judge_code() {
        let json = serde_json::to_string(&Verdict::WrongAnswer).unwrap();
        assert_eq!(json, r#""WA""#);
    }
}
