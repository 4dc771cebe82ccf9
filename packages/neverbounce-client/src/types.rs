use serde::{Deserialize, Serialize};

/// Raw v4 single-check envelope.
///
/// `status` is the API call status ("success"/"auth_failure"/...), while
/// `result` carries the verdict for the address itself.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub status: String,
    pub message: Option<String>,
    pub result: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    pub suggested_correction: Option<String>,
    #[serde(default)]
    pub execution_time: i64,
}

/// Verdict for a single address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyStatus {
    Valid,
    Invalid,
    Disposable,
    Catchall,
    Unknown,
    /// The check itself failed; the address verdict is indeterminate.
    Error,
}

impl VerifyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyStatus::Valid => "valid",
            VerifyStatus::Invalid => "invalid",
            VerifyStatus::Disposable => "disposable",
            VerifyStatus::Catchall => "catchall",
            VerifyStatus::Unknown => "unknown",
            VerifyStatus::Error => "error",
        }
    }

    /// Only a clean `valid` verdict counts as deliverable.
    pub fn is_deliverable(&self) -> bool {
        matches!(self, VerifyStatus::Valid)
    }
}

impl From<&str> for VerifyStatus {
    fn from(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "valid" => VerifyStatus::Valid,
            "invalid" => VerifyStatus::Invalid,
            "disposable" => VerifyStatus::Disposable,
            "catchall" => VerifyStatus::Catchall,
            _ => VerifyStatus::Unknown,
        }
    }
}

/// A completed verification, including the error fallback shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub email: String,
    pub status: VerifyStatus,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_correction: Option<String>,
    pub execution_time_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Verification {
    /// Fallback shape used when the check itself fails.
    pub fn check_failed(email: &str, error: impl Into<String>) -> Self {
        Self {
            email: email.to_string(),
            status: VerifyStatus::Error,
            flags: Vec::new(),
            suggested_correction: None,
            execution_time_ms: 0,
            error: Some(error.into()),
        }
    }
}
