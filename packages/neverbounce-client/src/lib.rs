//! Pure NeverBounce v4 email verification REST API client.
//!
//! Wraps the single-check endpoint and adds batched verification in small
//! concurrent groups. A failed check never surfaces as an error to the
//! caller of [`NeverBounceClient::verify_email`]; it degrades to a
//! [`Verification`] with status `error` so pipelines can treat
//! verification as advisory.
//!
//! # Example
//!
//! ```rust,ignore
//! use neverbounce_client::NeverBounceClient;
//!
//! let client = NeverBounceClient::new(api_key)?;
//! let verification = client.verify_email("jdoe@novihealth.org").await;
//! if verification.status.is_deliverable() {
//!     println!("deliverable in {}ms", verification.execution_time_ms);
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{NeverBounceError, Result};
pub use types::{CheckResponse, Verification, VerifyStatus};

use std::time::Duration;

use futures::future::join_all;

const BASE_URL: &str = "https://api.neverbounce.com/v4";

/// Verification timeout passed to the API, in seconds.
const CHECK_TIMEOUT_SECS: u64 = 10;

/// Concurrent checks per batch group, kept small to stay under rate limits.
const BATCH_GROUP_SIZE: usize = 5;

pub struct NeverBounceClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NeverBounceClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        // HTTP timeout carries a buffer over the API-side check timeout.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(CHECK_TIMEOUT_SECS + 5))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Verify a single address. Never fails: transport or API errors
    /// degrade to a [`Verification`] with status `error`.
    pub async fn verify_email(&self, email: &str) -> Verification {
        match self.try_verify(email).await {
            Ok(verification) => {
                tracing::info!(
                    email,
                    status = verification.status.as_str(),
                    execution_time_ms = verification.execution_time_ms,
                    "Email verified"
                );
                verification
            }
            Err(err) => {
                tracing::warn!(email, error = %err, "Email verification check failed");
                Verification::check_failed(email, err.to_string())
            }
        }
    }

    /// Verify several addresses in concurrent groups of
    /// [`BATCH_GROUP_SIZE`]. The output preserves input order.
    pub async fn verify_many(&self, emails: &[String]) -> Vec<Verification> {
        if emails.is_empty() {
            return Vec::new();
        }
        tracing::info!(count = emails.len(), "Starting batch verification");

        let mut results = Vec::with_capacity(emails.len());
        for group in emails.chunks(BATCH_GROUP_SIZE) {
            let checks = group.iter().map(|email| self.verify_email(email));
            results.extend(join_all(checks).await);
            tracing::debug!(
                completed = results.len(),
                total = emails.len(),
                "Batch verification progress"
            );
        }

        tracing::info!(count = results.len(), "Batch verification completed");
        results
    }

    async fn try_verify(&self, email: &str) -> Result<Verification> {
        let timeout = CHECK_TIMEOUT_SECS.to_string();
        let params = [
            ("key", self.api_key.as_str()),
            ("email", email),
            ("address_info", "0"),
            ("credits_info", "0"),
            ("timeout", timeout.as_str()),
            ("request_meta_data[leverage_historical_data]", "1"),
        ];

        let resp = self
            .client
            .get(format!("{}/single/check", self.base_url))
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NeverBounceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: CheckResponse = resp.json().await?;
        if data.status != "success" {
            let message = data.message.unwrap_or_else(|| "unknown error".to_string());
            return Err(NeverBounceError::Rejected(message));
        }

        let verdict = data.result.as_deref().unwrap_or("unknown");
        Ok(Verification {
            email: email.to_string(),
            status: VerifyStatus::from(verdict),
            flags: data.flags,
            suggested_correction: data.suggested_correction.filter(|s| !s.is_empty()),
            execution_time_ms: data.execution_time,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(VerifyStatus::from("valid"), VerifyStatus::Valid);
        assert_eq!(VerifyStatus::from("VALID"), VerifyStatus::Valid);
        assert_eq!(VerifyStatus::from("catchall"), VerifyStatus::Catchall);
        assert_eq!(VerifyStatus::from("gibberish"), VerifyStatus::Unknown);
    }

    #[test]
    fn test_only_valid_is_deliverable() {
        assert!(VerifyStatus::Valid.is_deliverable());
        assert!(!VerifyStatus::Catchall.is_deliverable());
        assert!(!VerifyStatus::Unknown.is_deliverable());
        assert!(!VerifyStatus::Error.is_deliverable());
    }

    #[test]
    fn test_check_failed_shape() {
        let v = Verification::check_failed("x@example.com", "Timeout");
        assert_eq!(v.status, VerifyStatus::Error);
        assert_eq!(v.error.as_deref(), Some("Timeout"));
        assert_eq!(v.execution_time_ms, 0);
    }

    #[test]
    fn test_check_response_parsing() {
        let json = r#"{
            "status": "success",
            "result": "valid",
            "flags": ["has_dns", "has_dns_mx"],
            "execution_time": 285
        }"#;
        let resp: CheckResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "success");
        assert_eq!(resp.result.as_deref(), Some("valid"));
        assert_eq!(resp.flags.len(), 2);
        assert_eq!(resp.execution_time, 285);
    }

    #[test]
    fn test_verification_serializes_cleanly() {
        let v = Verification {
            email: "x@example.com".to_string(),
            status: VerifyStatus::Valid,
            flags: vec!["has_dns".to_string()],
            suggested_correction: None,
            execution_time_ms: 120,
            error: None,
        };
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(value["status"], "valid");
        assert!(value.get("error").is_none());
        assert!(value.get("suggested_correction").is_none());
    }
}
