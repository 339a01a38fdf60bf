//! HTTP transport for the remote playground service.
//!
//! One outbound POST per submission; no retries, no local state. Failures
//! propagate to the caller untransformed so presentation layers decide how
//! to surface them.

use crate::model::{CodeSubmission, RunConfig, RunResponse};
use serde_json::Value;
use thiserror::Error;

const RUNCODE_PATH: &str = "/api/runcode";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to playground service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("playground service returned a non-JSON body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct PlaygroundClient {
    http: reqwest::Client,
    runcode_url: String,
}

impl PlaygroundClient {
    pub fn new(cfg: &RunConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(t) = cfg.request_timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            runcode_url: runcode_url(&cfg.base_url),
        })
    }

    /// POST the code and parse the reply body as JSON, nothing more.
    /// The HTTP status is deliberately not inspected; a non-JSON error page
    /// surfaces as `TransportError::Decode`, and an unexpected-but-valid
    /// JSON shape passes through untouched for the caller to interpret.
    pub async fn submit_raw(&self, code: &str) -> Result<Value, TransportError> {
        let body = CodeSubmission { code };
        let resp = self
            .http
            .post(&self.runcode_url)
            .json(&body)
            .send()
            .await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn submit(&self, code: &str) -> Result<RunResponse, TransportError> {
        Ok(RunResponse::from_value(self.submit_raw(code).await?))
    }
}

fn runcode_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), RUNCODE_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            runcode_url("http://localhost:5000"),
            "http://localhost:5000/api/runcode"
        );
        assert_eq!(
            runcode_url("http://localhost:5000/"),
            "http://localhost:5000/api/runcode"
        );
    }
}
