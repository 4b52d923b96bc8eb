use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;

use crate::error::{ImportError, Result};

/// One pooled client shared by the catalog and every remote source.
///
/// Every request carries `timeout`, so a hung remote surfaces as a
/// transport error instead of stalling the batch.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(timeout)
        .build()
        .map_err(|e| ImportError::transport("client setup", e))
}

pub fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// Read a JSON body, rejecting anything not declared as JSON.
///
/// The raw text of a non-JSON reply is kept in the error for diagnostics.
pub async fn read_json_text(op: &str, response: Response) -> Result<String> {
    let json = is_json(&response);
    let body = response
        .text()
        .await
        .map_err(|e| ImportError::transport(op, e))?;
    if !json {
        return Err(ImportError::UnexpectedContent {
            op: op.to_string(),
            body,
        });
    }
    Ok(body)
}

pub fn parse_json<T: serde::de::DeserializeOwned>(op: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| ImportError::validation(op, e))
}
