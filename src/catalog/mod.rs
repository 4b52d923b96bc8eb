use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{ImportError, Result};
use crate::http;
use crate::model::{NeoStandard, SetFileEntry, SetInfo, SetInfoUpdate};

pub mod model;

use self::model::{CardImportResponse, ErrorResponse, NeoImportResponse, SetResponse};

/// Typed access to the internal catalog service.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_sets(&self) -> Result<Vec<SetInfo>>;

    async fn create_set(&self, set: &SetInfo) -> Result<SetResponse>;

    async fn update_set(&self, set_id: &str, update: &SetInfoUpdate) -> Result<SetResponse>;

    /// Upsert the cards of one set; existing codes are updated, new ones inserted.
    async fn import_set_cards(
        &self,
        set_id: &str,
        cards: &[SetFileEntry],
    ) -> Result<CardImportResponse>;

    async fn import_neo(&self, standards: &[NeoStandard]) -> Result<NeoImportResponse>;
}

#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    pub fn new(http: Client, base_url: &str, api_key: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ImportError::validation("catalog url", format!("{raw}: {e}")))
    }

    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        op: &str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Request> {
        let mut builder = self
            .http
            .request(method, self.endpoint(path)?)
            .header("Authorization", &self.api_key)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.build().map_err(|e| ImportError::transport(op, e))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        op: &str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let request = self.build_request(op, method, path, body)?;
        debug!(op, method = %request.method(), url = %request.url(), "catalog request");
        self.http
            .execute(request)
            .await
            .map_err(|e| ImportError::transport(op, e))
    }
}

/// Decode a reply whose body carries its own status.
///
/// Non-2xx replies that only carry `{message, status}` are folded into `T`
/// through `on_error`, so callers can inspect the failing status instead of
/// losing it to a shape error.
async fn decode_reply<T, F>(op: &str, response: Response, on_error: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnOnce(ErrorResponse) -> T,
{
    let http_status = response.status();
    let body = http::read_json_text(op, response).await?;
    match serde_json::from_str::<T>(&body) {
        Ok(reply) => Ok(reply),
        Err(_) if !http_status.is_success() => match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => Ok(on_error(error)),
            Err(_) => Err(ImportError::Status {
                op: op.to_string(),
                status: http_status.as_u16(),
                message: body,
            }),
        },
        Err(err) => Err(ImportError::validation(op, err)),
    }
}

#[async_trait]
impl CatalogService for CatalogClient {
    async fn list_sets(&self) -> Result<Vec<SetInfo>> {
        const OP: &str = "getAllSets";
        let response = self.send::<()>(OP, Method::GET, "/sets/", None).await?;
        let http_status = response.status();
        let body = http::read_json_text(OP, response).await?;
        if !http_status.is_success() {
            let (status, message) = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(error) => (error.status, error.message),
                Err(_) => (http_status.as_u16(), body),
            };
            warn!(status, %message, "listing catalog sets failed");
            return Err(ImportError::Status {
                op: OP.to_string(),
                status,
                message,
            });
        }
        http::parse_json(OP, &body)
    }

    async fn create_set(&self, set: &SetInfo) -> Result<SetResponse> {
        let op = format!("createSet {}", set.id);
        let response = self.send(&op, Method::POST, "/sets", Some(set)).await?;
        decode_reply(&op, response, |e| SetResponse {
            set_id: set.id.clone(),
            status: e.status,
            message: e.message,
        })
        .await
    }

    async fn update_set(&self, set_id: &str, update: &SetInfoUpdate) -> Result<SetResponse> {
        let op = format!("updateSet {set_id}");
        let path = format!("/sets/{set_id}");
        let response = self.send(&op, Method::PUT, &path, Some(update)).await?;
        decode_reply(&op, response, |e| SetResponse {
            set_id: set_id.to_string(),
            status: e.status,
            message: e.message,
        })
        .await
    }

    async fn import_set_cards(
        &self,
        set_id: &str,
        cards: &[SetFileEntry],
    ) -> Result<CardImportResponse> {
        let op = format!("importSetCards {set_id}");
        let path = format!("/sets/{set_id}/cards");
        let response = self.send(&op, Method::POST, &path, Some(cards)).await?;
        decode_reply(&op, response, |e| CardImportResponse {
            set_id: set_id.to_string(),
            message: e.message,
            status: e.status,
            error_count: 0,
            details: None,
        })
        .await
    }

    async fn import_neo(&self, standards: &[NeoStandard]) -> Result<NeoImportResponse> {
        const OP: &str = "importNeo";
        let response = self.send(OP, Method::POST, "/neo/", Some(standards)).await?;
        decode_reply(OP, response, |e| NeoImportResponse {
            message: e.message,
            status: e.status,
            details: None,
        })
        .await
    }
}
