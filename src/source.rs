//! Readers for the GitHub-hosted set file database.
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::http;
use crate::model::{FolderEntry, SetFileEntry};

const FOLDER_OP: &str = "github folder";

#[async_trait]
pub trait SetSource: Send + Sync {
    /// Directory listing of all set files, in the order the host returns them.
    async fn list_set_files(&self) -> Result<Vec<FolderEntry>>;

    /// Download and validate one set file.
    async fn fetch_set_file(&self, entry: &FolderEntry) -> Result<Vec<SetFileEntry>>;
}

#[derive(Debug, Clone)]
pub struct GithubSource {
    http: Client,
    folder_url: String,
    user_agent: String,
}

impl GithubSource {
    pub fn new(http: Client, folder_url: &str, user_agent: &str) -> Self {
        Self {
            http,
            folder_url: folder_url.to_string(),
            user_agent: user_agent.to_string(),
        }
    }
}

#[async_trait]
impl SetSource for GithubSource {
    async fn list_set_files(&self) -> Result<Vec<FolderEntry>> {
        debug!(url = %self.folder_url, "listing set files");
        let response = self
            .http
            .get(&self.folder_url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| ImportError::transport(FOLDER_OP, e))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| ImportError::transport(FOLDER_OP, e))?;
            return Err(ImportError::Status {
                op: FOLDER_OP.to_string(),
                status,
                message: body,
            });
        }
        let body = http::read_json_text(FOLDER_OP, response).await?;
        validate_folder(&body)
    }

    async fn fetch_set_file(&self, entry: &FolderEntry) -> Result<Vec<SetFileEntry>> {
        let op = format!("set file {}", entry.name);
        // Raw file hosts serve text/plain, so the content type is not checked here.
        let response = self
            .http
            .get(&entry.download_url)
            .send()
            .await
            .map_err(|e| ImportError::transport(op.as_str(), e))?;
        if !response.status().is_success() {
            return Err(ImportError::Status {
                op,
                status: response.status().as_u16(),
                message: "set file download failed".into(),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| ImportError::transport(op.as_str(), e))?;
        validate_set_file(&op, &body)
    }
}

fn check_url(op: &str, field: &str, raw: &str) -> Result<()> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|e| ImportError::validation(op, format!("{field} \"{raw}\" is not a URL: {e}")))
}

/// Parse a directory listing; every entry needs a name, hash and download URL.
pub fn validate_folder(body: &str) -> Result<Vec<FolderEntry>> {
    let entries: Vec<FolderEntry> = http::parse_json(FOLDER_OP, body)?;
    for entry in &entries {
        check_url(FOLDER_OP, "download_url", &entry.download_url)?;
    }
    Ok(entries)
}

/// Parse a set file into card records.
pub fn validate_set_file(op: &str, body: &str) -> Result<Vec<SetFileEntry>> {
    let cards: Vec<SetFileEntry> = http::parse_json(op, body)?;
    for (idx, card) in cards.iter().enumerate() {
        if card.code.trim().is_empty() {
            return Err(ImportError::validation(op, format!("card #{idx} has an empty code")));
        }
        if card.rarity.trim().is_empty() {
            return Err(ImportError::validation(
                op,
                format!("card {} has an empty rarity", card.code),
            ));
        }
        check_url(op, "image", &card.image)?;
    }
    Ok(cards)
}
