#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use riki_import::catalog::model::{
    CardImportDetail, CardImportResponse, NeoImportResponse, SetResponse,
};
use riki_import::catalog::CatalogService;
use riki_import::error::{ImportError, Result};
use riki_import::model::{
    FolderEntry, NeoStandard, SetEnrichment, SetFileEntry, SetInfo, SetInfoUpdate,
};
use riki_import::scrape::CardSite;
use riki_import::source::SetSource;
use tokio::sync::{Barrier, Mutex};

fn fault(op: &str, message: &str) -> ImportError {
    ImportError::Status {
        op: op.to_string(),
        status: 502,
        message: message.to_string(),
    }
}

pub fn entry(name: &str, sha: &str) -> FolderEntry {
    FolderEntry {
        name: name.into(),
        sha: sha.into(),
        download_url: format!("https://raw.example/{name}"),
    }
}

pub fn known_set(id: &str, sha: &str) -> SetInfo {
    SetInfo {
        id: id.into(),
        name: format!("Set {id}"),
        short_name: None,
        set_type: None,
        release_date: None,
        sha: Some(sha.into()),
    }
}

pub fn card(code: &str, rarity: &str) -> SetFileEntry {
    SetFileEntry {
        name: format!("Card {code}"),
        code: code.into(),
        rarity: rarity.into(),
        expansion: "Fate/Zero".into(),
        side: "W".into(),
        card_type: "Character".into(),
        color: "YELLOW".into(),
        level: "1".into(),
        cost: "0".into(),
        power: "5000".into(),
        soul: 1,
        trigger: vec![],
        attributes: vec!["Master".into()],
        ability: vec![],
        flavor_text: String::new(),
        set: "Fate/Zero".into(),
        release: "35".into(),
        sid: "W35".into(),
        image: format!("https://img.example/{code}.png"),
    }
}

pub fn card_reply(set_id: &str, status: u16, details: Option<Vec<CardImportDetail>>) -> CardImportResponse {
    CardImportResponse {
        set_id: set_id.into(),
        message: format!("cards of {set_id} processed"),
        status,
        error_count: details.as_ref().map(|d| d.len() as u32).unwrap_or(0),
        details,
    }
}

pub fn detail(code: &str, status: u16) -> CardImportDetail {
    CardImportDetail {
        card_code: code.into(),
        card_name: format!("Card {code}"),
        status,
        message: if status == 200 { "ok".into() } else { "rejected".into() },
    }
}

/// Catalog fake keyed by set id, so concurrent pipelines can't steal each
/// other's scripted replies.
#[derive(Clone, Default)]
pub struct RecordingCatalog {
    sets: Arc<Mutex<Option<std::result::Result<Vec<SetInfo>, String>>>>,
    card_replies: Arc<Mutex<HashMap<String, std::result::Result<CardImportResponse, String>>>>,
    update_replies: Arc<Mutex<HashMap<String, std::result::Result<SetResponse, String>>>>,
    neo_reply: Arc<Mutex<Option<std::result::Result<NeoImportResponse, String>>>>,
    pub import_calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub update_calls: Arc<Mutex<Vec<(String, SetInfoUpdate)>>>,
    pub neo_calls: Arc<Mutex<Vec<Vec<NeoStandard>>>>,
}

impl RecordingCatalog {
    pub fn with_sets(sets: Vec<SetInfo>) -> Self {
        Self {
            sets: Arc::new(Mutex::new(Some(Ok(sets)))),
            ..Default::default()
        }
    }

    pub async fn fail_list_sets(&self, message: &str) {
        *self.sets.lock().await = Some(Err(message.into()));
    }

    pub async fn reply_cards(&self, set_id: &str, reply: std::result::Result<CardImportResponse, String>) {
        self.card_replies.lock().await.insert(set_id.into(), reply);
    }

    pub async fn reply_update(&self, set_id: &str, reply: std::result::Result<SetResponse, String>) {
        self.update_replies.lock().await.insert(set_id.into(), reply);
    }

    pub async fn reply_neo(&self, reply: std::result::Result<NeoImportResponse, String>) {
        *self.neo_reply.lock().await = Some(reply);
    }

    pub async fn import_calls(&self) -> Vec<(String, Vec<String>)> {
        self.import_calls.lock().await.clone()
    }

    pub async fn update_calls(&self) -> Vec<(String, SetInfoUpdate)> {
        self.update_calls.lock().await.clone()
    }

    pub async fn neo_calls(&self) -> Vec<Vec<NeoStandard>> {
        self.neo_calls.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl CatalogService for RecordingCatalog {
    async fn list_sets(&self) -> Result<Vec<SetInfo>> {
        match self.sets.lock().await.clone() {
            Some(Ok(sets)) => Ok(sets),
            Some(Err(message)) => Err(fault("getAllSets", &message)),
            None => Ok(vec![]),
        }
    }

    async fn create_set(&self, set: &SetInfo) -> Result<SetResponse> {
        Ok(SetResponse {
            set_id: set.id.clone(),
            status: 201,
            message: "created".into(),
        })
    }

    async fn update_set(&self, set_id: &str, update: &SetInfoUpdate) -> Result<SetResponse> {
        self.update_calls
            .lock()
            .await
            .push((set_id.to_string(), update.clone()));
        match self.update_replies.lock().await.get(set_id).cloned() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(fault("updateSet", &message)),
            None => Ok(SetResponse {
                set_id: set_id.into(),
                status: 200,
                message: "updated".into(),
            }),
        }
    }

    async fn import_set_cards(&self, set_id: &str, cards: &[SetFileEntry]) -> Result<CardImportResponse> {
        self.import_calls.lock().await.push((
            set_id.to_string(),
            cards.iter().map(|c| c.code.clone()).collect(),
        ));
        match self.card_replies.lock().await.get(set_id).cloned() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(fault("importSetCards", &message)),
            None => Ok(card_reply(set_id, 200, None)),
        }
    }

    async fn import_neo(&self, standards: &[NeoStandard]) -> Result<NeoImportResponse> {
        self.neo_calls.lock().await.push(standards.to_vec());
        match self.neo_reply.lock().await.clone() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(fault("importNeo", &message)),
            None => Ok(NeoImportResponse {
                message: "All neo standards imported".into(),
                status: 200,
                details: None,
            }),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeSource {
    listing: Arc<Mutex<Option<std::result::Result<Vec<FolderEntry>, String>>>>,
    files: Arc<Mutex<HashMap<String, std::result::Result<Vec<SetFileEntry>, String>>>>,
    gate: Arc<Mutex<Option<Arc<Barrier>>>>,
    pub fetch_calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSource {
    pub fn with_listing(entries: Vec<FolderEntry>) -> Self {
        Self {
            listing: Arc::new(Mutex::new(Some(Ok(entries)))),
            ..Default::default()
        }
    }

    pub async fn fail_listing(&self, message: &str) {
        *self.listing.lock().await = Some(Err(message.into()));
    }

    pub async fn file(&self, name: &str, cards: std::result::Result<Vec<SetFileEntry>, String>) {
        self.files.lock().await.insert(name.into(), cards);
    }

    /// Every fetch waits on `barrier` before answering.
    pub async fn gate(&self, barrier: Arc<Barrier>) {
        *self.gate.lock().await = Some(barrier);
    }

    pub async fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SetSource for FakeSource {
    async fn list_set_files(&self) -> Result<Vec<FolderEntry>> {
        match self.listing.lock().await.clone() {
            Some(Ok(entries)) => Ok(entries),
            Some(Err(message)) => Err(fault("github folder", &message)),
            None => Ok(vec![]),
        }
    }

    async fn fetch_set_file(&self, entry: &FolderEntry) -> Result<Vec<SetFileEntry>> {
        self.fetch_calls.lock().await.push(entry.name.clone());
        let gate = self.gate.lock().await.clone();
        if let Some(barrier) = gate {
            barrier.wait().await;
        }
        match self.files.lock().await.get(&entry.name).cloned() {
            Some(Ok(cards)) => Ok(cards),
            Some(Err(message)) => Err(fault(&format!("set file {}", entry.name), &message)),
            None => Ok(vec![card("X-001", "RR")]),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeSite {
    neo: Arc<Mutex<Option<std::result::Result<Vec<NeoStandard>, String>>>>,
    details: Arc<Mutex<Option<std::result::Result<SetEnrichment, String>>>>,
    pub lookup_calls: Arc<Mutex<Vec<String>>>,
}

impl FakeSite {
    pub async fn neo(&self, reply: std::result::Result<Vec<NeoStandard>, String>) {
        *self.neo.lock().await = Some(reply);
    }

    pub async fn details(&self, reply: std::result::Result<SetEnrichment, String>) {
        *self.details.lock().await = Some(reply);
    }

    pub async fn lookup_calls(&self) -> Vec<String> {
        self.lookup_calls.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl CardSite for FakeSite {
    async fn fetch_neo_standards(&self) -> Result<Vec<NeoStandard>> {
        match self.neo.lock().await.clone() {
            Some(Ok(standards)) => Ok(standards),
            Some(Err(message)) => Err(ImportError::scrape("neo-standard page", message)),
            None => Ok(vec![NeoStandard {
                title: "Fate".into(),
                codes: vec!["FS".into(), "F**".into()],
            }]),
        }
    }

    async fn lookup_set_details(&self, card_code: &str) -> Result<SetEnrichment> {
        self.lookup_calls.lock().await.push(card_code.to_string());
        match self.details.lock().await.clone() {
            Some(Ok(found)) => Ok(found),
            Some(Err(message)) => Err(ImportError::scrape("card details page", message)),
            None => Ok(SetEnrichment::default()),
        }
    }
}
