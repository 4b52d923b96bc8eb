use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::catalog::{CatalogClient, CatalogService};
use crate::config::Config;
use crate::error::Result;
use crate::http;
use crate::model::{BatchSummary, ImportReport, NeoImportReport};
use crate::neo;
use crate::pipeline::{self, Remotes};
use crate::scrape::{CardSite, WsTcgSite};
use crate::source::{GithubSource, SetSource};

/// Runs the neo-standard and card importers against one set of remotes.
///
/// Runs are serialised per process so an HTTP trigger and the schedule never
/// write the same set hash concurrently.
pub struct Importer {
    catalog: Arc<dyn CatalogService>,
    sets: Arc<dyn SetSource>,
    site: Arc<dyn CardSite>,
    max_batch_size: usize,
    run_lock: Mutex<()>,
}

impl Importer {
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        sets: Arc<dyn SetSource>,
        site: Arc<dyn CardSite>,
        max_batch_size: usize,
    ) -> Self {
        Self {
            catalog,
            sets,
            site,
            max_batch_size,
            run_lock: Mutex::new(()),
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let client = http::build_client(&cfg.sources.user_agent, cfg.app.request_timeout())?;
        let catalog = CatalogClient::new(
            client.clone(),
            &cfg.catalog.base_url,
            cfg.catalog.api_key.clone(),
        );
        let sets = GithubSource::new(
            client.clone(),
            &cfg.sources.set_folder_url,
            &cfg.sources.user_agent,
        );
        let site = WsTcgSite::new(
            client,
            &cfg.sources.neo_standard_url,
            &cfg.sources.card_details_url,
        );
        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(sets),
            Arc::new(site),
            cfg.app.max_batch_size,
        ))
    }

    fn remotes(&self) -> Remotes<'_> {
        Remotes {
            catalog: self.catalog.as_ref(),
            sets: self.sets.as_ref(),
            site: self.site.as_ref(),
        }
    }

    pub async fn import_cards(&self) -> BatchSummary {
        pipeline::import_cards(self.remotes(), self.max_batch_size).await
    }

    pub async fn import_neo_standards(&self) -> NeoImportReport {
        neo::import_neo_standards(self.site.as_ref(), self.catalog.as_ref()).await
    }

    /// Both importers, independently; neither one's failure affects the other.
    pub async fn run(&self) -> ImportReport {
        let _guard = self.run_lock.lock().await;
        let run_id = Uuid::new_v4();
        async {
            info!("import run started");
            let (neo_import, card_import) =
                tokio::join!(self.import_neo_standards(), self.import_cards());
            info!(
                neo_status = neo_import.status,
                card_status = card_import.status,
                "import run finished"
            );
            ImportReport {
                neo_import,
                card_import,
                foil_import: None,
            }
        }
        .instrument(info_span!("import_run", %run_id))
        .await
    }
}
