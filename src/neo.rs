use tracing::{error, info, instrument};

use crate::catalog::CatalogService;
use crate::model::NeoImportReport;
use crate::scrape::CardSite;

/// Scrape both neo-standard tables and hand them to the catalog in one call.
///
/// No diffing: the catalog replaces/upserts the whole list.
#[instrument(skip_all)]
pub async fn import_neo_standards(site: &dyn CardSite, catalog: &dyn CatalogService) -> NeoImportReport {
    let standards = match site.fetch_neo_standards().await {
        Ok(standards) => standards,
        Err(err) => {
            error!(%err, "cannot load neo standards");
            return NeoImportReport::fatal(format!("Failed to load Neo Standards from WS-TCG. {err}"));
        }
    };
    info!(count = standards.len(), "submitting neo standards");

    match catalog.import_neo(&standards).await {
        Ok(reply) => {
            info!(status = reply.status, "neo standard import finished");
            NeoImportReport {
                status: reply.status,
                message: reply.message,
                details: reply.details,
            }
        }
        Err(err) => {
            error!(%err, "neo standard import failed");
            NeoImportReport::fatal(err.to_string())
        }
    }
}
