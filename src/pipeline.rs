//! Card import: one pipeline run per changed set file, joined into a summary.
use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use crate::batch::{count_deferred, count_unchanged, index_sets, select_batch, set_id_from_file_name};
use crate::catalog::CatalogService;
use crate::error::{ImportError, Result};
use crate::model::{BatchSummary, FolderEntry, ImportOutcome, SetEnrichment, SetFileEntry, SetInfoUpdate};
use crate::scrape::CardSite;
use crate::source::SetSource;
use crate::summary::summarize;

/// The remote collaborators one import run talks to.
#[derive(Clone, Copy)]
pub struct Remotes<'a> {
    pub catalog: &'a dyn CatalogService,
    pub sets: &'a dyn SetSource,
    pub site: &'a dyn CardSite,
}

fn is_status_ok(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// First card whose rarity is representative of the set's main product.
pub fn pick_sample_card(cards: &[SetFileEntry]) -> Option<&SetFileEntry> {
    cards.iter().find(|c| c.is_sample_candidate())
}

/// Import every changed set file (up to `max_batch_size`) concurrently.
///
/// Failing to list the remote folder or the catalog's sets aborts the card
/// import as a whole; anything that goes wrong for a single set only shows up
/// in that set's outcome.
#[instrument(skip_all)]
pub async fn import_cards(remotes: Remotes<'_>, max_batch_size: usize) -> BatchSummary {
    let entries = match remotes.sets.list_set_files().await {
        Ok(entries) => entries,
        Err(err) => {
            error!(%err, "cannot list set files");
            return BatchSummary::fatal(format!("Failed to load set files from GitHub. {err}"));
        }
    };
    let known = match remotes.catalog.list_sets().await {
        Ok(sets) => index_sets(sets),
        Err(err) => {
            error!(%err, "cannot load catalog sets");
            return BatchSummary::fatal(format!("Failed to load sets from the catalog. {err}"));
        }
    };

    let batch = select_batch(&entries, &known, max_batch_size);
    let unchanged = count_unchanged(&entries, &known);
    let deferred = count_deferred(&entries, &known, batch.len());
    info!(
        listed = entries.len(),
        selected = batch.len(),
        unchanged,
        deferred,
        "planned card import"
    );
    if deferred > 0 {
        warn!(deferred, max_batch_size, "changed sets left for the next run");
    }

    let outcomes = join_all(batch.iter().map(|entry| import_one(remotes, entry))).await;

    let errors = outcomes.iter().filter(|o| o.is_error()).count();
    let (status, message) = summarize(errors, unchanged, outcomes.len() + unchanged);
    info!(status, errors, "card import finished");

    BatchSummary {
        message,
        status,
        deferred,
        details: Some(outcomes),
    }
}

/// Import a single set file. Never fails: every fault becomes the outcome.
#[instrument(skip_all, fields(file = %entry.name))]
pub async fn import_one(remotes: Remotes<'_>, entry: &FolderEntry) -> ImportOutcome {
    let Some(set_id) = set_id_from_file_name(&entry.name) else {
        let err = ImportError::BadFileName(entry.name.clone());
        warn!(%err, "skipping set file");
        return ImportOutcome::failed(&entry.name, None, 400, err.to_string());
    };

    match import_set(remotes, entry, set_id).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(set_id, %err, "set import failed");
            ImportOutcome::failed(&entry.name, Some(set_id), 500, err.to_string())
        }
    }
}

async fn import_set(remotes: Remotes<'_>, entry: &FolderEntry, set_id: &str) -> Result<ImportOutcome> {
    info!(set_id, "import start");
    let cards = remotes.sets.fetch_set_file(entry).await?;
    let reply = remotes.catalog.import_set_cards(set_id, &cards).await?;

    let mut outcome = ImportOutcome {
        file_name: entry.name.clone(),
        set_id: Some(set_id.to_string()),
        status: reply.status,
        message: reply.message,
        details: reply.details,
        enrichment: None,
    };

    // 207 and errors keep the old hash so the whole set is retried next run.
    if reply.status != 200 {
        warn!(
            set_id,
            status = reply.status,
            error_count = reply.error_count,
            "card import incomplete; set hash left unchanged"
        );
        return Ok(outcome);
    }

    let enrichment = enrich(remotes.site, set_id, &cards).await;
    let update = SetInfoUpdate::with_sha(&entry.sha, enrichment.as_ref());
    match remotes.catalog.update_set(set_id, &update).await {
        Ok(reply) if is_status_ok(reply.status) => {
            info!(set_id, sha = %entry.sha, "set hash updated");
            outcome.enrichment = enrichment;
        }
        Ok(reply) => {
            warn!(set_id, status = reply.status, "set update rejected after card import");
            outcome.status = reply.status;
            outcome.message = format!(
                "Card import was successful, but set update failed: {}",
                reply.message
            );
        }
        Err(err) => {
            warn!(set_id, %err, "set update failed after card import");
            outcome.status = 500;
            outcome.message = format!("Card import was successful, but set update failed: {err}");
        }
    }
    Ok(outcome)
}

/// Best-effort lookup; a miss or a failure only leaves the fields absent.
async fn enrich(site: &dyn CardSite, set_id: &str, cards: &[SetFileEntry]) -> Option<SetEnrichment> {
    let Some(sample) = pick_sample_card(cards) else {
        info!(set_id, "no regular card to sample; skipping enrichment");
        return None;
    };
    match site.lookup_set_details(&sample.code).await {
        Ok(found) if !found.is_empty() => Some(found),
        Ok(_) => None,
        Err(err) => {
            warn!(set_id, card = %sample.code, %err, "set enrichment failed");
            None
        }
    }
}
