//! `stash fetch`: download a URL and store its content once.

use stash_core::error::StashResult;
use stash_core::types::IngestOutcome;
use stash_fetch::filename_from_url;
use tracing::warn;
use super::open::view;
use super::CommandContext;

/// Execute the fetch command
///
/// A failed download is reported and leaves the store untouched; it is not
/// an error for the process.
pub async fn execute(url: String, name: Option<String>, open: bool, ctx: &CommandContext) -> StashResult<()> {
    let fetcher = ctx.fetcher()?;

    let content = match fetcher.fetch(&url).await {
        Ok(content) => content,
        Err(err) if err.is_recoverable() => {
            warn!("Fetch failed: {}", err);
            ctx.output.warn(&format!("Could not download {}: {}", url, err));
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let filename = name.unwrap_or_else(|| filename_from_url(&url));
    let store = ctx.open_store()?;

    match store.ingest(&filename, &content)? {
        IngestOutcome::Inserted(record) => {
            let summary = record.summary();
            ctx.output.success(&format!(
                "Stored {} ({}, {})",
                summary.filename,
                summary.format_size(),
                summary.short_checksum()
            ));
        }
        IngestOutcome::Skipped(checksum) => {
            ctx.output.info(&format!("Already stored, skipping ({})", checksum));
        }
    }

    if open {
        view(&store, &filename, ctx.config.viewer.launch, ctx).await?;
    }

    Ok(())
}
