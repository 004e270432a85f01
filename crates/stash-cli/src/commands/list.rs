//! `stash list`: show what is stored without loading payloads.

use stash_core::error::{StashError, StashResult};
use super::CommandContext;

/// Execute the list command
pub async fn execute(json: bool, ctx: &CommandContext) -> StashResult<()> {
    let store = ctx.open_store()?;
    let files = store.list()?;

    if json {
        let rendered = serde_json::to_string_pretty(&files)
            .map_err(|e| StashError::io("Failed to render file list".to_string(), e.into()))?;
        println!("{}", rendered);
        return Ok(());
    }

    if files.is_empty() {
        ctx.output.info("No files stored yet");
        return Ok(());
    }

    for file in &files {
        println!(
            "{:>5}  {:<12}  {:>10}  {}",
            file.id,
            file.short_checksum(),
            file.format_size(),
            file.filename
        );
    }
    ctx.output.info(&format!("{} file(s)", files.len()));

    Ok(())
}
