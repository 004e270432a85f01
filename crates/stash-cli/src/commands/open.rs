//! `stash open`: write a stored file out and launch it.

use stash_core::error::StashResult;
use stash_store::{ContentStore, RecordRepository};
use crate::viewer;
use super::CommandContext;

/// Execute the open command
pub async fn execute(filename: String, no_launch: bool, ctx: &CommandContext) -> StashResult<()> {
    let store = ctx.open_store()?;
    let launch = ctx.config.viewer.launch && !no_launch;

    view(&store, &filename, launch, ctx).await
}

/// Retrieve `filename`, materialize it and optionally launch it
///
/// A filename that was never stored is reported, not returned as an error.
pub async fn view<R: RecordRepository>(
    store: &ContentStore<R>,
    filename: &str,
    launch: bool,
    ctx: &CommandContext,
) -> StashResult<()> {
    let Some(content) = store.retrieve(filename)? else {
        ctx.output.info(&format!("No such file found! ({})", filename));
        return Ok(());
    };

    let path = viewer::materialize(&ctx.output_dir(), filename, &content).await?;
    ctx.output.success(&format!("Wrote {}", path.display()));

    if launch {
        ctx.launcher.launch(&path)?;
    }

    Ok(())
}
