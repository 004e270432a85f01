//! Writing retrieved files to disk and handing them to the desktop.

use std::path::{Path, PathBuf};
use std::process::Command;
use stash_core::error::{StashError, StashResult};
use stash_core::utils::path::materialize_path;
use tracing::{debug, info};

/// Opens a file with whatever the host considers its default application
pub trait Launcher: Send + Sync {
    fn launch(&self, path: &Path) -> StashResult<()>;
}

/// Launcher backed by the platform opener (`start`, `open` or `xdg-open`)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn command(path: &Path) -> Command {
        if cfg!(target_os = "windows") {
            // The empty argument is the window title `start` expects first
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]).arg(path);
            command
        } else if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(path);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, path: &Path) -> StashResult<()> {
        let mut command = Self::command(path);
        let program = command.get_program().to_string_lossy().into_owned();
        debug!("Launching {:?}", command);

        let status = command.status().map_err(|e| StashError::Launch {
            program: program.clone(),
            message: e.to_string(),
        })?;

        if !status.success() {
            return Err(StashError::Launch {
                program,
                message: format!("exited with {}", status),
            });
        }

        info!("Opened {}", path.display());
        Ok(())
    }
}

/// Write `content` into `output_dir` under a sanitized `filename`
///
/// An existing file with the same name is overwritten.
pub async fn materialize(output_dir: &Path, filename: &str, content: &[u8]) -> StashResult<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await
        .map_err(|e| StashError::io(format!("Failed to create {}", output_dir.display()), e))?;

    let path = materialize_path(output_dir, filename)?;
    tokio::fs::write(&path, content).await
        .map_err(|e| StashError::io(format!("Failed to write {}", path.display()), e))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(path)
}
