mod export;
mod graph;
mod init;
mod show;

pub use export::cmd_export;
pub use graph::cmd_graph;
pub use init::cmd_init;
pub use show::cmd_show;

use anyhow::Context;
use std::path::Path;

async fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
