use std::path::PathBuf;

use clap::Parser;
use reqdb::Project;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Export both databases as markdown documents")]
pub struct Export {
    /// Folder the documents are written to
    target: PathBuf,
}

impl Export {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let project = Project::open(root)?;
        let written = project.export(&self.target)?;

        println!(
            "{}",
            format!(
                "Exported {} documents to {}",
                written.len(),
                self.target.display()
            )
            .pass()
        );
        Ok(())
    }
}
