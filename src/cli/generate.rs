use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use reqdb::Project;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Generate a demo database of valid records")]
pub struct Generate {
    /// Which database to populate
    #[arg(long, value_enum, default_value = "requirements")]
    database: Target,

    /// Number of records to generate
    #[arg(long, default_value_t = 20)]
    files: usize,

    /// Number of subfolders to spread the records over
    #[arg(long, default_value_t = 3)]
    folders: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    Requirements,
    Definitions,
}

impl Generate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let project = Project::init(root)?;
        let database = match self.database {
            Target::Requirements => project.requirements()?,
            Target::Definitions => project.definitions()?,
        };

        let written = database.generate_fixture_set(self.files, self.folders)?;

        println!(
            "{}",
            format!(
                "Generated {} {} files in {}",
                written.len(),
                database.kind(),
                database.root().display()
            )
            .pass()
        );
        Ok(())
    }
}
