use std::path::PathBuf;

use clap::Parser;
use reqdb::{domain::CONFIG_FILE_NAME, Project};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Create the project folders and configuration")]
pub struct Init {
    /// Delete every record and reference before recreating the folders
    #[arg(long)]
    reset: bool,

    /// Skip the confirmation prompt when resetting
    #[arg(long, short)]
    yes: bool,
}

impl Init {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let project = Project::init(&root)?;

        if self.reset {
            let main = project.main_folder();
            let confirmed = self.yes
                || dialoguer::Confirm::new()
                    .with_prompt(format!("Delete everything under {}?", main.display()))
                    .default(false)
                    .interact()?;
            if !confirmed {
                println!("{}", "Reset cancelled".warn());
                return Ok(());
            }
            project.reset()?;
            println!("Reset {}", main.display());
        }

        println!("Initialised project in {}", root.display());
        println!("  {}", CONFIG_FILE_NAME.muted());
        for folder in [
            project.requirements()?.root().to_path_buf(),
            project.definitions()?.root().to_path_buf(),
            project.references_folder(),
        ] {
            let relative = folder.strip_prefix(&root).unwrap_or(&folder);
            println!("  {}", relative.display().to_string().muted());
        }

        Ok(())
    }
}
