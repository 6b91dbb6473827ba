use std::{path::PathBuf, process};

use clap::Parser;
use reqdb::{FileStatusList, Project, ProjectReport};
use tracing::instrument;

use super::{
    progress::IndicatifReporter,
    terminal::{verdict, Colorize},
};

#[derive(Debug, Parser, Default)]
#[command(about = "Validate the structure and content of both databases")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let project = Project::open(root)?;

        let missing = project.missing_folders();
        if !missing.is_empty() {
            for folder in &missing {
                eprintln!("{}", format!("missing folder: {}", folder.display()).warn());
            }
            anyhow::bail!("the project is not initialised, run 'reqdb init' first");
        }

        let reporter = IndicatifReporter::new("Validating");
        let report = project.validate_with(&reporter)?;

        match self.output {
            OutputFormat::Table => Self::output_table(&project, &report),
            OutputFormat::Json => Self::output_json(&report)?,
            OutputFormat::Summary => Self::output_summary(&report),
        }

        if !report.is_valid() {
            process::exit(2);
        }

        Ok(())
    }

    fn output_table(project: &Project, report: &ProjectReport) {
        let main = project.main_folder();
        Self::output_database("Requirements", &main, &report.requirements);
        Self::output_database("Definitions", &main, &report.definitions);

        let invalid = report.invalid_count();
        if invalid == 0 {
            println!(
                "{}",
                format!("All {} files are valid", report.file_count()).pass()
            );
        } else {
            println!(
                "{}",
                format!("{invalid} of {} files are invalid", report.file_count()).fail()
            );
        }
    }

    fn output_database(name: &str, base: &std::path::Path, files: &FileStatusList) {
        println!("{name} ({} files)", files.len());
        if files.is_empty() {
            println!("  {}", "no records".muted());
        }
        for status in files {
            println!(
                "  {} {}",
                verdict(status.is_valid_file()),
                status.relative_to(base)
            );
            if !status.is_valid_file() {
                for line in status.checks().extract_errors().to_table().lines() {
                    println!("    {line}");
                }
            }
        }
        println!();
    }

    fn output_json(report: &ProjectReport) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(report)?);
        Ok(())
    }

    fn output_summary(report: &ProjectReport) {
        println!(
            "files={} invalid={}",
            report.file_count(),
            report.invalid_count()
        );
    }
}
