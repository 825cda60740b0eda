//! Cves subcommand implementation.
//!
//! Handles `portcve cves`, which loads or fetches a catalogue and lists it.
//! Useful for checking an offline file or a feed credential without scanning.

use crate::cli::{CveArgs, OutputFormat};
use crate::config::AppSettings;
use crate::cve::CveCatalogue;
use crate::error::CliResult;
use crate::output;
use crate::types::Port;
use clap::Parser;

/// List the records of a CVE catalogue.
#[derive(Parser, Debug)]
pub struct CvesCommand {
    /// Only list records affecting this port
    #[arg(long)]
    pub port: Option<Port>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub cve_source: CveArgs,
}

impl CvesCommand {
    /// Execute the cves command.
    pub async fn execute(&self, settings: &AppSettings) -> CliResult<()> {
        let source = self.cve_source.build_source(settings)?;
        let catalogue = source.catalogue().await?;

        let catalogue = match self.port {
            Some(port) => CveCatalogue::from_records(catalogue.for_port(port).cloned()),
            None => catalogue,
        };

        output::print_catalogue(source.name(), &catalogue, self.output)?;
        Ok(())
    }
}
