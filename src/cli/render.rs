use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use halgraph::{Config, Encoder, HalGraph, Resource, domain::Naming};
use tracing::instrument;

#[derive(Debug, Parser)]
pub struct Render {
    /// Path to the resource manifest (YAML or JSON)
    manifest: PathBuf,

    /// Indent the output
    #[arg(long)]
    pretty: bool,

    /// Property naming convention (camel-dash, verbatim)
    ///
    /// Defaults to the configured convention.
    #[arg(long, value_name = "NAMING")]
    naming: Option<Naming>,

    /// Write the document to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Render {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let resource = Resource::load(&self.manifest)?;
        let graph = resource
            .build()
            .with_context(|| format!("Failed to build {}", self.manifest.display()))?;

        let json = self.encode(&graph, config)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{json}\n"))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!("Wrote document to {}", path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }

    fn encode(&self, graph: &HalGraph, config: &Config) -> anyhow::Result<String> {
        let naming = self.naming.unwrap_or(config.naming);
        let pretty = self.pretty || config.pretty;
        Ok(Encoder::with_convention(naming)
            .pretty(pretty)
            .to_string(graph)?)
    }
}
