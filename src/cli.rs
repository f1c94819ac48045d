use std::path::{Path, PathBuf};

mod check;
mod render;
mod terminal;

use check::Check;
use clap::ArgAction;
use halgraph::Config;
use render::Render;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the configuration file
    #[arg(short, long, default_value = "hal.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(&self.config);
        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Loads the configuration, falling back to defaults if it is missing or
/// invalid.
fn load_config(path: &Path) -> Config {
    match Config::load(path) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            tracing::debug!("Failed to load config: {e}");
            Config::default()
        }
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Build a document from a resource manifest and print it as HAL+JSON
    Render(Render),

    /// Check whether an href is a valid link target
    ///
    /// Reports whether the href is templated, and its normalised form.
    Check(Check),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Render(command) => command.run(config)?,
            Self::Check(command) => command.run()?,
        }
        Ok(())
    }
}
