use clap::Parser;
use halgraph::{
    Link,
    domain::{TemplateError, template},
};
use serde::Serialize;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Check {
    /// The href to check
    href: String,

    /// Require the href to end in a single placeholder, as a curie href must
    #[arg(long)]
    curie: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct Report {
    href: String,
    valid: bool,
    templated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalised: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Check {
    #[instrument(level = "debug")]
    pub fn run(self) -> anyhow::Result<()> {
        let report = self.report();

        match self.output {
            OutputFormat::Table => Self::output_table(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        if let Some(error) = report.error {
            anyhow::bail!(error);
        }
        Ok(())
    }

    fn report(&self) -> Report {
        match self.validate() {
            Ok(link) => Report {
                href: self.href.clone(),
                valid: true,
                templated: link.templated(),
                normalised: Some(link.href().to_string()),
                error: None,
            },
            Err(error) => Report {
                href: self.href.clone(),
                valid: false,
                templated: false,
                normalised: None,
                error: Some(error.to_string()),
            },
        }
    }

    fn validate(&self) -> Result<Link, TemplateError> {
        if self.curie {
            template::validate_templated(&self.href)?;
        }
        Link::new(&self.href)
    }

    fn output_table(report: &Report) {
        if report.valid {
            println!("{} {}", "✅ valid".success(), report.href);
            if let Some(normalised) = &report.normalised {
                println!("   {}  {normalised}", "href".dim());
            }
            println!("   {}  {}", "templated".dim(), report.templated);
        } else {
            println!("{} {}", "❌ invalid".failure(), report.href);
        }
    }
}
