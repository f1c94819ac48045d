use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Configuration for rendering documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The convention applied to projected property names when encoding.
    pub naming: Naming,

    /// Whether encoded documents are indented.
    pub pretty: bool,
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

/// The naming conventions which can be selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Naming {
    /// `OrderNumber` is written as `order-Number`.
    #[default]
    CamelDash,

    /// Names are written as the model describes them.
    Verbatim,
}

impl fmt::Display for Naming {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CamelDash => f.write_str("camel-dash"),
            Self::Verbatim => f.write_str("verbatim"),
        }
    }
}

impl FromStr for Naming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camel-dash" => Ok(Self::CamelDash),
            "verbatim" => Ok(Self::Verbatim),
            other => Err(format!(
                "unknown naming convention '{other}', expected 'camel-dash' or 'verbatim'"
            )),
        }
    }
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        naming: Naming,

        #[serde(default)]
        pretty: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 { naming, pretty } => Self { naming, pretty },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            naming: config.naming,
            pretty: config.pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nnaming = \"verbatim\"\npretty = true\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.naming, Naming::Verbatim);
        assert!(config.pretty);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nnaming = \"shouting\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, Config::default());
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hal.toml");
        let config = Config {
            naming: Naming::Verbatim,
            pretty: true,
        };

        config.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("_version = \"1\""));
        assert!(written.contains("naming = \"verbatim\""));

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test_case("camel-dash", Naming::CamelDash)]
    #[test_case("verbatim", Naming::Verbatim)]
    fn naming_parses(input: &str, expected: Naming) {
        assert_eq!(input.parse::<Naming>(), Ok(expected));
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn unknown_naming_is_rejected() {
        assert!("snake".parse::<Naming>().is_err());
    }
}
