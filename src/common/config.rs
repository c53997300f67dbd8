//! Self-documenting TOML configuration files
//!
//! A config type lists its fields once through `documented_config!` and gets a
//! loader that writes a commented default file on first use:
//!
//! ```ignore
//! documented_config!(PodcastConfig {
//!     fields: [
//!         preshow_marker, "Symbol in front of preshow offsets",
//!         table_class, "Class of the transcript table",
//!     ],
//!     config_path: default_config_path,
//! });
//! ```
//!
//! Defaults come from the type's `Default` impl and `#[serde(default)]`, so a
//! partially filled file still deserializes.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata about a configuration field
#[derive(Debug, Clone)]
pub struct ConfigFieldMeta {
    pub name: &'static str,
    /// TOML-serialized default value, or None if serialization failed
    pub default_value: Option<String>,
    pub description: &'static str,
}

/// Implemented by the `documented_config!` macro.
pub trait DocumentedConfig: Sized + Default {
    fn field_metadata() -> Vec<ConfigFieldMeta>;

    /// TOML-serialized value of a single field
    fn get_field_value(&self, field_name: &str) -> String;

    /// Default location of the config file
    fn config_path() -> Result<PathBuf>;

    /// Write every field as `name = value  # description`
    fn save_with_documentation(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory {}", parent.display()))?;
            }
        }

        let mut output = String::new();
        for field in Self::field_metadata() {
            let value = self.get_field_value(field.name);
            match &field.default_value {
                Some(default) if *default != value => output.push_str(&format!(
                    "{} = {}  # {} (default: {})\n",
                    field.name, value, field.description, default
                )),
                _ => output.push_str(&format!(
                    "{} = {}  # {}\n",
                    field.name, value, field.description
                )),
            }
        }

        fs::write(path, output).with_context(|| format!("writing config to {}", path.display()))?;
        Ok(())
    }

    /// Read the file at `path`, creating it with defaults if missing
    fn load_from_path_documented(path: &Path) -> Result<Self>
    where
        for<'de> Self: serde::de::Deserialize<'de>,
    {
        if !path.exists() {
            let config = Self::default();
            config.save_with_documentation(path)?;
            return Ok(config);
        }

        Self::read_from_path_documented(path)
    }

    /// Read the file at `path`, or return the defaults if it does not exist
    fn read_from_path_documented(path: &Path) -> Result<Self>
    where
        for<'de> Self: serde::de::Deserialize<'de>,
    {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Generate the `DocumentedConfig` implementation for a config struct
#[macro_export]
macro_rules! documented_config {
    (
        $config_name:ident {
            fields: [
                $($field:ident, $desc:expr),* $(,)?
            ],
            config_path: $path:expr $(,)?
        }
    ) => {
        impl $crate::common::config::DocumentedConfig for $config_name {
            fn field_metadata() -> Vec<$crate::common::config::ConfigFieldMeta> {
                let default_config = Self::default();
                vec![
                    $(
                        $crate::common::config::ConfigFieldMeta {
                            name: stringify!($field),
                            default_value: toml::Value::try_from(&default_config.$field)
                                .map(|v| v.to_string())
                                .ok(),
                            description: $desc,
                        },
                    )*
                ]
            }

            fn get_field_value(&self, field_name: &str) -> String {
                match field_name {
                    $(
                        stringify!($field) => {
                            toml::Value::try_from(&self.$field)
                                .map(|v| v.to_string())
                                .unwrap_or_else(|_| format!("{:?}", self.$field))
                        }
                    )*
                    _ => String::new(),
                }
            }

            fn config_path() -> ::anyhow::Result<::std::path::PathBuf> {
                ($path)()
            }
        }
    };
}
