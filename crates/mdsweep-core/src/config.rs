use crate::vars::VariableSet;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read sweep configuration '{path}'", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sweep configuration '{path}': {source}", path = path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("missing value for required variable(s): {}", names.join(", "))]
    MissingVariables { names: Vec<String> },

    #[error("dynamic variable '{0}' has an empty value list")]
    EmptyValueList(String),

    #[error("dynamic variable '{name}' lists value '{value}' more than once")]
    DuplicateValue { name: String, value: String },

    #[error(
        "dynamic variable '{name}' value '{value}' contains '_', \
         which is reserved as the directory-name separator"
    )]
    ValueContainsSeparator { name: String, value: String },

    #[error("variable '{0}' is declared both static and dynamic")]
    DuplicateVariable(String),

    #[error("equilibrated data file '{path}' not found", path = path.display())]
    MissingDataFile { path: PathBuf },
}

/// The `[engine]` section: how to invoke the external MD engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Engine executable (or the first word of the command to run).
    pub path: String,
    /// Extra arguments appended verbatim after the executable.
    #[serde(default)]
    pub args: String,
    /// Engine input script, resolved relative to the job directory.
    pub input_file: String,
    /// Per-instance log file the engine's stdout is captured into.
    pub log_file: String,
    /// Equilibrated data file that must exist before the sweep starts.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

/// The optional `[mpi]` section: launcher the engine command is wrapped in.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct MpiConfig {
    pub path: String,
    #[serde(default)]
    pub args: String,
}

/// The `[scheduler]` section: batch submission command (e.g. `sbatch`).
/// Required only for submit mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SchedulerConfig {
    pub path: String,
    #[serde(default)]
    pub args: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct JobConfig {
    /// Names that must be resolvable from static ∪ dynamic variables.
    #[serde(default)]
    pub required_variables: Vec<String>,
    /// Variables whose values are paths relative to the job directory; they
    /// are rewritten with a `../` prefix when an instance runs in its
    /// subdirectory.
    #[serde(default)]
    pub path_variables: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct VariablesConfig {
    /// Fixed-per-job engine parameters.
    #[serde(default, rename = "static")]
    pub static_vars: VariableSet,
    /// Varied-across-instances parameters; declaration order is preserved
    /// and drives expansion order and directory naming.
    #[serde(default)]
    pub dynamic: IndexMap<String, Vec<String>>,
}

/// The full declarative description of one sweep. Immutable once loaded and
/// validated; CLI overrides are applied before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SweepConfig {
    pub engine: EngineConfig,
    #[serde(default)]
    pub mpi: Option<MpiConfig>,
    #[serde(default)]
    pub scheduler: Option<SchedulerConfig>,
    #[serde(default)]
    pub job: JobConfig,
    #[serde(default)]
    pub variables: VariablesConfig,
}

impl SweepConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        debug!(
            "Loaded sweep configuration from {:?}: {} static, {} dynamic variable(s).",
            path,
            config.variables.static_vars.len(),
            config.variables.dynamic.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Layers command-line dynamic overrides over the file-declared
    /// variables. An override shadows a static variable of the same name
    /// entirely (the command line wins, as with the original `-var` flag).
    pub fn apply_overrides(&mut self, overrides: IndexMap<String, Vec<String>>) {
        for (name, values) in overrides {
            self.variables.static_vars.remove(&name);
            self.variables.dynamic.insert(name, values);
        }
    }

    /// Fails the whole sweep before anything is spawned: every configuration
    /// error is caught here, never halfway through a directory tree.
    pub fn validate(&self, job_dir: &Path) -> Result<(), ConfigError> {
        for name in self.variables.dynamic.keys() {
            if self.variables.static_vars.contains(name) {
                return Err(ConfigError::DuplicateVariable(name.clone()));
            }
        }

        for (name, values) in &self.variables.dynamic {
            if values.is_empty() {
                return Err(ConfigError::EmptyValueList(name.clone()));
            }
            let mut seen = std::collections::HashSet::new();
            for value in values {
                // A repeated value would expand into identical combinations
                // with identical directory names; all but the first would be
                // skipped as already existing.
                if !seen.insert(value.as_str()) {
                    return Err(ConfigError::DuplicateValue {
                        name: name.clone(),
                        value: value.clone(),
                    });
                }
                // Directory names join name/value pairs with '_'. A value
                // containing the separator can make two distinct
                // combinations collide on one name.
                if value.contains('_') {
                    return Err(ConfigError::ValueContainsSeparator {
                        name: name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        let missing: Vec<String> = self
            .job
            .required_variables
            .iter()
            .filter(|name| {
                !self.variables.static_vars.contains(name.as_str())
                    && !self.variables.dynamic.contains_key(name.as_str())
            })
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables { names: missing });
        }

        if let Some(data_file) = &self.engine.data_file {
            let path = job_dir.join(data_file);
            if !path.is_file() {
                return Err(ConfigError::MissingDataFile { path });
            }
        }

        Ok(())
    }
}
