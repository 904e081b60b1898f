use crate::config::SweepConfig;
use crate::engine::EngineCommand;
use crate::instance::SimulationInstance;
use crate::vars::VariableSet;
use serde::{Deserialize, Serialize};

/// Everything the second stage needs to run one instance on a (possibly
/// foreign) execution host, carried as a single JSON command-line argument.
/// The static and dynamic variables travel separately so the stage can
/// re-derive the instance directory name from the dynamic subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Handoff {
    pub command: EngineCommand,
    pub input_file: String,
    pub log_file: String,
    pub path_variables: Vec<String>,
    pub static_vars: VariableSet,
    pub dynamic_vars: VariableSet,
    pub dry_run: bool,
}

impl Handoff {
    pub fn for_instance(config: &SweepConfig, instance: &SimulationInstance, dry_run: bool) -> Self {
        Self {
            command: EngineCommand::from_config(&config.engine, config.mpi.as_ref()),
            input_file: config.engine.input_file.clone(),
            log_file: config.engine.log_file.clone(),
            path_variables: config.job.path_variables.clone(),
            static_vars: config.variables.static_vars.clone(),
            dynamic_vars: instance.dynamic.clone(),
            dry_run,
        }
    }

    /// Rebuilds the instance this payload describes.
    pub fn instance(&self) -> SimulationInstance {
        SimulationInstance::new(&self.static_vars, self.dynamic_vars.clone())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Quotes `s` for a POSIX shell by single-quoting it, closing and reopening
/// the quote around embedded single quotes.
pub fn shell_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;

    fn config() -> SweepConfig {
        SweepConfig::from_toml_str(
            r#"
            [engine]
            path = "lmp"
            args = "-sf omp"
            input-file = "in.gcmc"
            log-file = "log.gcmc"

            [job]
            path-variables = ["initial_data_file"]

            [variables.static]
            temp = "300"
            initial_data_file = "data.equi"

            [variables.dynamic]
            mu = ["-3.5"]
        "#,
        )
        .unwrap()
    }

    fn instance() -> SimulationInstance {
        let config = config();
        let mut dynamic = VariableSet::new();
        dynamic.insert("mu", "-3.5");
        SimulationInstance::new(&config.variables.static_vars, dynamic)
    }

    #[test]
    fn json_round_trip_is_identity() {
        let handoff = Handoff::for_instance(&config(), &instance(), false);

        let json = handoff.to_json().unwrap();
        let back = Handoff::from_json(&json).unwrap();

        assert_eq!(back, handoff);
    }

    #[test]
    fn rebuilt_instance_matches_the_original() {
        let original = instance();
        let handoff = Handoff::for_instance(&config(), &original, false);

        let rebuilt = handoff.instance();
        assert_eq!(rebuilt.dir_name, original.dir_name);
        assert_eq!(rebuilt.variables, original.variables);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(Handoff::from_json("{\"command\": [").is_err());
        assert!(Handoff::from_json("{}").is_err());
    }

    #[test]
    fn shell_quote_wraps_and_escapes() {
        assert_eq!(shell_quote("plain"), "'plain'");
        assert_eq!(shell_quote("a b\"c"), "'a b\"c'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
    }
}
