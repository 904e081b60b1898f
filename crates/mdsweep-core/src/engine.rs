use crate::config::{EngineConfig, MpiConfig};
use crate::vars::VariableSet;
use serde::{Deserialize, Serialize};

/// The engine invocation prefix: MPI launcher (if any), engine executable
/// and its fixed arguments, split into argv form. The per-instance input
/// script and `-var` pairs are appended by [`EngineCommand::invocation`].
///
/// Serializable so it can travel inside the second-stage hand-off payload
/// without re-reading the configuration on the execution host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineCommand {
    argv: Vec<String>,
}

impl EngineCommand {
    pub fn from_config(engine: &EngineConfig, mpi: Option<&MpiConfig>) -> Self {
        let mut argv = Vec::new();
        if let Some(mpi) = mpi {
            argv.push(mpi.path.clone());
            argv.extend(mpi.args.split_whitespace().map(str::to_string));
        }
        argv.push(engine.path.clone());
        argv.extend(engine.args.split_whitespace().map(str::to_string));
        Self { argv }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Full argv for one instance: prefix, `-in <input>`, then one
    /// `-var NAME VALUE` pair per resolved variable, in variable order.
    pub fn invocation(&self, input_file: &str, vars: &VariableSet) -> Vec<String> {
        let mut argv = self.argv.clone();
        argv.push("-in".to_string());
        argv.push(input_file.to_string());
        for (name, value) in vars.iter() {
            argv.push("-var".to_string());
            argv.push(name.to_string());
            argv.push(value.to_string());
        }
        argv
    }

    /// Space-joined rendering for logs and dry runs.
    pub fn render(&self, input_file: &str, vars: &VariableSet) -> String {
        self.invocation(input_file, vars).join(" ")
    }
}

/// Rewrites variables whose values are paths relative to the job directory
/// so they stay valid from inside an instance subdirectory one level down.
pub fn rewrite_for_subdir(vars: &VariableSet, path_variables: &[String]) -> VariableSet {
    vars.iter()
        .map(|(name, value)| {
            let value = if path_variables.iter().any(|p| p == name) {
                format!("../{value}")
            } else {
                value.to_string()
            };
            (name.to_string(), value)
        })
        .collect()
}
