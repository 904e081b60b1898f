use crate::vars::VariableSet;

/// One point of the sweep: the fully resolved variable set, the dynamic
/// subset it was derived from, and the working-directory name. Write-once;
/// created by the expander, consumed by a spawner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationInstance {
    /// Static ∪ dynamic variables, dynamic winning on collision.
    pub variables: VariableSet,
    /// The dynamic combination alone; drives directory naming and the
    /// second-stage hand-off.
    pub dynamic: VariableSet,
    /// Subdirectory under the job directory this instance runs in.
    pub dir_name: String,
}

impl SimulationInstance {
    pub fn new(static_vars: &VariableSet, dynamic: VariableSet) -> Self {
        let variables = static_vars.merged(&dynamic);
        let dir_name = dir_name_for(&dynamic);
        Self {
            variables,
            dynamic,
            dir_name,
        }
    }

    /// Names from `required` this instance cannot resolve. Checked before
    /// spawning so the engine never fails opaquely over an unset variable.
    pub fn missing_required(&self, required: &[String]) -> Vec<String> {
        self.variables.missing_required(required)
    }
}

/// Derives the instance subdirectory name by concatenating the dynamic
/// name/value pairs in declaration order. Configuration validation rejects
/// values containing the `_` separator, which keeps the mapping injective:
/// distinct combinations always map to distinct names. Zero dynamic
/// variables collapse to the bare prefix.
fn dir_name_for(dynamic: &VariableSet) -> String {
    let mut name = String::from("sim");
    for (var, value) in dynamic.iter() {
        name.push('_');
        name.push_str(var);
        name.push_str(value);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep;
    use indexmap::IndexMap;
    use std::collections::HashSet;

    fn set(pairs: &[(&str, &str)]) -> VariableSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn dir_name_concatenates_pairs_in_declaration_order() {
        let instance = SimulationInstance::new(
            &set(&[("temp", "300")]),
            set(&[("mu", "-3.5"), ("cps", "1.5")]),
        );
        assert_eq!(instance.dir_name, "sim_mu-3.5_cps1.5");
    }

    #[test]
    fn zero_dynamic_variables_collapse_to_bare_prefix() {
        let instance = SimulationInstance::new(&set(&[("temp", "300")]), VariableSet::new());
        assert_eq!(instance.dir_name, "sim");
        assert_eq!(instance.variables, set(&[("temp", "300")]));
    }

    #[test]
    fn dynamic_values_win_over_static_in_resolved_set() {
        let instance =
            SimulationInstance::new(&set(&[("mu", "-9.0"), ("temp", "300")]), set(&[("mu", "-3.5")]));
        assert_eq!(instance.variables.get("mu"), Some("-3.5"));
        assert_eq!(instance.variables.get("temp"), Some("300"));
    }

    #[test]
    fn distinct_combinations_get_pairwise_distinct_dir_names() {
        let mut dyn_vars = IndexMap::new();
        dyn_vars.insert(
            "mu".to_string(),
            vec!["-3.5".to_string(), "-3.0".to_string(), "-2.5".to_string()],
        );
        dyn_vars.insert("cps".to_string(), vec!["1.5".to_string(), "2.0".to_string()]);

        let statics = VariableSet::new();
        let names: Vec<String> = sweep::expand(&dyn_vars)
            .unwrap()
            .map(|combo| SimulationInstance::new(&statics, combo).dir_name)
            .collect();

        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn missing_required_reports_unresolvable_names() {
        let instance = SimulationInstance::new(&set(&[("temp", "300")]), set(&[("mu", "-3.5")]));
        assert_eq!(
            instance.missing_required(&["temp".to_string(), "nevap".to_string()]),
            vec!["nevap".to_string()]
        );
    }
}
