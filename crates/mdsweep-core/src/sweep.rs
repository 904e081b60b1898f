use crate::config::SweepConfig;
use crate::instance::SimulationInstance;
use crate::vars::VariableSet;
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SweepError {
    #[error("dynamic variable '{0}' has an empty value list")]
    EmptyValueList(String),
}

/// Lazy iterator over the Cartesian product of the dynamic variable lists.
///
/// Combinations are produced in odometer order with the *last-declared*
/// variable varying fastest, so `mu = [a, b]`, `cps = [x, y]` yields
/// `(a,x), (a,y), (b,x), (b,y)`. Zero dynamic variables yield exactly one
/// empty combination.
#[derive(Debug)]
pub struct SweepIter<'a> {
    names: Vec<&'a str>,
    lists: Vec<&'a [String]>,
    odometer: Vec<usize>,
    remaining: usize,
}

/// Builds a [`SweepIter`] over `dynamic`, rejecting any empty value list up
/// front so a mis-declared variable can never silently produce zero
/// instances.
pub fn expand(dynamic: &IndexMap<String, Vec<String>>) -> Result<SweepIter<'_>, SweepError> {
    let mut names = Vec::with_capacity(dynamic.len());
    let mut lists: Vec<&[String]> = Vec::with_capacity(dynamic.len());
    let mut remaining = 1usize;

    for (name, values) in dynamic {
        if values.is_empty() {
            return Err(SweepError::EmptyValueList(name.clone()));
        }
        names.push(name.as_str());
        lists.push(values.as_slice());
        remaining *= values.len();
    }

    Ok(SweepIter {
        odometer: vec![0; names.len()],
        names,
        lists,
        remaining,
    })
}

impl Iterator for SweepIter<'_> {
    type Item = VariableSet;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let combination = self
            .names
            .iter()
            .zip(&self.lists)
            .zip(&self.odometer)
            .map(|((name, values), &i)| (name.to_string(), values[i].clone()))
            .collect();

        // Advance the odometer, last digit fastest.
        for pos in (0..self.odometer.len()).rev() {
            self.odometer[pos] += 1;
            if self.odometer[pos] < self.lists[pos].len() {
                break;
            }
            self.odometer[pos] = 0;
        }

        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SweepIter<'_> {}

/// Expands a validated configuration into the full list of instances, one
/// per point of the Cartesian product, each carrying its resolved variable
/// set and directory name.
pub fn expand_instances(config: &SweepConfig) -> Result<Vec<SimulationInstance>, SweepError> {
    let statics = &config.variables.static_vars;
    Ok(expand(&config.variables.dynamic)?
        .map(|combination| SimulationInstance::new(statics, combination))
        .collect())
}
