use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid variable override '{0}'. Expected 'NAME=V1,V2,...' (e.g. 'mu=-3.5,-3.0').")]
    MissingSeparator(String),

    #[error("Variable override '{0}' has an empty name.")]
    EmptyName(String),

    #[error("Variable override '{0}' has an empty value.")]
    EmptyValue(String),
}

/// Parses one `--var` override of the form `NAME=V1,V2,...` into a name
/// and its ordered value list.
pub fn parse_override(arg: &str) -> Result<(String, Vec<String>), ParseError> {
    let (name, values) = arg
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(arg.to_string()))?;

    if name.is_empty() {
        return Err(ParseError::EmptyName(arg.to_string()));
    }

    let values: Vec<String> = values.split(',').map(str::to_string).collect();
    if values.iter().any(String::is_empty) {
        return Err(ParseError::EmptyValue(arg.to_string()));
    }

    Ok((name.to_string(), values))
}

/// Parses every override, in order. A name given twice keeps the last
/// occurrence (the command line reads left to right).
pub fn parse_overrides(args: &[String]) -> Result<IndexMap<String, Vec<String>>, ParseError> {
    let mut overrides = IndexMap::new();
    for arg in args {
        let (name, values) = parse_override(arg)?;
        overrides.insert(name, values);
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_override_parses() {
        assert_eq!(
            parse_override("mu=-3.5").unwrap(),
            ("mu".to_string(), vec!["-3.5".to_string()])
        );
    }

    #[test]
    fn comma_separated_values_become_a_list() {
        let (name, values) = parse_override("cps=1.5,2.0,2.5").unwrap();
        assert_eq!(name, "cps");
        assert_eq!(values, vec!["1.5", "2.0", "2.5"]);
    }

    #[test]
    fn missing_equals_sign_is_rejected() {
        assert_eq!(
            parse_override("mu"),
            Err(ParseError::MissingSeparator("mu".to_string()))
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            parse_override("=1.0"),
            Err(ParseError::EmptyName("=1.0".to_string()))
        );
    }

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(
            parse_override("mu="),
            Err(ParseError::EmptyValue("mu=".to_string()))
        );
        assert_eq!(
            parse_override("mu=1.0,,2.0"),
            Err(ParseError::EmptyValue("mu=1.0,,2.0".to_string()))
        );
    }

    #[test]
    fn later_overrides_win() {
        let args = vec!["mu=-3.5".to_string(), "mu=-3.0".to_string()];
        let overrides = parse_overrides(&args).unwrap();
        assert_eq!(overrides["mu"], vec!["-3.0"]);
    }
}
