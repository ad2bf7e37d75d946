// Filter controls shared by the resource views
use std::str::FromStr;
use thiserror::Error;

/// A string did not name any variant of a status/severity enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("no filter named '{control}' (available: {available})")]
    UnknownControl { control: String, available: String },
    #[error(transparent)]
    InvalidValue(#[from] UnknownValue),
}

/// Filters that can be driven from named controls (the dropdowns of a view).
pub trait FilterControls: Default + Clone + Send + Sync {
    /// Names of the controls this filter understands
    fn controls() -> &'static [&'static str];

    /// Set one control. Empty or "all" clears the constraint.
    fn apply(&mut self, control: &str, value: &str) -> Result<(), FilterError>;

    /// Query string pairs for the backend, constraints only
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Parse a control value, treating "" and "all" as no constraint
pub fn parse_choice<T>(value: &str) -> Result<Option<T>, UnknownValue>
where
    T: FromStr<Err = UnknownValue>,
{
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    value.parse().map(Some)
}

pub(crate) fn unknown_control<F: FilterControls>(control: &str) -> FilterError {
    FilterError::UnknownControl {
        control: control.to_string(),
        available: F::controls().join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::Severity;

    #[test]
    fn test_parse_choice_treats_blank_and_all_as_unconstrained() {
        assert_eq!(parse_choice::<Severity>("").unwrap(), None);
        assert_eq!(parse_choice::<Severity>("  ").unwrap(), None);
        assert_eq!(parse_choice::<Severity>("All").unwrap(), None);
        assert_eq!(parse_choice::<Severity>("high").unwrap(), Some(Severity::High));
    }

    #[test]
    fn test_parse_choice_rejects_unknown_values() {
        let err = parse_choice::<Severity>("catastrophic").unwrap_err();
        assert_eq!(err.kind, "severity");
        assert_eq!(err.value, "catastrophic");
    }
}
