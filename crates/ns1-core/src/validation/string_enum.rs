// # String Enum
//
// Validator for attributes restricted to a closed set of strings.
//
// ## Usage
//
// ```rust
// use ns1_core::validation::StringEnum;
//
// let policy = StringEnum::new(&["quorum", "one", "all"]);
// assert_eq!(policy.check("one").unwrap(), 1);
// assert!(policy.check("most").is_err());
// ```

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A closed, ordered set of allowed string values
#[derive(Debug, Clone)]
pub struct StringEnum {
    /// Allowed value → position in the original list
    values: HashMap<String, usize>,
    /// Pre-rendered list of quoted values for error messages
    expecting: String,
}

impl StringEnum {
    /// Build an enum from its allowed values, in order
    ///
    /// # Panics
    ///
    /// Panics when a value appears twice. The list is written by hand next to
    /// a schema, so a duplicate is a programming error.
    pub fn new(values: &[&str]) -> Self {
        let mut map = HashMap::with_capacity(values.len());
        let mut quoted = Vec::with_capacity(values.len());

        for (index, value) in values.iter().enumerate() {
            if map.insert((*value).to_string(), index).is_some() {
                panic!("duplicate value {:?} in string enum", value);
            }
            quoted.push(format!("{:?}", value));
        }

        Self {
            values: map,
            expecting: quoted.join(", "),
        }
    }

    /// Index of `value` in the allowed list
    pub fn check(&self, value: &str) -> Result<usize> {
        self.values.get(value).copied().ok_or_else(|| {
            Error::invalid_input(format!(
                "expecting one of {}; got {:?}",
                self.expecting, value
            ))
        })
    }

    /// Whether `value` is allowed
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains_key(value)
    }

    /// Validator closure for schema attributes
    ///
    /// The returned closure takes the attribute key and value and reports a
    /// failure scoped to that key, in the form collected by resource
    /// validation.
    pub fn validator(&self) -> impl Fn(&str, &str) -> std::result::Result<(), String> + '_ {
        move |key, value| {
            self.check(value)
                .map(|_| ())
                .map_err(|e| match e {
                    Error::InvalidInput(msg) => format!("{}: {}", key, msg),
                    other => format!("{}: {}", key, other),
                })
        }
    }

    /// Run the validator, pushing any failure into `errors`
    pub fn validate_into(&self, key: &str, value: &str, errors: &mut Vec<String>) {
        if let Err(msg) = (self.validator())(key, value) {
            errors.push(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_member_returns_index() {
        let e = StringEnum::new(&["quorum", "one", "all"]);
        assert_eq!(e.check("quorum").unwrap(), 0);
        assert_eq!(e.check("all").unwrap(), 2);
        assert!(e.contains("one"));
    }

    #[test]
    fn test_check_non_member_lists_values() {
        let e = StringEnum::new(&["quorum", "one", "all"]);
        let err = e.check("most").unwrap_err();

        assert_eq!(
            err.to_string(),
            r#"Invalid input: expecting one of "quorum", "one", "all"; got "most""#
        );
    }

    #[test]
    #[should_panic(expected = "duplicate value")]
    fn test_duplicate_panics() {
        StringEnum::new(&["a", "b", "a"]);
    }

    #[test]
    fn test_validator_scopes_to_key() {
        let e = StringEnum::new(&["hmac-md5", "hmac-sha256"]);
        let validate = e.validator();

        assert!(validate("algorithm", "hmac-sha256").is_ok());
        let msg = validate("algorithm", "md4").unwrap_err();
        assert!(msg.starts_with("algorithm: expecting one of"));
    }

    #[test]
    fn test_validate_into_collects() {
        let e = StringEnum::new(&["A", "AAAA"]);
        let mut errors = Vec::new();

        e.validate_into("type", "A", &mut errors);
        e.validate_into("type", "MX", &mut errors);

        assert_eq!(errors.len(), 1);
    }
}
