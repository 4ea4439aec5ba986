//! Validated MySQL identifiers for statements that cannot bind parameters
use std::fmt;

use super::{DatabaseError, DatabaseResult};

const MAX_IDENTIFIER_LEN: usize = 64;

/// A schema object name that is safe to splice into DDL.
///
/// Only unquoted-identifier characters are accepted (`[A-Za-z0-9_$]`, 1 to 64
/// characters, not purely numeric), so the backtick-quoted form can never
/// break out of the identifier position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    pub fn parse(name: &str) -> DatabaseResult<Self> {
        if name.is_empty() || name.len() > MAX_IDENTIFIER_LEN {
            return Err(DatabaseError::InvalidIdentifier(format!(
                "'{}' must be between 1 and {} characters",
                name, MAX_IDENTIFIER_LEN
            )));
        }

        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$'))
        {
            return Err(DatabaseError::InvalidIdentifier(format!(
                "'{}' contains disallowed character {:?}",
                name, bad
            )));
        }

        if name.chars().all(|c| c.is_ascii_digit()) {
            return Err(DatabaseError::InvalidIdentifier(format!(
                "'{}' cannot be purely numeric",
                name
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Backtick-quoted form for use in statements
    pub fn quoted(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl fmt::Display for SqlIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        for name in ["demo", "users", "app_db", "db$2", "_private", "9lives"] {
            let ident = SqlIdentifier::parse(name).unwrap();
            assert_eq!(ident.as_str(), name);
        }
    }

    #[test]
    fn test_quoted() {
        let ident = SqlIdentifier::parse("demo").unwrap();
        assert_eq!(ident.quoted(), "`demo`");
    }

    #[test]
    fn test_rejects_injection_attempts() {
        for name in ["demo`; DROP TABLE users; --", "demo db", "a-b", "db.users", "x'y"] {
            assert!(SqlIdentifier::parse(name).is_err(), "accepted {name}");
        }
    }

    #[test]
    fn test_rejects_empty_numeric_and_long_names() {
        assert!(SqlIdentifier::parse("").is_err());
        assert!(SqlIdentifier::parse("12345").is_err());
        assert!(SqlIdentifier::parse(&"a".repeat(65)).is_err());
        assert!(SqlIdentifier::parse(&"a".repeat(64)).is_ok());
    }
}
