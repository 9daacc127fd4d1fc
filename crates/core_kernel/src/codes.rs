//! Business codes for agents, customers and product families
//!
//! Unlike identifiers, these are human-assigned short codes coming from the
//! host's master data. A code is never blank: an empty value in a rule or a
//! document means "not set" and is represented as `None` at the edges.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_code {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a code, rejecting blank values
            pub fn new(code: impl Into<String>) -> Result<Self, CoreError> {
                let code = code.into();
                let trimmed = code.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::validation(concat!($label, " code cannot be blank")));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Parses an optional code where blank input means "not set"
            pub fn parse_optional(code: &str) -> Option<Self> {
                Self::new(code).ok()
            }

            /// Returns the code as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(code: $name) -> String {
                code.0
            }
        }
    };
}

define_code!(AgentCode, "Agent");
define_code!(CustomerCode, "Customer");
define_code!(FamilyCode, "Family");

/// Serde helper that reads a blank or missing string as `None`
///
/// Rule tables exported by the host store unset scopes as empty strings.
///
/// ```rust,ignore
/// #[serde(default, deserialize_with = "core_kernel::codes::blank_as_none")]
/// pub agent: Option<AgentCode>,
/// ```
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse::<T>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_trimmed() {
        let code = AgentCode::new("  AG01 ").unwrap();
        assert_eq!(code.as_str(), "AG01");
    }

    #[test]
    fn test_blank_code_rejected() {
        assert!(CustomerCode::new("   ").is_err());
        assert!(FamilyCode::parse_optional("").is_none());
    }

    #[test]
    fn test_blank_as_none_in_struct() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "blank_as_none")]
            agent: Option<AgentCode>,
            #[serde(default, deserialize_with = "blank_as_none")]
            family: Option<FamilyCode>,
        }

        let row: Row = serde_json::from_str(r#"{"agent": "", "family": "FRUIT"}"#).unwrap();
        assert!(row.agent.is_none());
        assert_eq!(row.family.unwrap().as_str(), "FRUIT");

        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert!(row.agent.is_none());
    }
}
