//! Strongly-typed identifiers for domain entities
//!
//! Using newtype wrappers around UUIDs provides type safety and prevents
//! accidental mixing of different identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier displayed as `PREFIX-uuid`
///
/// Parsing accepts both the prefixed form and a bare UUID, so ids copied
/// from host logs can be fed back in.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Random identifier, for entities created outside this crate
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Time-ordered identifier, for entities created by the domain
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", Self::PREFIX, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .strip_prefix(Self::PREFIX)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .unwrap_or(s);
                Uuid::parse_str(raw).map(Self)
            }
        }
    };
}

// Organisation identifiers
define_id!(CompanyId, "CMP");
define_id!(ProductId, "PRD");

// Commission configuration identifiers
define_id!(CommissionRuleId, "COM");
define_id!(PenaltyRuleId, "PEN");

// Sales document identifiers
define_id!(DocumentId, "DOC");
define_id!(LineId, "LIN");

// Settlement identifiers
define_id!(SettlementId, "SET");
define_id!(InvoiceId, "INV");
