//! Ports and Adapters Infrastructure
//!
//! The commission core never talks to a database directly. Each domain
//! declares the queries it needs as port traits (rule stores, product
//! catalog) and the host plugs in an adapter: its own ORM, a remote API, or
//! the in-memory adapter used by tests.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │        Calculation pipeline / services       │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │   Port traits (CommissionRuleStore, ...)     │
//! │   defined in each domain crate               │
//! └──────────────────────────────────────────────┘
//!            ▲                        ▲
//!   ┌────────┴────────┐     ┌─────────┴────────┐
//!   │  Host adapter   │     │ In-memory adapter│
//!   └─────────────────┘     └──────────────────┘
//! ```

use thiserror::Error;

/// Failure reported by a port adapter
///
/// Adapters attach the underlying error as `source` when there is one.
#[derive(Debug, Error)]
pub enum PortError {
    /// The backing store could not be reached
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The adapter failed on its own account
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Marker trait for all domain ports
///
/// Ports must be shareable so one calculator can serve a whole host process.
pub trait DomainPort: Send + Sync + 'static {}
