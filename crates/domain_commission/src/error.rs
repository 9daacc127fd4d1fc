//! Commission domain errors
//!
//! The resolver itself never fails; errors come from the edges: invalid
//! rule definitions, store adapters, currency mixing and guarded document
//! operations.

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{CoreError, DocumentId, MoneyError, PortError};

/// Errors that can occur in the commission domain
#[derive(Debug, Error)]
pub enum CommissionError {
    /// Commission rule definition is invalid
    #[error("Invalid commission rule: {0}")]
    InvalidRule(String),

    /// Penalty definition is invalid
    #[error("Invalid penalty: {0}")]
    InvalidPenalty(String),

    /// Discount outside the 0-100 scale
    #[error("Discount {0} is outside the 0-100 range")]
    InvalidDiscount(Decimal),

    /// The agent of a settled document cannot change
    #[error("Cannot change the agent of document {document}: it belongs to a settlement")]
    AgentLockedBySettlement {
        document: DocumentId,
    },

    /// Document settlement link operation not allowed
    #[error("Settlement link error: {0}")]
    SettlementLink(String),

    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rule store or product catalog failure
    #[error(transparent)]
    Port(#[from] PortError),

    /// Money arithmetic failure
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Kernel validation failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CommissionError {
    /// Creates an invalid rule error
    pub fn invalid_rule(message: impl Into<String>) -> Self {
        CommissionError::InvalidRule(message.into())
    }

    /// Creates an invalid penalty error
    pub fn invalid_penalty(message: impl Into<String>) -> Self {
        CommissionError::InvalidPenalty(message.into())
    }

    /// Creates a settlement link error
    pub fn settlement_link(message: impl Into<String>) -> Self {
        CommissionError::SettlementLink(message.into())
    }
}
