//! Core Kernel - Foundational types shared by the commission domains
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers and business codes
//! - Port infrastructure for rule stores and catalogs

pub mod money;
pub mod identifiers;
pub mod codes;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{
    CompanyId, ProductId, CommissionRuleId, PenaltyRuleId,
    DocumentId, LineId, SettlementId, InvoiceId,
};
pub use codes::{AgentCode, CustomerCode, FamilyCode};
pub use ports::{PortError, DomainPort};
pub use error::CoreError;
