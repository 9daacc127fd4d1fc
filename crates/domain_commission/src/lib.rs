//! Commission Domain
//!
//! This crate decides how much commission an agent earns on a sales
//! document. It plugs into the host's document-calculation pipeline as a
//! [`CalculatorMod`] and is otherwise infrastructure-agnostic: rule tables
//! and product master data come in through port traits.
//!
//! # Resolution
//!
//! - Commission rules are scoped by company, and optionally by agent,
//!   customer, product family and product. Empty scopes are wildcards.
//! - Rules are tried in descending priority; the first one matching the
//!   line wins, even if a later one would pay more.
//! - When the line carries a discount, the first penalty whose discount
//!   range contains it is subtracted from the selected percentage
//!   (never going below zero).
//!
//! # Document lifecycle
//!
//! ```text
//! Unlocked --(settlement invoiced)--> Locked
//! ```
//!
//! Once locked, every commission mutation is a no-op.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_commission::{CalculationPipeline, CommissionCalculator, CommissionSettings};
//!
//! let calculator = CommissionCalculator::from_store(store, CommissionSettings::load()?);
//! let mut pipeline = CalculationPipeline::new().with_mod(calculator);
//!
//! pipeline.calculate(&mut document, &mut lines)?;
//! println!("commission: {:?}", document.total_commission());
//! ```

pub mod rule;
pub mod penalty;
pub mod document;
pub mod product;
pub mod loader;
pub mod resolver;
pub mod calculator;
pub mod pipeline;
pub mod ports;
pub mod adapters;
pub mod settings;
pub mod error;

pub use rule::CommissionRule;
pub use penalty::PenaltyRule;
pub use document::{DocumentContext, SalesDocument, SalesLine, SettlementLink};
pub use product::Product;
pub use loader::{
    load_applicable_commissions, load_applicable_penalties,
    select_applicable_commissions, select_applicable_penalties,
};
pub use resolver::CommissionResolver;
pub use calculator::{CalculatorMod, CommissionCalculator, TOTAL_COMMISSION_SUBTOTAL};
pub use pipeline::{CalculationOutcome, CalculationPipeline, Subtotals};
pub use ports::{CommissionRuleStore, PenaltyRuleStore, ProductCatalog};
pub use adapters::InMemoryRuleStore;
pub use settings::CommissionSettings;
pub use error::CommissionError;
