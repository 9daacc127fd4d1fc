//! Settlement Domain
//!
//! Commission settlements group the sales documents of one agent for
//! payment:
//!
//! - Documents are attached through an [`InvoiceSelection`] filter
//! - The settlement total is the sum of its documents' commission
//! - Invoicing the settlement locks every member document, after which
//!   their commission can no longer be recalculated
//!
//! ```text
//! Open --(mark_invoiced)--> Invoiced
//! ```

pub mod settlement;
pub mod service;
pub mod error;

pub use settlement::{InvoiceSelection, Settlement, SettlementStatus};
pub use service::{RecalculationReport, SettledDocument, SettlementService};
pub use error::SettlementError;
