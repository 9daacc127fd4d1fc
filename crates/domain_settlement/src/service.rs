//! Settlement services
//!
//! Orchestrates the commission pipeline over every document of a
//! settlement.

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use core_kernel::{LineId, Money};
use domain_commission::{CalculationPipeline, SalesDocument, SalesLine};

use crate::error::SettlementError;
use crate::settlement::Settlement;

/// A document together with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettledDocument {
    pub document: SalesDocument,
    pub lines: Vec<SalesLine>,
}

impl SettledDocument {
    pub fn new(document: SalesDocument, lines: Vec<SalesLine>) -> Self {
        Self { document, lines }
    }
}

/// Result of recalculating a settlement
#[derive(Debug, Clone, PartialEq)]
pub struct RecalculationReport {
    /// Member documents recalculated
    pub documents: usize,
    /// Lines whose commission percentage changed
    pub changed_lines: Vec<LineId>,
    /// New settlement total
    pub total: Money,
}

/// Service recalculating commission settlements
#[derive(Debug, Default, Clone, Copy)]
pub struct SettlementService;

impl SettlementService {
    pub fn new() -> Self {
        Self
    }

    /// Reruns the commission pipeline for every member document and
    /// refreshes the settlement total
    ///
    /// Documents that do not belong to the settlement are left untouched.
    /// The caller owns the transaction: on error, discard the documents.
    #[instrument(skip_all, fields(settlement_id = %settlement.id))]
    pub fn recalculate(
        &self,
        settlement: &mut Settlement,
        documents: &mut [SettledDocument],
        pipeline: &mut CalculationPipeline,
    ) -> Result<RecalculationReport, SettlementError> {
        settlement.ensure_open()?;

        let mut recalculated = 0;
        let mut changed_lines = Vec::new();
        for entry in documents.iter_mut() {
            if !settlement.contains(entry.document.id) {
                warn!(document_id = %entry.document.id, "Skipping document outside the settlement");
                continue;
            }
            let outcome = pipeline.calculate(&mut entry.document, &mut entry.lines)?;
            changed_lines.extend(outcome.changed_lines);
            recalculated += 1;
        }

        let total = settlement.recalculate_total(documents.iter().map(|d| &d.document))?;
        Ok(RecalculationReport {
            documents: recalculated,
            changed_lines,
            total,
        })
    }
}
