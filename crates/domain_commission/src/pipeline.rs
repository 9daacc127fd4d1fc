//! Calculation pipeline
//!
//! Runs an ordered chain of [`CalculatorMod`]s over a document the way the
//! host recalculates it: every mod's `apply`, then `calculate_line` for each
//! line, then every mod's `calculate`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use core_kernel::{Currency, LineId, Money, MoneyError};

use crate::calculator::CalculatorMod;
use crate::document::{SalesDocument, SalesLine};
use crate::error::CommissionError;

/// Document subtotals with named contributions from the mods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtotals {
    /// Sum of the net line totals
    pub net: Money,
    /// Named amounts contributed by mods
    pub extras: BTreeMap<String, Money>,
}

impl Subtotals {
    /// Empty subtotals in the given currency
    pub fn new(currency: Currency) -> Self {
        Self {
            net: Money::zero(currency),
            extras: BTreeMap::new(),
        }
    }

    /// Adds to a named amount, creating it if needed
    pub fn add_extra(&mut self, name: impl Into<String>, amount: Money) -> Result<(), MoneyError> {
        let name = name.into();
        let current = self
            .extras
            .get(&name)
            .copied()
            .unwrap_or_else(|| Money::zero(amount.currency()));
        self.extras.insert(name, current.checked_add(&amount)?);
        Ok(())
    }

    /// Returns a named amount
    pub fn extra(&self, name: &str) -> Option<Money> {
        self.extras.get(name).copied()
    }
}

/// Result of a calculation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationOutcome {
    /// Lines whose stored values changed and must be persisted
    pub changed_lines: Vec<LineId>,
}

impl CalculationOutcome {
    /// True if no line changed
    pub fn is_unchanged(&self) -> bool {
        self.changed_lines.is_empty()
    }
}

/// Ordered chain of calculator mods
#[derive(Default)]
pub struct CalculationPipeline {
    mods: Vec<Box<dyn CalculatorMod>>,
}

impl CalculationPipeline {
    /// Creates an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mod
    pub fn with_mod(mut self, calculator: impl CalculatorMod + 'static) -> Self {
        self.add_mod(Box::new(calculator));
        self
    }

    /// Appends a boxed mod
    pub fn add_mod(&mut self, calculator: Box<dyn CalculatorMod>) {
        self.mods.push(calculator);
    }

    /// Names of the registered mods, in run order
    pub fn mod_names(&self) -> Vec<&'static str> {
        self.mods.iter().map(|m| m.name()).collect()
    }

    /// Recalculates the document and all of its lines
    #[instrument(skip_all, fields(document_id = %document.id, lines = lines.len()))]
    pub fn calculate(
        &mut self,
        document: &mut SalesDocument,
        lines: &mut [SalesLine],
    ) -> Result<CalculationOutcome, CommissionError> {
        for calculator in self.mods.iter_mut() {
            calculator.apply(document, lines)?;
        }

        let mut outcome = CalculationOutcome::default();
        for line in lines.iter_mut() {
            if self.run_line(document, line)? {
                outcome.changed_lines.push(line.id);
            }
        }

        for calculator in self.mods.iter_mut() {
            calculator.calculate(document, lines)?;
        }

        debug!(changed = outcome.changed_lines.len(), "Document recalculated");
        Ok(outcome)
    }

    /// Recalculates a single line, returning whether it changed
    pub fn calculate_line(
        &mut self,
        document: &SalesDocument,
        line: &mut SalesLine,
    ) -> Result<bool, CommissionError> {
        self.run_line(document, line)
    }

    /// Resets every value the mods own
    #[instrument(skip_all, fields(document_id = %document.id))]
    pub fn clear(&mut self, document: &mut SalesDocument, lines: &mut [SalesLine]) -> Result<(), CommissionError> {
        for calculator in self.mods.iter_mut() {
            calculator.clear(document, lines)?;
        }
        Ok(())
    }

    /// Builds the document subtotals
    pub fn subtotals(&self, document: &SalesDocument, lines: &[SalesLine]) -> Result<Subtotals, CommissionError> {
        let mut subtotals = Subtotals::new(document.currency);
        subtotals.net = Money::checked_sum(lines.iter().map(|l| &l.net_total), document.currency)?;
        for calculator in &self.mods {
            calculator.get_subtotals(&mut subtotals, document, lines)?;
        }
        Ok(subtotals)
    }

    fn run_line(&mut self, document: &SalesDocument, line: &mut SalesLine) -> Result<bool, CommissionError> {
        let mut changed = false;
        for calculator in self.mods.iter_mut() {
            changed |= calculator.calculate_line(document, line)?;
        }
        Ok(changed)
    }
}
