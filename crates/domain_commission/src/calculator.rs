//! Document calculator integration
//!
//! The host recalculates a document by running a chain of calculator mods
//! through the lifecycle `apply` -> `calculate_line` (per line) ->
//! `calculate`. [`CommissionCalculator`] is the mod that assigns commission
//! percentages to lines and the commission total to the document.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use core_kernel::{DocumentId, Money, MoneyError};

use crate::document::{DocumentContext, SalesDocument, SalesLine};
use crate::error::CommissionError;
use crate::pipeline::Subtotals;
use crate::ports::{CommissionRuleStore, PenaltyRuleStore, ProductCatalog};
use crate::resolver::CommissionResolver;
use crate::settings::CommissionSettings;

/// Name of the subtotal contributed by the commission mod
pub const TOTAL_COMMISSION_SUBTOTAL: &str = "total_commission";

/// A step of the host's document calculation
///
/// Implementations must leave documents and lines they do not handle
/// untouched.
pub trait CalculatorMod: Send {
    /// Identifies the mod in logs
    fn name(&self) -> &'static str;

    /// Prepares a calculation pass
    fn apply(&mut self, document: &SalesDocument, lines: &[SalesLine]) -> Result<(), CommissionError>;

    /// Computes document-level values once every line is done
    fn calculate(&mut self, document: &mut SalesDocument, lines: &[SalesLine]) -> Result<(), CommissionError>;

    /// Computes line-level values, returning whether the line changed
    fn calculate_line(&mut self, document: &SalesDocument, line: &mut SalesLine) -> Result<bool, CommissionError>;

    /// Resets the values the mod owns
    fn clear(&mut self, document: &mut SalesDocument, lines: &mut [SalesLine]) -> Result<(), CommissionError>;

    /// Contributes named amounts to the document subtotals
    fn get_subtotals(
        &self,
        subtotals: &mut Subtotals,
        document: &SalesDocument,
        lines: &[SalesLine],
    ) -> Result<(), CommissionError>;
}

/// Calculator mod assigning sales commissions
pub struct CommissionCalculator {
    commissions: Arc<dyn CommissionRuleStore>,
    penalties: Arc<dyn PenaltyRuleStore>,
    catalog: Arc<dyn ProductCatalog>,
    settings: CommissionSettings,
    pass: Option<PassRules>,
}

/// Rule lists loaded by `apply` for one calculation pass
struct PassRules {
    document_id: DocumentId,
    context: DocumentContext,
    resolver: CommissionResolver,
}

impl CommissionCalculator {
    /// Creates a calculator over separate ports
    pub fn new(
        commissions: Arc<dyn CommissionRuleStore>,
        penalties: Arc<dyn PenaltyRuleStore>,
        catalog: Arc<dyn ProductCatalog>,
        settings: CommissionSettings,
    ) -> Self {
        Self {
            commissions,
            penalties,
            catalog,
            settings,
            pass: None,
        }
    }

    /// Creates a calculator over a store serving all three ports
    pub fn from_store<S>(store: Arc<S>, settings: CommissionSettings) -> Self
    where
        S: CommissionRuleStore + PenaltyRuleStore + ProductCatalog + 'static,
    {
        Self::new(store.clone(), store.clone(), store, settings)
    }

    /// The settings in use
    pub fn settings(&self) -> &CommissionSettings {
        &self.settings
    }

    /// Loads the rule lists for the document from the stores
    fn load(&self, document: &SalesDocument) -> Result<CommissionResolver, CommissionError> {
        let resolver = CommissionResolver::load(
            self.commissions.as_ref(),
            self.penalties.as_ref(),
            &document.context(),
        )?;
        debug!(
            document_id = %document.id,
            commissions = resolver.commissions().len(),
            penalties = resolver.penalties().len(),
            "Commission rules loaded"
        );
        Ok(resolver)
    }

    /// Rules of the running pass, if they were loaded for this exact document state
    fn pass_resolver(&self, document: &SalesDocument) -> Option<&CommissionResolver> {
        self.pass
            .as_ref()
            .filter(|pass| pass.document_id == document.id && pass.context == document.context())
            .map(|pass| &pass.resolver)
    }

    fn handles(document: &SalesDocument) -> bool {
        document.is_commission_capable() && !document.is_locked()
    }
}

impl CalculatorMod for CommissionCalculator {
    fn name(&self) -> &'static str {
        "commission"
    }

    fn apply(&mut self, document: &SalesDocument, _lines: &[SalesLine]) -> Result<(), CommissionError> {
        self.pass = None;
        if Self::handles(document) {
            self.pass = Some(PassRules {
                document_id: document.id,
                context: document.context(),
                resolver: self.load(document)?,
            });
        }
        Ok(())
    }

    #[instrument(skip_all, fields(document_id = %document.id))]
    fn calculate(&mut self, document: &mut SalesDocument, lines: &[SalesLine]) -> Result<(), CommissionError> {
        self.pass = None;
        if !Self::handles(document) {
            return Ok(());
        }

        let mut sum = Decimal::ZERO;
        for line in lines.iter().filter(|l| !l.reimbursable_expense) {
            let Some(percentage) = line.commission_percentage() else {
                continue;
            };
            if line.net_total.currency() != document.currency {
                return Err(MoneyError::CurrencyMismatch(
                    document.currency.to_string(),
                    line.net_total.currency().to_string(),
                )
                .into());
            }
            sum = line
                .net_total
                .percentage_share(percentage)
                .and_then(|share| sum.checked_add(share).ok_or(MoneyError::Overflow("commission total")))?;
        }

        let total = Money::new(self.settings.round(sum), document.currency);
        debug!(total = %total, "Commission total calculated");
        document.set_total_commission(total);
        Ok(())
    }

    fn calculate_line(&mut self, document: &SalesDocument, line: &mut SalesLine) -> Result<bool, CommissionError> {
        if !Self::handles(document) || !line.is_commission_capable() {
            return Ok(false);
        }

        if line.reimbursable_expense {
            return Ok(line.set_commission_percentage(Decimal::ZERO));
        }

        let fresh;
        let resolver = match self.pass_resolver(document) {
            Some(resolver) => resolver,
            None => {
                fresh = self.load(document)?;
                &fresh
            }
        };
        if resolver.is_empty() {
            return Ok(line.set_commission_percentage(Decimal::ZERO));
        }

        let product = match line.product_id {
            Some(id) => self.catalog.product(id)?,
            None => None,
        };
        let percentage = resolver.resolve_line_percentage(line, product.as_ref());
        Ok(line.set_commission_percentage(percentage))
    }

    fn clear(&mut self, document: &mut SalesDocument, lines: &mut [SalesLine]) -> Result<(), CommissionError> {
        self.pass = None;
        if document.is_locked() {
            return Ok(());
        }

        document.set_total_commission(Money::zero(document.currency));
        for line in lines.iter_mut() {
            line.set_commission_percentage(Decimal::ZERO);
        }
        Ok(())
    }

    fn get_subtotals(
        &self,
        subtotals: &mut Subtotals,
        document: &SalesDocument,
        _lines: &[SalesLine],
    ) -> Result<(), CommissionError> {
        if let Some(total) = document.total_commission() {
            subtotals.add_extra(TOTAL_COMMISSION_SUBTOTAL, total)?;
        }
        Ok(())
    }
}
