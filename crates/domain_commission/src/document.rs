//! Sales documents and lines as seen by the commission domain
//!
//! A document or line is *commission-capable* when it carries the commission
//! field (`Some`); plain documents and lines are ignored by the calculator.
//! A document whose settlement has been invoiced is *locked* and keeps its
//! commission values forever.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{
    AgentCode, CompanyId, Currency, CustomerCode, DocumentId, InvoiceId, LineId, Money,
    ProductId, SettlementId,
};

use crate::error::CommissionError;

/// Membership of a document in a commission settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementLink {
    /// The settlement the document belongs to
    pub settlement_id: SettlementId,
    /// Invoice paying the settlement, once generated
    pub invoice_id: Option<InvoiceId>,
}

impl SettlementLink {
    /// True once the settlement has been invoiced
    pub fn is_invoiced(&self) -> bool {
        self.invoice_id.is_some()
    }
}

/// The document-level inputs of commission resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub company_id: CompanyId,
    pub agent: Option<AgentCode>,
    pub customer: CustomerCode,
    pub locked: bool,
}

/// A sales document (order, delivery note or invoice)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDocument {
    /// Unique identifier
    pub id: DocumentId,
    /// Human-readable document code
    pub code: String,
    /// Issuing company
    pub company_id: CompanyId,
    /// Customer
    pub customer: CustomerCode,
    /// Document date
    pub date: NaiveDate,
    /// Document currency
    pub currency: Currency,
    /// Whether the customer has paid the document
    pub paid: bool,
    agent: Option<AgentCode>,
    settlement: Option<SettlementLink>,
    total_commission: Option<Money>,
}

impl SalesDocument {
    /// Creates a commission-capable document dated today without agent
    pub fn new(company_id: CompanyId, customer: CustomerCode, currency: Currency) -> Self {
        let id = DocumentId::new_v7();
        Self {
            id,
            code: generate_document_code(&id),
            company_id,
            customer,
            date: Utc::now().date_naive(),
            currency,
            paid: false,
            agent: None,
            settlement: None,
            total_commission: Some(Money::zero(currency)),
        }
    }

    /// Sets the agent at creation time
    pub fn with_agent(mut self, agent: AgentCode) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Sets the document code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the document date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Marks the document as paid
    pub fn with_paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    /// Sets a previously stored commission total
    pub fn with_total_commission(mut self, total: Money) -> Self {
        self.total_commission = Some(total);
        self
    }

    /// Drops the commission field, turning this into a plain document
    pub fn without_commission(mut self) -> Self {
        self.total_commission = None;
        self
    }

    /// Returns the agent
    pub fn agent(&self) -> Option<&AgentCode> {
        self.agent.as_ref()
    }

    /// Returns the settlement membership
    pub fn settlement(&self) -> Option<&SettlementLink> {
        self.settlement.as_ref()
    }

    /// Returns the stored commission total (`None` on plain documents)
    pub fn total_commission(&self) -> Option<Money> {
        self.total_commission
    }

    /// True if the document carries the commission field
    pub fn is_commission_capable(&self) -> bool {
        self.total_commission.is_some()
    }

    /// True once the owning settlement has been invoiced
    pub fn is_locked(&self) -> bool {
        self.settlement.map_or(false, |s| s.is_invoiced())
    }

    /// Snapshot of the values rule matching depends on
    pub fn context(&self) -> DocumentContext {
        DocumentContext {
            company_id: self.company_id,
            agent: self.agent.clone(),
            customer: self.customer.clone(),
            locked: self.is_locked(),
        }
    }

    /// Replaces the agent
    ///
    /// The caller is expected to recalculate (or clear) commissions after
    /// a successful change.
    ///
    /// # Errors
    ///
    /// Returns `AgentLockedBySettlement` while the document belongs to a
    /// settlement, invoiced or not
    pub fn change_agent(&mut self, agent: Option<AgentCode>) -> Result<(), CommissionError> {
        if self.settlement.is_some() {
            return Err(CommissionError::AgentLockedBySettlement { document: self.id });
        }
        self.agent = agent;
        Ok(())
    }

    /// Normalizes the document before it is stored
    ///
    /// A document without agent cannot hold a commission total.
    pub fn validate(&mut self) {
        if self.agent.is_none() && !self.is_locked() {
            if let Some(total) = self.total_commission.as_mut() {
                *total = Money::zero(self.currency);
            }
        }
    }

    /// Adds the document to a settlement
    pub fn join_settlement(&mut self, settlement_id: SettlementId) -> Result<(), CommissionError> {
        match self.settlement {
            Some(link) if link.settlement_id == settlement_id => Ok(()),
            Some(link) => Err(CommissionError::settlement_link(format!(
                "document {} already belongs to settlement {}",
                self.id, link.settlement_id
            ))),
            None => {
                self.settlement = Some(SettlementLink {
                    settlement_id,
                    invoice_id: None,
                });
                Ok(())
            }
        }
    }

    /// Removes the document from its settlement
    pub fn leave_settlement(&mut self) -> Result<(), CommissionError> {
        if self.is_locked() {
            return Err(CommissionError::settlement_link(format!(
                "document {} belongs to an invoiced settlement",
                self.id
            )));
        }
        self.settlement = None;
        Ok(())
    }

    /// Records the settlement invoice, locking the document
    pub fn lock_with_invoice(&mut self, invoice_id: InvoiceId) -> Result<(), CommissionError> {
        match self.settlement.as_mut() {
            None => Err(CommissionError::settlement_link(format!(
                "document {} does not belong to a settlement",
                self.id
            ))),
            Some(link) if link.is_invoiced() => Err(CommissionError::settlement_link(format!(
                "document {} is already locked by a settlement invoice",
                self.id
            ))),
            Some(link) => {
                link.invoice_id = Some(invoice_id);
                Ok(())
            }
        }
    }

    pub(crate) fn set_total_commission(&mut self, total: Money) {
        if let Some(current) = self.total_commission.as_mut() {
            *current = total;
        }
    }
}

/// A line of a sales document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesLine {
    /// Unique identifier
    pub id: LineId,
    /// Product sold, if any
    pub product_id: Option<ProductId>,
    /// Line description
    pub description: String,
    /// Line discount (0-100 scale)
    pub discount_percentage: Decimal,
    /// Net line total after discounts
    pub net_total: Money,
    /// Pass-through cost re-invoiced to the customer
    pub reimbursable_expense: bool,
    commission_percentage: Option<Decimal>,
}

impl SalesLine {
    /// Creates a commission-capable free-text line
    pub fn new(description: impl Into<String>, net_total: Money) -> Self {
        Self {
            id: LineId::new_v7(),
            product_id: None,
            description: description.into(),
            discount_percentage: Decimal::ZERO,
            net_total,
            reimbursable_expense: false,
            commission_percentage: Some(Decimal::ZERO),
        }
    }

    /// Sets the product
    pub fn for_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Sets the discount
    ///
    /// # Errors
    ///
    /// Returns `InvalidDiscount` outside the 0-100 scale
    pub fn with_discount(mut self, discount: Decimal) -> Result<Self, CommissionError> {
        if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
            return Err(CommissionError::InvalidDiscount(discount));
        }
        self.discount_percentage = discount;
        Ok(self)
    }

    /// Flags the line as a reimbursable expense
    pub fn as_reimbursable_expense(mut self) -> Self {
        self.reimbursable_expense = true;
        self
    }

    /// Sets a previously stored commission percentage
    pub fn with_commission_percentage(mut self, percentage: Decimal) -> Self {
        self.commission_percentage = Some(percentage);
        self
    }

    /// Drops the commission field, turning this into a plain line
    pub fn without_commission(mut self) -> Self {
        self.commission_percentage = None;
        self
    }

    /// Returns the stored commission percentage (`None` on plain lines)
    pub fn commission_percentage(&self) -> Option<Decimal> {
        self.commission_percentage
    }

    /// True if the line carries the commission field
    pub fn is_commission_capable(&self) -> bool {
        self.commission_percentage.is_some()
    }

    /// Stores a new percentage, returning whether it changed
    pub(crate) fn set_commission_percentage(&mut self, percentage: Decimal) -> bool {
        match self.commission_percentage.as_mut() {
            Some(current) if *current != percentage => {
                *current = percentage;
                true
            }
            _ => false,
        }
    }
}

/// Generates a provisional document code
fn generate_document_code(id: &DocumentId) -> String {
    let simple = id.as_uuid().simple().to_string();
    format!("DOC-{}", &simple[simple.len() - 8..])
}
