//! Commission settlements
//!
//! A settlement groups the sales documents of one agent so that their
//! commissions can be paid together. Once the settlement is invoiced, the
//! settlement and all of its documents are frozen.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{
    AgentCode, CompanyId, Currency, CustomerCode, DocumentId, InvoiceId, Money, SettlementId,
};
use domain_commission::SalesDocument;

use crate::error::SettlementError;

/// Settlement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementStatus {
    /// Documents can be added, removed and recalculated
    Open,
    /// The agent invoice has been generated
    Invoiced,
}

/// Filter for the documents offered to a settlement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSelection {
    /// Only documents of this customer
    pub customer: Option<CustomerCode>,
    /// Earliest document date (inclusive)
    pub date_from: Option<NaiveDate>,
    /// Latest document date (inclusive)
    pub date_to: Option<NaiveDate>,
    /// Only documents the customer has paid
    pub only_paid: bool,
}

impl InvoiceSelection {
    /// Selects every document
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_customer(mut self, customer: CustomerCode) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn paid_only(mut self) -> Self {
        self.only_paid = true;
        self
    }

    /// True if the document passes every filter
    pub fn matches(&self, document: &SalesDocument) -> bool {
        if let Some(customer) = &self.customer {
            if &document.customer != customer {
                return false;
            }
        }

        if self.date_from.map_or(false, |from| document.date < from) {
            return false;
        }

        if self.date_to.map_or(false, |to| document.date > to) {
            return false;
        }

        !self.only_paid || document.paid
    }
}

/// A commission settlement for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,
    /// Company the documents belong to
    pub company_id: CompanyId,
    /// Agent being paid
    pub agent: AgentCode,
    /// Currency of the settled documents
    pub currency: Currency,
    /// Creation date
    pub created_on: NaiveDate,
    /// Free-text notes
    pub observations: Option<String>,
    documents: Vec<DocumentId>,
    total_commission: Money,
    invoice_id: Option<InvoiceId>,
}

impl Settlement {
    /// Creates an empty open settlement
    pub fn new(company_id: CompanyId, agent: AgentCode, currency: Currency) -> Self {
        Self {
            id: SettlementId::new_v7(),
            company_id,
            agent,
            currency,
            created_on: Utc::now().date_naive(),
            observations: None,
            documents: Vec::new(),
            total_commission: Money::zero(currency),
            invoice_id: None,
        }
    }

    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = Some(observations.into());
        self
    }

    /// Member documents in the order they were added
    pub fn documents(&self) -> &[DocumentId] {
        &self.documents
    }

    /// True if the document is a member
    pub fn contains(&self, document_id: DocumentId) -> bool {
        self.documents.contains(&document_id)
    }

    /// Sum of the member documents' commission
    pub fn total_commission(&self) -> Money {
        self.total_commission
    }

    /// Invoice paying the settlement
    pub fn invoice_id(&self) -> Option<InvoiceId> {
        self.invoice_id
    }

    pub fn status(&self) -> SettlementStatus {
        if self.invoice_id.is_some() {
            SettlementStatus::Invoiced
        } else {
            SettlementStatus::Open
        }
    }

    pub fn is_invoiced(&self) -> bool {
        self.status() == SettlementStatus::Invoiced
    }

    pub(crate) fn ensure_open(&self) -> Result<(), SettlementError> {
        match self.invoice_id {
            Some(invoice) => Err(SettlementError::AlreadyInvoiced {
                settlement: self.id,
                invoice,
            }),
            None => Ok(()),
        }
    }

    /// True if the document may join this settlement
    fn accepts(&self, document: &SalesDocument, selection: &InvoiceSelection) -> bool {
        document.company_id == self.company_id
            && document.agent() == Some(&self.agent)
            && document.currency == self.currency
            && document.is_commission_capable()
            && document.settlement().is_none()
            && selection.matches(document)
    }

    /// Attaches the candidate documents that pass the selection
    ///
    /// Documents of another company or agent, documents already in a
    /// settlement and plain documents are skipped. Returns the documents
    /// added; their commission is added to the settlement total.
    pub fn add_documents(
        &mut self,
        candidates: &mut [SalesDocument],
        selection: &InvoiceSelection,
    ) -> Result<Vec<DocumentId>, SettlementError> {
        self.ensure_open()?;

        let mut added = Vec::new();
        for document in candidates.iter_mut() {
            if !self.accepts(document, selection) {
                continue;
            }
            document.join_settlement(self.id)?;
            if let Some(total) = document.total_commission() {
                self.total_commission = self.total_commission.checked_add(&total)?;
            }
            self.documents.push(document.id);
            added.push(document.id);
        }

        info!(
            settlement_id = %self.id,
            agent = %self.agent,
            added = added.len(),
            skipped = candidates.len() - added.len(),
            "Documents added to settlement"
        );
        Ok(added)
    }

    /// Detaches a document
    pub fn remove_document(&mut self, document: &mut SalesDocument) -> Result<(), SettlementError> {
        self.ensure_open()?;
        if !self.contains(document.id) {
            return Err(SettlementError::DocumentNotInSettlement {
                settlement: self.id,
                document: document.id,
            });
        }

        document.leave_settlement()?;
        self.documents.retain(|id| *id != document.id);
        if let Some(total) = document.total_commission() {
            self.total_commission = self.total_commission.checked_sub(&total)?;
        }

        info!(settlement_id = %self.id, document_id = %document.id, "Document removed from settlement");
        Ok(())
    }

    /// Recomputes the total from the member documents supplied
    ///
    /// Documents that are not members are ignored.
    pub fn recalculate_total<'a, I>(&mut self, documents: I) -> Result<Money, SettlementError>
    where
        I: IntoIterator<Item = &'a SalesDocument>,
    {
        let totals: Vec<Money> = documents
            .into_iter()
            .filter(|d| self.contains(d.id))
            .filter_map(|d| d.total_commission())
            .collect();
        self.total_commission = Money::checked_sum(&totals, self.currency)?;
        Ok(self.total_commission)
    }

    /// Records the agent invoice and locks every member document
    ///
    /// Every member must be supplied; nothing changes unless all of them
    /// can be locked.
    pub fn mark_invoiced(
        &mut self,
        invoice_id: InvoiceId,
        documents: &mut [SalesDocument],
    ) -> Result<(), SettlementError> {
        self.ensure_open()?;
        if self.documents.is_empty() {
            return Err(SettlementError::EmptySettlement(self.id));
        }

        let mut supplied = BTreeSet::new();
        for document in documents.iter().filter(|d| self.contains(d.id)) {
            if !supplied.insert(document.id) {
                return Err(SettlementError::DuplicateDocument {
                    settlement: self.id,
                    document: document.id,
                });
            }
            let linked = document
                .settlement()
                .map_or(false, |link| link.settlement_id == self.id && !link.is_invoiced());
            if !linked {
                return Err(SettlementError::DocumentNotLinked {
                    settlement: self.id,
                    document: document.id,
                });
            }
        }

        if let Some(missing) = self.documents.iter().find(|id| !supplied.contains(*id)) {
            return Err(SettlementError::MissingDocument {
                settlement: self.id,
                document: *missing,
            });
        }

        for document in documents.iter_mut().filter(|d| self.documents.contains(&d.id)) {
            document.lock_with_invoice(invoice_id)?;
        }
        self.invoice_id = Some(invoice_id);

        info!(
            settlement_id = %self.id,
            invoice_id = %invoice_id,
            total = %self.total_commission,
            "Settlement invoiced"
        );
        Ok(())
    }
}
