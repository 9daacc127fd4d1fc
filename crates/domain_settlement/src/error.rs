//! Settlement domain errors

use thiserror::Error;

use core_kernel::{DocumentId, InvoiceId, MoneyError, SettlementId};
use domain_commission::CommissionError;

/// Errors that can occur in the settlement domain
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The settlement has been invoiced and can no longer change
    #[error("Settlement {settlement} is already invoiced by {invoice}")]
    AlreadyInvoiced {
        settlement: SettlementId,
        invoice: InvoiceId,
    },

    /// Document is not a member of the settlement
    #[error("Document {document} does not belong to settlement {settlement}")]
    DocumentNotInSettlement {
        settlement: SettlementId,
        document: DocumentId,
    },

    /// A member document was not supplied
    #[error("Document {document} of settlement {settlement} was not supplied")]
    MissingDocument {
        settlement: SettlementId,
        document: DocumentId,
    },

    /// A supplied member is not linked to the open settlement
    #[error("Document {document} is not linked to open settlement {settlement}")]
    DocumentNotLinked {
        settlement: SettlementId,
        document: DocumentId,
    },

    /// A member document was supplied more than once
    #[error("Document {document} of settlement {settlement} was supplied twice")]
    DuplicateDocument {
        settlement: SettlementId,
        document: DocumentId,
    },

    /// Settlement has no documents
    #[error("Settlement {0} has no documents")]
    EmptySettlement(SettlementId),

    /// Commission calculation failure
    #[error(transparent)]
    Commission(#[from] CommissionError),

    /// Money arithmetic failure
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}
