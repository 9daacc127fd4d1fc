//! Commission Domain Ports
//!
//! The queries the commission domain needs from the host's master data.
//! Adapters may return rows in any order except where noted; the loaders
//! apply the ordering the resolver depends on.
//!
//! ```rust,ignore
//! struct HostRuleStore { db: HostDb }
//!
//! impl DomainPort for HostRuleStore {}
//!
//! impl CommissionRuleStore for HostRuleStore {
//!     fn commissions_for(&self, company_id: CompanyId, agent: &AgentCode)
//!         -> Result<Vec<CommissionRule>, PortError>
//!     {
//!         self.db.query("SELECT * FROM commissions WHERE company = ? AND (agent = ? OR agent IS NULL)", ..)
//!     }
//! }
//! ```

use core_kernel::{AgentCode, CompanyId, DomainPort, PortError, ProductId};

use crate::penalty::PenaltyRule;
use crate::product::Product;
use crate::rule::CommissionRule;

/// Source of commission rules
pub trait CommissionRuleStore: DomainPort {
    /// Rules of the company whose agent scope is empty or equals `agent`
    ///
    /// Rows must come back in primary-key order so that rules sharing a
    /// priority keep a stable order.
    fn commissions_for(
        &self,
        company_id: CompanyId,
        agent: &AgentCode,
    ) -> Result<Vec<CommissionRule>, PortError>;
}

/// Source of discount penalties
pub trait PenaltyRuleStore: DomainPort {
    /// Penalties whose company scope is empty or equals `company_id` and
    /// whose agent scope is empty or equals `agent`
    fn penalties_for(
        &self,
        company_id: CompanyId,
        agent: &AgentCode,
    ) -> Result<Vec<PenaltyRule>, PortError>;
}

/// Product lookup
pub trait ProductCatalog: DomainPort {
    /// Returns the product, or `None` if it no longer exists
    fn product(&self, id: ProductId) -> Result<Option<Product>, PortError>;
}
