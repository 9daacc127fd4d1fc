//! In-memory rule store
//!
//! Keeps commission rules, penalties and products in insertion order, which
//! plays the role of primary-key order. Useful for tests and for hosts that
//! load their rule tables once per request.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use core_kernel::{
    AgentCode, CommissionRuleId, CompanyId, DomainPort, PenaltyRuleId, PortError, ProductId,
};

use crate::error::CommissionError;
use crate::penalty::PenaltyRule;
use crate::ports::{CommissionRuleStore, PenaltyRuleStore, ProductCatalog};
use crate::product::Product;
use crate::rule::CommissionRule;

#[derive(Debug, Default)]
struct Tables {
    commissions: Vec<CommissionRule>,
    penalties: Vec<PenaltyRule>,
    products: HashMap<ProductId, Product>,
}

/// Rule store backed by process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRuleStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRuleStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a commission rule after validating it
    pub fn insert_commission(&self, rule: CommissionRule) -> Result<CommissionRuleId, CommissionError> {
        rule.validate()?;
        let id = rule.id;
        self.write()?.commissions.push(rule);
        Ok(id)
    }

    /// Adds a penalty after validating it
    pub fn insert_penalty(&self, penalty: PenaltyRule) -> Result<PenaltyRuleId, CommissionError> {
        penalty.validate()?;
        let id = penalty.id;
        self.write()?.penalties.push(penalty);
        Ok(id)
    }

    /// Adds or replaces a product
    pub fn insert_product(&self, product: Product) -> Result<ProductId, CommissionError> {
        let id = product.id;
        self.write()?.products.insert(id, product);
        Ok(id)
    }

    /// Deletes a commission rule, returning whether it existed
    pub fn remove_commission(&self, id: CommissionRuleId) -> Result<bool, CommissionError> {
        let mut tables = self.write()?;
        let before = tables.commissions.len();
        tables.commissions.retain(|r| r.id != id);
        Ok(tables.commissions.len() != before)
    }

    /// Deletes a penalty, returning whether it existed
    pub fn remove_penalty(&self, id: PenaltyRuleId) -> Result<bool, CommissionError> {
        let mut tables = self.write()?;
        let before = tables.penalties.len();
        tables.penalties.retain(|p| p.id != id);
        Ok(tables.penalties.len() != before)
    }

    /// Deletes every rule and penalty scoped to the agent
    ///
    /// Mirrors the cascade the host applies when an agent is deleted.
    pub fn remove_agent(&self, agent: &AgentCode) -> Result<usize, CommissionError> {
        let mut tables = self.write()?;
        let before = tables.commissions.len() + tables.penalties.len();
        tables.commissions.retain(|r| r.agent.as_ref() != Some(agent));
        tables.penalties.retain(|p| p.agent.as_ref() != Some(agent));
        let removed = before - tables.commissions.len() - tables.penalties.len();
        debug!(agent = %agent, removed, "Removed agent rules");
        Ok(removed)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, PortError> {
        self.tables
            .read()
            .map_err(|_| PortError::internal("in-memory rule store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, PortError> {
        self.tables
            .write()
            .map_err(|_| PortError::internal("in-memory rule store lock poisoned"))
    }
}

impl DomainPort for InMemoryRuleStore {}

impl CommissionRuleStore for InMemoryRuleStore {
    fn commissions_for(
        &self,
        company_id: CompanyId,
        agent: &AgentCode,
    ) -> Result<Vec<CommissionRule>, PortError> {
        let tables = self.read()?;
        Ok(tables
            .commissions
            .iter()
            .filter(|r| r.company_id == company_id)
            .filter(|r| r.agent.as_ref().map_or(true, |a| a == agent))
            .cloned()
            .collect())
    }
}

impl PenaltyRuleStore for InMemoryRuleStore {
    fn penalties_for(
        &self,
        company_id: CompanyId,
        agent: &AgentCode,
    ) -> Result<Vec<PenaltyRule>, PortError> {
        let tables = self.read()?;
        Ok(tables
            .penalties
            .iter()
            .filter(|p| p.applies_to(company_id, agent))
            .cloned()
            .collect())
    }
}

impl ProductCatalog for InMemoryRuleStore {
    fn product(&self, id: ProductId) -> Result<Option<Product>, PortError> {
        Ok(self.read()?.products.get(&id).cloned())
    }
}
