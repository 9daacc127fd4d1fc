//! Rule loading
//!
//! Two pure selection functions order rule rows the way resolution needs
//! them, and two loaders run them over the store ports. Nothing is cached:
//! every calculation pass loads fresh lists.

use tracing::debug;

use core_kernel::{AgentCode, CompanyId, CustomerCode};

use crate::document::DocumentContext;
use crate::error::CommissionError;
use crate::penalty::PenaltyRule;
use crate::ports::{CommissionRuleStore, PenaltyRuleStore};
use crate::rule::CommissionRule;

/// Keeps the rules matching the document and orders them by priority
///
/// Rules sharing a priority keep their store order.
pub fn select_applicable_commissions(
    rules: Vec<CommissionRule>,
    context: &DocumentContext,
) -> Vec<CommissionRule> {
    if context.agent.is_none() {
        return Vec::new();
    }

    let mut selected: Vec<CommissionRule> = rules
        .into_iter()
        .filter(|rule| rule.applies_to_document(context))
        .collect();
    // stable sort
    selected.sort_by(|a, b| b.priority.cmp(&a.priority));
    selected
}

/// Keeps the penalties visible to the company and agent
///
/// Company-specific penalties come first, then penalties are ordered by
/// the start of their discount range. The sort is stable, so penalties
/// sharing both keys keep their store order.
pub fn select_applicable_penalties(
    penalties: Vec<PenaltyRule>,
    company_id: CompanyId,
    agent: &AgentCode,
) -> Vec<PenaltyRule> {
    let mut selected: Vec<PenaltyRule> = penalties
        .into_iter()
        .filter(|penalty| penalty.applies_to(company_id, agent))
        .collect();
    selected.sort_by(|a, b| {
        a.company_id
            .is_none()
            .cmp(&b.company_id.is_none())
            .then(a.discount_from.cmp(&b.discount_from))
    });
    selected
}

/// Loads the commission rules of a document in evaluation order
///
/// A document without agent earns no commission, so no query is made.
pub fn load_applicable_commissions(
    store: &dyn CommissionRuleStore,
    company_id: CompanyId,
    agent: Option<&AgentCode>,
    customer: &CustomerCode,
) -> Result<Vec<CommissionRule>, CommissionError> {
    let Some(agent) = agent else {
        debug!(%company_id, "Document has no agent, skipping commission rules");
        return Ok(Vec::new());
    };

    let rows = store.commissions_for(company_id, agent)?;
    let context = DocumentContext {
        company_id,
        agent: Some(agent.clone()),
        customer: customer.clone(),
        locked: false,
    };
    let rules = select_applicable_commissions(rows, &context);

    debug!(%company_id, %agent, %customer, count = rules.len(), "Loaded commission rules");
    Ok(rules)
}

/// Loads the discount penalties of a document in evaluation order
///
/// Penalties only matter if some commission rule applies, so an empty
/// `commissions` list short-circuits the query.
pub fn load_applicable_penalties(
    store: &dyn PenaltyRuleStore,
    company_id: CompanyId,
    agent: Option<&AgentCode>,
    commissions: &[CommissionRule],
) -> Result<Vec<PenaltyRule>, CommissionError> {
    let agent = match agent {
        Some(agent) if !commissions.is_empty() => agent,
        _ => return Ok(Vec::new()),
    };

    let rows = store.penalties_for(company_id, agent)?;
    let penalties = select_applicable_penalties(rows, company_id, agent);

    debug!(%company_id, %agent, count = penalties.len(), "Loaded discount penalties");
    Ok(penalties)
}
