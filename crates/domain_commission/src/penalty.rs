//! Discount penalties
//!
//! A penalty lowers the commission of a line sold with a discount. Each
//! penalty covers an inclusive discount range; the resolver takes the first
//! penalty, in load order, whose range contains the line discount.
//! Overlapping ranges are accepted as configured.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::codes::blank_as_none;
use core_kernel::{AgentCode, CompanyId, PenaltyRuleId};

use crate::error::CommissionError;

/// A discount-range penalty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRule {
    /// Unique identifier
    pub id: PenaltyRuleId,
    /// Agent scope
    #[serde(default, deserialize_with = "blank_as_none")]
    pub agent: Option<AgentCode>,
    /// Company scope
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    /// Lowest discount covered (inclusive)
    pub discount_from: Decimal,
    /// Highest discount covered (inclusive)
    pub discount_to: Decimal,
    /// Percentage points subtracted from the commission
    pub penalty: Decimal,
}

impl PenaltyRule {
    /// Lower bound given to new penalties
    pub const DEFAULT_DISCOUNT_FROM: Decimal = dec!(1);
    /// Upper bound given to new penalties
    pub const DEFAULT_DISCOUNT_TO: Decimal = dec!(100);
    /// Penalty given to new penalties
    pub const DEFAULT_PENALTY: Decimal = dec!(100);

    /// Creates a penalty for every agent and company
    ///
    /// # Errors
    ///
    /// Returns `InvalidPenalty` when a bound lies outside 0-100, the range
    /// is inverted, or the penalty is negative
    pub fn new(
        discount_from: Decimal,
        discount_to: Decimal,
        penalty: Decimal,
    ) -> Result<Self, CommissionError> {
        let rule = Self {
            id: PenaltyRuleId::new_v7(),
            agent: None,
            company_id: None,
            discount_from,
            discount_to,
            penalty,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Restricts the penalty to one agent
    pub fn with_agent(mut self, agent: AgentCode) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Restricts the penalty to one company
    pub fn for_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Checks the penalty definition
    pub fn validate(&self) -> Result<(), CommissionError> {
        let scale = Decimal::ZERO..=dec!(100);
        if !scale.contains(&self.discount_from) || !scale.contains(&self.discount_to) {
            return Err(CommissionError::invalid_penalty(format!(
                "discount range {}-{} must lie within 0-100",
                self.discount_from, self.discount_to
            )));
        }

        if self.discount_from > self.discount_to {
            return Err(CommissionError::invalid_penalty(format!(
                "discount range start {} is greater than end {}",
                self.discount_from, self.discount_to
            )));
        }

        if self.penalty < Decimal::ZERO {
            return Err(CommissionError::invalid_penalty(format!(
                "penalty cannot be negative, got {}",
                self.penalty
            )));
        }

        Ok(())
    }

    /// True if the discount falls inside the inclusive range
    pub fn covers(&self, discount: Decimal) -> bool {
        self.discount_from <= discount && discount <= self.discount_to
    }

    /// True if the penalty is visible to documents of this company and agent
    pub fn applies_to(&self, company_id: CompanyId, agent: &AgentCode) -> bool {
        let company_matches = self.company_id.map_or(true, |c| c == company_id);
        let agent_matches = self.agent.as_ref().map_or(true, |a| a == agent);
        company_matches && agent_matches
    }
}

impl Default for PenaltyRule {
    /// A new penalty as offered to the administrator: any discount from 1%
    /// removes the whole commission
    fn default() -> Self {
        Self {
            id: PenaltyRuleId::new_v7(),
            agent: None,
            company_id: None,
            discount_from: Self::DEFAULT_DISCOUNT_FROM,
            discount_to: Self::DEFAULT_DISCOUNT_TO,
            penalty: Self::DEFAULT_PENALTY,
        }
    }
}
