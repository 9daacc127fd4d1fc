//! Commission rules
//!
//! A commission rule assigns a percentage to the lines of a sales document.
//! Every scope other than the company is optional; an unset scope matches
//! anything.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::codes::blank_as_none;
use core_kernel::{AgentCode, CommissionRuleId, CompanyId, CustomerCode, FamilyCode, ProductId};

use crate::document::DocumentContext;
use crate::error::CommissionError;
use crate::product::Product;

/// A row of the commission rate table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRule {
    /// Unique identifier
    pub id: CommissionRuleId,
    /// Company the rule belongs to
    pub company_id: CompanyId,
    /// Agent scope
    #[serde(default, deserialize_with = "blank_as_none")]
    pub agent: Option<AgentCode>,
    /// Customer scope
    #[serde(default, deserialize_with = "blank_as_none")]
    pub customer: Option<CustomerCode>,
    /// Product family scope
    #[serde(default, deserialize_with = "blank_as_none")]
    pub family: Option<FamilyCode>,
    /// Product scope
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Commission percentage (0-100 scale)
    pub percentage: Decimal,
    /// Higher priorities are tried first
    #[serde(default)]
    pub priority: i32,
}

impl CommissionRule {
    /// Creates a general rule for a company
    ///
    /// # Errors
    ///
    /// Returns `InvalidRule` if the percentage is negative
    pub fn new(company_id: CompanyId, percentage: Decimal) -> Result<Self, CommissionError> {
        let rule = Self {
            id: CommissionRuleId::new_v7(),
            company_id,
            agent: None,
            customer: None,
            family: None,
            product_id: None,
            percentage,
            priority: 0,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Restricts the rule to one agent
    pub fn with_agent(mut self, agent: AgentCode) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Restricts the rule to one customer
    pub fn with_customer(mut self, customer: CustomerCode) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Restricts the rule to one product family
    pub fn with_family(mut self, family: FamilyCode) -> Self {
        self.family = Some(family);
        self
    }

    /// Restricts the rule to one product
    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Sets the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Checks the rule definition
    pub fn validate(&self) -> Result<(), CommissionError> {
        if self.percentage.is_sign_negative() && !self.percentage.is_zero() {
            return Err(CommissionError::invalid_rule(format!(
                "percentage cannot be negative, got {}",
                self.percentage
            )));
        }
        Ok(())
    }

    /// True when no optional scope is set
    pub fn is_general(&self) -> bool {
        self.agent.is_none()
            && self.customer.is_none()
            && self.family.is_none()
            && self.product_id.is_none()
    }

    /// Document-level match: company, agent and customer
    pub fn applies_to_document(&self, context: &DocumentContext) -> bool {
        if self.company_id != context.company_id {
            return false;
        }

        if let Some(agent) = &self.agent {
            if context.agent.as_ref() != Some(agent) {
                return false;
            }
        }

        if let Some(customer) = &self.customer {
            if &context.customer != customer {
                return false;
            }
        }

        true
    }

    /// Line-level match: product family and product
    ///
    /// A scoped rule never matches a line without a product.
    pub fn applies_to_line(&self, line_product: Option<ProductId>, product: Option<&Product>) -> bool {
        if let Some(family) = &self.family {
            let line_family = product.and_then(|p| p.family.as_ref());
            if line_family != Some(family) {
                return false;
            }
        }

        if let Some(product_id) = self.product_id {
            if line_product != Some(product_id) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn context(company_id: CompanyId, agent: Option<&str>, customer: &str) -> DocumentContext {
        DocumentContext {
            company_id,
            agent: agent.map(|a| AgentCode::new(a).unwrap()),
            customer: CustomerCode::new(customer).unwrap(),
            locked: false,
        }
    }

    #[test]
    fn test_negative_percentage_rejected() {
        let result = CommissionRule::new(CompanyId::new(), dec!(-1));
        assert!(matches!(result, Err(CommissionError::InvalidRule(_))));
    }

    #[test]
    fn test_zero_percentage_allowed() {
        let rule = CommissionRule::new(CompanyId::new(), Decimal::ZERO).unwrap();
        assert!(rule.percentage.is_zero());
        assert_eq!(rule.priority, 0);
        assert!(rule.is_general());
    }

    #[test]
    fn test_general_rule_matches_any_agent_of_its_company() {
        let company = CompanyId::new();
        let rule = CommissionRule::new(company, dec!(12)).unwrap();

        assert!(rule.applies_to_document(&context(company, Some("A1"), "C1")));
        assert!(rule.applies_to_document(&context(company, Some("A2"), "C2")));
        assert!(!rule.applies_to_document(&context(CompanyId::new(), Some("A1"), "C1")));
    }

    #[test]
    fn test_agent_and_customer_scopes() {
        let company = CompanyId::new();
        let rule = CommissionRule::new(company, dec!(5))
            .unwrap()
            .with_agent(AgentCode::new("A1").unwrap())
            .with_customer(CustomerCode::new("C1").unwrap());

        assert!(!rule.is_general());
        assert!(rule.applies_to_document(&context(company, Some("A1"), "C1")));
        assert!(!rule.applies_to_document(&context(company, Some("A1"), "C2")));
        assert!(!rule.applies_to_document(&context(company, Some("A2"), "C1")));
        assert!(!rule.applies_to_document(&context(company, None, "C1")));
    }

    #[test]
    fn test_family_scope_needs_product_family() {
        let rule = CommissionRule::new(CompanyId::new(), dec!(8))
            .unwrap()
            .with_family(FamilyCode::new("TOOLS").unwrap());

        let tool = Product::new("HAMMER").with_family(FamilyCode::new("TOOLS").unwrap());
        let food = Product::new("APPLE").with_family(FamilyCode::new("FOOD").unwrap());
        let unclassified = Product::new("MISC");

        assert!(rule.applies_to_line(Some(tool.id), Some(&tool)));
        assert!(!rule.applies_to_line(Some(food.id), Some(&food)));
        assert!(!rule.applies_to_line(Some(unclassified.id), Some(&unclassified)));
        assert!(!rule.applies_to_line(None, None));
    }

    #[test]
    fn test_product_scope() {
        let product = ProductId::new();
        let rule = CommissionRule::new(CompanyId::new(), dec!(25))
            .unwrap()
            .with_product(product);

        assert!(rule.applies_to_line(Some(product), None));
        assert!(!rule.applies_to_line(Some(ProductId::new()), None));
        assert!(!rule.applies_to_line(None, None));
    }

    #[test]
    fn test_deserialize_blank_scopes_as_wildcards() {
        let json = format!(
            r#"{{"id": "{}", "company_id": "{}", "agent": "", "customer": " ", "family": null, "percentage": "12.5", "priority": 3}}"#,
            CommissionRuleId::new().as_uuid(),
            CompanyId::new().as_uuid(),
        );
        let rule: CommissionRule = serde_json::from_str(&json).unwrap();
        assert!(rule.is_general());
        assert_eq!(rule.percentage, dec!(12.5));
        assert_eq!(rule.priority, 3);
    }
}
