//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use std::sync::Arc;

use chrono::NaiveDate;
use core_kernel::{AgentCode, CompanyId, Currency, CustomerCode, Money, ProductId};
use domain_commission::{
    CalculationPipeline, CommissionCalculator, CommissionRule, CommissionSettings,
    InMemoryRuleStore, PenaltyRule, Product, SalesDocument, SalesLine,
};
use rust_decimal::Decimal;

use crate::fixtures::{CodeFixtures, DateFixtures};

/// Builder for a sales document and its lines
pub struct TestDocumentBuilder {
    company_id: CompanyId,
    agent: Option<AgentCode>,
    customer: CustomerCode,
    currency: Currency,
    date: NaiveDate,
    paid: bool,
    plain: bool,
    lines: Vec<SalesLine>,
}

impl TestDocumentBuilder {
    /// Creates a builder for a document of the standard agent and customer
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            agent: Some(CodeFixtures::agent()),
            customer: CodeFixtures::customer(),
            currency: Currency::EUR,
            date: DateFixtures::invoice_date(),
            paid: false,
            plain: false,
            lines: Vec::new(),
        }
    }

    pub fn with_agent(mut self, agent: AgentCode) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn without_agent(mut self) -> Self {
        self.agent = None;
        self
    }

    pub fn with_customer(mut self, customer: CustomerCode) -> Self {
        self.customer = customer;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn paid(mut self) -> Self {
        self.paid = true;
        self
    }

    /// Builds a document without the commission field
    pub fn plain(mut self) -> Self {
        self.plain = true;
        self
    }

    /// Adds a free-text line with the given net total
    pub fn with_line(mut self, net: Decimal) -> Self {
        let line = SalesLine::new(format!("line {}", self.lines.len() + 1), self.money(net));
        self.lines.push(line);
        self
    }

    /// Adds a discounted line
    pub fn with_discounted_line(mut self, net: Decimal, discount: Decimal) -> Self {
        let line = SalesLine::new(format!("line {}", self.lines.len() + 1), self.money(net))
            .with_discount(discount)
            .unwrap_or_else(|e| panic!("invalid discount in test line: {e}"));
        self.lines.push(line);
        self
    }

    /// Adds a line selling a product
    pub fn with_product_line(mut self, product_id: ProductId, net: Decimal) -> Self {
        let line = SalesLine::new(format!("line {}", self.lines.len() + 1), self.money(net))
            .for_product(product_id);
        self.lines.push(line);
        self
    }

    /// Adds a reimbursable expense line
    pub fn with_expense_line(mut self, net: Decimal) -> Self {
        let line = SalesLine::new(format!("expense {}", self.lines.len() + 1), self.money(net))
            .as_reimbursable_expense();
        self.lines.push(line);
        self
    }

    /// Adds a prepared line
    pub fn with_sales_line(mut self, line: SalesLine) -> Self {
        self.lines.push(line);
        self
    }

    fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency)
    }

    /// Builds the document and its lines
    pub fn build(self) -> (SalesDocument, Vec<SalesLine>) {
        let mut document = SalesDocument::new(self.company_id, self.customer, self.currency)
            .with_date(self.date)
            .with_paid(self.paid);
        if let Some(agent) = self.agent {
            document = document.with_agent(agent);
        }
        if self.plain {
            document = document.without_commission();
        }
        (document, self.lines)
    }
}

/// Builder for a populated in-memory rule store
pub struct TestRuleStoreBuilder {
    company_id: CompanyId,
    commissions: Vec<CommissionRule>,
    penalties: Vec<PenaltyRule>,
    products: Vec<Product>,
    settings: CommissionSettings,
}

impl TestRuleStoreBuilder {
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            commissions: Vec::new(),
            penalties: Vec::new(),
            products: Vec::new(),
            settings: CommissionSettings::default(),
        }
    }

    /// Adds a general rule of the store's company
    pub fn with_general_rule(self, percentage: Decimal, priority: i32) -> Self {
        let rule = CommissionRule::new(self.company_id, percentage)
            .unwrap_or_else(|e| panic!("invalid test rule: {e}"))
            .with_priority(priority);
        self.with_rule(rule)
    }

    pub fn with_rule(mut self, rule: CommissionRule) -> Self {
        self.commissions.push(rule);
        self
    }

    pub fn with_penalty(mut self, penalty: PenaltyRule) -> Self {
        self.penalties.push(penalty);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_settings(mut self, settings: CommissionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the store
    pub fn build(self) -> Arc<InMemoryRuleStore> {
        let store = InMemoryRuleStore::new();
        for rule in self.commissions {
            store
                .insert_commission(rule)
                .unwrap_or_else(|e| panic!("failed to store test rule: {e}"));
        }
        for penalty in self.penalties {
            store
                .insert_penalty(penalty)
                .unwrap_or_else(|e| panic!("failed to store test penalty: {e}"));
        }
        for product in self.products {
            store
                .insert_product(product)
                .unwrap_or_else(|e| panic!("failed to store test product: {e}"));
        }
        Arc::new(store)
    }

    /// Builds the store and a pipeline running the commission calculator
    pub fn build_pipeline(self) -> (Arc<InMemoryRuleStore>, CalculationPipeline) {
        let settings = self.settings;
        let store = self.build();
        let pipeline = CalculationPipeline::new()
            .with_mod(CommissionCalculator::from_store(store.clone(), settings));
        (store, pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_document_builder_defaults() {
        let (document, lines) = TestDocumentBuilder::new(CompanyId::new())
            .with_line(dec!(10))
            .with_expense_line(dec!(5))
            .build();

        assert_eq!(document.agent(), Some(&CodeFixtures::agent()));
        assert!(document.is_commission_capable());
        assert_eq!(lines.len(), 2);
        assert!(lines[1].reimbursable_expense);
    }

    #[test]
    fn test_store_builder_pipeline() {
        let company = CompanyId::new();
        let (_store, mut pipeline) = TestRuleStoreBuilder::new(company)
            .with_general_rule(dec!(10), 0)
            .build_pipeline();
        let (mut document, mut lines) = TestDocumentBuilder::new(company).with_line(dec!(50)).build();

        pipeline.calculate(&mut document, &mut lines).unwrap();
        assert_eq!(document.total_commission(), Some(Money::new(dec!(5), Currency::EUR)));
    }
}
