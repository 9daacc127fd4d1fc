//! End-to-End Commission Tests
//!
//! Exercises the commission pipeline and settlements together, the way a
//! host application drives them:
//! - Document recalculation with mixed rules and penalties
//! - Settling documents and invoicing the settlement
//! - Behaviour of locked documents after invoicing
//!
//! # Test Organization
//!
//! - `document_flow_tests` - Recalculation scenarios
//! - `settlement_flow_tests` - Settlement lifecycle scenarios
//! - `property_tests` - Cross-crate invariants

use core_kernel::{CompanyId, InvoiceId};
use domain_commission::{CommissionSettings, SalesLine};
use domain_settlement::{InvoiceSelection, SettledDocument, Settlement, SettlementService};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_utils::*;

// ============================================================================
// DOCUMENT FLOW TESTS
// ============================================================================

mod document_flow_tests {
    use super::*;

    /// Verifies the reference scenario: 12% general rule on a 1000 line
    #[test]
    fn test_reference_scenario() {
        init_test_tracing();
        let company = CompanyId::new();
        let (_store, mut pipeline) = TestRuleStoreBuilder::new(company)
            .with_rule(RuleFixtures::general_12(company))
            .build_pipeline();
        let (mut document, mut lines) = TestDocumentBuilder::new(company).with_line(dec!(1000)).build();

        pipeline.calculate(&mut document, &mut lines).unwrap();

        assert_line_percentages(&lines, &[dec!(12)]);
        assert_total_commission(&document, dec!(120.00));
    }

    /// Verifies a mixed document: family rule, general rule, penalty and expense
    #[test]
    fn test_mixed_document() {
        init_test_tracing();
        let company = CompanyId::new();
        let tool = RuleFixtures::tool();
        let (_store, mut pipeline) = TestRuleStoreBuilder::new(company)
            .with_product(tool.clone())
            .with_rule(RuleFixtures::rule(company, dec!(15)).with_family(CodeFixtures::family()).with_priority(10))
            .with_general_rule(dec!(5), 1)
            .with_penalty(RuleFixtures::penalty(dec!(10), dec!(50), dec!(4)))
            .build_pipeline();

        let discounted = SalesLine::new("discounted tool", MoneyFixtures::eur(dec!(200)))
            .for_product(tool.id)
            .with_discount(dec!(20))
            .unwrap();
        let (mut document, mut lines) = TestDocumentBuilder::new(company)
            .with_product_line(tool.id, dec!(400))
            .with_sales_line(discounted)
            .with_line(dec!(300))
            .with_expense_line(dec!(90))
            .build();

        pipeline.calculate(&mut document, &mut lines).unwrap();

        // 400 * 15% + 200 * 11% + 300 * 5% = 60 + 22 + 15
        assert_line_percentages(&lines, &[dec!(15), dec!(11), dec!(5), dec!(0)]);
        assert_total_commission(&document, dec!(97));
    }

    /// Verifies customer-scoped rules only pay for their customer
    #[test]
    fn test_customer_scoped_rule() {
        let company = CompanyId::new();
        let (_store, mut pipeline) = TestRuleStoreBuilder::new(company)
            .with_rule(RuleFixtures::rule(company, dec!(9)).with_customer(CodeFixtures::customer()).with_priority(3))
            .with_general_rule(dec!(2), 0)
            .build_pipeline();

        let (mut own, mut own_lines) = TestDocumentBuilder::new(company).with_line(dec!(100)).build();
        let (mut other, mut other_lines) = TestDocumentBuilder::new(company)
            .with_customer(CodeFixtures::other_customer())
            .with_line(dec!(100))
            .build();

        pipeline.calculate(&mut own, &mut own_lines).unwrap();
        pipeline.calculate(&mut other, &mut other_lines).unwrap();

        assert_total_commission(&own, dec!(9));
        assert_total_commission(&other, dec!(2));
    }

    /// Verifies changing the agent and recalculating moves to the new agent's rules
    #[test]
    fn test_agent_change_then_recalculate() {
        let company = CompanyId::new();
        let (_store, mut pipeline) = TestRuleStoreBuilder::new(company)
            .with_rule(RuleFixtures::rule(company, dec!(20)).with_agent(CodeFixtures::other_agent()))
            .build_pipeline();
        let (mut document, mut lines) = TestDocumentBuilder::new(company).with_line(dec!(100)).build();

        pipeline.calculate(&mut document, &mut lines).unwrap();
        assert_total_commission(&document, dec!(0));

        document.change_agent(Some(CodeFixtures::other_agent())).unwrap();
        pipeline.calculate(&mut document, &mut lines).unwrap();
        assert_total_commission(&document, dec!(20));

        document.change_agent(None).unwrap();
        document.validate();
        assert_total_commission(&document, dec!(0));
    }

    /// Verifies configured precision through the builder
    #[test]
    fn test_precision_from_settings() {
        let company = CompanyId::new();
        let (_store, mut pipeline) = TestRuleStoreBuilder::new(company)
            .with_general_rule(dec!(3.3), 0)
            .with_settings(CommissionSettings::with_decimal_places(0).unwrap())
            .build_pipeline();
        let (mut document, mut lines) = TestDocumentBuilder::new(company).with_line(dec!(15)).build();

        pipeline.calculate(&mut document, &mut lines).unwrap();

        // 0.495 rounds to 0 at zero places
        assert_total_commission(&document, dec!(0));
    }
}

// ============================================================================
// SETTLEMENT FLOW TESTS
// ============================================================================

mod settlement_flow_tests {
    use super::*;

    /// Verifies the full cycle: calculate, settle, invoice, then attempt changes
    #[test]
    fn test_settle_and_invoice() {
        init_test_tracing();
        let company = CompanyId::new();
        let (store, mut pipeline) = TestRuleStoreBuilder::new(company)
            .with_general_rule(dec!(10), 0)
            .build_pipeline();

        let (doc_a, lines_a) = TestDocumentBuilder::new(company).with_line(dec!(100)).paid().build();
        let (doc_b, lines_b) = TestDocumentBuilder::new(company).with_line(dec!(300)).paid().build();
        let (doc_c, lines_c) = TestDocumentBuilder::new(company).with_line(dec!(999)).build();
        let mut entries = vec![
            SettledDocument::new(doc_a, lines_a),
            SettledDocument::new(doc_b, lines_b),
            SettledDocument::new(doc_c, lines_c),
        ];
        for entry in entries.iter_mut() {
            pipeline.calculate(&mut entry.document, &mut entry.lines).unwrap();
        }

        let mut settlement = Settlement::new(company, CodeFixtures::agent(), core_kernel::Currency::EUR);
        let mut documents: Vec<_> = entries.iter().map(|e| e.document.clone()).collect();
        let added = settlement
            .add_documents(&mut documents, &InvoiceSelection::all().paid_only())
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(settlement.total_commission(), MoneyFixtures::eur(dec!(40)));

        for (entry, document) in entries.iter_mut().zip(documents.iter()) {
            entry.document = document.clone();
        }

        // rates change before invoicing: recalculation picks them up
        store
            .insert_commission(RuleFixtures::rule(company, dec!(20)).with_priority(5))
            .unwrap();
        let report = SettlementService::new()
            .recalculate(&mut settlement, &mut entries, &mut pipeline)
            .unwrap();
        assert_eq!(report.documents, 2);
        assert_eq!(report.total, MoneyFixtures::eur(dec!(80)));

        let mut settled: Vec<_> = entries.iter().map(|e| e.document.clone()).collect();
        settlement.mark_invoiced(InvoiceId::new(), &mut settled).unwrap();
        assert_locked(&settled[0]);
        assert_locked(&settled[1]);
        assert!(!settled[2].is_locked());

        // after invoicing, rate changes no longer reach settled documents
        store
            .insert_commission(RuleFixtures::rule(company, dec!(50)).with_priority(9))
            .unwrap();
        let mut lines = entries[0].lines.clone();
        pipeline.clear(&mut settled[0], &mut lines).unwrap();
        pipeline.calculate(&mut settled[0], &mut lines).unwrap();
        assert_total_commission(&settled[0], dec!(20));
        assert_line_percentages(&lines, &[dec!(20)]);
    }
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn commission_bounded_by_best_rate(
            rules in proptest::collection::vec(commission_rule_strategy(CompanyId::new()), 0..5),
            penalty in penalty_rule_strategy(),
            lines in proptest::collection::vec(sales_line_strategy(), 1..6),
        ) {
            let company = rules.first().map(|r| r.company_id).unwrap_or_else(CompanyId::new);
            let best = rules.iter().map(|r| r.percentage).max().unwrap_or(Decimal::ZERO);
            let builder = rules.into_iter().fold(
                TestRuleStoreBuilder::new(company).with_penalty(penalty),
                |b, r| b.with_rule(r),
            );
            let (_store, mut pipeline) = builder.build_pipeline();

            let (mut document, mut lines) = lines
                .into_iter()
                .fold(TestDocumentBuilder::new(company), |b, l| b.with_sales_line(l))
                .build();
            pipeline.calculate(&mut document, &mut lines).unwrap();

            let net: Decimal = lines
                .iter()
                .filter(|l| !l.reimbursable_expense)
                .map(|l| l.net_total.amount())
                .sum();
            let total = document.total_commission().unwrap().amount();
            prop_assert!(total >= Decimal::ZERO);
            prop_assert!(total <= CommissionSettings::default().round(net * best / dec!(100)) + dec!(0.01));
            for line in &lines {
                let pct = line.commission_percentage().unwrap();
                prop_assert!(pct >= Decimal::ZERO && pct <= best);
                if line.reimbursable_expense {
                    prop_assert_eq!(pct, Decimal::ZERO);
                }
            }
        }
    }
}
