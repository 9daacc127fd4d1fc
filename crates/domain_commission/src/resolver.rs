//! Commission resolution
//!
//! The resolver holds the rule lists loaded for one document and answers,
//! per line, which percentage applies. It is pure: it never touches a store
//! and never mutates a line.

use rust_decimal::Decimal;

use core_kernel::CompanyId;

use crate::document::{DocumentContext, SalesLine};
use crate::error::CommissionError;
use crate::loader::{load_applicable_commissions, load_applicable_penalties};
use crate::penalty::PenaltyRule;
use crate::ports::{CommissionRuleStore, PenaltyRuleStore};
use crate::product::Product;
use crate::rule::CommissionRule;

/// Rule lists applicable to one document, in evaluation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommissionResolver {
    commissions: Vec<CommissionRule>,
    penalties: Vec<PenaltyRule>,
}

impl CommissionResolver {
    /// Wraps already ordered rule lists
    pub fn new(commissions: Vec<CommissionRule>, penalties: Vec<PenaltyRule>) -> Self {
        Self {
            commissions,
            penalties,
        }
    }

    /// A resolver that pays nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the rule lists for a document
    pub fn load(
        commissions: &dyn CommissionRuleStore,
        penalties: &dyn PenaltyRuleStore,
        context: &DocumentContext,
    ) -> Result<Self, CommissionError> {
        let company_id: CompanyId = context.company_id;
        let agent = context.agent.as_ref();
        let rules = load_applicable_commissions(commissions, company_id, agent, &context.customer)?;
        let penalty_rules = load_applicable_penalties(penalties, company_id, agent, &rules)?;
        Ok(Self::new(rules, penalty_rules))
    }

    /// Commission rules in evaluation order
    pub fn commissions(&self) -> &[CommissionRule] {
        &self.commissions
    }

    /// Penalties in evaluation order
    pub fn penalties(&self) -> &[PenaltyRule] {
        &self.penalties
    }

    /// True if no commission rule applies to the document
    pub fn is_empty(&self) -> bool {
        self.commissions.is_empty()
    }

    /// First rule, by descending priority, matching the line
    pub fn matching_rule(&self, line: &SalesLine, product: Option<&Product>) -> Option<&CommissionRule> {
        self.commissions
            .iter()
            .find(|rule| rule.applies_to_line(line.product_id, product))
    }

    /// Percentage the line earns
    ///
    /// The matching rule's percentage is reduced by the discount penalty
    /// only when both the percentage and the line discount are non-zero;
    /// the result never drops below zero. Without a matching rule the line
    /// earns nothing.
    pub fn resolve_line_percentage(&self, line: &SalesLine, product: Option<&Product>) -> Decimal {
        let Some(rule) = self.matching_rule(line, product) else {
            return Decimal::ZERO;
        };

        let percentage = rule.percentage;
        if percentage.is_zero() || line.discount_percentage.is_zero() {
            return percentage;
        }

        let penalty = self.resolve_penalty(line.discount_percentage);
        (percentage - penalty).max(Decimal::ZERO)
    }

    /// Penalty of the first penalty whose range contains the discount
    pub fn resolve_penalty(&self, discount: Decimal) -> Decimal {
        self.penalties
            .iter()
            .find(|penalty| penalty.covers(discount))
            .map_or(Decimal::ZERO, |penalty| penalty.penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{Currency, FamilyCode, Money};
    use rust_decimal_macros::dec;

    fn line(discount: Decimal) -> SalesLine {
        SalesLine::new("line", Money::new(dec!(100), Currency::EUR))
            .with_discount(discount)
            .unwrap()
    }

    fn rule(percentage: Decimal, priority: i32) -> CommissionRule {
        CommissionRule::new(CompanyId::new(), percentage)
            .unwrap()
            .with_priority(priority)
    }

    #[test]
    fn test_empty_resolver_pays_zero() {
        let resolver = CommissionResolver::empty();
        assert!(resolver.is_empty());
        assert_eq!(resolver.resolve_line_percentage(&line(dec!(0)), None), Decimal::ZERO);
    }

    #[test]
    fn test_first_match_wins() {
        let family = FamilyCode::new("F1").unwrap();
        let product = Product::new("P1").with_family(family.clone());
        let resolver = CommissionResolver::new(
            vec![
                rule(dec!(30), 10).with_family(FamilyCode::new("OTHER").unwrap()),
                rule(dec!(20), 5).with_family(family),
                rule(dec!(40), 1),
            ],
            vec![],
        );

        let l = line(dec!(0)).for_product(product.id);
        assert_eq!(resolver.resolve_line_percentage(&l, Some(&product)), dec!(20));
    }

    #[test]
    fn test_penalty_requires_discount() {
        let penalty = PenaltyRule::new(dec!(1), dec!(100), dec!(5)).unwrap();
        let resolver = CommissionResolver::new(vec![rule(dec!(20), 0)], vec![penalty]);

        assert_eq!(resolver.resolve_line_percentage(&line(dec!(0)), None), dec!(20));
        assert_eq!(resolver.resolve_line_percentage(&line(dec!(30)), None), dec!(15));
    }

    #[test]
    fn test_zero_percentage_skips_penalty() {
        let penalty = PenaltyRule::new(dec!(0), dec!(100), dec!(5)).unwrap();
        let resolver = CommissionResolver::new(vec![rule(dec!(0), 0)], vec![penalty]);
        assert_eq!(resolver.resolve_line_percentage(&line(dec!(30)), None), Decimal::ZERO);
    }

    #[test]
    fn test_penalty_never_goes_negative() {
        let resolver = CommissionResolver::new(vec![rule(dec!(10), 0)], vec![PenaltyRule::default()]);
        assert_eq!(resolver.resolve_line_percentage(&line(dec!(50)), None), Decimal::ZERO);
    }

    #[test]
    fn test_first_covering_penalty_wins_on_overlap() {
        let resolver = CommissionResolver::new(
            vec![],
            vec![
                PenaltyRule::new(dec!(10), dec!(30), dec!(2)).unwrap(),
                PenaltyRule::new(dec!(20), dec!(40), dec!(6)).unwrap(),
            ],
        );
        assert_eq!(resolver.resolve_penalty(dec!(25)), dec!(2));
        assert_eq!(resolver.resolve_penalty(dec!(35)), dec!(6));
        assert_eq!(resolver.resolve_penalty(dec!(5)), Decimal::ZERO);
    }
}
