//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{CompanyId, Currency, Money};
use domain_commission::{CommissionRule, PenaltyRule, SalesLine};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for currencies with two decimal places
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::EUR),
        Just(Currency::USD),
        Just(Currency::GBP),
        Just(Currency::CHF),
        Just(Currency::MXN),
    ]
}

/// Strategy for percentages on the 0-100 scale with two decimals
pub fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=10_000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for non-zero percentages
pub fn positive_percentage_strategy() -> impl Strategy<Value = Decimal> {
    (1u32..=10_000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for positive EUR amounts
pub fn eur_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::EUR))
}

/// Strategy for rule priorities
pub fn priority_strategy() -> impl Strategy<Value = i32> {
    -10i32..=10i32
}

/// Strategy for general commission rules of a company
pub fn commission_rule_strategy(company_id: CompanyId) -> impl Strategy<Value = CommissionRule> {
    (percentage_strategy(), priority_strategy()).prop_filter_map(
        "valid commission rule",
        move |(percentage, priority)| {
            CommissionRule::new(company_id, percentage)
                .ok()
                .map(|rule| rule.with_priority(priority))
        },
    )
}

/// Strategy for penalties with an ordered discount range
pub fn penalty_rule_strategy() -> impl Strategy<Value = PenaltyRule> {
    (percentage_strategy(), percentage_strategy(), percentage_strategy()).prop_filter_map(
        "valid penalty",
        |(a, b, penalty)| PenaltyRule::new(a.min(b), a.max(b), penalty).ok(),
    )
}

/// Strategy for commission-capable EUR lines with a discount
pub fn sales_line_strategy() -> impl Strategy<Value = SalesLine> {
    (eur_money_strategy(), percentage_strategy(), any::<bool>()).prop_filter_map(
        "valid sales line",
        |(net, discount, expense)| {
            let line = SalesLine::new("generated", net).with_discount(discount).ok()?;
            Some(if expense { line.as_reimbursable_expense() } else { line })
        },
    )
}
