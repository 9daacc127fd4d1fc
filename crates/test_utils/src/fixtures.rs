//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities of the commission
//! domain. These fixtures are consistent and predictable for unit tests.

use chrono::NaiveDate;
use core_kernel::{AgentCode, CompanyId, Currency, CustomerCode, FamilyCode, Money};
use domain_commission::{CommissionRule, PenaltyRule, Product};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A EUR amount
    pub fn eur(amount: Decimal) -> Money {
        Money::new(amount, Currency::EUR)
    }

    /// Net total of the reference line
    pub fn eur_1000() -> Money {
        Money::new(dec!(1000.00), Currency::EUR)
    }

    /// A zero EUR amount
    pub fn eur_zero() -> Money {
        Money::zero(Currency::EUR)
    }

    /// A USD amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }
}

/// Fixture for business codes
pub struct CodeFixtures;

impl CodeFixtures {
    pub fn agent() -> AgentCode {
        Self::agent_code("AGT001")
    }

    pub fn other_agent() -> AgentCode {
        Self::agent_code("AGT002")
    }

    pub fn customer() -> CustomerCode {
        Self::customer_code("CLI001")
    }

    pub fn other_customer() -> CustomerCode {
        Self::customer_code("CLI002")
    }

    pub fn family() -> FamilyCode {
        Self::family_code("TOOLS")
    }

    pub fn agent_code(code: &str) -> AgentCode {
        AgentCode::new(code).unwrap_or_else(|e| panic!("invalid agent fixture {code}: {e}"))
    }

    pub fn customer_code(code: &str) -> CustomerCode {
        CustomerCode::new(code).unwrap_or_else(|e| panic!("invalid customer fixture {code}: {e}"))
    }

    pub fn family_code(code: &str) -> FamilyCode {
        FamilyCode::new(code).unwrap_or_else(|e| panic!("invalid family fixture {code}: {e}"))
    }
}

/// Fixture for document dates
pub struct DateFixtures;

impl DateFixtures {
    /// A fixed date for reproducible documents
    pub fn invoice_date() -> NaiveDate {
        Self::date(2024, 3, 15)
    }

    pub fn month_start() -> NaiveDate {
        Self::date(2024, 3, 1)
    }

    pub fn month_end() -> NaiveDate {
        Self::date(2024, 3, 31)
    }

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| panic!("invalid date fixture {year}-{month}-{day}"))
    }
}

/// Fixture for commission rules and penalties
pub struct RuleFixtures;

impl RuleFixtures {
    /// General rule paying 12% at priority 5
    pub fn general_12(company_id: CompanyId) -> CommissionRule {
        Self::rule(company_id, dec!(12)).with_priority(5)
    }

    /// A rule with the given percentage and no scope
    pub fn rule(company_id: CompanyId, percentage: Decimal) -> CommissionRule {
        CommissionRule::new(company_id, percentage)
            .unwrap_or_else(|e| panic!("invalid rule fixture: {e}"))
    }

    /// Penalty of `penalty` points for discounts within `from..=to`
    pub fn penalty(from: Decimal, to: Decimal, penalty: Decimal) -> PenaltyRule {
        PenaltyRule::new(from, to, penalty).unwrap_or_else(|e| panic!("invalid penalty fixture: {e}"))
    }

    /// A product of the standard family
    pub fn tool() -> Product {
        Product::new("HAMMER").with_family(CodeFixtures::family())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        assert_ne!(CodeFixtures::agent(), CodeFixtures::other_agent());
        assert_ne!(CodeFixtures::customer(), CodeFixtures::other_customer());
        assert!(DateFixtures::month_start() < DateFixtures::invoice_date());
        assert!(DateFixtures::invoice_date() < DateFixtures::month_end());
        assert_eq!(RuleFixtures::general_12(CompanyId::new()).priority, 5);
        assert_eq!(RuleFixtures::tool().family, Some(CodeFixtures::family()));
    }
}
