//! Commission settings

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::error::CommissionError;

/// Commission configuration
///
/// Read from `COMMISSION_*` environment variables, e.g.
/// `COMMISSION_DECIMAL_PLACES=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CommissionSettings {
    /// Decimal places of document commission totals
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

fn default_decimal_places() -> u32 {
    CommissionSettings::DEFAULT_DECIMAL_PLACES
}

impl Default for CommissionSettings {
    fn default() -> Self {
        Self {
            decimal_places: Self::DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl CommissionSettings {
    /// Precision used when nothing is configured
    pub const DEFAULT_DECIMAL_PLACES: u32 = 2;
    /// Highest precision a money amount can hold
    pub const MAX_DECIMAL_PLACES: u32 = 4;

    /// Creates settings with the given precision
    pub fn with_decimal_places(decimal_places: u32) -> Result<Self, CommissionError> {
        let settings = Self { decimal_places };
        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings from the process environment
    pub fn from_env() -> Result<Self, CommissionError> {
        Self::from_source(config::Environment::with_prefix("COMMISSION").try_parsing(true))
    }

    /// Reads a `.env` file if present, then loads from the environment
    pub fn load() -> Result<Self, CommissionError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Loads settings from an explicit environment source
    pub fn from_source(source: config::Environment) -> Result<Self, CommissionError> {
        let settings: Self = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| CommissionError::Configuration(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects precisions a money amount cannot represent
    pub fn validate(&self) -> Result<(), CommissionError> {
        if self.decimal_places > Self::MAX_DECIMAL_PLACES {
            return Err(CommissionError::Configuration(format!(
                "decimal_places must be at most {}, got {}",
                Self::MAX_DECIMAL_PLACES,
                self.decimal_places
            )));
        }
        Ok(())
    }

    /// Rounds half away from zero to the configured precision
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero)
    }
}
