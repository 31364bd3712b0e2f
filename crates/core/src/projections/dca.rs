//! Dollar-cost averaging projection.
//!
//! A fixed payment is invested at a regular interval. Each payment
//! compounds monthly from the day it is made until the end of the horizon.
//! The confidence band narrows with the number of payments, since averaging
//! in spreads the entry price.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CONFIDENCE_Z;
use crate::errors::{Result, ValidationError};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
}

impl PaymentFrequency {
    pub fn payments_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Biweekly => 26,
            PaymentFrequency::Monthly => 12,
        }
    }

    /// Number of whole payments in `months`.
    pub fn payments_in(&self, months: u32) -> u32 {
        let count = u64::from(months) * u64::from(self.payments_per_year()) / 12;
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Months between two payments.
    pub fn interval_months(&self) -> f64 {
        12.0 / f64::from(self.payments_per_year())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(PaymentFrequency::Weekly),
            "biweekly" | "bi-weekly" => Ok(PaymentFrequency::Biweekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown payment frequency '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DcaInput {
    pub payment: f64,
    pub frequency: PaymentFrequency,
    pub months: u32,
    /// Expected return per month, as a fraction
    pub monthly_return: f64,
    /// Volatility per month, as a fraction
    pub monthly_volatility: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaProjection {
    pub payment_count: u32,
    pub total_contributions: f64,
    pub total_value: f64,
    pub gains: f64,
    pub low_value: f64,
    pub high_value: f64,
    /// Gains at the low end of the band
    pub low_estimate: f64,
    /// Gains at the high end of the band
    pub high_estimate: f64,
}

impl DcaInput {
    fn validate(&self) -> Result<()> {
        if !self.payment.is_finite() || self.payment < 0.0 {
            return Err(ValidationError::InvalidInput(format!(
                "payment must be a non-negative number, got {}",
                self.payment
            ))
            .into());
        }
        if !self.monthly_return.is_finite() || self.monthly_return <= -1.0 {
            return Err(ValidationError::InvalidInput(format!(
                "monthly return must be above -100%, got {}",
                self.monthly_return
            ))
            .into());
        }
        if !self.monthly_volatility.is_finite() || self.monthly_volatility < 0.0 {
            return Err(ValidationError::InvalidInput(format!(
                "monthly volatility must be a non-negative number, got {}",
                self.monthly_volatility
            ))
            .into());
        }
        Ok(())
    }
}

pub fn project_dca(input: &DcaInput) -> Result<DcaProjection> {
    input.validate()?;

    let payments = input.frequency.payments_in(input.months);
    let interval = input.frequency.interval_months();
    let horizon = f64::from(input.months);
    let growth = 1.0 + input.monthly_return;

    let total_value: f64 = (0..payments)
        .map(|i| input.payment * growth.powf(horizon - f64::from(i) * interval))
        .sum();
    let total_contributions = input.payment * f64::from(payments);

    let adjusted_volatility = if payments == 0 {
        0.0
    } else {
        let n = f64::from(payments);
        input.monthly_volatility * n.sqrt() / n
    };
    let low_value = total_value * (1.0 - CONFIDENCE_Z * adjusted_volatility);
    let high_value = total_value * (1.0 + CONFIDENCE_Z * adjusted_volatility);

    Ok(DcaProjection {
        payment_count: payments,
        total_contributions,
        total_value,
        gains: total_value - total_contributions,
        low_value,
        high_value,
        low_estimate: low_value - total_contributions,
        high_estimate: high_value - total_contributions,
    })
}
