use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::BONUS_PACKAGE_CATALOG;

use super::errors::AllocationError;

/// A pool of promo bonuses with a cap on the share of one campaign budget it may fund
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPackage {
    pub id: String,
    pub amount: Decimal, // B left in the package
    pub max_percent: u8, // 1..=100, share of a single budget payable from this package
    pub expiry: Option<NaiveDate>,
    pub display_burn: String, // e.g. "209.4M", amount burning at expiry
}

impl BonusPackage {
    pub fn new(id: impl Into<String>, amount: Decimal, max_percent: u8) -> Result<Self, AllocationError> {
        if !(1..=100).contains(&max_percent) {
            return Err(AllocationError::InvalidPackagePercent { max_percent });
        }
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AllocationError::NegativePackageAmount { amount });
        }
        Ok(Self {
            id: id.into(),
            amount,
            max_percent,
            expiry: None,
            display_burn: String::new(),
        })
    }

    /// Largest bonus this package may pay towards `budget`: floor(budget * max_percent / 100)
    pub fn percent_cap(&self, budget: Decimal) -> Decimal {
        let percent = Decimal::from(self.max_percent);
        match budget.checked_mul(percent) {
            Some(scaled) => (scaled / Decimal::ONE_HUNDRED).floor(),
            // near Decimal::MAX: divide first so the product stays in range
            None => (budget / Decimal::ONE_HUNDRED * percent).floor().min(budget),
        }
    }

    /// Built-in packages offered by the dashboard, in display order
    pub fn catalog() -> Vec<BonusPackage> {
        BONUS_PACKAGE_CATALOG
            .iter()
            .map(|&(id, amount, max_percent, expiry, burn)| BonusPackage {
                id: id.to_string(),
                amount: Decimal::from(amount),
                max_percent,
                expiry: NaiveDate::parse_from_str(expiry, "%d.%m.%y").ok(),
                display_burn: burn.to_string(),
            })
            .collect()
    }

    pub fn find_in_catalog(id: &str) -> Option<BonusPackage> {
        Self::catalog().into_iter().find(|pkg| pkg.id == id)
    }
}
