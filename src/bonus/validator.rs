use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::errors::AllocationError;
use super::package::BonusPackage;

/// Budget/bonus pair that passed validation and may be written to a campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedAllocation {
    pub budget: Decimal,
    pub bonus_amount: Decimal,
    pub use_promo_bonuses: bool,
}

pub type ValidationResult = Result<ValidatedAllocation, AllocationError>;

/// Validate a single campaign's budget and bonus against a package.
///
/// Checks run in a fixed order and the first failure is returned, since only
/// one message is shown under the bonus field at a time:
/// bonus over budget, bonus over package amount, bonus over the package's
/// percent-of-budget cap. With bonuses disabled the allocation is always
/// valid and the bonus is forced to zero.
///
/// `budget` is expected to be at or above the minimum campaign budget;
/// callers clamp it before getting here.
pub fn validate_single_allocation(
    budget: Decimal,
    bonus_amount: Decimal,
    use_bonuses: bool,
    pkg: &BonusPackage,
) -> ValidationResult {
    if !use_bonuses {
        return Ok(ValidatedAllocation {
            budget,
            bonus_amount: Decimal::ZERO,
            use_promo_bonuses: false,
        });
    }

    if bonus_amount > budget {
        return Err(AllocationError::BonusExceedsBudget { bonus: bonus_amount, budget });
    }

    if bonus_amount > pkg.amount {
        return Err(AllocationError::BonusExceedsPackage { bonus: bonus_amount, available: pkg.amount });
    }

    let cap = pkg.percent_cap(budget);
    if bonus_amount > cap {
        return Err(AllocationError::BonusExceedsPackagePercent {
            bonus: bonus_amount,
            cap,
            max_percent: pkg.max_percent,
        });
    }

    debug!(%budget, %bonus_amount, package = %pkg.id, "Single allocation validated");
    Ok(ValidatedAllocation {
        budget,
        bonus_amount,
        use_promo_bonuses: true,
    })
}
