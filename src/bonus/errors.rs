use rust_decimal::Decimal;
use thiserror::Error;

use crate::format::group_digits;

/// Business conditions raised while validating or planning a bonus allocation.
///
/// Display strings are the messages shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Requested bonus is larger than the campaign budget
    #[error("Сумма бонусов не может превышать общий бюджет")]
    BonusExceedsBudget { bonus: Decimal, budget: Decimal },

    /// Requested bonus is larger than everything left in the package
    #[error("В пакете доступно только {} B", group_digits(.available))]
    BonusExceedsPackage { bonus: Decimal, available: Decimal },

    /// Requested bonus is above the package's share of the budget
    #[error("Максимум {} B ({max_percent}%) от суммы", group_digits(.cap))]
    BonusExceedsPackagePercent { bonus: Decimal, cap: Decimal, max_percent: u8 },

    /// Bulk only: the package cannot fund even one campaign at the requested bonus
    #[error("Бонусов в пакете не хватает даже для одной кампании по {} B.", group_digits(.bonus_per_campaign))]
    InsufficientPackageForAny { bonus_per_campaign: Decimal, available: Decimal },

    #[error("Минимальный бюджет {} ₽", group_digits(.minimum))]
    BudgetBelowMinimum { budget: Decimal, minimum: Decimal },

    #[error("Процент пакета {max_percent} вне диапазона 1–100")]
    InvalidPackagePercent { max_percent: u8 },

    #[error("Сумма пакета не может быть отрицательной: {amount}")]
    NegativePackageAmount { amount: Decimal },
}

impl AllocationError {
    /// Recoverable errors re-prompt the operator on the same screen; the rest block the action.
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            AllocationError::BonusExceedsBudget { .. }
                | AllocationError::BonusExceedsPackage { .. }
                | AllocationError::BonusExceedsPackagePercent { .. }
                | AllocationError::BudgetBelowMinimum { .. }
        )
    }
}
