use rust_decimal::Decimal;
use thiserror::Error;

use crate::bonus::errors::AllocationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Ставка должна быть больше нуля: {amount}")]
    NonPositiveBid { amount: Decimal },

    #[error("Исправьте ошибки в полях перед сохранением")]
    UnresolvedFieldErrors { count: usize },

    #[error("Кампания {id} не найдена")]
    UnknownCampaign { id: String },

    #[error("Нет плана распределения бонусов, ожидающего подтверждения")]
    NoPendingPlan,
}
