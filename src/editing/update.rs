use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::bonus::allocator::AllocationRequest;
use crate::bonus::errors::AllocationError;
use crate::bonus::package::BonusPackage;
use crate::campaign::types::Campaign;

use super::errors::EditError;

/// Raise a budget typed below the minimum up to the minimum, as the budget field does on blur
pub fn clamp_budget(value: Decimal, minimum: Decimal) -> Decimal {
    value.max(minimum)
}

/// Budget change for one or more campaigns, checked against per-campaign rules.
/// Package capacity across several campaigns is left to the bulk planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetUpdate {
    total: Decimal,
    bonus: Decimal,
    use_bonuses: bool,
    package: BonusPackage,
}

impl BudgetUpdate {
    pub fn new(
        total: Decimal,
        bonus: Decimal,
        use_bonuses: bool,
        package: BonusPackage,
        min_budget: Decimal,
    ) -> Result<Self, EditError> {
        if total < min_budget {
            return Err(AllocationError::BudgetBelowMinimum { budget: total, minimum: min_budget }.into());
        }
        if !use_bonuses {
            return Ok(Self { total, bonus: Decimal::ZERO, use_bonuses, package });
        }
        if bonus > total {
            return Err(AllocationError::BonusExceedsBudget { bonus, budget: total }.into());
        }
        let cap = package.percent_cap(total);
        if bonus > cap {
            return Err(AllocationError::BonusExceedsPackagePercent {
                bonus,
                cap,
                max_percent: package.max_percent,
            }
            .into());
        }
        Ok(Self { total, bonus, use_bonuses, package })
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn bonus(&self) -> Decimal {
        self.bonus
    }

    pub fn use_bonuses(&self) -> bool {
        self.use_bonuses
    }

    pub fn package(&self) -> &BonusPackage {
        &self.package
    }

    pub fn to_request(&self, target_campaign_ids: Vec<String>) -> AllocationRequest {
        AllocationRequest {
            budget_per_campaign: self.total,
            bonus_per_campaign: self.bonus,
            use_bonuses: self.use_bonuses,
            package: self.package.clone(),
            target_campaign_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BidUpdate {
    /// Same bid for every selected campaign
    Uniform(Decimal),
    /// Bid per category; campaigns whose category is missing keep their bids
    PerCategory(HashMap<String, Decimal>),
}

impl BidUpdate {
    pub fn uniform(amount: Decimal) -> Result<Self, EditError> {
        if amount <= Decimal::ZERO {
            return Err(EditError::NonPositiveBid { amount });
        }
        Ok(Self::Uniform(amount))
    }

    pub fn per_category(bids: HashMap<String, Decimal>) -> Result<Self, EditError> {
        if let Some(&amount) = bids.values().find(|amount| **amount <= Decimal::ZERO) {
            return Err(EditError::NonPositiveBid { amount });
        }
        Ok(Self::PerCategory(bids))
    }

    pub fn bid_for(&self, category: &str) -> Option<Decimal> {
        match self {
            BidUpdate::Uniform(amount) => Some(*amount),
            BidUpdate::PerCategory(bids) => bids.get(category).copied(),
        }
    }
}

/// One bulk action over the selected campaigns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BulkUpdate {
    Budget(BudgetUpdate),
    Bid(BidUpdate),
    AutoRefill(bool),
}

impl BulkUpdate {
    pub fn action_type(&self) -> &'static str {
        match self {
            BulkUpdate::Budget(_) => "budget",
            BulkUpdate::Bid(_) => "bid",
            BulkUpdate::AutoRefill(_) => "autorefill",
        }
    }

    /// Apply to a single campaign; returns whether anything was written.
    /// Budget updates are never written here: they depend on package capacity
    /// across the whole selection and are applied through an `AllocationPlan`.
    pub fn apply_to(&self, campaign: &mut Campaign) -> bool {
        match self {
            BulkUpdate::Budget(_) => false,
            BulkUpdate::Bid(update) => match update.bid_for(&campaign.category) {
                Some(amount) => {
                    campaign.bids.set_all(amount);
                    true
                }
                None => false,
            },
            BulkUpdate::AutoRefill(enabled) => {
                campaign.auto_replenishment = *enabled;
                true
            }
        }
    }
}

/// Apply `update` to every campaign whose id is in `ids`; returns how many were changed
pub fn apply_bulk_update(campaigns: &mut [Campaign], ids: &[String], update: &BulkUpdate) -> usize {
    campaigns
        .iter_mut()
        .filter(|campaign| ids.contains(&campaign.id))
        .map(|campaign| update.apply_to(campaign))
        .filter(|changed| *changed)
        .count()
}
