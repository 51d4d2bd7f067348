use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::campaign::types::Campaign;
use crate::format::{group_digits, plural};

use super::errors::AllocationError;
use super::package::BonusPackage;

/// How the promo-bonus flag is set on selected campaigns that end up with no bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PromoFlagPolicy {
    /// Every selected campaign gets the flag, funded or not (dashboard behavior)
    #[default]
    AllSelected,
    /// Only campaigns that actually receive bonus credit get the flag
    FundedOnly,
}

impl PromoFlagPolicy {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "all_selected" => Some(Self::AllSelected),
            "funded_only" => Some(Self::FundedOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllSelected => "all_selected",
            Self::FundedOnly => "funded_only",
        }
    }

    fn flag_for(&self, use_bonuses: bool, bonus_amount: Decimal) -> bool {
        match self {
            Self::AllSelected => use_bonuses,
            Self::FundedOnly => use_bonuses && bonus_amount > Decimal::ZERO,
        }
    }
}

/// Bulk budget change for a set of selected campaigns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub budget_per_campaign: Decimal,
    pub bonus_per_campaign: Decimal, // 0 when bonuses are disabled
    pub use_bonuses: bool,
    pub package: BonusPackage,
    pub target_campaign_ids: Vec<String>, // priority order: earlier ids are funded first
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Coverage {
    /// Bonuses off or zero bonus requested; package capacity never consulted
    Unconstrained,
    /// Package funds the full bonus for every target
    Full,
    /// Package runs out before the end of the target list; needs operator confirmation
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignAssignment {
    pub campaign_id: String,
    pub budget: Decimal,
    pub bonus_amount: Decimal,
    pub use_promo_bonuses: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationPlan {
    pub assignments: Vec<CampaignAssignment>, // same order as the request targets
    pub coverage: Coverage,
    pub bonus_per_campaign: Decimal,
    pub full_coverage_count: usize, // campaigns funded with the full requested bonus
    pub remaining_bonus: Decimal,   // package remainder given to the partial campaign, 0 if none
    pub partial_campaign_id: Option<String>,
}

impl AllocationPlan {
    /// Campaigns that receive any bonus treatment: full coverage plus the partial one
    pub fn applied_count(&self) -> usize {
        self.full_coverage_count + usize::from(self.partial_campaign_id.is_some())
    }

    pub fn total_bonus(&self) -> Decimal {
        self.assignments.iter().map(|a| a.bonus_amount).sum()
    }

    pub fn needs_confirmation(&self) -> bool {
        self.coverage == Coverage::Partial
    }

    pub fn assignment(&self, campaign_id: &str) -> Option<&CampaignAssignment> {
        self.assignments.iter().find(|a| a.campaign_id == campaign_id)
    }

    /// Write the assignments into matching campaign records. Campaigns outside the plan are untouched.
    pub fn apply_to(&self, campaigns: &mut [Campaign]) -> usize {
        let mut updated = 0;
        for campaign in campaigns.iter_mut() {
            if let Some(assignment) = self.assignment(&campaign.id) {
                campaign.budget = assignment.budget;
                campaign.bonus_amount = assignment.bonus_amount;
                campaign.use_promo_bonuses = assignment.use_promo_bonuses;
                updated += 1;
            }
        }
        updated
    }

    /// Body of the "not enough bonuses" confirmation shown before a partial plan is applied
    pub fn confirmation_lines(&self) -> Vec<String> {
        let selected = self.assignments.len() as i64;
        let full = self.full_coverage_count as i64;
        let bonus = group_digits(&self.bonus_per_campaign);

        let mut lines = vec![
            format!(
                "В выбранном пакете недостаточно бонусов для пополнения всех {} {} на сумму {} B.",
                selected,
                plural(selected, "кампании", "кампаний", "кампаний"),
                bonus
            ),
            format!(
                "Будет пополнено {} {} на полную сумму {} B.",
                full,
                plural(full, "кампания", "кампании", "кампаний"),
                bonus
            ),
        ];
        if self.partial_campaign_id.is_some() {
            lines.push(format!(
                "Остаток в {} B будет применен к следующей кампании.",
                group_digits(&self.remaining_bonus)
            ));
        }
        lines
    }

    /// Message shown once the plan has been applied
    pub fn applied_message(&self) -> String {
        match self.coverage {
            Coverage::Partial => {
                let applied = self.applied_count() as i64;
                format!(
                    "Бонусы применены к {} {}",
                    applied,
                    plural(applied, "кампании", "кампаниям", "кампаниям")
                )
            }
            Coverage::Full | Coverage::Unconstrained => {
                let updated = self.assignments.len() as i64;
                format!("Обновлено {} {}", updated, plural(updated, "кампания", "кампании", "кампаний"))
            }
        }
    }
}

/// Splits a bonus package across selected campaigns
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkAllocator {
    pub policy: PromoFlagPolicy,
}

impl BulkAllocator {
    pub fn new(policy: PromoFlagPolicy) -> Self {
        Self { policy }
    }

    /// Plan a bulk budget/bonus change.
    ///
    /// Budget is assigned to every target unconditionally; only the bonus depends on
    /// package capacity. Targets are funded in the order given: the first
    /// `floor(amount / bonus)` receive the full bonus, the next one receives the
    /// remainder (if any), the rest receive nothing. Fails with
    /// `InsufficientPackageForAny` when the package cannot fund a single campaign.
    #[instrument(name = "plan_bulk_allocation", skip(self, request), fields(targets = request.target_campaign_ids.len(), package = %request.package.id))]
    pub fn plan(&self, request: &AllocationRequest) -> Result<AllocationPlan, AllocationError> {
        let budget = request.budget_per_campaign;
        let bonus = request.bonus_per_campaign;
        let targets = &request.target_campaign_ids;

        if !request.use_bonuses || bonus <= Decimal::ZERO {
            let assignments = targets
                .iter()
                .map(|id| CampaignAssignment {
                    campaign_id: id.clone(),
                    budget,
                    bonus_amount: Decimal::ZERO,
                    use_promo_bonuses: self.policy.flag_for(request.use_bonuses, Decimal::ZERO),
                })
                .collect();
            debug!(%budget, "Bonus-free bulk plan built");
            return Ok(AllocationPlan {
                assignments,
                coverage: Coverage::Unconstrained,
                bonus_per_campaign: Decimal::ZERO,
                full_coverage_count: targets.len(),
                remaining_bonus: Decimal::ZERO,
                partial_campaign_id: None,
            });
        }

        if bonus > budget {
            return Err(AllocationError::BonusExceedsBudget { bonus, budget });
        }

        let pkg = &request.package;
        if pkg.amount < bonus {
            return Err(AllocationError::InsufficientPackageForAny {
                bonus_per_campaign: bonus,
                available: pkg.amount,
            });
        }

        let cap = pkg.percent_cap(budget);
        if bonus > cap {
            return Err(AllocationError::BonusExceedsPackagePercent {
                bonus,
                cap,
                max_percent: pkg.max_percent,
            });
        }

        // quotient beyond Decimal range means more campaigns than can ever be selected
        let fundable = pkg
            .amount
            .checked_div(bonus)
            .and_then(|q| q.floor().to_usize())
            .unwrap_or(usize::MAX);

        if fundable >= targets.len() {
            let assignments = targets
                .iter()
                .map(|id| CampaignAssignment {
                    campaign_id: id.clone(),
                    budget,
                    bonus_amount: bonus,
                    use_promo_bonuses: true,
                })
                .collect();
            info!(%bonus, fundable, "Package covers every selected campaign");
            return Ok(AllocationPlan {
                assignments,
                coverage: Coverage::Full,
                bonus_per_campaign: bonus,
                full_coverage_count: targets.len(),
                remaining_bonus: Decimal::ZERO,
                partial_campaign_id: None,
            });
        }

        let remaining_bonus = pkg.amount.checked_rem(bonus).unwrap_or(Decimal::ZERO);
        let partial_campaign_id = if remaining_bonus > Decimal::ZERO {
            targets.get(fundable).cloned()
        } else {
            None
        };

        let assignments = targets
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let bonus_amount = if index < fundable {
                    bonus
                } else if index == fundable && partial_campaign_id.is_some() {
                    remaining_bonus
                } else {
                    Decimal::ZERO
                };
                CampaignAssignment {
                    campaign_id: id.clone(),
                    budget,
                    bonus_amount,
                    use_promo_bonuses: self.policy.flag_for(true, bonus_amount),
                }
            })
            .collect();

        info!(
            %bonus,
            full_coverage_count = fundable,
            remaining_bonus = %remaining_bonus,
            partial_campaign = ?partial_campaign_id,
            "Package covers only part of the selection"
        );

        Ok(AllocationPlan {
            assignments,
            coverage: Coverage::Partial,
            bonus_per_campaign: bonus,
            full_coverage_count: fundable,
            remaining_bonus,
            partial_campaign_id,
        })
    }
}

/// Plan with the default flag policy
pub fn plan_bulk_allocation(request: &AllocationRequest) -> Result<AllocationPlan, AllocationError> {
    BulkAllocator::default().plan(request)
}
