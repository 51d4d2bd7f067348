use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::bonus::allocator::{AllocationPlan, BulkAllocator};
use crate::bonus::errors::AllocationError;
use crate::bonus::package::BonusPackage;
use crate::bonus::validator::validate_single_allocation;
use crate::campaign::types::{Campaign, CampaignConfig, CorrectionField, Product};
use crate::format::plural;

use super::errors::EditError;
use super::filter::{CampaignFilter, unique_values};
use super::totals::SpendTotals;
use super::update::{BudgetUpdate, BulkUpdate, apply_bulk_update};

/// Values the bulk budget form starts with when every selected campaign agrees on them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetPrefill {
    pub budget: Decimal,
    pub bonus_amount: Decimal,
    pub use_bonuses: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// Changes written; carries the number of campaigns and the operator message
    Applied { count: usize, message: String },
    /// Package covers only part of the selection; nothing written until confirmed
    NeedsConfirmation(AllocationPlan),
}

/// Editing session over one group of campaigns.
///
/// Every mutation goes through a method here; nothing is written to the
/// campaigns until a change has been fully validated (and, for partial
/// bonus coverage, confirmed).
#[derive(Debug, Clone)]
pub struct EditorState {
    campaigns: Vec<Campaign>,
    baseline: Vec<Campaign>, // snapshot taken when editing started
    selected: Vec<String>,   // selection order is the bonus priority order
    filter: CampaignFilter,
    inline_errors: BTreeMap<(String, CorrectionField), String>,
    pending_plan: Option<AllocationPlan>,
    allocator: BulkAllocator,
    min_budget: Decimal,
}

impl EditorState {
    /// Start editing. Records with critical errors are left out.
    pub fn new(campaigns: Vec<Campaign>, allocator: BulkAllocator, min_budget: Decimal) -> Self {
        let campaigns: Vec<Campaign> = campaigns.into_iter().filter(Campaign::is_editable).collect();
        Self {
            baseline: campaigns.clone(),
            campaigns,
            selected: Vec::new(),
            filter: CampaignFilter::default(),
            inline_errors: BTreeMap::new(),
            pending_plan: None,
            allocator,
            min_budget,
        }
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn campaign(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    pub fn pending_plan(&self) -> Option<&AllocationPlan> {
        self.pending_plan.as_ref()
    }

    pub fn inline_error(&self, id: &str, field: CorrectionField) -> Option<&str> {
        self.inline_errors.get(&(id.to_string(), field)).map(String::as_str)
    }

    // --- Filters ---

    pub fn filter(&self) -> &CampaignFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut CampaignFilter {
        &mut self.filter
    }

    /// Campaigns shown in the table under the current filter, in table order
    pub fn filtered_campaigns(&self) -> Vec<&Campaign> {
        self.campaigns.iter().filter(|c| self.filter.matches(c)).collect()
    }

    /// Options for the source multi-select
    pub fn unique_sources(&self) -> Vec<String> {
        unique_values(self.campaigns.iter().map(|c| c.source.as_str()))
    }

    /// Options for the category multi-select
    pub fn unique_categories(&self) -> Vec<String> {
        unique_values(self.campaigns.iter().map(|c| c.category.as_str()))
    }

    // --- Selection ---

    pub fn toggle_selection(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else if self.campaign(id).is_some() {
            self.selected.push(id.to_string());
        }
    }

    /// Select every campaign the current filter shows
    pub fn select_all(&mut self) {
        self.selected = self.filtered_campaigns().into_iter().map(|c| c.id.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // --- Inline edits ---

    /// Write a budget typed into the table. Values below the minimum, or below the
    /// campaign's bonus, are kept but flagged; saving is blocked while flags remain.
    pub fn set_campaign_budget(&mut self, id: &str, budget: Decimal) -> Result<(), EditError> {
        let min_budget = self.min_budget;
        let campaign = self
            .campaigns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EditError::UnknownCampaign { id: id.to_string() })?;
        campaign.budget = budget;

        let problem = if budget < min_budget {
            Some(AllocationError::BudgetBelowMinimum { budget, minimum: min_budget })
        } else if campaign.bonus_amount > budget {
            Some(AllocationError::BonusExceedsBudget { bonus: campaign.bonus_amount, budget })
        } else {
            None
        };

        let key = (id.to_string(), CorrectionField::Budget);
        match problem {
            Some(err) => {
                debug!(campaign = id, %budget, error = %err, "Inline budget error");
                self.inline_errors.insert(key, err.to_string());
            }
            None => {
                self.inline_errors.remove(&key);
            }
        }
        Ok(())
    }

    /// Single-campaign budget/bonus save: validated in full, then written, or nothing changes
    pub fn save_campaign_bonus(
        &mut self,
        id: &str,
        budget: Decimal,
        bonus_amount: Decimal,
        use_bonuses: bool,
        package: &BonusPackage,
    ) -> Result<(), EditError> {
        if budget < self.min_budget {
            return Err(AllocationError::BudgetBelowMinimum { budget, minimum: self.min_budget }.into());
        }
        let validated = validate_single_allocation(budget, bonus_amount, use_bonuses, package)?;

        let campaign = self
            .campaigns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| EditError::UnknownCampaign { id: id.to_string() })?;
        campaign.budget = validated.budget;
        campaign.bonus_amount = validated.bonus_amount;
        campaign.use_promo_bonuses = validated.use_promo_bonuses;
        self.inline_errors.remove(&(id.to_string(), CorrectionField::Budget));
        Ok(())
    }

    // --- Bulk actions ---

    pub fn bulk_prefill(&self) -> Option<BudgetPrefill> {
        let mut selected = self.campaigns.iter().filter(|c| self.selected.contains(&c.id));
        let first = selected.next()?;
        let prefill = BudgetPrefill {
            budget: first.budget,
            bonus_amount: first.bonus_amount,
            use_bonuses: first.use_promo_bonuses,
        };
        selected
            .all(|c| {
                c.budget == prefill.budget
                    && c.bonus_amount == prefill.bonus_amount
                    && c.use_promo_bonuses == prefill.use_bonuses
            })
            .then_some(prefill)
    }

    /// Run a bulk action over the current selection.
    ///
    /// Budget updates always go through the bulk planner: full coverage is applied
    /// at once, partial coverage is parked for confirmation, and a package that
    /// cannot fund one campaign fails without touching anything.
    #[instrument(skip(self, update), fields(action = update.action_type(), selected = self.selected.len()))]
    pub fn submit_bulk_update(&mut self, update: BulkUpdate) -> Result<BulkOutcome, EditError> {
        if let BulkUpdate::Budget(budget_update) = &update {
            return self.submit_budget(budget_update);
        }

        let count = apply_bulk_update(&mut self.campaigns, &self.selected, &update);
        let updated = count as i64;
        let message = format!("Обновлено {} {}", updated, plural(updated, "кампания", "кампании", "кампаний"));
        info!(count, "Bulk update applied");
        self.after_bulk_change();
        Ok(BulkOutcome::Applied { count, message })
    }

    fn submit_budget(&mut self, update: &BudgetUpdate) -> Result<BulkOutcome, EditError> {
        let plan = match self.allocator.plan(&update.to_request(self.selected.clone())) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "Bulk bonus allocation rejected");
                return Err(e.into());
            }
        };

        if plan.needs_confirmation() {
            self.pending_plan = Some(plan.clone());
            return Ok(BulkOutcome::NeedsConfirmation(plan));
        }

        let count = plan.apply_to(&mut self.campaigns);
        let message = plan.applied_message();
        self.after_bulk_change();
        Ok(BulkOutcome::Applied { count, message })
    }

    /// Apply the plan parked by `submit_bulk_update`
    pub fn confirm_partial_plan(&mut self) -> Result<BulkOutcome, EditError> {
        let plan = self.pending_plan.take().ok_or(EditError::NoPendingPlan)?;
        let count = plan.apply_to(&mut self.campaigns);
        info!(
            applied = plan.applied_count(),
            remaining_bonus = %plan.remaining_bonus,
            "Partial bonus plan confirmed"
        );
        let message = plan.applied_message();
        self.after_bulk_change();
        Ok(BulkOutcome::Applied { count, message })
    }

    pub fn cancel_partial_plan(&mut self) {
        self.pending_plan = None;
    }

    /// Add campaigns for products picked by hand; products whose campaign id is already present are skipped
    pub fn add_manual_products(&mut self, products: &[Product], config: &CampaignConfig, created_on: NaiveDate) -> usize {
        let mut added = 0;
        for product in products {
            let campaign = Campaign::manual(product, config, created_on);
            if self.campaign(&campaign.id).is_some() {
                debug!(campaign = %campaign.id, "Manual product already has a campaign");
                continue;
            }
            self.campaigns.push(campaign);
            added += 1;
        }
        info!(added, "Manual campaigns added");
        added
    }

    pub fn delete_selected(&mut self) -> usize {
        let before = self.campaigns.len();
        let selected = std::mem::take(&mut self.selected);
        self.campaigns.retain(|c| !selected.contains(&c.id));
        self.inline_errors.retain(|(id, _), _| !selected.contains(id));
        self.pending_plan = None;
        before - self.campaigns.len()
    }

    fn after_bulk_change(&mut self) {
        self.selected.clear();
        self.pending_plan = None;
    }

    // --- Session ---

    pub fn can_save(&self) -> bool {
        self.inline_errors.is_empty()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.campaigns != self.baseline
    }

    /// Commit the session and hand back the edited campaigns
    pub fn save(&mut self) -> Result<Vec<Campaign>, EditError> {
        if !self.can_save() {
            return Err(EditError::UnresolvedFieldErrors { count: self.inline_errors.len() });
        }
        self.baseline = self.campaigns.clone();
        self.selected.clear();
        Ok(self.campaigns.clone())
    }

    /// Throw away every change since the last save
    pub fn discard(&mut self) {
        self.campaigns = self.baseline.clone();
        self.selected.clear();
        self.inline_errors.clear();
        self.pending_plan = None;
    }

    pub fn totals(&self) -> SpendTotals {
        SpendTotals::from_campaigns(&self.campaigns)
    }
}
