mod common;

use common::{d, package, static_campaigns};
use promo_budget_planner::bonus::allocator::{BulkAllocator, Coverage, PromoFlagPolicy};
use promo_budget_planner::bonus::errors::AllocationError;
use promo_budget_planner::editing::errors::EditError;
use promo_budget_planner::editing::state::{BulkOutcome, EditorState};
use promo_budget_planner::editing::update::{BidUpdate, BudgetUpdate, BulkUpdate};
use promo_budget_planner::campaign::types::BidSettings;
use rust_decimal::Decimal;

fn editor() -> EditorState {
    EditorState::new(static_campaigns(), BulkAllocator::default(), d(1000))
}

fn select_first(state: &mut EditorState, n: usize) -> Vec<String> {
    let ids: Vec<String> = state.campaigns().iter().take(n).map(|c| c.id.clone()).collect();
    for id in &ids {
        state.toggle_selection(id);
    }
    ids
}

fn budget_update(total: i64, bonus: i64, amount: i64) -> BulkUpdate {
    BulkUpdate::Budget(BudgetUpdate::new(d(total), d(bonus), true, package(amount, 100), d(1000)).unwrap())
}

#[test]
fn static_session_drops_error_records() {
    assert_eq!(editor().campaigns().len(), 68);
}

#[test]
fn full_coverage_applies_immediately() {
    let mut state = editor();
    let ids = select_first(&mut state, 3);

    let outcome = state.submit_bulk_update(budget_update(3000, 1000, 1_000_000)).unwrap();
    assert_eq!(
        outcome,
        BulkOutcome::Applied { count: 3, message: "Обновлено 3 кампании".to_string() }
    );
    for id in &ids {
        let campaign = state.campaign(id).unwrap();
        assert_eq!(campaign.budget, d(3000));
        assert_eq!(campaign.bonus_amount, d(1000));
        assert!(campaign.use_promo_bonuses);
    }
    assert!(state.selected_ids().is_empty());
}

#[test]
fn partial_coverage_waits_for_confirmation() {
    let mut state = editor();
    let ids = select_first(&mut state, 3);
    let before: Vec<_> = state.campaigns().to_vec();

    let outcome = state.submit_bulk_update(budget_update(3000, 1000, 2500)).unwrap();
    let plan = match outcome {
        BulkOutcome::NeedsConfirmation(plan) => plan,
        other => panic!("expected confirmation, got {:?}", other),
    };
    assert_eq!(plan.coverage, Coverage::Partial);
    assert_eq!(plan.partial_campaign_id.as_deref(), Some(ids[2].as_str()));
    // nothing written yet
    assert_eq!(state.campaigns(), before.as_slice());
    assert!(state.pending_plan().is_some());

    let outcome = state.confirm_partial_plan().unwrap();
    assert_eq!(
        outcome,
        BulkOutcome::Applied { count: 3, message: "Бонусы применены к 3 кампаниям".to_string() }
    );
    let bonuses: Vec<Decimal> = ids.iter().map(|id| state.campaign(id).unwrap().bonus_amount).collect();
    assert_eq!(bonuses, vec![d(1000), d(1000), d(500)]);
    assert!(state.pending_plan().is_none());
}

#[test]
fn cancelled_partial_plan_changes_nothing() {
    let mut state = editor();
    select_first(&mut state, 4);
    let before: Vec<_> = state.campaigns().to_vec();

    state.submit_bulk_update(budget_update(3000, 1000, 2500)).unwrap();
    state.cancel_partial_plan();
    assert_eq!(state.confirm_partial_plan(), Err(EditError::NoPendingPlan));
    assert_eq!(state.campaigns(), before.as_slice());
}

#[test]
fn insufficient_package_mutates_nothing() {
    let mut state = editor();
    select_first(&mut state, 2);
    let before: Vec<_> = state.campaigns().to_vec();

    let err = state.submit_bulk_update(budget_update(3000, 1000, 500)).unwrap_err();
    assert_eq!(
        err,
        EditError::Allocation(AllocationError::InsufficientPackageForAny {
            bonus_per_campaign: d(1000),
            available: d(500),
        })
    );
    assert_eq!(state.campaigns(), before.as_slice());
    assert_eq!(state.selected_ids().len(), 2);
}

#[test]
fn funded_only_policy_flows_through_the_session() {
    let mut state = EditorState::new(static_campaigns(), BulkAllocator::new(PromoFlagPolicy::FundedOnly), d(1000));
    let ids = select_first(&mut state, 3);
    state.submit_bulk_update(budget_update(3000, 1000, 2000)).unwrap();
    state.confirm_partial_plan().unwrap();
    assert!(!state.campaign(&ids[2]).unwrap().use_promo_bonuses);
    assert_eq!(state.campaign(&ids[2]).unwrap().bonus_amount, Decimal::ZERO);
}

#[test]
fn unselected_campaigns_are_untouched() {
    let mut state = editor();
    select_first(&mut state, 2);
    let untouched = state.campaigns()[5].clone();
    state.submit_bulk_update(budget_update(3000, 1000, 1_000_000)).unwrap();
    assert_eq!(state.campaigns()[5], untouched);
}

#[test]
fn single_campaign_save_is_all_or_nothing() {
    let mut state = editor();
    let id = state.campaigns()[0].id.clone();
    let before = state.campaign(&id).unwrap().clone();

    let err = state
        .save_campaign_bonus(&id, d(10_000), d(5000), true, &package(1_000_000, 40))
        .unwrap_err();
    assert_eq!(err.to_string(), "Максимум 4\u{a0}000 B (40%) от суммы");
    assert_eq!(state.campaign(&id).unwrap(), &before);

    state.save_campaign_bonus(&id, d(10_000), d(4000), true, &package(1_000_000, 40)).unwrap();
    let campaign = state.campaign(&id).unwrap();
    assert_eq!(campaign.budget, d(10_000));
    assert_eq!(campaign.bonus_amount, d(4000));
    assert!(campaign.use_promo_bonuses);
}

#[test]
fn bonuses_off_clears_bonus_and_flag() {
    let mut state = editor();
    let ids = select_first(&mut state, 2);
    let update = BudgetUpdate::new(d(2000), d(9999), false, package(0, 100), d(1000)).unwrap();
    state.submit_bulk_update(BulkUpdate::Budget(update)).unwrap();
    for id in &ids {
        let campaign = state.campaign(id).unwrap();
        assert_eq!(campaign.bonus_amount, Decimal::ZERO);
        assert!(!campaign.use_promo_bonuses);
        assert_eq!(campaign.budget, d(2000));
    }
}

#[test]
fn bulk_bid_update_sets_every_bid_field() {
    let mut state = editor();
    let ids = select_first(&mut state, 2);
    let outcome = state
        .submit_bulk_update(BulkUpdate::Bid(BidUpdate::uniform(d(300)).unwrap()))
        .unwrap();
    assert!(matches!(outcome, BulkOutcome::Applied { count: 2, .. }));
    assert_eq!(state.campaign(&ids[0]).unwrap().bids, BidSettings::Unified { bid: d(300) });
}

#[test]
fn delete_selected_removes_campaigns() {
    let mut state = editor();
    select_first(&mut state, 5);
    assert_eq!(state.delete_selected(), 5);
    assert_eq!(state.campaigns().len(), 63);
    assert!(state.has_unsaved_changes());
}

#[test]
fn totals_follow_bonus_changes() {
    let mut state = editor();
    let before = state.totals();
    select_first(&mut state, 1);
    let first_budget = state.campaigns()[0].budget;
    state.submit_bulk_update(budget_update(3000, 1000, 1_000_000)).unwrap();

    let after = state.totals();
    assert_eq!(after.bonus, before.bonus + d(1000));
    assert_eq!(after.total, before.total - first_budget + d(3000));
    assert_eq!(after.real, after.total - after.bonus);
}
