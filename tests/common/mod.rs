#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;

use promo_budget_planner::bonus::allocator::AllocationRequest;
use promo_budget_planner::bonus::package::BonusPackage;
use promo_budget_planner::campaign::source::{CampaignSource, StaticCampaignSource};
use promo_budget_planner::campaign::types::{BidType, Campaign, CampaignConfig, PaymentModel};

pub fn d(value: i64) -> Decimal {
    Decimal::from(value)
}

pub fn package(amount: i64, max_percent: u8) -> BonusPackage {
    BonusPackage::new("test", d(amount), max_percent).expect("valid package")
}

pub fn ids(targets: &[&str]) -> Vec<String> {
    targets.iter().map(|t| t.to_string()).collect()
}

pub fn request(budget: i64, bonus: i64, use_bonuses: bool, pkg: BonusPackage, targets: &[&str]) -> AllocationRequest {
    AllocationRequest {
        budget_per_campaign: d(budget),
        bonus_per_campaign: d(bonus),
        use_bonuses,
        package: pkg,
        target_campaign_ids: ids(targets),
    }
}

pub fn static_campaigns() -> Vec<Campaign> {
    let source = StaticCampaignSource::new(NaiveDate::from_ymd_opt(2026, 1, 22).expect("date"));
    let config = CampaignConfig {
        payment_model: PaymentModel::Cpm,
        bid_type: BidType::Unified,
        categories: vec!["Платья".to_string()],
    };
    source.load("upload.xlsx", &config).expect("static campaigns")
}
