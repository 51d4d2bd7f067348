use chrono::Local;
use rust_decimal::Decimal;
use tracing::info;

use promo_budget_planner::campaign::source::{CampaignSource, StaticCampaignSource};
use promo_budget_planner::campaign::types::CampaignStatus;
use promo_budget_planner::config;
use promo_budget_planner::constants::TOTAL_PROMO_BONUS;
use promo_budget_planner::editing::totals::SpendTotals;
use promo_budget_planner::format::group_digits;
use promo_budget_planner::logging;

fn main() -> eyre::Result<()> {
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = config::Config::load()?;
    let source = StaticCampaignSource::new(Local::now().date_naive());
    let campaigns = source.load(&cfg.upload_filename, &cfg.campaign_config)?;

    let corrected = campaigns.iter().filter(|c| c.status == CampaignStatus::Corrected).count();
    let errors = campaigns.iter().filter(|c| c.status == CampaignStatus::Error).count();
    info!(total = campaigns.len(), corrected, errors, "Campaign set loaded");

    let totals = SpendTotals::from_campaigns(&campaigns);
    let deficit = totals.deficit(cfg.unified_balance);
    println!("Итого:          {} ₽", group_digits(&totals.total));
    println!("Промо-бонусы:   {} B", group_digits(&totals.bonus));
    println!("Единый счёт:    {} ₽", group_digits(&totals.real));
    if deficit > Decimal::ZERO {
        println!("Не хватает:     {} ₽", group_digits(&deficit));
    }
    println!("Всего бонусов:  {} B", group_digits(&Decimal::from(TOTAL_PROMO_BONUS)));

    Ok(())
}
