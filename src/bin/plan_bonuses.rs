use chrono::Local;
use tracing::{error, info, warn};

use promo_budget_planner::bonus::allocator::BulkAllocator;
use promo_budget_planner::campaign::source::{CampaignSource, StaticCampaignSource};
use promo_budget_planner::config;
use promo_budget_planner::editing::state::{BulkOutcome, EditorState};
use promo_budget_planner::editing::update::{BudgetUpdate, BulkUpdate, clamp_budget};
use promo_budget_planner::logging;

fn main() -> eyre::Result<()> {
    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    // Load configuration (.env is read inside)
    let cfg = config::Config::load()?;
    info!(
        mode = %cfg.mode,
        package = %cfg.bonus_package.id,
        flag_policy = cfg.flag_policy.as_str(),
        "Configuration loaded and logging initialized"
    );

    // Load campaigns
    let source = StaticCampaignSource::new(Local::now().date_naive());
    let campaigns = source.load(&cfg.upload_filename, &cfg.campaign_config)?;

    // Select every editable campaign, in table order
    let mut editor = EditorState::new(campaigns, BulkAllocator::new(cfg.flag_policy), cfg.min_campaign_budget);
    editor.select_all();
    info!(selected = editor.selected_ids().len(), "Campaigns selected");

    let budget = clamp_budget(cfg.budget_per_campaign, cfg.min_campaign_budget);
    if budget != cfg.budget_per_campaign {
        warn!(requested = %cfg.budget_per_campaign, %budget, "Budget raised to the minimum");
    }
    let update = BudgetUpdate::new(
        budget,
        cfg.bonus_per_campaign,
        cfg.use_bonuses,
        cfg.bonus_package.clone(),
        cfg.min_campaign_budget,
    )?;

    let outcome = match editor.submit_bulk_update(BulkUpdate::Budget(update)) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Bulk budget change rejected");
            return Err(e.into());
        }
    };

    let outcome = match outcome {
        BulkOutcome::NeedsConfirmation(plan) => {
            for line in plan.confirmation_lines() {
                warn!("{}", line);
            }
            println!("{}", serde_json::to_string_pretty(&plan)?);
            let auto_confirm = std::env::var("AUTO_CONFIRM").unwrap_or_else(|_| "false".to_string()) == "true";
            if !auto_confirm {
                info!("Partial plan not applied; set AUTO_CONFIRM=true to apply it");
                return Ok(());
            }
            editor.confirm_partial_plan()?
        }
        applied => applied,
    };

    if let BulkOutcome::Applied { count, message } = outcome {
        info!(count, "{}", message);
    }

    let totals = editor.totals();
    info!(
        real = %totals.real,
        bonus = %totals.bonus,
        total = %totals.total,
        deficit = %totals.deficit(cfg.unified_balance),
        "Spend totals after update"
    );

    Ok(())
}
