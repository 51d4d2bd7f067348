use dotenvy::dotenv;
use eyre::{Result, WrapErr, eyre};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

use crate::bonus::allocator::PromoFlagPolicy;
use crate::bonus::package::BonusPackage;
use crate::campaign::types::{BidType, CampaignConfig, PaymentModel};
use crate::constants::{DEFAULT_CAMPAIGN_BUDGET, MIN_CAMPAIGN_BUDGET, UNIFIED_BALANCE};

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: String,
    pub min_campaign_budget: Decimal,
    pub unified_balance: Decimal,
    pub flag_policy: PromoFlagPolicy,
    pub bonus_package: BonusPackage,
    pub budget_per_campaign: Decimal,
    pub bonus_per_campaign: Decimal,
    pub use_bonuses: bool,
    pub campaign_config: CampaignConfig,
    pub upload_filename: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable lookup; `load` passes the process environment
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = var("MODE").unwrap_or_else(|| "test".to_string());
        if mode != "test" && mode != "prod" {
            return Err(eyre!("Invalid MODE value (must be 'test' or 'prod'): {}", mode));
        }

        let flag_policy_raw = var("PROMO_FLAG_POLICY").unwrap_or_else(|| "all_selected".to_string());
        let flag_policy = PromoFlagPolicy::from_str(&flag_policy_raw)
            .ok_or_else(|| eyre!("Invalid PROMO_FLAG_POLICY (must be 'all_selected' or 'funded_only'): {}", flag_policy_raw))?;

        let package_id = var("BONUS_PACKAGE_ID").unwrap_or_else(|| "p1".to_string());
        let bonus_package = BonusPackage::find_in_catalog(&package_id)
            .ok_or_else(|| eyre!("Unknown BONUS_PACKAGE_ID: {}", package_id))?;

        let payment_model_raw = var("PAYMENT_MODEL").unwrap_or_else(|| "cpm".to_string());
        let payment_model = PaymentModel::from_str(&payment_model_raw)
            .ok_or_else(|| eyre!("Invalid PAYMENT_MODEL (must be 'cpc' or 'cpm'): {}", payment_model_raw))?;
        let bid_type_raw = var("BID_TYPE").unwrap_or_else(|| "unified".to_string());
        let bid_type = BidType::from_str(&bid_type_raw)
            .ok_or_else(|| eyre!("Invalid BID_TYPE (must be 'unified' or 'manual'): {}", bid_type_raw))?;
        let categories: Vec<String> = var("CAMPAIGN_CATEGORIES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            mode,
            min_campaign_budget: decimal_var(&var, "MIN_CAMPAIGN_BUDGET", Decimal::from(MIN_CAMPAIGN_BUDGET))?,
            unified_balance: decimal_var(&var, "UNIFIED_BALANCE", Decimal::from(UNIFIED_BALANCE))?,
            flag_policy,
            bonus_package,
            budget_per_campaign: decimal_var(&var, "BUDGET_PER_CAMPAIGN", Decimal::from(DEFAULT_CAMPAIGN_BUDGET))?,
            bonus_per_campaign: decimal_var(&var, "BONUS_PER_CAMPAIGN", Decimal::ZERO)?,
            use_bonuses: var("USE_BONUSES").unwrap_or_else(|| "false".to_string()) == "true",
            campaign_config: CampaignConfig { payment_model, bid_type, categories },
            upload_filename: var("UPLOAD_FILENAME").unwrap_or_else(|| "campaigns.xlsx".to_string()),
        })
    }
}

fn decimal_var<F>(var: &F, name: &str, default: Decimal) -> Result<Decimal>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => Decimal::from_str(raw.trim()).wrap_err_with(|| format!("Invalid {}: {}", name, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    fn error_text(vars: &[(&str, &str)]) -> String {
        config_with(vars).unwrap_err().to_string()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = config_with(&[]).unwrap();
        assert_eq!(cfg.mode, "test");
        assert_eq!(cfg.flag_policy, PromoFlagPolicy::AllSelected);
        assert_eq!(cfg.bonus_package.id, "p1");
        assert_eq!(cfg.min_campaign_budget, Decimal::from(1000));
        assert_eq!(cfg.unified_balance, Decimal::from(105_350));
        assert_eq!(cfg.budget_per_campaign, Decimal::from(3000));
        assert_eq!(cfg.bonus_per_campaign, Decimal::ZERO);
        assert!(!cfg.use_bonuses);
        assert_eq!(cfg.campaign_config.payment_model, PaymentModel::Cpm);
        assert_eq!(cfg.campaign_config.bid_type, BidType::Unified);
        assert!(cfg.campaign_config.categories.is_empty());
        assert_eq!(cfg.upload_filename, "campaigns.xlsx");
    }

    #[test]
    fn values_are_read_from_lookup() {
        let cfg = config_with(&[
            ("MODE", "prod"),
            ("PROMO_FLAG_POLICY", "FUNDED_ONLY"),
            ("BONUS_PACKAGE_ID", "p2"),
            ("PAYMENT_MODEL", "cpc"),
            ("BID_TYPE", "manual"),
            ("CAMPAIGN_CATEGORIES", " Платья, ,Обувь "),
            ("BONUS_PER_CAMPAIGN", " 1500.50 "),
            ("USE_BONUSES", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.mode, "prod");
        assert_eq!(cfg.flag_policy, PromoFlagPolicy::FundedOnly);
        assert_eq!(cfg.bonus_package.max_percent, 99);
        assert_eq!(cfg.campaign_config.payment_model, PaymentModel::Cpc);
        assert_eq!(cfg.campaign_config.bid_type, BidType::Manual);
        assert_eq!(cfg.campaign_config.categories, vec!["Платья", "Обувь"]);
        assert_eq!(cfg.bonus_per_campaign, Decimal::new(150_050, 2));
        assert!(cfg.use_bonuses);
    }

    #[test]
    fn invalid_mode_is_rejected() {
        assert!(error_text(&[("MODE", "staging")]).contains("Invalid MODE value"));
    }

    #[test]
    fn invalid_flag_policy_is_rejected() {
        assert!(error_text(&[("PROMO_FLAG_POLICY", "sometimes")]).contains("Invalid PROMO_FLAG_POLICY"));
    }

    #[test]
    fn unknown_package_is_rejected() {
        assert_eq!(error_text(&[("BONUS_PACKAGE_ID", "p9")]), "Unknown BONUS_PACKAGE_ID: p9");
    }

    #[test]
    fn invalid_payment_model_is_rejected() {
        assert!(error_text(&[("PAYMENT_MODEL", "cpa")]).contains("Invalid PAYMENT_MODEL"));
    }

    #[test]
    fn invalid_bid_type_is_rejected() {
        assert!(error_text(&[("BID_TYPE", "auto")]).contains("Invalid BID_TYPE"));
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        assert_eq!(error_text(&[("MIN_CAMPAIGN_BUDGET", "много")]), "Invalid MIN_CAMPAIGN_BUDGET: много");
        assert_eq!(error_text(&[("BUDGET_PER_CAMPAIGN", "3k")]), "Invalid BUDGET_PER_CAMPAIGN: 3k");
    }
}
