use chrono::NaiveDate;
use eyre::Result;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::constants::{
    FALLBACK_BASE_NM_ID, FALLBACK_CATEGORY, FALLBACK_RECORD_COUNT, MOCK_PRODUCTS_PER_CATEGORY, PLACEHOLDER_IMAGE_URL,
};

use super::types::{
    BidSettings, Campaign, CampaignConfig, CampaignStatus, CorrectionDetails, CorrectionField, Product,
};

/// Anything that turns an uploaded campaign file into campaign records
pub trait CampaignSource {
    fn load(&self, filename: &str, config: &CampaignConfig) -> Result<Vec<Campaign>>;
}

/// Deterministic campaign set used whenever no upload validation service is available.
///
/// Produces 70 records for the first configured category: 60 valid, 8 with an
/// auto-corrected bid, 2 critical errors, and the last record repeats the
/// nm_id of the first.
#[derive(Debug, Clone)]
pub struct StaticCampaignSource {
    pub created_on: NaiveDate,
}

impl StaticCampaignSource {
    pub fn new(created_on: NaiveDate) -> Self {
        Self { created_on }
    }

    fn record(&self, i: u32, filename: &str, config: &CampaignConfig, category: &str) -> Campaign {
        let base_id = FALLBACK_BASE_NM_ID + u64::from(i);
        let split_bids = config.has_split_bids();
        let bids = if split_bids {
            BidSettings::Split {
                search_bid: Decimal::from(150 + i),
                recommendations_bid: Decimal::from(160 + i),
            }
        } else {
            BidSettings::Unified { bid: Decimal::from(150 + i) }
        };

        let mut campaign = Campaign {
            id: format!("{}-{}", base_id, self.created_on.format("%Y%m%d")),
            nm_id: base_id,
            product_name: format!("{} Модель {}", category, i),
            campaign_name: format!(
                "{} Модель {} {} {}",
                category,
                i,
                config.payment_model.as_str(),
                self.created_on.format("%d.%m.%Y")
            ),
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            category: category.to_string(),
            keyword: None,
            bids,
            budget: Decimal::from(5000 + i * 100),
            bonus_amount: Decimal::ZERO,
            use_promo_bonuses: true,
            auto_replenishment: false,
            status: CampaignStatus::Valid,
            error_message: None,
            corrections: Vec::new(),
            source: filename.to_string(),
            cpc_compatible: None,
        };

        if (61..=68).contains(&i) {
            campaign.status = CampaignStatus::Corrected;
            campaign.corrections.push(CorrectionDetails {
                field: if split_bids { CorrectionField::SearchBid } else { CorrectionField::Bid },
                old_value: Decimal::from(100),
                new_value: Decimal::from(150),
                reason: "Минимальная ставка 150 ₽".to_string(),
            });
        }
        if i > 68 {
            campaign.status = CampaignStatus::Error;
            campaign.error_message = Some("Товар закончился".to_string());
        }
        if i == FALLBACK_RECORD_COUNT {
            campaign.nm_id = FALLBACK_BASE_NM_ID + 1;
        }
        campaign
    }
}

impl CampaignSource for StaticCampaignSource {
    fn load(&self, filename: &str, config: &CampaignConfig) -> Result<Vec<Campaign>> {
        let category = config
            .categories
            .first()
            .map(String::as_str)
            .unwrap_or(FALLBACK_CATEGORY);

        let campaigns: Vec<Campaign> = (1..=FALLBACK_RECORD_COUNT)
            .map(|i| self.record(i, filename, config, category))
            .collect();
        info!(filename, category, count = campaigns.len(), "Loaded static campaign set");
        Ok(campaigns)
    }
}

/// Try `primary`; on any error log it and serve `fallback` instead. No retry.
pub struct WithFallback<P, F> {
    pub primary: P,
    pub fallback: F,
}

impl<P: CampaignSource, F: CampaignSource> CampaignSource for WithFallback<P, F> {
    fn load(&self, filename: &str, config: &CampaignConfig) -> Result<Vec<Campaign>> {
        match self.primary.load(filename, config) {
            Ok(campaigns) => Ok(campaigns),
            Err(e) => {
                warn!(error = %e, filename, "Campaign source failed; using fallback data");
                self.fallback.load(filename, config)
            }
        }
    }
}

/// Random product catalog for one category; every fourth product cannot run CPC
pub fn mock_products_for_category<R: Rng>(category: &str, rng: &mut R) -> Vec<Product> {
    (1..=MOCK_PRODUCTS_PER_CATEGORY)
        .map(|i| {
            let nm_id: u64 = rng.random_range(10_000_000..90_000_000);
            Product {
                id: nm_id.to_string(),
                nm_id,
                product_name: format!("{} #{}", category, i),
                image_url: PLACEHOLDER_IMAGE_URL.to_string(),
                category: category.to_string(),
                cpc_compatible: i % 4 != 0,
            }
        })
        .collect()
}
