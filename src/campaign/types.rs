use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CAMPAIGN_BUDGET, DEFAULT_CPC_BID, DEFAULT_CPM_BID, MANUAL_SOURCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentModel {
    Cpc,
    Cpm,
}

impl PaymentModel {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "cpc" => Some(Self::Cpc),
            "cpm" => Some(Self::Cpm),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpc => "CPC",
            Self::Cpm => "CPM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidType {
    Unified,
    Manual,
}

impl BidType {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "unified" => Some(Self::Unified),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub payment_model: PaymentModel,
    pub bid_type: BidType,
    pub categories: Vec<String>,
}

impl CampaignConfig {
    /// Only CPM with manual bidding splits the bid between search and recommendations
    pub fn has_split_bids(&self) -> bool {
        self.payment_model == PaymentModel::Cpm && self.bid_type == BidType::Manual
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CampaignStatus {
    Valid,
    Corrected, // auto-corrected by the system during upload
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CorrectionField {
    Bid,
    Budget,
    SearchBid,
    RecommendationsBid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionDetails {
    pub field: CorrectionField,
    pub old_value: Decimal,
    pub new_value: Decimal,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidSettings {
    /// One bid for every placement
    Unified { bid: Decimal },
    /// CPM manual: separate search and recommendation placements
    Split { search_bid: Decimal, recommendations_bid: Decimal },
}

impl BidSettings {
    /// Set every bid this campaign carries to `amount`
    pub fn set_all(&mut self, amount: Decimal) {
        match self {
            BidSettings::Unified { bid } => *bid = amount,
            BidSettings::Split { search_bid, recommendations_bid } => {
                *search_bid = amount;
                *recommendations_bid = amount;
            }
        }
    }
}

/// Product picked for a campaign, before budgets and bids are attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub nm_id: u64,
    pub product_name: String,
    pub image_url: String,
    pub category: String,
    pub cpc_compatible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub nm_id: u64, // nomenclature id / SKU
    pub product_name: String,
    pub campaign_name: String,
    pub image_url: String,
    pub category: String,
    pub keyword: Option<String>,
    pub bids: BidSettings,
    pub budget: Decimal,
    pub bonus_amount: Decimal, // part of the budget funded by promo bonuses
    pub use_promo_bonuses: bool,
    pub auto_replenishment: bool,
    pub status: CampaignStatus,
    pub error_message: Option<String>,
    pub corrections: Vec<CorrectionDetails>,
    pub source: String, // upload filename or manual add
    pub cpc_compatible: Option<bool>,
}

impl Campaign {
    /// Campaign for a manually added product with the dashboard defaults:
    /// 3000 ₽ budget, bid 300 for CPM or 30 for CPC, promo bonuses on with nothing allocated yet.
    pub fn from_product(product: &Product, config: &CampaignConfig, source: &str, created_on: NaiveDate) -> Self {
        let default_bid = match config.payment_model {
            PaymentModel::Cpm => Decimal::from(DEFAULT_CPM_BID),
            PaymentModel::Cpc => Decimal::from(DEFAULT_CPC_BID),
        };
        let bids = if config.has_split_bids() {
            BidSettings::Split { search_bid: default_bid, recommendations_bid: default_bid }
        } else {
            BidSettings::Unified { bid: default_bid }
        };

        Self {
            id: format!("{}-{}", product.nm_id, created_on.format("%Y%m%d")),
            nm_id: product.nm_id,
            product_name: product.product_name.clone(),
            campaign_name: format!(
                "{} {} {}",
                product.product_name,
                config.payment_model.as_str(),
                created_on.format("%d.%m.%Y")
            ),
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            keyword: None,
            bids,
            budget: Decimal::from(DEFAULT_CAMPAIGN_BUDGET),
            bonus_amount: Decimal::ZERO,
            use_promo_bonuses: true,
            auto_replenishment: false,
            status: CampaignStatus::Valid,
            error_message: None,
            corrections: Vec::new(),
            source: source.to_string(),
            cpc_compatible: Some(product.cpc_compatible),
        }
    }

    /// Campaign added by hand rather than from an upload
    pub fn manual(product: &Product, config: &CampaignConfig, created_on: NaiveDate) -> Self {
        Self::from_product(product, config, MANUAL_SOURCE, created_on)
    }

    /// Part of the budget charged to the unified account
    pub fn real_spend(&self) -> Decimal {
        self.budget - self.bonus_amount
    }

    /// Records with critical upload errors never enter editing or totals
    pub fn is_editable(&self) -> bool {
        self.status != CampaignStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: "12345678".to_string(),
            nm_id: 12_345_678,
            product_name: "Платья #1".to_string(),
            image_url: String::new(),
            category: "Платья".to_string(),
            cpc_compatible: true,
        }
    }

    #[test]
    fn manual_cpm_campaign_gets_split_bids() {
        let config = CampaignConfig {
            payment_model: PaymentModel::Cpm,
            bid_type: BidType::Manual,
            categories: vec![],
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 22).unwrap();
        let campaign = Campaign::manual(&product(), &config, date);
        assert_eq!(campaign.source, MANUAL_SOURCE);
        assert_eq!(
            campaign.bids,
            BidSettings::Split { search_bid: Decimal::from(300), recommendations_bid: Decimal::from(300) }
        );
        assert_eq!(campaign.campaign_name, "Платья #1 CPM 22.01.2026");
        assert_eq!(campaign.budget, Decimal::from(3000));
        assert!(campaign.use_promo_bonuses);
    }

    #[test]
    fn manual_cpc_campaign_gets_low_unified_bid() {
        let config = CampaignConfig {
            payment_model: PaymentModel::Cpc,
            bid_type: BidType::Manual,
            categories: vec![],
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 22).unwrap();
        let campaign = Campaign::from_product(&product(), &config, "file.xlsx", date);
        assert_eq!(campaign.bids, BidSettings::Unified { bid: Decimal::from(30) });
        assert_eq!(campaign.source, "file.xlsx");
    }

    #[test]
    fn set_all_updates_both_split_bids() {
        let mut bids = BidSettings::Split { search_bid: Decimal::from(1), recommendations_bid: Decimal::from(2) };
        bids.set_all(Decimal::from(250));
        assert_eq!(
            bids,
            BidSettings::Split { search_bid: Decimal::from(250), recommendations_bid: Decimal::from(250) }
        );
    }
}
