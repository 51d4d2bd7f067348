use rust_decimal::Decimal;
use serde::Serialize;

use crate::campaign::types::Campaign;

/// Spend split across the campaigns on screen. Error records are excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpendTotals {
    pub real: Decimal,  // charged to the unified account
    pub bonus: Decimal, // paid with promo bonuses
    pub total: Decimal,
}

impl SpendTotals {
    pub fn from_campaigns<'a>(campaigns: impl IntoIterator<Item = &'a Campaign>) -> Self {
        campaigns
            .into_iter()
            .filter(|campaign| campaign.is_editable())
            .fold(Self::default(), |mut acc, campaign| {
                acc.real += campaign.real_spend();
                acc.bonus += campaign.bonus_amount;
                acc.total += campaign.budget;
                acc
            })
    }

    /// How much real spend the unified account cannot cover
    pub fn deficit(&self, unified_balance: Decimal) -> Decimal {
        (self.real - unified_balance).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::source::{CampaignSource, StaticCampaignSource};
    use crate::campaign::types::{BidType, CampaignConfig, PaymentModel};
    use chrono::NaiveDate;

    #[test]
    fn totals_skip_error_records_and_split_bonus() {
        let source = StaticCampaignSource::new(NaiveDate::from_ymd_opt(2026, 1, 22).unwrap());
        let config = CampaignConfig {
            payment_model: PaymentModel::Cpc,
            bid_type: BidType::Unified,
            categories: vec![],
        };
        let mut campaigns = source.load("f.xlsx", &config).unwrap();
        campaigns[0].bonus_amount = Decimal::from(1000);

        let totals = SpendTotals::from_campaigns(&campaigns);
        // records 1..=68: sum(5000 + 100 i)
        let expected_total = Decimal::from(68 * 5000 + 100 * (68 * 69 / 2));
        assert_eq!(totals.total, expected_total);
        assert_eq!(totals.bonus, Decimal::from(1000));
        assert_eq!(totals.real, expected_total - Decimal::from(1000));
    }

    #[test]
    fn deficit_is_never_negative() {
        let totals = SpendTotals {
            real: Decimal::from(100),
            bonus: Decimal::ZERO,
            total: Decimal::from(100),
        };
        assert_eq!(totals.deficit(Decimal::from(500)), Decimal::ZERO);
        assert_eq!(totals.deficit(Decimal::from(40)), Decimal::from(60));
    }
}
