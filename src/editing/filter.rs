use serde::{Deserialize, Serialize};

use crate::campaign::types::Campaign;

/// Table filter: search tags plus source and category multi-selects.
///
/// All-digit search terms are matched against `nm_id` (any of them may match);
/// every other term must appear in the product or campaign name. When both kinds
/// are present a campaign has to satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFilter {
    search_terms: Vec<String>, // lowercased, deduplicated, insertion order
    pub sources: Vec<String>,
    pub categories: Vec<String>,
}

impl CampaignFilter {
    /// Split typed input on whitespace and commas and add the pieces as search terms
    pub fn add_search_input(&mut self, input: &str) {
        for term in input.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !self.search_terms.contains(&term) {
                self.search_terms.push(term);
            }
        }
    }

    pub fn remove_search_term(&mut self, term: &str) {
        let term = term.to_lowercase();
        self.search_terms.retain(|t| *t != term);
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        !self.search_terms.is_empty() || !self.sources.is_empty() || !self.categories.is_empty()
    }

    pub fn matches(&self, campaign: &Campaign) -> bool {
        if !self.sources.is_empty() && !self.sources.contains(&campaign.source) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&campaign.category) {
            return false;
        }

        let (id_terms, text_terms): (Vec<&String>, Vec<&String>) =
            self.search_terms.iter().partition(|t| t.chars().all(|c| c.is_ascii_digit()));

        let nm_id = campaign.nm_id.to_string();
        let id_match = id_terms.is_empty() || id_terms.iter().any(|t| **t == nm_id);

        let text = format!("{} {}", campaign.product_name, campaign.campaign_name).to_lowercase();
        let text_match = text_terms.iter().all(|t| text.contains(t.as_str()));

        id_match && text_match
    }
}

/// Distinct values in first-seen order
pub(crate) fn unique_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
