use crate::models::ReportKind;
use super::layout::{self, LayoutFn};

/// A numbered `## N. Title` heading the prompt for a kind asks the model to use.
#[derive(Debug, Clone, Copy)]
pub struct Heading {
    pub key: &'static str,
    pub title: &'static str,
}

/// A top-level report key with its own section title and layout.
#[derive(Clone, Copy)]
pub struct KnownKey {
    pub key: &'static str,
    pub title: &'static str,
    pub layout: LayoutFn,
}

impl std::fmt::Debug for KnownKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnownKey")
            .field("key", &self.key)
            .field("title", &self.title)
            .finish()
    }
}

/// Everything the router needs to know about one report kind.
#[derive(Debug)]
pub struct KindProfile {
    pub kind: ReportKind,
    pub headings: &'static [Heading],
    /// Rendered first, in this order, when present.
    pub known: &'static [KnownKey],
    /// Score at or above which a metric-scoring average reads as favourable.
    pub score_threshold: Option<f64>,
}

impl KindProfile {
    pub fn known_key(&self, key: &str) -> Option<&KnownKey> {
        self.known.iter().find(|k| k.key == key)
    }

    /// Keys that never get a generic section of their own.
    pub fn is_already_rendered(&self, key: &str) -> bool {
        DENYLIST.contains(&key) || self.known_key(key).is_some()
    }

    pub fn heading_title(&self, key: &str) -> Option<(usize, &'static str)> {
        self.headings
            .iter()
            .position(|h| h.key == key)
            .map(|i| (i + 1, self.headings[i].title))
    }
}

pub const DENYLIST: &[&str] = &["raw_content", "rawContent", "_raw_content", "_rawContent"];

pub fn profile_for(kind: ReportKind) -> &'static KindProfile {
    match kind {
        ReportKind::Validation => &VALIDATION,
        ReportKind::MarketSize => &MARKET_SIZE,
        ReportKind::CompetitorAnalysis => &COMPETITOR_ANALYSIS,
    }
}

const fn known(key: &'static str, title: &'static str, layout: LayoutFn) -> KnownKey {
    KnownKey { key, title, layout }
}

const fn heading(key: &'static str, title: &'static str) -> Heading {
    Heading { key, title }
}

static VALIDATION: KindProfile = KindProfile {
    kind: ReportKind::Validation,
    headings: &[
        heading("problem_statement", "Problem Statement"),
        heading("evidence_collection_summary", "Evidence Collection Summary"),
        heading("metric_scoring", "Metric Scoring"),
        heading("final_decision", "Final Decision"),
        heading("key_insights", "Key Insights"),
        heading("next_steps", "Next Steps"),
    ],
    known: &[
        known("problem_statement", "Problem Statement", layout::generic),
        known("evidence_collection_summary", "Evidence Summary", layout::evidence_summary),
        known("metric_scoring", "Validation Scores", layout::score_grid),
        known("final_decision", "Final Decision", layout::decision_badge),
        known("key_insights", "Key Insights", layout::bullets),
        known("next_steps", "Next Steps", layout::bullets),
    ],
    score_threshold: None,
};

static MARKET_SIZE: KindProfile = KindProfile {
    kind: ReportKind::MarketSize,
    headings: &[
        heading("market_size_estimates", "Market Size Estimates"),
        heading("market_growth", "Market Growth & Trend Analysis"),
        heading("customer_acquisition", "Customer Acquisition Analysis"),
        heading("revenue_potential", "Revenue Model & Monetization Strategy"),
        heading("final_report", "Final Report: Market Size Analysis"),
        heading("metric_scoring", "Metric Scoring"),
        heading("key_insights", "Key Insights & Next Steps"),
    ],
    known: &[
        known("market_overview", "Market Overview", layout::generic),
        known("market_size_estimates", "Market Size Estimates", layout::market_size_estimates),
        known("market_growth", "Market Growth & Trends", layout::market_growth),
        known("customer_acquisition", "Customer Acquisition", layout::customer_acquisition),
        known("revenue_potential", "Revenue Potential", layout::revenue_potential),
        known("final_report", "Final Report", layout::generic),
        known("metric_scoring", "Market Opportunity Score", layout::score_grid),
        known("key_insights", "Key Insights & Next Steps", layout::insights_with_next_steps),
        known("next_steps", "Next Steps", layout::orphan_next_steps),
    ],
    score_threshold: Some(6.5),
};

static COMPETITOR_ANALYSIS: KindProfile = KindProfile {
    kind: ReportKind::CompetitorAnalysis,
    headings: &[
        heading("top_competitors", "Top Competitors"),
        heading("website_analysis", "Website Analysis"),
        heading("user_reviews", "User Reviews & Feedback"),
        heading("competitive_advantages", "Competitive Advantages"),
        heading("final_report", "Final Report"),
        heading("metric_scoring", "Metric Scoring"),
        heading("key_insights", "Key Insights & Next Steps"),
    ],
    known: &[
        known("top_competitors", "Top Competitors", layout::competitor_cards),
        known("website_analysis", "Website Analysis", layout::generic),
        known("user_reviews", "User Reviews & Feedback", layout::bullets),
        known("competitive_advantages", "Competitive Advantages", layout::bullets),
        known("final_report", "Final Report", layout::generic),
        known("metric_scoring", "Competitive Position Score", layout::score_grid),
        known("key_insights", "Key Insights & Next Steps", layout::insights_with_next_steps),
        known("next_steps", "Next Steps", layout::orphan_next_steps),
    ],
    score_threshold: Some(6.0),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_profile() {
        for kind in ReportKind::ALL {
            assert_eq!(profile_for(kind).kind, kind);
        }
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(profile_for(ReportKind::MarketSize).score_threshold, Some(6.5));
        assert_eq!(profile_for(ReportKind::CompetitorAnalysis).score_threshold, Some(6.0));
        assert_eq!(profile_for(ReportKind::Validation).score_threshold, None);
    }

    #[test]
    fn test_denylist_and_known_keys_are_already_rendered() {
        let profile = profile_for(ReportKind::MarketSize);
        assert!(profile.is_already_rendered("rawContent"));
        assert!(profile.is_already_rendered("_raw_content"));
        assert!(profile.is_already_rendered("metric_scoring"));
        assert!(!profile.is_already_rendered("regulatory_risks"));
    }

    #[test]
    fn test_heading_title_is_numbered() {
        let profile = profile_for(ReportKind::CompetitorAnalysis);
        assert_eq!(profile.heading_title("website_analysis"), Some((2, "Website Analysis")));
        assert_eq!(profile.heading_title("missing"), None);
    }

    #[test]
    fn test_headings_share_keys_with_known_keys() {
        for kind in ReportKind::ALL {
            let profile = profile_for(kind);
            for heading in profile.headings {
                assert!(
                    profile.known_key(heading.key).is_some(),
                    "{}: heading key {} has no layout",
                    kind,
                    heading.key
                );
            }
        }
    }
}
