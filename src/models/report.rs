use serde::{Deserialize, Serialize};

/// The three analyses produced for every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    Validation,
    MarketSize,
    CompetitorAnalysis,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Validation,
        ReportKind::MarketSize,
        ReportKind::CompetitorAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::MarketSize => "market-size",
            Self::CompetitorAnalysis => "competitor-analysis",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Validation => "Problem Validation Report",
            Self::MarketSize => "Market Size Analysis",
            Self::CompetitorAnalysis => "Competitor Analysis",
        }
    }

    /// Stem used for exported files.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::MarketSize => "market_size",
            Self::CompetitorAnalysis => "competitor_analysis",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "validation" => Ok(Self::Validation),
            "market-size" | "market_size" | "marketsize" => Ok(Self::MarketSize),
            "competitor-analysis" | "competitor_analysis" | "competitoranalysis" | "competitors" => {
                Ok(Self::CompetitorAnalysis)
            }
            other => Err(format!("Unknown report kind: {}", other)),
        }
    }
}

/// What a report view receives: the serialized envelope, if any.
/// `None` means no report has been produced yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub raw_report_data: Option<String>,
}

impl ReportPayload {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw_report_data: Some(raw.into()) }
    }

    /// Stand-in used when the API call for this kind did not succeed.
    pub fn placeholder(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Validation => Self::new(
                serde_json::json!({ "error": "Failed to get a valid response from the AI" }).to_string(),
            ),
            _ => Self::new("{}"),
        }
    }
}

/// One payload per report kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSet {
    pub validation: ReportPayload,
    pub market_size: ReportPayload,
    pub competitor_analysis: ReportPayload,
}

impl ReportSet {
    pub fn placeholders() -> Self {
        Self {
            validation: ReportPayload::placeholder(ReportKind::Validation),
            market_size: ReportPayload::placeholder(ReportKind::MarketSize),
            competitor_analysis: ReportPayload::placeholder(ReportKind::CompetitorAnalysis),
        }
    }

    pub fn get(&self, kind: ReportKind) -> &ReportPayload {
        match kind {
            ReportKind::Validation => &self.validation,
            ReportKind::MarketSize => &self.market_size,
            ReportKind::CompetitorAnalysis => &self.competitor_analysis,
        }
    }

    pub fn set(&mut self, kind: ReportKind, payload: ReportPayload) {
        match kind {
            ReportKind::Validation => self.validation = payload,
            ReportKind::MarketSize => self.market_size = payload,
            ReportKind::CompetitorAnalysis => self.competitor_analysis = payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_accepts_cli_spellings() {
        assert_eq!("market-size".parse::<ReportKind>().unwrap(), ReportKind::MarketSize);
        assert_eq!("Competitor_Analysis".parse::<ReportKind>().unwrap(), ReportKind::CompetitorAnalysis);
        assert_eq!("validation".parse::<ReportKind>().unwrap(), ReportKind::Validation);
        assert!("pricing".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_camel_case() {
        let json = serde_json::to_string(&ReportKind::CompetitorAnalysis).unwrap();
        assert_eq!(json, "\"competitorAnalysis\"");
    }

    #[test]
    fn test_placeholders() {
        let set = ReportSet::placeholders();
        assert!(set.validation.raw_report_data.as_deref().unwrap().contains("Failed to get a valid response"));
        assert_eq!(set.market_size.raw_report_data.as_deref(), Some("{}"));
        assert_eq!(set.competitor_analysis.raw_report_data.as_deref(), Some("{}"));
    }

    #[test]
    fn test_payload_absent_by_default() {
        let set = ReportSet::default();
        for kind in ReportKind::ALL {
            assert!(set.get(kind).raw_report_data.is_none());
        }
    }
}
