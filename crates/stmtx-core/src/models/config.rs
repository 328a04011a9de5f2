//! Configuration structures for the extraction pipeline.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statement::Issuer;

/// Main configuration for the stmtx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Issuer detection configuration.
    pub detection: DetectionConfig,

    /// Account field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Transaction flagging configuration.
    pub analysis: AnalysisConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Retry with whole-document text extraction when page extraction yields nothing.
    pub fallback_extractor: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            fallback_extractor: true,
        }
    }
}

/// Issuer detection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Extra literal markers checked after the built-in ones.
    pub extra_markers: Vec<IssuerMarker>,
}

/// A literal string that identifies an issuer when found in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerMarker {
    pub marker: String,
    pub issuer: Issuer,
}

/// Account field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extra regex patterns per field, tried after the built-in chain.
    ///
    /// Keys are `"<issuer>.<field>"`, e.g. `"hdfc.micr"`. The first capture
    /// group is used, or the whole match when the pattern has no groups.
    pub extra_patterns: BTreeMap<String, Vec<String>>,
}

impl ExtractionConfig {
    /// Extra patterns configured for one issuer, keyed by field name.
    pub fn patterns_for(&self, issuer: Issuer) -> BTreeMap<&str, &[String]> {
        let prefix = format!("{}.", issuer.key());
        self.extra_patterns
            .iter()
            .filter_map(|(key, patterns)| {
                key.strip_prefix(&prefix)
                    .map(|field| (field, patterns.as_slice()))
            })
            .collect()
    }
}

/// Transaction flagging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Demand-draft withdrawals above this amount are flagged.
    pub dd_withdrawal_threshold: Decimal,

    /// RTGS deposits above this amount are flagged.
    pub rtgs_deposit_threshold: Decimal,

    /// Counterparty names flagged wherever they appear (case-insensitive).
    pub suspicious_entities: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dd_withdrawal_threshold: Decimal::from(10_000),
            rtgs_deposit_threshold: Decimal::from(50_000),
            suspicious_entities: ["guddu", "prabhat", "arif", "coal india"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl StatementConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StatementConfig =
            serde_json::from_str(r#"{ "pdf": { "max_pages": 3 } }"#).unwrap();

        assert_eq!(config.pdf.max_pages, 3);
        assert!(config.pdf.fallback_extractor);
        assert_eq!(config.analysis.dd_withdrawal_threshold, Decimal::from(10_000));
        assert_eq!(config.analysis.suspicious_entities.len(), 4);
    }

    #[test]
    fn test_patterns_for_issuer() {
        let mut config = ExtractionConfig::default();
        config
            .extra_patterns
            .insert("hdfc.micr".to_string(), vec![r"MICR Code\s*(\d{9})".to_string()]);
        config
            .extra_patterns
            .insert("icici.ifsc".to_string(), vec![r"IFS Code\s*(\w+)".to_string()]);

        let hdfc = config.patterns_for(Issuer::Hdfc);
        assert_eq!(hdfc.len(), 1);
        assert!(hdfc.contains_key("micr"));
        assert!(config.patterns_for(Issuer::Unknown).is_empty());
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = StatementConfig::default();
        config.detection.extra_markers.push(IssuerMarker {
            marker: "HDFC0009999".to_string(),
            issuer: Issuer::Hdfc,
        });
        config.save(&path).unwrap();

        let loaded = StatementConfig::from_file(&path).unwrap();
        assert_eq!(loaded.detection.extra_markers, config.detection.extra_markers);
    }
}
