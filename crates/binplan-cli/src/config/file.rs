use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub destination: Option<FileDestinationConfig>,
    pub policy: Option<FilePolicyConfig>,
    pub binning: Option<FileBinningConfig>,
    pub qc: Option<FileQcConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileDestinationConfig {
    pub plate: Option<String>,
    pub rows: Option<usize>,
    pub columns: Option<usize>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    TargetAmount,
    FixedVolume,
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "target-amount" => Ok(Self::TargetAmount),
            "fixed-volume" => Ok(Self::FixedVolume),
            other => Err(format!(
                "unknown policy type '{other}' (expected 'target-amount' or 'fixed-volume')"
            )),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePolicyConfig {
    #[serde(rename = "type")]
    pub kind: Option<PolicyKind>,
    pub target_amount: Option<f64>,
    pub target_volume: Option<f64>,
    pub minimum_source_volume: Option<f64>,
    pub source_volume: Option<f64>,
    pub diluent_volume: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BinningModeKind {
    Amount,
    Discrete,
    Unbinned,
}

impl FromStr for BinningModeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "amount" => Ok(Self::Amount),
            "discrete" => Ok(Self::Discrete),
            "unbinned" => Ok(Self::Unbinned),
            other => Err(format!(
                "unknown binning mode '{other}' (expected 'amount', 'discrete' or 'unbinned')"
            )),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBinningConfig {
    pub mode: Option<BinningModeKind>,
    pub bins: Option<Vec<FileBin>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBin {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_inclusive: Option<bool>,
    pub max_inclusive: Option<bool>,
    pub colour: Option<u32>,
    pub pcr_cycles: Option<u32>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileQcConfig {
    pub units: Option<String>,
    pub assay_type: Option<String>,
    pub assay_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_configuration_deserializes() {
        let config: FileConfig = toml::from_str(
            r#"
            [destination]
            plate = "384"

            [policy]
            type = "target-amount"
            target-amount = 50.0
            target-volume = 20.0
            minimum-source-volume = 0.2

            [binning]
            mode = "amount"

            [[binning.bins]]
            max = 25.0
            colour = 1
            pcr-cycles = 16

            [[binning.bins]]
            min = 25.0
            colour = 2
            pcr-cycles = 12
            attributes = { label = "high" }

            [qc]
            units = "ng/ul"
            assay-type = "NormalisedBinning"
            "#,
        )
        .unwrap();

        let policy = config.policy.unwrap();
        assert_eq!(policy.kind, Some(PolicyKind::TargetAmount));
        assert_eq!(policy.minimum_source_volume, Some(0.2));

        let binning = config.binning.unwrap();
        assert_eq!(binning.mode, Some(BinningModeKind::Amount));
        let bins = binning.bins.unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].max, Some(25.0));
        assert_eq!(bins[1].attributes.get("label").map(String::as_str), Some("high"));

        assert_eq!(config.qc.unwrap().assay_version, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<FileConfig, _> = toml::from_str(
            r#"
            [policy]
            type = "fixed-volume"
            sample-volume = 5.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn kinds_parse_from_override_strings() {
        assert_eq!("fixed-volume".parse(), Ok(PolicyKind::FixedVolume));
        assert_eq!("discrete".parse(), Ok(BinningModeKind::Discrete));
        assert!("binned".parse::<BinningModeKind>().is_err());
    }
}
