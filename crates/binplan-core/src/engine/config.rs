use crate::core::binning::table::{BinTable, BinTableError};
use crate::core::dilution::policy::{DilutionPolicy, PolicyError};
use crate::core::models::plate::{DimensionError, PlateDimensions};
use crate::core::qc::QcSettings;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid dilution policy: {0}")]
    Policy(#[from] PolicyError),

    #[error("Invalid bin table: {0}")]
    BinTable(#[from] BinTableError),

    #[error("Invalid destination plate: {0}")]
    Dimensions(#[from] DimensionError),
}

/// How wells are grouped before they are laid out on the destination plate.
#[derive(Debug, Clone, PartialEq)]
pub enum BinningMode {
    /// Classify each well's computed amount against a configured table.
    Amount(BinTable),
    /// Derive bins from the wells' discrete values, highest first.
    Discrete,
    /// No bins; every well keeps its source coordinate on the destination.
    Unbinned,
}

impl BinningMode {
    pub fn name(&self) -> &'static str {
        match self {
            BinningMode::Amount(_) => "amount",
            BinningMode::Discrete => "discrete",
            BinningMode::Unbinned => "unbinned",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanConfig {
    pub policy: DilutionPolicy,
    pub binning: BinningMode,
    pub destination: PlateDimensions,
    pub qc: QcSettings,
}

#[derive(Default)]
pub struct PlanConfigBuilder {
    policy: Option<DilutionPolicy>,
    binning: Option<BinningMode>,
    destination: Option<PlateDimensions>,
    qc: Option<QcSettings>,
}

impl PlanConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, policy: DilutionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
    pub fn binning(mut self, mode: BinningMode) -> Self {
        self.binning = Some(mode);
        self
    }
    pub fn bin_table(mut self, table: BinTable) -> Self {
        self.binning = Some(BinningMode::Amount(table));
        self
    }
    pub fn destination(mut self, dims: PlateDimensions) -> Self {
        self.destination = Some(dims);
        self
    }
    pub fn qc(mut self, settings: QcSettings) -> Self {
        self.qc = Some(settings);
        self
    }

    /// Assembles the configuration. Bin tables are re-validated here so that
    /// tables built with [`BinTable::unvalidated`] cannot slip through.
    pub fn build(self) -> Result<PlanConfig, ConfigError> {
        let policy = self.policy.ok_or(ConfigError::MissingParameter("policy"))?;
        let binning = self
            .binning
            .ok_or(ConfigError::MissingParameter("binning"))?;
        let destination = self
            .destination
            .ok_or(ConfigError::MissingParameter("destination"))?;

        if let BinningMode::Amount(table) = &binning {
            table.validate()?;
        }

        Ok(PlanConfig {
            policy,
            binning,
            destination,
            qc: self.qc.unwrap_or_default(),
        })
    }
}
