use super::file::BinningModeKind;
use binplan::core::qc::QcSettings;

pub struct DefaultsConfig {
    pub plate: String,
    pub binning_mode: BinningModeKind,
    pub fixed_diluent_volume: f64,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
    pub qc: QcSettings,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            plate: "96".to_string(),
            binning_mode: BinningModeKind::Unbinned,
            fixed_diluent_volume: 0.0,
            min_inclusive: true,
            max_inclusive: false,
            qc: QcSettings::default(),
        }
    }
}
