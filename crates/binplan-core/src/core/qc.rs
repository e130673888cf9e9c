//! Concentration/QC Deriver.
//!
//! Destination concentrations are rounded to three decimal places and reported
//! as formatted strings, ready for a bulk QC-result payload.

use crate::core::models::well::WellCoordinate;
use serde::Serialize;

pub const CONCENTRATION_KEY: &str = "concentration";
pub const DEFAULT_UNITS: &str = "ng/ul";
const DECIMAL_PLACES: i32 = 3;

/// Rounds half away from zero to three decimal places.
#[inline]
pub fn round_to_precision(value: f64) -> f64 {
    let factor = 10f64.powi(DECIMAL_PLACES);
    (value * factor).round() / factor
}

/// `amount / total_volume`, rounded to three decimals.
///
/// `total_volume` is the post-dilution volume (sample plus diluent) and must be
/// positive; the planning workflow guarantees this for every entry it builds.
pub fn destination_concentration(amount: f64, total_volume: f64) -> f64 {
    debug_assert!(total_volume > 0.0, "total volume must be positive");
    round_to_precision(amount / total_volume)
}

pub fn format_concentration(value: f64) -> String {
    format!("{:.*}", DECIMAL_PLACES as usize, value)
}

/// Assay details stamped onto every QC record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QcSettings {
    pub units: String,
    pub assay_type: String,
    pub assay_version: String,
}

impl Default for QcSettings {
    fn default() -> Self {
        Self {
            units: DEFAULT_UNITS.to_string(),
            assay_type: "Binning".to_string(),
            assay_version: "v1.0".to_string(),
        }
    }
}

/// One concentration result for a destination well.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcRecord {
    pub well_location: WellCoordinate,
    pub key: &'static str,
    pub value: String,
    pub units: String,
    pub cv: u32,
    pub assay_type: String,
    pub assay_version: String,
}

impl QcRecord {
    pub fn concentration(
        well_location: WellCoordinate,
        concentration: f64,
        settings: &QcSettings,
    ) -> Self {
        Self {
            well_location,
            key: CONCENTRATION_KEY,
            value: format_concentration(concentration),
            units: settings.units.clone(),
            cv: 0,
            assay_type: settings.assay_type.clone(),
            assay_version: settings.assay_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_concentration_divides_and_rounds() {
        assert_eq!(destination_concentration(50.0, 20.0), 2.5);
        assert_eq!(destination_concentration(10.0, 3.0), 3.333);
        assert_eq!(destination_concentration(20.0, 3.0), 6.667);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to_precision(0.0625), 0.063);
        assert_eq!(round_to_precision(-0.0625), -0.063);
    }

    #[test]
    fn recomputation_is_idempotent() {
        for (amount, volume) in [(12.34567, 35.0), (0.0, 20.0), (999.999, 7.0)] {
            let once = destination_concentration(amount, volume);
            assert_eq!(once, destination_concentration(amount, volume));
            assert_eq!(once, round_to_precision(once));
        }
    }

    #[test]
    fn doubling_amount_doubles_concentration_within_rounding() {
        for amount in [1.0, 7.77, 123.456, 5000.0] {
            let single = destination_concentration(amount, 35.0);
            let double = destination_concentration(amount * 2.0, 35.0);
            assert!((double - 2.0 * single).abs() <= 0.0015);
        }
    }

    #[test]
    fn format_always_shows_three_decimals() {
        assert_eq!(format_concentration(2.5), "2.500");
        assert_eq!(format_concentration(0.0), "0.000");
        assert_eq!(format_concentration(1234.5678), "1234.568");
    }

    #[test]
    fn record_uses_concentration_key_and_settings() {
        let settings = QcSettings::default();
        let record = QcRecord::concentration("B2".parse().unwrap(), 1.25, &settings);
        assert_eq!(record.key, "concentration");
        assert_eq!(record.value, "1.250");
        assert_eq!(record.units, "ng/ul");
        assert_eq!(record.well_location.to_string(), "B2");
    }
}
