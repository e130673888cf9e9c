use super::policy::DilutionPolicy;
use crate::core::models::well::VolumeSplit;
use thiserror::Error;

/// Diluent volumes at or below this are too small to pipette; all sample is used instead.
pub const SNAP_TO_SAMPLE_THRESHOLD: f64 = 0.5;
/// Diluent volumes below this (but above the snap threshold) force the sample volume
/// down to a whole unit so the diluent becomes pipettable.
pub const WHOLE_UNIT_THRESHOLD: f64 = 1.0;

#[derive(Debug, Error, PartialEq, Clone, Copy)]
pub enum VolumeError {
    #[error("Concentration {0} is not a valid measurement")]
    InvalidConcentration(f64),
}

/// Computes the sample/diluent split needed for a well at the given concentration.
///
/// A missing concentration is treated as zero. Negative and non-finite
/// concentrations are rejected rather than clamped.
pub fn compute_volume(
    concentration: Option<f64>,
    policy: &DilutionPolicy,
) -> Result<VolumeSplit, VolumeError> {
    if let Some(c) = concentration {
        if !c.is_finite() || c < 0.0 {
            return Err(VolumeError::InvalidConcentration(c));
        }
    }

    match *policy {
        DilutionPolicy::FixedVolume {
            source_volume,
            diluent_volume,
        } => Ok(VolumeSplit::new(source_volume, diluent_volume)),
        DilutionPolicy::TargetAmount {
            target_amount,
            target_volume,
            minimum_source_volume,
        } => {
            let provisional = provisional_sample_volume(
                concentration,
                target_amount,
                target_volume,
                minimum_source_volume,
            );
            Ok(apply_low_diluent_rounding(provisional, target_volume))
        }
    }
}

fn provisional_sample_volume(
    concentration: Option<f64>,
    target_amount: f64,
    target_volume: f64,
    minimum_source_volume: f64,
) -> f64 {
    let c = match concentration {
        Some(c) if c > 0.0 => c,
        _ => return target_volume,
    };

    let raw = target_amount / c;
    if raw >= target_volume {
        target_volume
    } else if raw <= minimum_source_volume {
        minimum_source_volume
    } else {
        raw
    }
}

/// Applies the pipetting-precision rule to a provisional sample volume.
///
/// Rounding goes down, never to nearest, so the recomputed diluent is at least
/// one whole unit.
pub fn apply_low_diluent_rounding(sample_volume: f64, target_volume: f64) -> VolumeSplit {
    let diluent = target_volume - sample_volume;
    if diluent <= SNAP_TO_SAMPLE_THRESHOLD {
        VolumeSplit::new(target_volume, 0.0)
    } else if diluent < WHOLE_UNIT_THRESHOLD {
        let rounded = sample_volume.floor();
        VolumeSplit::new(rounded, target_volume - rounded)
    } else {
        VolumeSplit::new(sample_volume, diluent)
    }
}

/// Amount of material transferred: concentration times sample volume.
#[inline]
pub fn compute_amount(concentration: Option<f64>, split: &VolumeSplit) -> f64 {
    concentration.unwrap_or(0.0) * split.sample_volume
}
