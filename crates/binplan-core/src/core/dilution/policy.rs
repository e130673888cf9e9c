use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum PolicyError {
    #[error("Policy parameter '{name}' must be a finite number (got {value})")]
    NotFinite { name: &'static str, value: f64 },
    #[error("Policy parameter '{name}' must be greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("Policy parameter '{name}' must not be negative (got {value})")]
    Negative { name: &'static str, value: f64 },
    #[error(
        "Minimum source volume {minimum_source_volume} must be smaller than target volume {target_volume}"
    )]
    MinimumExceedsTarget {
        minimum_source_volume: f64,
        target_volume: f64,
    },
}

/// How sample and diluent volumes are chosen for every well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DilutionPolicy {
    /// Per-well sample volume chosen to deliver `target_amount` in `target_volume`.
    TargetAmount {
        target_amount: f64,
        target_volume: f64,
        minimum_source_volume: f64,
    },
    /// The same volumes for every well, regardless of concentration.
    FixedVolume {
        source_volume: f64,
        diluent_volume: f64,
    },
}

impl DilutionPolicy {
    pub fn target_amount(
        target_amount: f64,
        target_volume: f64,
        minimum_source_volume: f64,
    ) -> Result<Self, PolicyError> {
        ensure_positive("target_amount", target_amount)?;
        ensure_positive("target_volume", target_volume)?;
        ensure_positive("minimum_source_volume", minimum_source_volume)?;
        if minimum_source_volume >= target_volume {
            return Err(PolicyError::MinimumExceedsTarget {
                minimum_source_volume,
                target_volume,
            });
        }
        Ok(Self::TargetAmount {
            target_amount,
            target_volume,
            minimum_source_volume,
        })
    }

    pub fn fixed_volume(source_volume: f64, diluent_volume: f64) -> Result<Self, PolicyError> {
        ensure_positive("source_volume", source_volume)?;
        ensure_finite("diluent_volume", diluent_volume)?;
        if diluent_volume < 0.0 {
            return Err(PolicyError::Negative {
                name: "diluent_volume",
                value: diluent_volume,
            });
        }
        Ok(Self::FixedVolume {
            source_volume,
            diluent_volume,
        })
    }

    /// Total post-dilution volume every well ends up with.
    pub fn total_volume(&self) -> f64 {
        match *self {
            Self::TargetAmount { target_volume, .. } => target_volume,
            Self::FixedVolume {
                source_volume,
                diluent_volume,
            } => source_volume + diluent_volume,
        }
    }
}

fn ensure_finite(name: &'static str, value: f64) -> Result<(), PolicyError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PolicyError::NotFinite { name, value })
    }
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), PolicyError> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(PolicyError::NotPositive { name, value })
    }
}
