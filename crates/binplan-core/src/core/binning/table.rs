use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum BinTableError {
    #[error("Bin table has no bins")]
    Empty,
    #[error("First bin must not have a lower bound (found {0})")]
    FirstBinHasLowerBound(f64),
    #[error("Last bin must not have an upper bound (found {0})")]
    LastBinHasUpperBound(f64),
    #[error("Bin {index} must have a lower bound")]
    MissingLowerBound { index: usize },
    #[error("Bin {index} must have an upper bound")]
    MissingUpperBound { index: usize },
    #[error("Bin {index} has a non-finite bound ({value})")]
    NonFiniteBound { index: usize, value: f64 },
    #[error("Bin {index} covers no values (lower {lower}, upper {upper})")]
    EmptyRange { index: usize, lower: f64, upper: f64 },
    #[error("Gap between bin {previous} (upper {upper}) and bin {index} (lower {lower})")]
    Gap {
        previous: usize,
        index: usize,
        upper: f64,
        lower: f64,
    },
    #[error("Bin {index} (lower {lower}) overlaps bin {previous} (upper {upper})")]
    Overlap {
        previous: usize,
        index: usize,
        upper: f64,
        lower: f64,
    },
    #[error("Thresholds must be strictly increasing ({previous} is followed by {next})")]
    UnsortedThresholds { previous: f64, next: f64 },
    #[error("Expected {expected} metadata entries for {thresholds} thresholds, got {actual}")]
    MetadataCount {
        thresholds: usize,
        expected: usize,
        actual: usize,
    },
}

/// One end of a bin's range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// Opaque per-bin data handed back to callers untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BinMetadata {
    pub colour: Option<u32>,
    pub pcr_cycles: Option<u32>,
    pub attributes: BTreeMap<String, String>,
}

impl BinMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn with_pcr_cycles(mut self, cycles: u32) -> Self {
        self.pcr_cycles = Some(cycles);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
    pub metadata: BinMetadata,
}

impl Bin {
    /// A bin using the `lower <= value < upper` convention.
    pub fn new(lower: Option<f64>, upper: Option<f64>, metadata: BinMetadata) -> Self {
        Self {
            lower: lower.map(Bound::inclusive),
            upper: upper.map(Bound::exclusive),
            metadata,
        }
    }

    pub fn with_bounds(lower: Option<Bound>, upper: Option<Bound>, metadata: BinMetadata) -> Self {
        Self {
            lower,
            upper,
            metadata,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let above_lower = match self.lower {
            None => true,
            Some(Bound {
                value: lo,
                inclusive: true,
            }) => value >= lo,
            Some(Bound {
                value: lo,
                inclusive: false,
            }) => value > lo,
        };
        let below_upper = match self.upper {
            None => true,
            Some(Bound {
                value: hi,
                inclusive: true,
            }) => value <= hi,
            Some(Bound {
                value: hi,
                inclusive: false,
            }) => value < hi,
        };
        above_lower && below_upper
    }
}

/// Ordered bins; a bin's priority is its position in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinTable {
    bins: Vec<Bin>,
}

impl BinTable {
    pub fn new(bins: Vec<Bin>) -> Result<Self, BinTableError> {
        let table = Self { bins };
        table.validate()?;
        Ok(table)
    }

    /// Wraps bins without checking them. Classification against a malformed table
    /// surfaces as `NoBinFound` for values that fall into a gap.
    pub fn unvalidated(bins: Vec<Bin>) -> Self {
        Self { bins }
    }

    /// Builds a contiguous table from strictly increasing thresholds.
    ///
    /// `n` thresholds produce `n + 1` bins: `(-inf, t0)`, `[t0, t1)`, ..., `[tn-1, +inf)`.
    pub fn from_thresholds(
        thresholds: &[f64],
        metadata: Vec<BinMetadata>,
    ) -> Result<Self, BinTableError> {
        if metadata.len() != thresholds.len() + 1 {
            return Err(BinTableError::MetadataCount {
                thresholds: thresholds.len(),
                expected: thresholds.len() + 1,
                actual: metadata.len(),
            });
        }
        for pair in thresholds.windows(2) {
            if pair[0].partial_cmp(&pair[1]) != Some(std::cmp::Ordering::Less) {
                return Err(BinTableError::UnsortedThresholds {
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }

        let bins = metadata
            .into_iter()
            .enumerate()
            .map(|(i, meta)| {
                let lower = i.checked_sub(1).map(|j| thresholds[j]);
                let upper = thresholds.get(i).copied();
                Bin::new(lower, upper, meta)
            })
            .collect();
        Self::new(bins)
    }

    /// Checks that the table is ordered, exhaustive and free of overlaps.
    pub fn validate(&self) -> Result<(), BinTableError> {
        let (first, last) = match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(BinTableError::Empty),
        };
        if let Some(lower) = first.lower {
            return Err(BinTableError::FirstBinHasLowerBound(lower.value));
        }
        if let Some(upper) = last.upper {
            return Err(BinTableError::LastBinHasUpperBound(upper.value));
        }

        let last_index = self.bins.len() - 1;
        for (index, bin) in self.bins.iter().enumerate() {
            if index > 0 && bin.lower.is_none() {
                return Err(BinTableError::MissingLowerBound { index });
            }
            if index < last_index && bin.upper.is_none() {
                return Err(BinTableError::MissingUpperBound { index });
            }
            for bound in bin.lower.iter().chain(bin.upper.iter()) {
                if !bound.value.is_finite() {
                    return Err(BinTableError::NonFiniteBound {
                        index,
                        value: bound.value,
                    });
                }
            }
            if let (Some(lower), Some(upper)) = (bin.lower, bin.upper) {
                let empty = lower.value > upper.value
                    || (lower.value == upper.value && !(lower.inclusive && upper.inclusive));
                if empty {
                    return Err(BinTableError::EmptyRange {
                        index,
                        lower: lower.value,
                        upper: upper.value,
                    });
                }
            }
        }

        for (previous, pair) in self.bins.windows(2).enumerate() {
            let index = previous + 1;
            let (upper, lower) = match (pair[0].upper, pair[1].lower) {
                (Some(upper), Some(lower)) => (upper, lower),
                _ => continue,
            };
            if upper.value == lower.value {
                if upper.inclusive == lower.inclusive {
                    return Err(if upper.inclusive {
                        BinTableError::Overlap {
                            previous,
                            index,
                            upper: upper.value,
                            lower: lower.value,
                        }
                    } else {
                        BinTableError::Gap {
                            previous,
                            index,
                            upper: upper.value,
                            lower: lower.value,
                        }
                    });
                }
            } else if lower.value > upper.value {
                return Err(BinTableError::Gap {
                    previous,
                    index,
                    upper: upper.value,
                    lower: lower.value,
                });
            } else {
                return Err(BinTableError::Overlap {
                    previous,
                    index,
                    upper: upper.value,
                    lower: lower.value,
                });
            }
        }

        Ok(())
    }

    /// Priority rank of the first bin containing `value`.
    pub fn bin_for(&self, value: f64) -> Option<usize> {
        self.bins.iter().position(|bin| bin.contains(value))
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
