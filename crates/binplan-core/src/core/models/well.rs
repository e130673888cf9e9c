use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CoordinateError {
    #[error("Well coordinate is empty")]
    Empty,
    #[error("Well coordinate '{0}' is missing a row letter")]
    MissingRow(String),
    #[error("Well coordinate '{0}' has a row label that is too long")]
    InvalidRow(String),
    #[error("Well coordinate '{0}' is missing a column number")]
    MissingColumn(String),
    #[error("Well coordinate '{0}' has an invalid column number")]
    InvalidColumn(String),
}

/// An addressable position on a plate, stored zero-based.
///
/// Coordinates order column-major: every row of column 1, then column 2, and
/// so on. The derived ordering relies on `column` being declared before `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WellCoordinate {
    column: usize,
    row: usize,
}

impl WellCoordinate {
    pub fn new(row: usize, column: usize) -> Self {
        Self { column, row }
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Row label in bijective base-26 (`A`..`Z`, `AA`, `AB`, ...).
    pub fn row_label(&self) -> String {
        let mut n = self.row + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }
}

impl fmt::Display for WellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_label(), self.column + 1)
    }
}

impl FromStr for WellCoordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoordinateError::Empty);
        }

        let split = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (letters, digits) = trimmed.split_at(split);

        if letters.is_empty() {
            return Err(CoordinateError::MissingRow(trimmed.to_string()));
        }
        if digits.is_empty() {
            return Err(CoordinateError::MissingColumn(trimmed.to_string()));
        }

        let row = letters
            .bytes()
            .map(|b| (b.to_ascii_uppercase() - b'A') as usize + 1)
            .try_fold(0usize, |acc, d| acc.checked_mul(26)?.checked_add(d))
            .ok_or_else(|| CoordinateError::InvalidRow(trimmed.to_string()))?
            - 1;

        // `usize::from_str` would also accept a sign.
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoordinateError::InvalidColumn(trimmed.to_string()));
        }
        let column: usize = digits
            .parse()
            .map_err(|_| CoordinateError::InvalidColumn(trimmed.to_string()))?;
        if column == 0 {
            return Err(CoordinateError::InvalidColumn(trimmed.to_string()));
        }

        Ok(Self::new(row, column - 1))
    }
}

impl Serialize for WellCoordinate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sample and diluent volumes (µl) for a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VolumeSplit {
    pub sample_volume: f64,
    pub diluent_volume: f64,
}

impl VolumeSplit {
    pub fn new(sample_volume: f64, diluent_volume: f64) -> Self {
        Self {
            sample_volume,
            diluent_volume,
        }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.sample_volume + self.diluent_volume
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Well {
    pub coordinate: WellCoordinate,
    /// Measured concentration in ng/µl.
    pub concentration: Option<f64>,
    pub has_sample: Option<bool>,
    /// Externally supplied discrete attribute, such as a PCR cycle count.
    pub discrete_value: Option<u32>,
    /// Externally supplied volumes that replace the policy-derived split.
    pub supplied_volumes: Option<VolumeSplit>,
}

impl Well {
    pub fn new(coordinate: WellCoordinate) -> Self {
        Self {
            coordinate,
            concentration: None,
            has_sample: None,
            discrete_value: None,
            supplied_volumes: None,
        }
    }

    pub fn with_concentration(mut self, concentration: f64) -> Self {
        self.concentration = Some(concentration);
        self
    }

    pub fn with_sample_present(mut self, present: bool) -> Self {
        self.has_sample = Some(present);
        self
    }

    pub fn with_discrete_value(mut self, value: u32) -> Self {
        self.discrete_value = Some(value);
        self
    }

    pub fn with_supplied_volumes(mut self, volumes: VolumeSplit) -> Self {
        self.supplied_volumes = Some(volumes);
        self
    }

    /// A well is eligible for transfer unless it is explicitly flagged empty.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.has_sample != Some(false)
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum WellOrderError {
    #[error("Well {current} appears after {previous}, breaking column-major order")]
    OutOfOrder {
        previous: WellCoordinate,
        current: WellCoordinate,
    },
    #[error("Well {0} appears more than once")]
    DuplicateWell(WellCoordinate),
}

/// A well sequence guaranteed to be in strictly increasing column-major order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnMajorWells {
    wells: Vec<Well>,
}

impl ColumnMajorWells {
    /// Accepts wells that are already column-major, rejecting anything else.
    pub fn new(wells: Vec<Well>) -> Result<Self, WellOrderError> {
        for pair in wells.windows(2) {
            let (previous, current) = (pair[0].coordinate, pair[1].coordinate);
            match previous.cmp(&current) {
                Ordering::Less => {}
                Ordering::Equal => return Err(WellOrderError::DuplicateWell(current)),
                Ordering::Greater => {
                    return Err(WellOrderError::OutOfOrder { previous, current });
                }
            }
        }
        Ok(Self { wells })
    }

    /// Sorts wells into column-major order. Duplicates are still rejected.
    pub fn sorted(mut wells: Vec<Well>) -> Result<Self, WellOrderError> {
        wells.sort_by_key(|w| w.coordinate);
        Self::new(wells)
    }

    pub fn as_slice(&self) -> &[Well] {
        &self.wells
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Well> {
        self.wells.iter()
    }

    /// The occupied subset. Filtering preserves order, so the invariant holds.
    pub fn occupied(&self) -> ColumnMajorWells {
        Self {
            wells: self.wells.iter().filter(|w| w.is_occupied()).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ColumnMajorWells {
    type Item = &'a Well;
    type IntoIter = std::slice::Iter<'a, Well>;

    fn into_iter(self) -> Self::IntoIter {
        self.wells.iter()
    }
}
