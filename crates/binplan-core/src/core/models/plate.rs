use super::well::WellCoordinate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DimensionError {
    #[error("Plate must have at least one row and one column (got {rows}x{columns})")]
    Empty { rows: usize, columns: usize },
    #[error("Plate dimensions {rows}x{columns} overflow the addressable capacity")]
    Overflow { rows: usize, columns: usize },
}

/// Row and column counts of a destination container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlateDimensions {
    rows: usize,
    columns: usize,
}

impl PlateDimensions {
    pub const PLATE_96: PlateDimensions = PlateDimensions {
        rows: 8,
        columns: 12,
    };
    pub const PLATE_384: PlateDimensions = PlateDimensions {
        rows: 16,
        columns: 24,
    };

    pub fn new(rows: usize, columns: usize) -> Result<Self, DimensionError> {
        if rows == 0 || columns == 0 {
            return Err(DimensionError::Empty { rows, columns });
        }
        if rows.checked_mul(columns).is_none() {
            return Err(DimensionError::Overflow { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.rows * self.columns
    }

    pub fn contains(&self, coordinate: WellCoordinate) -> bool {
        coordinate.row() < self.rows && coordinate.column() < self.columns
    }

    /// Coordinate at a zero-based column-major index, if it lies on the plate.
    pub fn coordinate_at(&self, index: usize) -> Option<WellCoordinate> {
        if index >= self.capacity() {
            return None;
        }
        Some(WellCoordinate::new(index % self.rows, index / self.rows))
    }

    /// Every coordinate of the plate in column-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = WellCoordinate> + '_ {
        (0..self.capacity()).filter_map(|i| self.coordinate_at(i))
    }
}
