use crate::core::models::plate::PlateDimensions;
use crate::core::models::well::WellCoordinate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LayoutError {
    #[error("{required} wells do not fit on a plate with capacity {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },
    #[error("Well {well} lies outside a {rows}x{columns} destination plate")]
    WellOutOfBounds {
        well: WellCoordinate,
        rows: usize,
        columns: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementMode {
    /// Every bin starts at the top of a fresh column.
    Padded,
    /// One contiguous column-major stream across all bins.
    Compressed,
    /// Each well keeps its source coordinate.
    Unbinned,
}

/// Destination coordinates per bin, in the same order as the input bin sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub mode: PlacementMode,
    pub bins: Vec<Vec<WellCoordinate>>,
}

impl Layout {
    /// All destinations in placement order.
    pub fn destinations(&self) -> impl Iterator<Item = WellCoordinate> + '_ {
        self.bins.iter().flatten().copied()
    }
}

/// Number of columns consumed if every bin is rounded up to whole columns.
pub fn padded_columns(bin_sizes: &[usize], rows: usize) -> usize {
    bin_sizes.iter().map(|&size| size.div_ceil(rows)).sum()
}

/// Chooses padded or compressed placement and assigns destinations column-major.
///
/// Empty bins consume no space in either mode.
pub fn layout(bin_sizes: &[usize], dims: PlateDimensions) -> Result<Layout, LayoutError> {
    let required: usize = bin_sizes.iter().sum();
    let capacity = dims.capacity();
    if required > capacity {
        return Err(LayoutError::CapacityExceeded { required, capacity });
    }

    let rows = dims.rows();
    let mode = if padded_columns(bin_sizes, rows) <= dims.columns() {
        PlacementMode::Padded
    } else {
        PlacementMode::Compressed
    };

    let mut cursor = 0usize;
    let mut bins = Vec::with_capacity(bin_sizes.len());
    for &size in bin_sizes {
        if mode == PlacementMode::Padded && size > 0 {
            cursor = cursor.next_multiple_of(rows);
        }
        let destinations = (cursor..cursor + size)
            .map(|index| dims.coordinate_at(index))
            .collect::<Option<Vec<_>>>()
            .ok_or(LayoutError::CapacityExceeded { required, capacity })?;
        cursor += size;
        bins.push(destinations);
    }

    Ok(Layout { mode, bins })
}
