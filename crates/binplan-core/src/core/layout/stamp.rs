use super::binner::{Layout, LayoutError, PlacementMode};
use crate::core::models::plate::PlateDimensions;
use crate::core::models::well::WellCoordinate;

/// Maps every source well onto the same coordinate of the destination plate.
pub fn stamp(sources: &[WellCoordinate], dims: PlateDimensions) -> Result<Layout, LayoutError> {
    let (required, capacity) = (sources.len(), dims.capacity());
    if required > capacity {
        return Err(LayoutError::CapacityExceeded { required, capacity });
    }
    if let Some(&well) = sources.iter().find(|&&c| !dims.contains(c)) {
        return Err(LayoutError::WellOutOfBounds {
            well,
            rows: dims.rows(),
            columns: dims.columns(),
        });
    }
    Ok(Layout {
        mode: PlacementMode::Unbinned,
        bins: vec![sources.to_vec()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_keeps_source_coordinates() {
        let sources: Vec<WellCoordinate> = ["A1", "C1", "B7"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let layout = stamp(&sources, PlateDimensions::PLATE_96).unwrap();
        assert_eq!(layout.mode, PlacementMode::Unbinned);
        assert_eq!(layout.destinations().collect::<Vec<_>>(), sources);
    }

    #[test]
    fn stamp_rejects_wells_off_the_destination_plate() {
        let sources = vec!["I1".parse().unwrap()];
        let result = stamp(&sources, PlateDimensions::PLATE_96);
        assert!(matches!(
            result,
            Err(LayoutError::WellOutOfBounds { rows: 8, columns: 12, .. })
        ));
    }

    #[test]
    fn stamp_checks_capacity_before_bounds() {
        let sources: Vec<WellCoordinate> =
            PlateDimensions::PLATE_384.coordinates().take(100).collect();
        assert_eq!(
            stamp(&sources, PlateDimensions::PLATE_96),
            Err(LayoutError::CapacityExceeded {
                required: 100,
                capacity: 96
            })
        );
    }
}
