use super::table::{BinMetadata, BinTable};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone, Copy)]
pub enum ClassifyError {
    #[error("No bin found for value {value} (input position {index})")]
    NoBinFound { index: usize, value: f64 },
}

/// The wells of one bin, referenced by their position in the classified input.
#[derive(Debug, Clone, PartialEq)]
pub struct BinMembers {
    pub rank: usize,
    pub metadata: BinMetadata,
    pub members: Vec<usize>,
}

impl BinMembers {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Bins in priority order. Within a bin, members keep their input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Classification {
    pub bins: Vec<BinMembers>,
}

impl Classification {
    pub fn sizes(&self) -> Vec<usize> {
        self.bins.iter().map(BinMembers::len).collect()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(BinMembers::len).sum()
    }
}

/// Assigns each amount to a bin of the table. Every bin of the table appears in
/// the result, empty or not.
pub fn classify_continuous(
    values: &[f64],
    table: &BinTable,
) -> Result<Classification, ClassifyError> {
    let mut bins: Vec<BinMembers> = table
        .bins()
        .iter()
        .enumerate()
        .map(|(rank, bin)| BinMembers {
            rank,
            metadata: bin.metadata.clone(),
            members: Vec::new(),
        })
        .collect();

    for (index, &value) in values.iter().enumerate() {
        let rank = table
            .bin_for(value)
            .ok_or(ClassifyError::NoBinFound { index, value })?;
        bins[rank].members.push(index);
    }

    Ok(Classification { bins })
}

/// Derives bins from the distinct discrete values, highest value first.
///
/// Each derived bin carries `pcr_cycles = value` and `colour = rank + 1`.
pub fn classify_discrete(values: &[u32]) -> Classification {
    let distinct: BTreeSet<u32> = values.iter().copied().collect();

    let mut bins: Vec<BinMembers> = distinct
        .iter()
        .rev()
        .enumerate()
        .map(|(rank, &value)| BinMembers {
            rank,
            metadata: BinMetadata::new()
                .with_pcr_cycles(value)
                .with_colour(rank as u32 + 1),
            members: Vec::new(),
        })
        .collect();

    for (index, value) in values.iter().enumerate() {
        if let Some(bin) = bins
            .iter_mut()
            .find(|bin| bin.metadata.pcr_cycles == Some(*value))
        {
            bin.members.push(index);
        }
    }

    Classification { bins }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binning::table::Bin;

    fn table() -> BinTable {
        BinTable::new(vec![
            Bin::new(None, Some(25.0), BinMetadata::new().with_pcr_cycles(16)),
            Bin::new(
                Some(25.0),
                Some(500.0),
                BinMetadata::new().with_pcr_cycles(12),
            ),
            Bin::new(Some(500.0), None, BinMetadata::new().with_pcr_cycles(8)),
        ])
        .unwrap()
    }

    #[test]
    fn continuous_partition_is_stable_within_each_bin() {
        let amounts = [600.0, 10.0, 30.0, 5.0, 700.0, 40.0];
        let classification = classify_continuous(&amounts, &table()).unwrap();

        assert_eq!(classification.bins[0].members, vec![1, 3]);
        assert_eq!(classification.bins[1].members, vec![2, 5]);
        assert_eq!(classification.bins[2].members, vec![0, 4]);
        assert_eq!(classification.sizes(), vec![2, 2, 2]);
        assert_eq!(classification.total(), amounts.len());
    }

    #[test]
    fn continuous_keeps_empty_bins_in_priority_order() {
        let classification = classify_continuous(&[1.0, 2.0], &table()).unwrap();
        assert_eq!(classification.sizes(), vec![2, 0, 0]);
        assert_eq!(
            classification.bins[2].metadata,
            BinMetadata::new().with_pcr_cycles(8)
        );
    }

    #[test]
    fn continuous_reports_values_inside_a_gap() {
        let gapped = BinTable::unvalidated(vec![
            Bin::new(None, Some(25.0), BinMetadata::new()),
            Bin::new(Some(30.0), None, BinMetadata::new()),
        ]);
        let result = classify_continuous(&[10.0, 27.5, 40.0], &gapped);
        assert_eq!(
            result,
            Err(ClassifyError::NoBinFound {
                index: 1,
                value: 27.5
            })
        );
    }

    #[test]
    fn continuous_never_matches_nan() {
        let result = classify_continuous(&[f64::NAN], &table());
        assert!(matches!(result, Err(ClassifyError::NoBinFound { index: 0, .. })));
    }

    #[test]
    fn discrete_orders_bins_by_descending_value() {
        let cycles = [12, 16, 12, 8, 16, 12];
        let classification = classify_discrete(&cycles);

        let order: Vec<_> = classification
            .bins
            .iter()
            .map(|b| b.metadata.pcr_cycles.unwrap())
            .collect();
        assert_eq!(order, vec![16, 12, 8]);
        assert_eq!(classification.bins[0].members, vec![1, 4]);
        assert_eq!(classification.bins[1].members, vec![0, 2, 5]);
        assert_eq!(classification.bins[2].members, vec![3]);
    }

    #[test]
    fn discrete_assigns_colour_by_rank() {
        let classification = classify_discrete(&[5, 9]);
        assert_eq!(classification.bins[0].metadata.colour, Some(1));
        assert_eq!(classification.bins[0].metadata.pcr_cycles, Some(9));
        assert_eq!(classification.bins[1].metadata.colour, Some(2));
    }

    #[test]
    fn discrete_on_empty_input_has_no_bins() {
        assert!(classify_discrete(&[]).bins.is_empty());
    }
}
