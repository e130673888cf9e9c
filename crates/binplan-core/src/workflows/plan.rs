use crate::core::binning::classify::{
    BinMembers, Classification, ClassifyError, classify_continuous, classify_discrete,
};
use crate::core::binning::table::BinMetadata;
use crate::core::dilution::policy::DilutionPolicy;
use crate::core::dilution::volume::{VolumeError, compute_amount, compute_volume};
use crate::core::layout::binner::{self, Layout, PlacementMode};
use crate::core::layout::stamp::stamp;
use crate::core::models::well::{ColumnMajorWells, VolumeSplit, Well, WellCoordinate};
use crate::core::qc::{QcRecord, destination_concentration};
use crate::engine::config::{BinningMode, PlanConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{PlanPhase, Progress, ProgressReporter};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

/// One source-to-destination transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferPlanEntry {
    pub source: WellCoordinate,
    pub destination: WellCoordinate,
    pub volumes: VolumeSplit,
    pub bin_rank: usize,
    pub metadata: BinMetadata,
    /// `concentration × sample_volume`, when it can be known.
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSummary {
    pub rank: usize,
    pub metadata: BinMetadata,
    pub well_count: usize,
}

/// Transfers keyed by source coordinate, with unique destinations.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPlan {
    mode: PlacementMode,
    entries: BTreeMap<WellCoordinate, TransferPlanEntry>,
    bins: Vec<BinSummary>,
}

impl TransferPlan {
    fn new(
        mode: PlacementMode,
        entries: Vec<TransferPlanEntry>,
        bins: Vec<BinSummary>,
    ) -> Result<Self, EngineError> {
        let mut destinations = BTreeSet::new();
        let mut by_source = BTreeMap::new();
        for entry in entries {
            if !destinations.insert(entry.destination) {
                return Err(EngineError::Internal(format!(
                    "destination {} assigned more than once",
                    entry.destination
                )));
            }
            let source = entry.source;
            if by_source.insert(source, entry).is_some() {
                return Err(EngineError::Internal(format!(
                    "source {source} planned more than once"
                )));
            }
        }
        Ok(Self {
            mode,
            entries: by_source,
            bins,
        })
    }

    pub fn mode(&self) -> PlacementMode {
        self.mode
    }

    pub fn get(&self, source: &WellCoordinate) -> Option<&TransferPlanEntry> {
        self.entries.get(source)
    }

    /// Entries in source column-major order.
    pub fn entries(&self) -> impl Iterator<Item = &TransferPlanEntry> {
        self.entries.values()
    }

    /// Entries in destination column-major order.
    pub fn by_destination(&self) -> Vec<&TransferPlanEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|e| e.destination);
        entries
    }

    pub fn bin_summary(&self) -> &[BinSummary] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    pub plan: TransferPlan,
    /// QC records in destination column-major order.
    pub concentrations: Vec<QcRecord>,
}

struct Dilution {
    volumes: VolumeSplit,
    amount: Option<f64>,
}

#[instrument(skip_all, name = "planning_workflow")]
pub fn run(
    wells: &ColumnMajorWells,
    config: &PlanConfig,
    reporter: &ProgressReporter,
) -> Result<PlanResult, EngineError> {
    let eligible = wells.occupied();
    let skipped = wells.len() - eligible.len();
    if skipped > 0 {
        info!("Skipping {} well(s) flagged as having no sample.", skipped);
    }
    if eligible.is_empty() {
        warn!("No eligible wells to plan.");
        return Err(EngineError::EmptyInput);
    }
    info!(
        "Planning {} well(s) with {} binning onto a {}x{} plate.",
        eligible.len(),
        config.binning.name(),
        config.destination.rows(),
        config.destination.columns()
    );

    // === Phase 1: Volumes and amounts ===
    let dilutions = reporter.phase(PlanPhase::Volumes, || {
        compute_dilutions(&eligible, config, reporter)
    })?;

    // === Phase 2: Classification ===
    let classification = reporter.phase(PlanPhase::Classification, || {
        classify(&eligible, &dilutions, &config.binning)
    })?;
    debug!("Bin sizes in priority order: {:?}", classification.sizes());

    // === Phase 3: Destination layout ===
    let layout = reporter.phase(PlanPhase::Layout, || {
        place(&eligible, &classification, config)
    })?;
    if layout.mode == PlacementMode::Compressed {
        let message = "Padded placement does not fit; bins share columns on the destination plate.";
        warn!("{}", message);
        reporter.report(Progress::Message(message.to_string()));
    }

    let plan = assemble_plan(&eligible, &dilutions, &classification, layout)?;

    // === Phase 4: Destination concentrations ===
    let concentrations = reporter.phase(PlanPhase::Concentrations, || {
        Ok::<_, EngineError>(derive_concentrations(&plan, config))
    })?;

    info!(
        "Planning complete: {} transfer(s) in {} bin(s) using {:?} placement, {} QC record(s).",
        plan.len(),
        plan.bin_summary().len(),
        plan.mode(),
        concentrations.len()
    );
    Ok(PlanResult {
        plan,
        concentrations,
    })
}

fn compute_dilutions(
    wells: &ColumnMajorWells,
    config: &PlanConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Dilution>, EngineError> {
    reporter.report(Progress::WellsStart { total: wells.len() });
    let discrete = matches!(config.binning, BinningMode::Discrete);

    let dilutions = wells
        .iter()
        .map(|well| {
            let volumes = well_volumes(well, &config.policy)?;
            let amount = if discrete && well.concentration.is_none() {
                None
            } else {
                Some(compute_amount(well.concentration, &volumes))
            };
            reporter.report(Progress::WellProcessed {
                well: well.coordinate,
            });
            Ok(Dilution { volumes, amount })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    reporter.report(Progress::WellsFinish);
    Ok(dilutions)
}

fn well_volumes(well: &Well, policy: &DilutionPolicy) -> Result<VolumeSplit, EngineError> {
    if let Some(supplied) = well.supplied_volumes {
        check_supplied_volumes(well.coordinate, &supplied)?;
        if let Some(c) = well.concentration {
            if !c.is_finite() || c < 0.0 {
                return Err(EngineError::InvalidConcentration {
                    well: well.coordinate,
                    value: c,
                });
            }
        }
        return Ok(supplied);
    }
    compute_volume(well.concentration, policy).map_err(|e| match e {
        VolumeError::InvalidConcentration(value) => EngineError::InvalidConcentration {
            well: well.coordinate,
            value,
        },
    })
}

fn check_supplied_volumes(well: WellCoordinate, volumes: &VolumeSplit) -> Result<(), EngineError> {
    let reason = if !volumes.sample_volume.is_finite() || volumes.sample_volume <= 0.0 {
        "sample volume must be positive"
    } else if !volumes.diluent_volume.is_finite() || volumes.diluent_volume < 0.0 {
        "diluent volume must not be negative"
    } else {
        return Ok(());
    };
    Err(EngineError::InvalidSuppliedVolume { well, reason })
}

fn classify(
    wells: &ColumnMajorWells,
    dilutions: &[Dilution],
    mode: &BinningMode,
) -> Result<Classification, EngineError> {
    let wells = wells.as_slice();
    match mode {
        BinningMode::Amount(table) => {
            let amounts: Vec<f64> = dilutions.iter().map(|d| d.amount.unwrap_or(0.0)).collect();
            classify_continuous(&amounts, table).map_err(|e| match e {
                ClassifyError::NoBinFound { index, value } => EngineError::NoBinFound {
                    well: wells[index].coordinate,
                    value,
                },
            })
        }
        BinningMode::Discrete => {
            let values = wells
                .iter()
                .map(|w| {
                    w.discrete_value
                        .ok_or(EngineError::MissingDiscreteValue { well: w.coordinate })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(classify_discrete(&values))
        }
        BinningMode::Unbinned => Ok(Classification {
            bins: vec![BinMembers {
                rank: 0,
                metadata: BinMetadata::new(),
                members: (0..wells.len()).collect(),
            }],
        }),
    }
}

fn place(
    wells: &ColumnMajorWells,
    classification: &Classification,
    config: &PlanConfig,
) -> Result<Layout, EngineError> {
    let layout = match config.binning {
        BinningMode::Unbinned => {
            let sources: Vec<_> = wells.iter().map(|w| w.coordinate).collect();
            stamp(&sources, config.destination)?
        }
        BinningMode::Amount(_) | BinningMode::Discrete => {
            binner::layout(&classification.sizes(), config.destination)?
        }
    };
    debug!("Using {:?} placement.", layout.mode);
    Ok(layout)
}

fn assemble_plan(
    wells: &ColumnMajorWells,
    dilutions: &[Dilution],
    classification: &Classification,
    layout: Layout,
) -> Result<TransferPlan, EngineError> {
    if layout.bins.len() != classification.bins.len() {
        return Err(EngineError::Internal(format!(
            "layout has {} bins but classification has {}",
            layout.bins.len(),
            classification.bins.len()
        )));
    }

    let wells = wells.as_slice();
    let mut entries = Vec::with_capacity(wells.len());
    let mut summary = Vec::new();
    for (bin, destinations) in classification.bins.iter().zip(&layout.bins) {
        if bin.members.len() != destinations.len() {
            return Err(EngineError::Internal(format!(
                "bin {} has {} members but {} destinations",
                bin.rank,
                bin.members.len(),
                destinations.len()
            )));
        }
        if !bin.is_empty() {
            summary.push(BinSummary {
                rank: bin.rank,
                metadata: bin.metadata.clone(),
                well_count: bin.len(),
            });
        }
        for (&index, &destination) in bin.members.iter().zip(destinations) {
            let dilution = &dilutions[index];
            entries.push(TransferPlanEntry {
                source: wells[index].coordinate,
                destination,
                volumes: dilution.volumes,
                bin_rank: bin.rank,
                metadata: bin.metadata.clone(),
                amount: dilution.amount,
            });
        }
    }

    TransferPlan::new(layout.mode, entries, summary)
}

fn derive_concentrations(plan: &TransferPlan, config: &PlanConfig) -> Vec<QcRecord> {
    plan.by_destination()
        .into_iter()
        .filter_map(|entry| {
            let amount = entry.amount?;
            let concentration = destination_concentration(amount, entry.volumes.total());
            Some(QcRecord::concentration(
                entry.destination,
                concentration,
                &config.qc,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binning::table::BinTable;
    use crate::core::models::plate::PlateDimensions;
    use crate::engine::config::PlanConfigBuilder;

    fn coord(s: &str) -> WellCoordinate {
        s.parse().unwrap()
    }

    fn target_policy() -> DilutionPolicy {
        DilutionPolicy::target_amount(50.0, 20.0, 0.2).unwrap()
    }

    fn config(binning: BinningMode) -> PlanConfig {
        PlanConfigBuilder::new()
            .policy(target_policy())
            .binning(binning)
            .destination(PlateDimensions::PLATE_96)
            .build()
            .unwrap()
    }

    fn wells(entries: &[(&str, f64)]) -> ColumnMajorWells {
        ColumnMajorWells::sorted(
            entries
                .iter()
                .map(|&(c, conc)| Well::new(coord(c)).with_concentration(conc))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn supplied_volumes_replace_policy_volumes() {
        let well = Well::new(coord("A1"))
            .with_concentration(50.0)
            .with_supplied_volumes(VolumeSplit::new(5.0, 15.0));
        let volumes = well_volumes(&well, &target_policy()).unwrap();
        assert_eq!(volumes, VolumeSplit::new(5.0, 15.0));
    }

    #[test]
    fn non_positive_supplied_sample_volume_is_rejected() {
        let well = Well::new(coord("B3")).with_supplied_volumes(VolumeSplit::new(0.0, 15.0));
        assert!(matches!(
            well_volumes(&well, &target_policy()),
            Err(EngineError::InvalidSuppliedVolume { .. })
        ));

        let well = Well::new(coord("B3")).with_supplied_volumes(VolumeSplit::new(1.0, -2.0));
        assert!(matches!(
            well_volumes(&well, &target_policy()),
            Err(EngineError::InvalidSuppliedVolume { .. })
        ));
    }

    #[test]
    fn invalid_concentration_names_the_well() {
        let result = run(
            &wells(&[("A1", 10.0), ("B1", -3.0)]),
            &config(BinningMode::Unbinned),
            &ProgressReporter::new(),
        );
        assert_eq!(
            result,
            Err(EngineError::InvalidConcentration {
                well: coord("B1"),
                value: -3.0
            })
        );
    }

    #[test]
    fn unbinned_plan_keeps_source_coordinates() {
        let result = run(
            &wells(&[("A1", 50.0), ("C5", 500.0)]),
            &config(BinningMode::Unbinned),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(result.plan.mode(), PlacementMode::Unbinned);
        for entry in result.plan.entries() {
            assert_eq!(entry.source, entry.destination);
        }
        assert_eq!(result.concentrations.len(), 2);
        assert_eq!(result.concentrations[0].value, "2.500");
    }

    #[test]
    fn bin_summary_skips_empty_bins() {
        let table = BinTable::from_thresholds(
            &[25.0, 500.0],
            vec![
                BinMetadata::new().with_colour(1),
                BinMetadata::new().with_colour(2),
                BinMetadata::new().with_colour(3),
            ],
        )
        .unwrap();
        // Amounts: 10 * 5 = 50 and 20 * 2.5 = 50, both in the middle bin.
        let result = run(
            &wells(&[("A1", 10.0), ("B1", 20.0)]),
            &config(BinningMode::Amount(table)),
            &ProgressReporter::new(),
        )
        .unwrap();

        let summary = result.plan.bin_summary();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].rank, 1);
        assert_eq!(summary[0].well_count, 2);
    }

    #[test]
    fn duplicate_destinations_are_an_internal_error() {
        let entry = |source: &str| TransferPlanEntry {
            source: coord(source),
            destination: coord("A1"),
            volumes: VolumeSplit::new(1.0, 1.0),
            bin_rank: 0,
            metadata: BinMetadata::new(),
            amount: None,
        };
        let result = TransferPlan::new(
            PlacementMode::Padded,
            vec![entry("A1"), entry("B1")],
            Vec::new(),
        );
        assert!(matches!(result, Err(EngineError::Internal(_))));
    }
}
