use crate::error::{CliError, Result};
use crate::utils::parser;
use anyhow::anyhow;
use binplan::core::models::well::{ColumnMajorWells, VolumeSplit, Well, WellCoordinate};
use binplan::core::qc::QcRecord;
use binplan::workflows::plan::TransferPlan;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct WellRecord {
    well: String,
    #[serde(default)]
    concentration: Option<f64>,
    #[serde(default)]
    has_sample: Option<String>,
    #[serde(default)]
    value: Option<u32>,
    #[serde(default)]
    sample_volume: Option<f64>,
    #[serde(default)]
    diluent_volume: Option<f64>,
}

impl WellRecord {
    fn into_well(self) -> anyhow::Result<Well> {
        let coordinate: WellCoordinate = self.well.parse()?;
        let mut well = Well::new(coordinate);
        if let Some(concentration) = self.concentration {
            well = well.with_concentration(concentration);
        }
        if let Some(flag) = self.has_sample.as_deref().filter(|f| !f.trim().is_empty()) {
            well = well.with_sample_present(parser::parse_flag(flag)?);
        }
        if let Some(value) = self.value {
            well = well.with_discrete_value(value);
        }
        match (self.sample_volume, self.diluent_volume) {
            (Some(sample), Some(diluent)) => {
                well = well.with_supplied_volumes(VolumeSplit::new(sample, diluent));
            }
            (None, None) => {}
            _ => {
                return Err(anyhow!(
                    "well {coordinate} must supply both sample-volume and diluent-volume, or neither"
                ));
            }
        }
        Ok(well)
    }
}

/// Reads the wells CSV. Rows may come in any order; they are sorted column-major.
pub fn read_wells(path: &Path) -> Result<ColumnMajorWells> {
    let parse_error = |source: anyhow::Error| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| parse_error(e.into()))?;

    let mut wells = Vec::new();
    for (index, record) in reader.deserialize::<WellRecord>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let well = record
            .map_err(anyhow::Error::from)
            .and_then(WellRecord::into_well)
            .map_err(|e| parse_error(anyhow!("line {line}: {e:#}")))?;
        wells.push(well);
    }
    debug!("Read {} well row(s) from {:?}", wells.len(), path);

    ColumnMajorWells::sorted(wells).map_err(|e| parse_error(e.into()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct PlanRow {
    source: String,
    destination: String,
    sample_volume: f64,
    diluent_volume: f64,
    bin: usize,
    colour: Option<u32>,
    pcr_cycles: Option<u32>,
    amount: Option<f64>,
}

/// Writes the plan as a worklist CSV in destination column-major order.
pub fn write_plan<W: Write>(writer: W, plan: &TransferPlan) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for entry in plan.by_destination() {
        csv_writer.serialize(PlanRow {
            source: entry.source.to_string(),
            destination: entry.destination.to_string(),
            sample_volume: entry.volumes.sample_volume,
            diluent_volume: entry.volumes.diluent_volume,
            bin: entry.bin_rank,
            colour: entry.metadata.colour,
            pcr_cycles: entry.metadata.pcr_cycles,
            amount: entry.amount,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_plan_file(path: &Path, plan: &TransferPlan) -> Result<()> {
    let file = File::create(path).map_err(|e| CliError::output(path, e))?;
    write_plan(BufWriter::new(file), plan).map_err(|e| CliError::output(path, e))?;
    info!("Wrote {} transfer(s) to {:?}", plan.len(), path);
    Ok(())
}

pub fn write_qc_file(path: &Path, records: &[QcRecord]) -> Result<()> {
    let file = File::create(path).map_err(|e| CliError::output(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| CliError::output(path, e))?;
    writer.flush().map_err(|e| CliError::output(path, e))?;
    info!("Wrote {} QC record(s) to {:?}", records.len(), path);
    Ok(())
}
