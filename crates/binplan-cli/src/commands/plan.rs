use crate::cli::PlanArgs;
use crate::config::build_app_config;
use crate::data;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use binplan::engine::progress::ProgressReporter;
use binplan::workflows::plan::{self, BinSummary};
use std::io;
use tracing::info;

pub fn run(args: PlanArgs, show_progress: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_app_config(&args)?;

    info!("Loading wells from {:?}", &app_config.input_path);
    let wells = data::read_wells(&app_config.input_path)?;

    let progress_handler = CliProgressHandler::new(show_progress);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core planning workflow...");
    let result = plan::run(&wells, &app_config.core_config, &reporter)?;

    match &app_config.output_path {
        Some(path) => {
            data::write_plan_file(path, &result.plan)?;
            println!(
                "✓ Planned {} transfer(s) using {:?} placement, written to: {}",
                result.plan.len(),
                result.plan.mode(),
                path.display()
            );
            for bin in result.plan.bin_summary() {
                println!("  {}", describe_bin(bin));
            }
        }
        None => {
            data::write_plan(io::stdout().lock(), &result.plan).map_err(CliError::Other)?;
        }
    }

    if let Some(path) = &app_config.qc_output_path {
        data::write_qc_file(path, &result.concentrations)?;
        if app_config.output_path.is_some() {
            println!(
                "✓ {} QC record(s) written to: {}",
                result.concentrations.len(),
                path.display()
            );
        }
    }

    Ok(())
}

fn describe_bin(bin: &BinSummary) -> String {
    let mut line = format!("Bin {}: {} well(s)", bin.rank + 1, bin.well_count);
    if let Some(cycles) = bin.metadata.pcr_cycles {
        line.push_str(&format!(", {cycles} PCR cycles"));
    }
    if let Some(colour) = bin.metadata.colour {
        line.push_str(&format!(", colour {colour}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use binplan::core::binning::table::BinMetadata;

    #[test]
    fn bin_description_lists_known_metadata() {
        let bin = BinSummary {
            rank: 0,
            metadata: BinMetadata::new().with_pcr_cycles(16).with_colour(1),
            well_count: 12,
        };
        assert_eq!(describe_bin(&bin), "Bin 1: 12 well(s), 16 PCR cycles, colour 1");

        let bin = BinSummary {
            rank: 2,
            metadata: BinMetadata::new(),
            well_count: 1,
        };
        assert_eq!(describe_bin(&bin), "Bin 3: 1 well(s)");
    }
}
