use crate::cli::ValidateArgs;
use crate::config::build_config;
use crate::error::Result;
use binplan::engine::config::{BinningMode, PlanConfig};
use tracing::info;

pub fn run(args: ValidateArgs) -> Result<()> {
    info!("Validating configuration...");
    let config = build_config(&args.config)?;
    println!("✓ Configuration is valid: {}", describe(&config));
    Ok(())
}

fn describe(config: &PlanConfig) -> String {
    let binning = match &config.binning {
        BinningMode::Amount(table) => format!("amount binning with {} bin(s)", table.len()),
        other => format!("{} binning", other.name()),
    };
    format!(
        "{}, {}x{} destination plate ({} wells)",
        binning,
        config.destination.rows(),
        config.destination.columns(),
        config.destination.capacity()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;

    #[test]
    fn description_summarises_binning_and_plate() {
        let args = ConfigArgs {
            plate: Some("384".to_string()),
            set_values: vec![
                "policy.type=fixed-volume".to_string(),
                "policy.source-volume=2".to_string(),
                "binning.mode=discrete".to_string(),
            ],
            ..ConfigArgs::default()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(
            describe(&config),
            "discrete binning, 16x24 destination plate (384 wells)"
        );
    }

    #[test]
    fn invalid_configuration_fails_validation() {
        let args = ValidateArgs {
            config: ConfigArgs::default(),
        };
        assert!(run(args).is_err());
    }
}
