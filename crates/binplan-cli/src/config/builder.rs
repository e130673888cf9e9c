use super::defaults::DefaultsConfig;
use super::file::{
    BinningModeKind, FileBin, FileBinningConfig, FileConfig, FileDestinationConfig,
    FilePolicyConfig, FileQcConfig, PolicyKind,
};
use super::models::AppConfig;
use crate::cli::{BinningModeArg, ConfigArgs, PlanArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use binplan::core::binning::table::{Bin, BinMetadata, BinTable, Bound};
use binplan::core::dilution::policy::DilutionPolicy;
use binplan::core::models::plate::PlateDimensions;
use binplan::core::qc::QcSettings;
use binplan::engine::config::{BinningMode, ConfigError, PlanConfig, PlanConfigBuilder};
use std::str::FromStr;
use tracing::{debug, warn};

pub fn build_app_config(args: &PlanArgs) -> Result<AppConfig> {
    let core_config = build_config(&args.config)?;
    Ok(AppConfig {
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        qc_output_path: args.qc_output.clone(),
        core_config,
    })
}

pub fn build_config(args: &ConfigArgs) -> Result<PlanConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let destination = resolve_destination(
        args.plate.as_deref(),
        file_config.destination.take(),
        &defaults,
    )?;
    let policy = file_config
        .policy
        .take()
        .map(|file| build_policy(file, &defaults))
        .transpose()?;
    let binning = build_binning(
        args.binning,
        file_config.binning.take().unwrap_or_default(),
        &defaults,
    )?;
    let qc = merge_qc(file_config.qc.take().unwrap_or_default(), defaults.qc);

    debug!(
        "Resolved destination {}x{} with {} binning.",
        destination.rows(),
        destination.columns(),
        binning.name()
    );

    let mut builder = PlanConfigBuilder::new()
        .binning(binning)
        .destination(destination)
        .qc(qc);
    if let Some(policy) = policy {
        builder = builder.policy(policy);
    }
    Ok(builder.build()?)
}

fn resolve_destination(
    cli_plate: Option<&str>,
    file: Option<FileDestinationConfig>,
    defaults: &DefaultsConfig,
) -> Result<PlateDimensions> {
    if let Some(plate) = cli_plate {
        return parser::parse_plate_size(plate).map_err(|e| CliError::Argument(e.to_string()));
    }

    let file = file.unwrap_or_default();
    match (file.plate, file.rows, file.columns) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(CliError::Config(
            "Specify either 'destination.plate' or 'destination.rows'/'destination.columns', not both."
                .to_string(),
        )),
        (Some(plate), None, None) => {
            parser::parse_plate_size(&plate).map_err(|e| CliError::Config(e.to_string()))
        }
        (None, Some(rows), Some(columns)) => PlateDimensions::new(rows, columns)
            .map_err(|e| CliError::Plan(e.into())),
        (None, Some(_), None) | (None, None, Some(_)) => Err(CliError::Config(
            "'destination.rows' and 'destination.columns' must be given together.".to_string(),
        )),
        (None, None, None) => {
            parser::parse_plate_size(&defaults.plate).map_err(|e| CliError::Config(e.to_string()))
        }
    }
}

fn require(value: Option<f64>, key: &str) -> Result<f64> {
    value.ok_or_else(|| {
        CliError::Config(format!(
            "A value for '{}' is required by the selected policy type.",
            key
        ))
    })
}

fn reject(value: Option<f64>, key: &str, kind: &str) -> Result<()> {
    match value {
        Some(_) => Err(CliError::Config(format!(
            "'{}' does not apply to {} policies.",
            key, kind
        ))),
        None => Ok(()),
    }
}

fn build_policy(file: FilePolicyConfig, defaults: &DefaultsConfig) -> Result<DilutionPolicy> {
    let kind = file.kind.ok_or_else(|| {
        CliError::Config(
            "Missing 'policy.type' (expected 'target-amount' or 'fixed-volume').".to_string(),
        )
    })?;

    let policy = match kind {
        PolicyKind::TargetAmount => {
            reject(file.source_volume, "policy.source-volume", "target-amount")?;
            reject(file.diluent_volume, "policy.diluent-volume", "target-amount")?;
            DilutionPolicy::target_amount(
                require(file.target_amount, "policy.target-amount")?,
                require(file.target_volume, "policy.target-volume")?,
                require(file.minimum_source_volume, "policy.minimum-source-volume")?,
            )
        }
        PolicyKind::FixedVolume => {
            reject(file.target_amount, "policy.target-amount", "fixed-volume")?;
            reject(file.target_volume, "policy.target-volume", "fixed-volume")?;
            reject(
                file.minimum_source_volume,
                "policy.minimum-source-volume",
                "fixed-volume",
            )?;
            DilutionPolicy::fixed_volume(
                require(file.source_volume, "policy.source-volume")?,
                file.diluent_volume
                    .unwrap_or(defaults.fixed_diluent_volume),
            )
        }
    };
    Ok(policy.map_err(ConfigError::from)?)
}

fn build_binning(
    cli_mode: Option<BinningModeArg>,
    file: FileBinningConfig,
    defaults: &DefaultsConfig,
) -> Result<BinningMode> {
    let mode = match cli_mode {
        Some(BinningModeArg::Amount) => BinningModeKind::Amount,
        Some(BinningModeArg::Discrete) => BinningModeKind::Discrete,
        Some(BinningModeArg::Unbinned) => BinningModeKind::Unbinned,
        None => file.mode.unwrap_or(defaults.binning_mode),
    };

    match mode {
        BinningModeKind::Amount => {
            let bins = file.bins.unwrap_or_default();
            if bins.is_empty() {
                return Err(CliError::Config(
                    "Amount binning requires at least one [[binning.bins]] entry.".to_string(),
                ));
            }
            let bins = bins
                .into_iter()
                .map(|bin| convert_bin(bin, defaults))
                .collect();
            let table = BinTable::new(bins).map_err(ConfigError::from)?;
            Ok(BinningMode::Amount(table))
        }
        BinningModeKind::Discrete | BinningModeKind::Unbinned => {
            if file.bins.is_some_and(|bins| !bins.is_empty()) {
                warn!("Ignoring [[binning.bins]]: they only apply to amount binning.");
            }
            Ok(if mode == BinningModeKind::Discrete {
                BinningMode::Discrete
            } else {
                BinningMode::Unbinned
            })
        }
    }
}

fn convert_bin(bin: FileBin, defaults: &DefaultsConfig) -> Bin {
    let lower = bin.min.map(|value| Bound {
        value,
        inclusive: bin.min_inclusive.unwrap_or(defaults.min_inclusive),
    });
    let upper = bin.max.map(|value| Bound {
        value,
        inclusive: bin.max_inclusive.unwrap_or(defaults.max_inclusive),
    });

    let mut metadata = BinMetadata::new();
    metadata.colour = bin.colour;
    metadata.pcr_cycles = bin.pcr_cycles;
    metadata.attributes = bin.attributes;
    Bin::with_bounds(lower, upper, metadata)
}

fn merge_qc(file: FileQcConfig, defaults: QcSettings) -> QcSettings {
    QcSettings {
        units: file.units.unwrap_or(defaults.units),
        assay_type: file.assay_type.unwrap_or(defaults.assay_type),
        assay_version: file.assay_version.unwrap_or(defaults.assay_version),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", expected, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "destination.plate" => {
                config
                    .destination
                    .get_or_insert_with(Default::default)
                    .plate = Some(value.to_string());
            }
            "destination.rows" => {
                config.destination.get_or_insert_with(Default::default).rows =
                    Some(parse_value(key, value, "integer")?);
            }
            "destination.columns" => {
                config
                    .destination
                    .get_or_insert_with(Default::default)
                    .columns = Some(parse_value(key, value, "integer")?);
            }
            "policy.type" => {
                config.policy.get_or_insert_with(Default::default).kind =
                    Some(value.parse().map_err(CliError::Config)?);
            }
            "policy.target-amount" => {
                config.policy.get_or_insert_with(Default::default).target_amount =
                    Some(parse_value(key, value, "float")?);
            }
            "policy.target-volume" => {
                config.policy.get_or_insert_with(Default::default).target_volume =
                    Some(parse_value(key, value, "float")?);
            }
            "policy.minimum-source-volume" => {
                config
                    .policy
                    .get_or_insert_with(Default::default)
                    .minimum_source_volume = Some(parse_value(key, value, "float")?);
            }
            "policy.source-volume" => {
                config.policy.get_or_insert_with(Default::default).source_volume =
                    Some(parse_value(key, value, "float")?);
            }
            "policy.diluent-volume" => {
                config.policy.get_or_insert_with(Default::default).diluent_volume =
                    Some(parse_value(key, value, "float")?);
            }
            "binning.mode" => {
                config.binning.get_or_insert_with(Default::default).mode =
                    Some(value.parse().map_err(CliError::Config)?);
            }
            "qc.units" => {
                config.qc.get_or_insert_with(Default::default).units = Some(value.to_string());
            }
            "qc.assay-type" => {
                config.qc.get_or_insert_with(Default::default).assay_type =
                    Some(value.to_string());
            }
            "qc.assay-version" => {
                config.qc.get_or_insert_with(Default::default).assay_version =
                    Some(value.to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
