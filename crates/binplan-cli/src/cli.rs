use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Binplan Developers",
    version,
    about = "binplan CLI - plan dilutions, bins and destination plate layouts for laboratory well transfers.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress bars except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute volumes, bins and destinations for a batch of source wells.
    Plan(PlanArgs),
    /// Load and validate a configuration file without planning any wells.
    Validate(ValidateArgs),
}

/// Configuration sources shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to the planning configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the destination plate: '96', '384' or 'ROWSxCOLUMNS' (e.g. '16x24').
    #[arg(long, value_name = "SIZE")]
    pub plate: Option<String>,

    /// Override the binning mode from the config file.
    #[arg(short, long, value_enum, value_name = "MODE")]
    pub binning: Option<BinningModeArg>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S policy.target-amount=50
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinningModeArg {
    Amount,
    Discrete,
    Unbinned,
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the input wells CSV file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the transfer plan CSV. Written to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path for the QC concentration payload (JSON).
    #[arg(long, value_name = "PATH")]
    pub qc_output: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_arguments_parse_with_repeated_overrides() {
        let cli = Cli::parse_from([
            "binplan",
            "-vv",
            "plan",
            "-i",
            "wells.csv",
            "-c",
            "config.toml",
            "--plate",
            "384",
            "-S",
            "policy.target-amount=40",
            "-S",
            "qc.units=nM",
        ]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.input, PathBuf::from("wells.csv"));
                assert!(args.output.is_none());
                assert_eq!(args.config.plate.as_deref(), Some("384"));
                assert_eq!(args.config.set_values.len(), 2);
            }
            Commands::Validate(_) => panic!("expected 'plan' subcommand"),
        }
    }

    #[test]
    fn binning_mode_override_uses_kebab_case_values() {
        let cli = Cli::parse_from(["binplan", "validate", "--binning", "discrete"]);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.config.binning, Some(BinningModeArg::Discrete));
            }
            Commands::Plan(_) => panic!("expected 'validate' subcommand"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["binplan", "-q", "-v", "validate"]);
        assert!(result.is_err());
    }
}
