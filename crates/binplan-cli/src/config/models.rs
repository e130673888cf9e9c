use binplan::engine::config::PlanConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub qc_output_path: Option<PathBuf>,
    pub core_config: PlanConfig,
}
