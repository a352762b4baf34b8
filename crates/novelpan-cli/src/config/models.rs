use novelpan::core::models::variant::VariantDescriptor;
use novelpan::engine::config::AnalysisConfig;
use novelpan::engine::predictor::CommandPredictor;
use std::path::PathBuf;

pub struct AppConfig {
    pub sequence_path: PathBuf,
    pub sequence_id: Option<String>,
    pub variants: Vec<VariantDescriptor>,
    pub alleles_path: PathBuf,
    pub proteome_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub predictor: CommandPredictor,
    pub core_config: AnalysisConfig,
}
