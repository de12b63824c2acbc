use crate::core::updater::PatchUpdater;
use crate::domain::image::{DEFAULT_ORG, DEFAULT_REGISTRY};
use crate::domain::promotion::promotion_targets;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_no_whitespace, validate_non_empty_string, validate_target, Validate,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "patch-updater")]
#[command(about = "Point a deployment patch at a new container image")]
pub struct CliConfig {
    /// Environment directory under apps/, e.g. staging
    pub environment: String,

    /// Application directory under apps/<environment>/, also the image name
    pub app: String,

    /// Image tag, or a digest starting with sha256:
    pub version: String,

    /// Directory that contains apps/
    #[arg(long, env = "PATCH_UPDATER_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    #[arg(long, env = "PATCH_UPDATER_REGISTRY", default_value = DEFAULT_REGISTRY)]
    pub registry: String,

    #[arg(long, env = "PATCH_UPDATER_ORG", default_value = DEFAULT_ORG)]
    pub org: String,

    /// Treat <environment> as the highest environment and update every
    /// environment below it first (production: testing, staging, production)
    #[arg(long)]
    pub promote: bool,

    /// Print the updated document instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn updater(&self) -> PatchUpdater {
        PatchUpdater::local()
            .with_base_dir(self.base_dir.clone())
            .with_registry(self.registry.clone())
            .with_org(self.org.clone())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_target(&self.environment, &self.app, &self.version)?;
        if self.promote {
            promotion_targets(&self.environment)?;
        }
        validate_non_empty_string("registry", &self.registry)?;
        validate_no_whitespace("registry", &self.registry)?;
        validate_non_empty_string("org", &self.org)?;
        validate_no_whitespace("org", &self.org)
    }
}
