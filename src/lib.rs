#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{
    storage::LocalStorage,
    updater::{PatchUpdater, PlannedUpdate, UpdateOutcome},
};
pub use domain::model::{Container, DeploymentPatch};
pub use utils::error::{Result, UpdateError};
