pub mod storage;
pub mod updater;

pub use crate::domain::model::{Container, DeploymentPatch};
pub use crate::domain::ports::PatchStore;
pub use crate::utils::error::Result;
