use crate::core::storage::LocalStorage;
use crate::domain::image::{image_reference, DEFAULT_ORG, DEFAULT_REGISTRY};
use crate::domain::model::DeploymentPatch;
use crate::domain::ports::PatchStore;
use crate::domain::promotion::promotion_targets;
use crate::utils::error::{Result, UpdateError};
use crate::utils::validation::validate_target;
use std::path::{Path, PathBuf};

pub const APPS_DIR: &str = "apps";
pub const PATCH_FILE_NAME: &str = "patch-deployment.yaml";

/// A fully rendered update that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedUpdate {
    pub path: PathBuf,
    pub previous_image: String,
    pub new_image: String,
    pub document: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub path: PathBuf,
    pub previous_image: String,
    pub new_image: String,
    pub changed: bool,
}

/// Rewrites the first container image of `apps/<environment>/<app>/patch-deployment.yaml`.
pub struct PatchUpdater<S: PatchStore = LocalStorage> {
    storage: S,
    base_dir: PathBuf,
    registry: String,
    org: String,
}

impl PatchUpdater<LocalStorage> {
    pub fn local() -> Self {
        Self::new(LocalStorage::new())
    }
}

impl<S: PatchStore> PatchUpdater<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            base_dir: PathBuf::from("."),
            registry: DEFAULT_REGISTRY.to_string(),
            org: DEFAULT_ORG.to_string(),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = registry.into();
        self
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn patch_path(&self, environment: &str, app: &str) -> PathBuf {
        self.base_dir
            .join(APPS_DIR)
            .join(environment)
            .join(app)
            .join(PATCH_FILE_NAME)
    }

    pub fn image_for(&self, app: &str, version: &str) -> String {
        image_reference(&self.registry, &self.org, app, version)
    }

    /// Reads, parses and rewrites the patch in memory. Nothing is written.
    pub fn plan(&self, environment: &str, app: &str, version: &str) -> Result<PlannedUpdate> {
        validate_target(environment, app, version)?;

        let path = self.patch_path(environment, app);
        tracing::debug!("Reading patch file {}", path.display());

        let content = self.storage.read_to_string(&path)?;
        let mut patch =
            DeploymentPatch::from_yaml_str(&content).map_err(|source| UpdateError::Parse {
                path: path.clone(),
                source,
            })?;

        let new_image = self.image_for(app, version);
        let container = patch
            .primary_container_mut()
            .ok_or_else(|| UpdateError::Precondition {
                path: path.clone(),
                message: "spec.template.spec.containers is empty".to_string(),
            })?;
        let previous_image = std::mem::replace(&mut container.image, new_image.clone());

        let document = patch.to_yaml_string().map_err(UpdateError::Serialize)?;

        Ok(PlannedUpdate {
            path,
            previous_image,
            new_image,
            document,
        })
    }

    /// Applies the update, committing it with a single rename.
    pub fn update(&self, environment: &str, app: &str, version: &str) -> Result<UpdateOutcome> {
        let plan = self.plan(environment, app, version)?;

        self.storage
            .write_atomic(&plan.path, plan.document.as_bytes())?;

        let changed = plan.previous_image != plan.new_image;
        if changed {
            tracing::info!(
                "Updated {}: {} -> {}",
                plan.path.display(),
                plan.previous_image,
                plan.new_image
            );
        } else {
            tracing::info!(
                "{} already references {}",
                plan.path.display(),
                plan.new_image
            );
        }

        Ok(UpdateOutcome {
            path: plan.path,
            previous_image: plan.previous_image,
            new_image: plan.new_image,
            changed,
        })
    }

    /// Plans every environment up to `highest` without writing anything.
    pub fn plan_promotion(
        &self,
        highest: &str,
        app: &str,
        version: &str,
    ) -> Result<Vec<PlannedUpdate>> {
        promotion_targets(highest)?
            .iter()
            .map(|environment| self.plan(environment, app, version))
            .collect()
    }

    /// Updates every environment up to `highest` in promotion order, stopping
    /// at the first failure. Environments already on `version` are reported
    /// with `changed == false`.
    pub fn promote(&self, highest: &str, app: &str, version: &str) -> Result<Vec<UpdateOutcome>> {
        let environments = promotion_targets(highest)?;
        tracing::info!(
            "Promoting {} to {} in {:?}",
            app,
            version,
            environments
        );

        let mut outcomes = Vec::with_capacity(environments.len());
        for environment in environments {
            let outcome = self.update(environment, app, version)?;
            if !outcome.changed {
                tracing::info!("No changes in {}, skipping", environment);
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
