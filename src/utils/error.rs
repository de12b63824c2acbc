use std::path::PathBuf;
use thiserror::Error;

/// The file operation that was in progress when an I/O error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStep {
    Read,
    CreateTemp,
    WriteTemp,
    SyncTemp,
    Rename,
}

impl std::fmt::Display for IoStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let step = match self {
            IoStep::Read => "read patch file",
            IoStep::CreateTemp => "create temp file",
            IoStep::WriteTemp => "write temp file",
            IoStep::SyncTemp => "sync temp file",
            IoStep::Rename => "rename temp file over patch file",
        };
        f.write_str(step)
    }
}

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Invalid arguments: {message}")]
    Usage { message: String },

    #[error("Failed to {step} '{}': {source}", path.display())]
    Io {
        step: IoStep,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize patch document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Precondition failed for '{}': {message}", path.display())]
    Precondition { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Io,
    Parse,
    Serialize,
    Precondition,
}

impl UpdateError {
    pub fn usage(message: impl Into<String>) -> Self {
        UpdateError::Usage {
            message: message.into(),
        }
    }

    pub fn io(step: IoStep, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UpdateError::Io {
            step,
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            UpdateError::Usage { .. } => ErrorCategory::Usage,
            UpdateError::Io { .. } => ErrorCategory::Io,
            UpdateError::Parse { .. } => ErrorCategory::Parse,
            UpdateError::Serialize(_) => ErrorCategory::Serialize,
            UpdateError::Precondition { .. } => ErrorCategory::Precondition,
        }
    }

    /// Process exit status, following sysexits.h.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Usage => 64,
            ErrorCategory::Parse | ErrorCategory::Precondition => 65,
            ErrorCategory::Serialize => 70,
            ErrorCategory::Io => 74,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            UpdateError::Usage { message } => format!("Invalid arguments: {}", message),
            UpdateError::Io { step, path, .. } => {
                format!("Could not {} at {}", step, path.display())
            }
            UpdateError::Parse { path, .. } => {
                format!("{} is not a valid deployment patch", path.display())
            }
            UpdateError::Serialize(_) => "Could not render the updated patch".to_string(),
            UpdateError::Precondition { path, message } => {
                format!("{}: {}", path.display(), message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            UpdateError::Usage { .. } => {
                "Pass <environment> <app> <version>; environment and app must be plain directory names"
            }
            UpdateError::Io {
                step: IoStep::Read, ..
            } => "Check that apps/<environment>/<app>/patch-deployment.yaml exists under --base-dir",
            UpdateError::Io { .. } => "Check permissions and free space in the patch directory",
            UpdateError::Parse { .. } => "Fix the YAML syntax of the patch file",
            UpdateError::Serialize(_) => "Report this as a bug together with the patch file",
            UpdateError::Precondition { .. } => {
                "Add a container entry under spec.template.spec.containers"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, UpdateError>;
