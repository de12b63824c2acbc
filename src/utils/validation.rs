use crate::utils::error::{Result, UpdateError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UpdateError::usage(format!(
            "{} cannot be empty or whitespace-only",
            field_name
        )));
    }
    Ok(())
}

/// Checks that `value` names exactly one directory below its parent, so a
/// derived path cannot climb out of the `apps/` tree.
pub fn validate_path_component(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if value == "." || value == ".." {
        return Err(UpdateError::usage(format!(
            "{} '{}' is not a directory name",
            field_name, value
        )));
    }

    if let Some(bad) = value.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(UpdateError::usage(format!(
            "{} '{}' contains forbidden character {:?}",
            field_name, value, bad
        )));
    }

    Ok(())
}

pub fn validate_no_whitespace(field_name: &str, value: &str) -> Result<()> {
    if value.chars().any(char::is_whitespace) {
        return Err(UpdateError::usage(format!(
            "{} '{}' cannot contain whitespace",
            field_name, value
        )));
    }
    Ok(())
}

/// Checks the three positional arguments that select and update a patch file.
pub fn validate_target(environment: &str, app: &str, version: &str) -> Result<()> {
    validate_path_component("environment", environment)?;
    validate_path_component("app", app)?;
    validate_non_empty_string("version", version)?;
    validate_no_whitespace("version", version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("version", "1.0.0").is_ok());
        assert!(validate_non_empty_string("version", "").is_err());
        assert!(validate_non_empty_string("version", "   ").is_err());
    }

    #[test]
    fn test_validate_path_component() {
        assert!(validate_path_component("environment", "staging").is_ok());
        assert!(validate_path_component("app", "drawbridge").is_ok());
        assert!(validate_path_component("app", "..").is_err());
        assert!(validate_path_component("app", ".").is_err());
        assert!(validate_path_component("app", "a/b").is_err());
        assert!(validate_path_component("app", "a\\b").is_err());
        assert!(validate_path_component("environment", "").is_err());
    }

    #[test]
    fn test_validate_no_whitespace() {
        assert!(validate_no_whitespace("version", "sha256:abcd").is_ok());
        assert!(validate_no_whitespace("version", "1.0 beta").is_err());
    }

    #[test]
    fn test_validate_target() {
        assert!(validate_target("prod", "app", "sha256:abcd1234").is_ok());
        assert!(validate_target("prod", "../secrets", "1.0.0").is_err());
        assert!(validate_target("prod", "app", "").is_err());
    }
}
