pub const DEFAULT_REGISTRY: &str = "ghcr.io";
pub const DEFAULT_ORG: &str = "profianinc";

/// Versions carrying this prefix are content digests rather than tags.
pub const DIGEST_PREFIX: &str = "sha256:";

/// Builds `<registry>/<org>/<app>@<digest>` for digests and
/// `<registry>/<org>/<app>:<tag>` for everything else.
pub fn image_reference(registry: &str, org: &str, app: &str, version: &str) -> String {
    let separator = if is_digest(version) { '@' } else { ':' };
    format!("{}/{}/{}{}{}", registry, org, app, separator, version)
}

pub fn is_digest(version: &str) -> bool {
    version.starts_with(DIGEST_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_reference() {
        assert_eq!(
            image_reference(DEFAULT_REGISTRY, DEFAULT_ORG, "app", "2.0.0"),
            "ghcr.io/profianinc/app:2.0.0"
        );
    }

    #[test]
    fn test_digest_reference() {
        assert_eq!(
            image_reference(DEFAULT_REGISTRY, DEFAULT_ORG, "app", "sha256:abcd1234"),
            "ghcr.io/profianinc/app@sha256:abcd1234"
        );
    }

    #[test]
    fn test_prefix_must_be_exact() {
        // only the literal lowercase prefix selects digest form
        assert!(!is_digest("SHA256:abcd"));
        assert!(!is_digest("v1-sha256:abcd"));
        assert_eq!(
            image_reference("registry.local", "acme", "web", "sha512:ff"),
            "registry.local/acme/web:sha512:ff"
        );
    }
}
