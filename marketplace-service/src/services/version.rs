//! Version selection and automatic patch bumps.

use semver::{BuildMetadata, Prerelease, Version};

use crate::error::{MarketplaceError, Result};

/// Version recorded for a module created with auto_version and no version.
pub const INITIAL_VERSION: &str = "0.0.0";

fn parse(version: &str) -> Result<Version> {
    Version::parse(version.trim()).map_err(|source| MarketplaceError::VersionFormat {
        version: version.to_string(),
        source,
    })
}

/// Next patch version. Major and minor are untouched; pre-release and build
/// metadata are dropped.
pub fn next_patch(version: &str) -> Result<String> {
    let mut version = parse(version)?;
    version.patch += 1;
    version.pre = Prerelease::EMPTY;
    version.build = BuildMetadata::EMPTY;
    Ok(version.to_string())
}

/// Version to publish when a module is first created.
pub fn version_for_create(version: Option<&str>, auto_version: bool) -> Result<String> {
    match version {
        Some(version) if !version.is_empty() => Ok(version.to_string()),
        _ if auto_version => Ok(INITIAL_VERSION.to_string()),
        _ => Err(MarketplaceError::MissingVersion),
    }
}

/// Version to publish when updating a module whose declared version is `current`.
///
/// With auto_version, `current` must be valid semver: an existing module is
/// never republished at the initial version.
pub fn version_for_update(current: Option<&str>, auto_version: bool) -> Result<String> {
    match (current, auto_version) {
        (current, true) => next_patch(current.unwrap_or_default()),
        (Some(current), false) if !current.is_empty() => Ok(current.to_string()),
        _ => Err(MarketplaceError::MissingVersion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_patch() {
        assert_eq!(next_patch("1.2.3").unwrap(), "1.2.4");
        assert_eq!(next_patch("1.2.9").unwrap(), "1.2.10");
        assert_eq!(next_patch("0.0.0").unwrap(), "0.0.1");
    }

    #[test]
    fn test_next_patch_drops_prerelease() {
        assert_eq!(next_patch("2.0.0-beta.1+build.5").unwrap(), "2.0.1");
    }

    #[test]
    fn test_next_patch_rejects_bad_input() {
        let err = next_patch("bad").unwrap_err();
        assert!(matches!(err, MarketplaceError::VersionFormat { .. }));
        assert!(next_patch("1.2").is_err());
    }

    #[test]
    fn test_version_for_create() {
        assert_eq!(version_for_create(Some("1.0.0"), false).unwrap(), "1.0.0");
        assert_eq!(version_for_create(Some("1.0.0"), true).unwrap(), "1.0.0");
        assert_eq!(version_for_create(None, true).unwrap(), "0.0.0");
        assert!(matches!(
            version_for_create(None, false).unwrap_err(),
            MarketplaceError::MissingVersion
        ));
    }

    #[test]
    fn test_version_for_update() {
        assert_eq!(version_for_update(Some("1.0.0"), true).unwrap(), "1.0.1");
        assert_eq!(version_for_update(Some("1.0.0"), false).unwrap(), "1.0.0");
        assert!(matches!(
            version_for_update(Some("oops"), true).unwrap_err(),
            MarketplaceError::VersionFormat { .. }
        ));
    }

    #[test]
    fn test_auto_version_update_requires_current_version() {
        let err = version_for_update(None, true).unwrap_err();
        assert!(matches!(
            err,
            MarketplaceError::VersionFormat { ref version, .. } if version.is_empty()
        ));
        assert!(matches!(
            version_for_update(None, false).unwrap_err(),
            MarketplaceError::MissingVersion
        ));
    }
}
