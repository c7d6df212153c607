use std::env;

use crate::error::ManifestError;

/// Destination object-store settings. All configuration is
/// environment-driven; the binary takes no functional flags.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub path_style: bool,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ManifestError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Pure resolver; tests drive it without touching the process
    /// environment.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ManifestError> {
        Ok(Self {
            endpoint: lookup("S3_ENDPOINT"),
            region: lookup("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            bucket: lookup("S3_BUCKET").unwrap_or_else(|| "melodi".to_string()),
            access_key: lookup("ACCESS_KEY").ok_or(ManifestError::MissingEnv("ACCESS_KEY"))?,
            secret_key: lookup("SECRET_KEY").ok_or(ManifestError::MissingEnv("SECRET_KEY"))?,
            path_style: lookup("S3_PATH_STYLE")
                .and_then(|value| value.parse().ok())
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|value| value.to_string())
    }

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("ACCESS_KEY", "key"),
            ("SECRET_KEY", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, None);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.bucket, "melodi");
        assert!(!config.path_style);
    }

    #[test]
    fn full_environment_is_honored() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("S3_REGION", "eu-west-3"),
            ("S3_BUCKET", "catalog"),
            ("ACCESS_KEY", "key"),
            ("SECRET_KEY", "secret"),
            ("S3_PATH_STYLE", "true"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.region, "eu-west-3");
        assert_eq!(config.bucket, "catalog");
        assert!(config.path_style);
    }

    #[test]
    fn missing_credentials_fail_fast() {
        let err = StoreConfig::from_lookup(lookup_from(&[("ACCESS_KEY", "key")])).unwrap_err();
        assert_matches!(err, ManifestError::MissingEnv("SECRET_KEY"));
    }
}
