use crate::config::schema::{SnipConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config from {}: {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(f, "failed to parse config TOML ({}): {}", path.display(), source),
                None => write!(f, "failed to parse config TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid config ({}): {}", path.display(), source),
                None => write!(f, "invalid config: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<SnipConfig, ConfigError> {
    let config: SnipConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<SnipConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ValidationIssue;

    #[test]
    fn loads_roots_and_languages() {
        let config = load_from_str(
            r#"
[sources]
roots = ["src", "../shared"]

[languages]
dotnet = "csharp"
"#,
        )
        .unwrap();

        assert_eq!(config.sources.roots, vec!["src", "../shared"]);
        let roots = config.source_roots(Path::new("/repo/docs"));
        assert_eq!(roots[0], Path::new("/repo/docs/src"));

        let registry = config.registry();
        assert_eq!(registry.resolve("dotnet"), Some("csharp"));
    }

    #[test]
    fn empty_config_is_valid() {
        let config = load_from_str("").unwrap();
        assert!(config.sources.roots.is_empty());
        assert!(config.languages.is_empty());
    }

    #[test]
    fn validation_collects_every_issue() {
        let err = load_from_str(
            r#"
[sources]
roots = ["  "]

[languages]
py = "python"
"#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation { source, .. } => {
                assert_eq!(
                    source.issues,
                    vec![
                        ValidationIssue::BlankRoot { index: 0 },
                        ValidationIssue::UnknownExtractor {
                            tag: "py".to_string(),
                            target: "python".to_string(),
                        },
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = load_from_str("[sources]\nroot = [\"src\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn path_is_attached_to_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codesnip.toml");
        fs::write(&path, "[sources]\nroots = 3\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("codesnip.toml"));

        let missing = load_from_path(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
