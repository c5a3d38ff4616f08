use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_RENDERED_ITEMS: usize = 6;

/// URL templates used by the annotator. `{url}`, `{handle}` and `{tag}` are
/// substituted with the matched value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTemplates {
    pub url_template: String,
    pub mention_template: String,
    pub hashtag_template: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self {
            url_template: "{url}".to_string(),
            mention_template: "http://www.twitter.com/{handle}".to_string(),
            hashtag_template: "http://search.twitter.com/search?q=%23{tag}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub max_rendered_items: usize,
    /// `{user}` and `{id}` are substituted.
    pub permalink_template: String,
    pub links: LinkTemplates,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_rendered_items: DEFAULT_MAX_RENDERED_ITEMS,
            permalink_template: "http://twitter.com/{user}/statuses/{id}".to_string(),
            links: LinkTemplates::default(),
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` when given, otherwise the user config file if one exists,
    /// otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tweetlist").join("config.toml"))
}

/// Substitute every `{key}` in `template` with its value in a single pass.
/// Unknown placeholders are left as written.
pub(crate) fn expand(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let key = &after[..close];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.max_rendered_items, 6);
        assert_eq!(
            config.links.mention_template,
            "http://www.twitter.com/{handle}"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RenderConfig = toml::from_str(
            r#"
            max_rendered_items = 3

            [links]
            mention_template = "https://x.com/{handle}"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_rendered_items, 3);
        assert_eq!(config.links.mention_template, "https://x.com/{handle}");
        assert_eq!(config.links.url_template, "{url}");
        assert_eq!(
            config.permalink_template,
            "http://twitter.com/{user}/statuses/{id}"
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "permalink_template = \"https://x.com/{{user}}/status/{{id}}\"").unwrap();
        let config = RenderConfig::load(file.path()).unwrap();
        assert_eq!(config.permalink_template, "https://x.com/{user}/status/{id}");
        assert_eq!(config.max_rendered_items, DEFAULT_MAX_RENDERED_ITEMS);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RenderConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_rendered_items = \"six\"").unwrap();
        let err = RenderConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn test_expand() {
        assert_eq!(
            expand("http://twitter.com/{user}/statuses/{id}", &[("user", "bob"), ("id", "42")]),
            "http://twitter.com/bob/statuses/42"
        );
        assert_eq!(expand("{url}", &[("url", "http://a.b")]), "http://a.b");
    }

    #[test]
    fn test_expand_does_not_rescan_values() {
        assert_eq!(
            expand("{user}/{id}", &[("user", "{id}"), ("id", "1")]),
            "{id}/1"
        );
        assert_eq!(expand("{other} {", &[("user", "x")]), "{other} {");
    }
}
