//! 配置文档结构与加载

use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid color `{0}`, expected rrggbb or rrggbbaa")]
    InvalidColor(String),

    #[error("invalid rule: {0}")]
    Rule(#[from] scrape::RuleError),
}

/// 完整配置文档，所有字段可省略
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub configuration: ScrapeSection,
    pub rules: Vec<RuleConfig>,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSection {
    pub pkgs: Vec<String>,
    /// 缺省为 scrape::DEFAULT_MAX_REVISITS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_revisits: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub pkg_regexps: Vec<String>,
    pub name_regexp: String,
    pub component: ComponentConfig,
}

/// name 中的 `{0}` `{1}` 由捕获组替换
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    pub name: String,
    pub description: String,
    pub technology: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub title: String,
    pub line_color: String,
    pub styles: Vec<StyleConfig>,
    pub component_tags: Vec<String>,
    pub root_component_tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub id: String,
    pub background_color: String,
    pub font_color: String,
    pub border_color: String,
    pub shape: String,
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading configuration");
        Self::parse(&text)
    }

    pub fn load_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// 空文档视为空配置
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(text)?;
        debug!(
            pkgs = config.configuration.pkgs.len(),
            rules = config.rules.len(),
            styles = config.view.styles.len(),
            "configuration parsed"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
configuration:
  pkgs:
    - shop
    - ""
  max_revisits: 20
rules:
  - pkg_regexps: ["^shop"]
    name_regexp: "^(\\w*)Client$"
    component:
      name: "Client{0}"
      description: "remote client"
      technology: "HTTP"
      tags: [CLIENT]
view:
  title: "Shop"
  line_color: 000000ff
  styles:
    - id: CLIENT
      background_color: ffffffff
      font_color: 000000ff
      border_color: 000000ff
      shape: cloud
  component_tags: [CLIENT]
  root_component_tags: [ROOT]
"#;

    #[test]
    fn test_parse_full_document() {
        let config = Config::parse(FULL).unwrap();

        assert_eq!(config.configuration.pkgs, vec!["shop", ""]);
        assert_eq!(config.configuration.max_revisits, Some(20));

        assert_eq!(config.rules.len(), 1);
        let rule = &config.rules[0];
        assert_eq!(rule.pkg_regexps, vec!["^shop"]);
        assert_eq!(rule.name_regexp, r"^(\w*)Client$");
        assert_eq!(rule.component.name, "Client{0}");
        assert_eq!(rule.component.tags, vec!["CLIENT"]);

        assert_eq!(config.view.title, "Shop");
        assert_eq!(config.view.line_color, "000000ff");
        assert_eq!(config.view.styles[0].shape, "cloud");
        assert_eq!(config.view.root_component_tags, vec!["ROOT"]);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
        assert_eq!(Config::parse("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_document() {
        let config = Config::parse("view:\n  title: Only\n").unwrap();
        assert_eq!(config.view.title, "Only");
        assert!(config.rules.is_empty());
        assert!(config.configuration.pkgs.is_empty());
        assert_eq!(config.configuration.max_revisits, None);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::parse("rules: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_from_reader() {
        let config = Config::load_from(FULL.as_bytes()).unwrap();
        assert_eq!(config.view.title, "Shop");
    }
}
