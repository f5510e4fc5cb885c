//! 配置 -> 抓取配置 / 规则 / 视图

use crate::color::decode_hex_color;
use crate::document::{ComponentConfig, Config, RuleConfig, StyleConfig, ViewConfig};
use crate::Result;
use model::{Info, KIND_COMPONENT};
use scrape::{expand_template, Configuration, PatternRule, Rule, RuleBuilder, Scraper};
use std::path::Path;
use tracing::debug;
use view::{ComponentStyle, View};

/// 由配置生成的规则: 组件名按模板展开，其余字段原样复制
#[derive(Debug)]
pub struct TemplateRule {
    component: ComponentConfig,
    inner: PatternRule,
}

impl TemplateRule {
    pub fn from_config(config: &RuleConfig) -> Result<Self> {
        let component = config.component.clone();
        let template = component.clone();
        let inner = RuleBuilder::new()
            .with_pkg_regexps(config.pkg_regexps.iter().cloned())
            .with_name_regexp(config.name_regexp.clone())
            .with_apply_fn(move |name, groups| {
                Info::new(KIND_COMPONENT, expand_template(&template.name, name, groups))
                    .with_description(template.description.clone())
                    .with_technology(template.technology.clone())
                    .with_tags(template.tags.iter().cloned())
            })
            .build()?;
        Ok(Self { component, inner })
    }

    pub fn component(&self) -> &ComponentConfig {
        &self.component
    }
}

impl Rule for TemplateRule {
    fn applies(&self, namespace: &str, name: &str) -> bool {
        self.inner.applies(namespace, name)
    }

    fn apply(&self, name: &str) -> Info {
        self.inner.apply(name)
    }
}

impl Config {
    pub fn to_scraper_config(&self) -> Configuration {
        let mut config = Configuration::new(self.configuration.pkgs.iter().cloned());
        if let Some(max) = self.configuration.max_revisits {
            config = config.with_max_revisits(max);
        }
        config
    }

    /// 按文件中的顺序；任一规则无效即失败
    pub fn to_rules(&self) -> Result<Vec<TemplateRule>> {
        self.rules.iter().map(TemplateRule::from_config).collect()
    }

    pub fn to_scraper(&self) -> Result<Scraper> {
        let rules = self.to_rules()?;
        debug!(rules = rules.len(), "building scraper from configuration");
        Ok(Scraper::new(self.to_scraper_config())
            .with_rules(rules.into_iter().map(|r| Box::new(r) as Box<dyn Rule>)))
    }

    pub fn to_view(&self) -> Result<View> {
        self.view.to_view()
    }
}

impl ViewConfig {
    /// 空标题沿用默认标题，空颜色沿用黑色
    pub fn to_view(&self) -> Result<View> {
        let mut builder = View::builder();
        if !self.title.is_empty() {
            builder = builder.with_title(self.title.clone());
        }
        if !self.line_color.is_empty() {
            builder = builder.with_line_color(decode_hex_color(&self.line_color)?);
        }
        for style in &self.styles {
            builder = builder.with_component_style(style.to_style()?);
        }
        for tag in &self.component_tags {
            builder = builder.with_component_tag(tag.clone());
        }
        for tag in &self.root_component_tags {
            builder = builder.with_root_component_tag(tag.clone());
        }
        Ok(builder.build())
    }
}

impl StyleConfig {
    pub fn to_style(&self) -> Result<ComponentStyle> {
        let mut builder = ComponentStyle::builder(self.id.clone()).with_shape(self.shape.clone());
        if !self.background_color.is_empty() {
            builder = builder.with_background_color(decode_hex_color(&self.background_color)?);
        }
        if !self.font_color.is_empty() {
            builder = builder.with_font_color(decode_hex_color(&self.font_color)?);
        }
        if !self.border_color.is_empty() {
            builder = builder.with_border_color(decode_hex_color(&self.border_color)?);
        }
        Ok(builder.build())
    }
}

pub fn scraper_from_file(path: impl AsRef<Path>) -> Result<Scraper> {
    Config::load_from_file(path)?.to_scraper()
}

pub fn view_from_file(path: impl AsRef<Path>) -> Result<View> {
    Config::load_from_file(path)?.to_view()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use view::Color;

    fn client_rule() -> RuleConfig {
        RuleConfig {
            pkg_regexps: vec!["^shop".to_string()],
            name_regexp: r"^(\w*)Client$".to_string(),
            component: ComponentConfig {
                name: "Client{0}".to_string(),
                description: "remote client".to_string(),
                technology: "HTTP".to_string(),
                tags: vec!["CLIENT".to_string()],
            },
        }
    }

    #[test]
    fn test_template_rule() {
        let rule = TemplateRule::from_config(&client_rule()).unwrap();

        assert!(rule.applies("shop::api", "TestClient"));
        assert!(!rule.applies("vendor", "TestClient"));
        assert!(!rule.applies("shop", "TestServer"));

        let info = rule.apply("TestClient");
        assert_eq!(info.kind, KIND_COMPONENT);
        assert_eq!(info.name, "ClientTest");
        assert_eq!(info.description, "remote client");
        assert_eq!(info.technology, "HTTP");
        assert_eq!(info.tags, vec!["CLIENT"]);
    }

    #[test]
    fn test_empty_template_keeps_matched_name() {
        let mut config = client_rule();
        config.component.name = String::new();
        let rule = TemplateRule::from_config(&config).unwrap();
        assert_eq!(rule.apply("TestClient").name, "TestClient");
    }

    #[test]
    fn test_invalid_rule_pattern() {
        let mut config = client_rule();
        config.name_regexp = "(".to_string();
        let err = TemplateRule::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Rule(_)));
        assert!(err.to_string().contains("`(`"));
    }

    #[test]
    fn test_scraper_config() {
        let mut config = Config::default();
        assert_eq!(config.to_scraper_config(), Configuration::default());

        config.configuration.pkgs = vec!["shop".to_string()];
        config.configuration.max_revisits = Some(5);
        let scraper_config = config.to_scraper_config();
        assert_eq!(scraper_config.packages, vec!["shop"]);
        assert_eq!(scraper_config.max_revisits, 5);
    }

    #[test]
    fn test_to_scraper_keeps_rule_order() {
        let mut config = Config::default();
        config.rules = vec![client_rule(), RuleConfig::default()];
        let scraper = config.to_scraper().unwrap();
        assert_eq!(scraper.rule_count(), 2);
    }

    #[test]
    fn test_to_view() {
        let config = ViewConfig {
            title: "Shop".to_string(),
            line_color: "#ff000080".to_string(),
            styles: vec![StyleConfig {
                id: "DB".to_string(),
                background_color: "ffffffff".to_string(),
                font_color: String::new(),
                border_color: "000000".to_string(),
                shape: "database".to_string(),
            }],
            component_tags: vec!["DB".to_string()],
            root_component_tags: vec!["ROOT".to_string()],
        };

        let view = config.to_view().unwrap();
        assert_eq!(view.title, "Shop");
        assert_eq!(view.line_color, Color::rgb(0xff, 0, 0));
        assert_eq!(view.component_tags, vec!["DB"]);
        assert_eq!(view.root_component_tags, vec!["ROOT"]);

        let style = &view.component_styles["DB"];
        assert_eq!(style.shape, "database");
        assert_eq!(style.background_color, Color::WHITE);
        assert_eq!(style.font_color, Color::BLACK);
    }

    #[test]
    fn test_empty_view_config_is_default_view() {
        assert_eq!(ViewConfig::default().to_view().unwrap(), View::default());
    }

    #[test]
    fn test_invalid_style_color() {
        let style = StyleConfig {
            id: "X".to_string(),
            font_color: "blue".to_string(),
            ..StyleConfig::default()
        };
        assert!(matches!(style.to_style(), Err(ConfigError::InvalidColor(_))));
    }
}
