//! config - YAML 配置文件
//!
//! 一个文件同时描述抓取范围、组件规则和视图

mod color;
mod convert;
mod document;

pub use color::decode_hex_color;
pub use convert::{scraper_from_file, view_from_file, TemplateRule};
pub use document::{
    ComponentConfig, Config, ConfigError, ScrapeSection, RuleConfig, StyleConfig, ViewConfig,
};

pub type Result<T> = std::result::Result<T, ConfigError>;
