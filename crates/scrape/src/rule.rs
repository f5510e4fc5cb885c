//! 规则引擎 - 无自描述能力时的兜底分类

use model::Info;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid package pattern `{pattern}`: {source}")]
    InvalidPackagePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid name pattern `{pattern}`: {source}")]
    InvalidNamePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("apply function must be provided")]
    MissingApply,
}

pub type Result<T> = std::result::Result<T, RuleError>;

/// 分类规则
///
/// `name` 形如 `module::TypeName`，`namespace` 为完整模块路径。
pub trait Rule {
    fn applies(&self, namespace: &str, name: &str) -> bool;
    fn apply(&self, name: &str) -> Info;
}

/// 规则应用函数: (匹配到的名字, 捕获组) -> Info
pub type ApplyFn = Box<dyn Fn(&str, &[&str]) -> Info + Send + Sync>;

/// 基于正则的规则
///
/// 包正则为空、名字正则为 None 时匹配一切。
pub struct PatternRule {
    pkg_regexes: Vec<Regex>,
    name_regex: Option<Regex>,
    apply_fn: ApplyFn,
}

impl PatternRule {
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    fn pkg_applies(&self, namespace: &str) -> bool {
        self.pkg_regexes.is_empty() || self.pkg_regexes.iter().any(|r| r.is_match(namespace))
    }

    fn name_applies(&self, name: &str) -> bool {
        self.name_regex.as_ref().map_or(true, |r| r.is_match(name))
    }
}

impl Rule for PatternRule {
    fn applies(&self, namespace: &str, name: &str) -> bool {
        self.name_applies(name) && self.pkg_applies(namespace)
    }

    fn apply(&self, name: &str) -> Info {
        if let Some(caps) = self.name_regex.as_ref().and_then(|r| r.captures(name)) {
            if caps.len() > 1 {
                let matched = caps.get(0).map_or(name, |m| m.as_str());
                // 未参与匹配的组记为空串，保持位置
                let groups: Vec<&str> = caps
                    .iter()
                    .skip(1)
                    .map(|g| g.map_or("", |m| m.as_str()))
                    .collect();
                return (self.apply_fn)(matched, &groups);
            }
        }
        (self.apply_fn)(name, &[])
    }
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRule")
            .field("pkg_regexes", &self.pkg_regexes)
            .field("name_regex", &self.name_regex)
            .finish_non_exhaustive()
    }
}

/// PatternRule 构建器
///
/// 未提供的包/名字正则默认匹配一切。
#[derive(Default)]
pub struct RuleBuilder {
    pkg_regexps: Vec<String>,
    name_regexp: String,
    apply_fn: Option<ApplyFn>,
}

impl RuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pkg_regexps<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pkg_regexps.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_name_regexp(mut self, pattern: impl Into<String>) -> Self {
        self.name_regexp = pattern.into();
        self
    }

    pub fn with_apply_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &[&str]) -> Info + Send + Sync + 'static,
    {
        self.apply_fn = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Result<PatternRule> {
        let mut pkg_regexes = Vec::with_capacity(self.pkg_regexps.len());
        for pattern in &self.pkg_regexps {
            let regex = Regex::new(pattern).map_err(|source| RuleError::InvalidPackagePattern {
                pattern: pattern.clone(),
                source,
            })?;
            pkg_regexes.push(regex);
        }

        let name_regex = if self.name_regexp.is_empty() {
            None
        } else {
            let regex = Regex::new(&self.name_regexp).map_err(|source| {
                RuleError::InvalidNamePattern {
                    pattern: self.name_regexp.clone(),
                    source,
                }
            })?;
            Some(regex)
        };

        let apply_fn = self.apply_fn.ok_or(RuleError::MissingApply)?;

        Ok(PatternRule {
            pkg_regexes,
            name_regex,
            apply_fn,
        })
    }
}

/// 名字模板: 空模板沿用匹配到的名字，`{i}` 替换为第 i 个捕获组
///
/// 单遍扫描: 替换进来的捕获组文本不会再被展开，越界的 `{i}` 原样保留
pub fn expand_template(template: &str, matched: &str, groups: &[&str]) -> String {
    if template.is_empty() {
        return matched.to_string();
    }

    let mut name = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        name.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let group = if digits > 0 && after[digits..].starts_with('}') {
            after[..digits].parse::<usize>().ok().and_then(|i| groups.get(i))
        } else {
            None
        };
        match group {
            Some(group) => {
                name.push_str(group);
                rest = &after[digits + 1..];
            }
            None => {
                name.push('{');
                rest = after;
            }
        }
    }
    name.push_str(rest);
    name
}
