//! 抓取配置

/// 默认的同一身份最大访问次数
pub const DEFAULT_MAX_REVISITS: usize = 100;

/// 抓取配置
///
/// packages 为命名空间前缀；不匹配任何前缀的记录连同其字段一起被跳过。
/// 未配置任何前缀时抓取在根节点即停止。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub packages: Vec<String>,
    pub max_revisits: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            max_revisits: DEFAULT_MAX_REVISITS,
        }
    }
}

impl Configuration {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_max_revisits(mut self, max: usize) -> Self {
        self.max_revisits = max;
        self
    }

    /// 字面前缀匹配
    pub fn in_scope(&self, namespace: &str) -> bool {
        self.packages.iter().any(|p| namespace.starts_with(p.as_str()))
    }
}
