use serde::{Deserialize, Serialize};

/// 默认组件类型
pub const KIND_COMPONENT: &str = "component";

/// 自描述能力
///
/// 实现该 trait 的类型直接声明自己的组件信息，优先于规则匹配。
pub trait HasInfo {
    fn info(&self) -> Info;
}

/// 组件信息 - 来自自描述或规则
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// 组件层级 (C4 语义): "component", "container" ...
    pub kind: String,
    pub name: String,
    pub description: String,
    pub technology: String,
    /// 第一个 tag 决定渲染样式
    pub tags: Vec<String>,
}

impl Info {
    /// kind 为 "component" 的组件信息
    pub fn component(name: impl Into<String>) -> Self {
        Self::new(KIND_COMPONENT, name)
    }

    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = technology.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// 未指定 kind 视为空信息
    pub fn is_zero(&self) -> bool {
        self.kind.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_info_has_component_kind() {
        let info = Info::component("shop.OrderService");
        assert_eq!(info.kind, KIND_COMPONENT);
        assert_eq!(info.name, "shop.OrderService");
        assert!(info.tags.is_empty());
        assert!(!info.is_zero());
    }

    #[test]
    fn test_builder_keeps_tag_order() {
        let info = Info::component("db")
            .with_description("primary storage")
            .with_technology("postgres")
            .with_tag("DB")
            .with_tags(["STORAGE", "CORE"]);

        assert_eq!(info.description, "primary storage");
        assert_eq!(info.technology, "postgres");
        assert_eq!(info.tags, vec!["DB", "STORAGE", "CORE"]);
    }

    #[test]
    fn test_default_info_is_zero() {
        assert!(Info::default().is_zero());
        assert!(Info::new("", "named").is_zero());
    }
}
