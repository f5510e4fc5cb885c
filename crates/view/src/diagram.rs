use crate::style::{Color, ComponentStyle};
use std::collections::BTreeMap;

pub const DEFAULT_TITLE: &str = "TITLE UNDEFINED";

/// 视图配置
///
/// - root_component_tags: 非空时只从带这些 tag 的组件开始展开
/// - component_tags: 非空时只显示带这些 tag 的组件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub title: String,
    pub root_component_tags: Vec<String>,
    pub component_tags: Vec<String>,
    pub component_styles: BTreeMap<String, ComponentStyle>,
    pub line_color: Color,
}

impl Default for View {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            root_component_tags: Vec::new(),
            component_tags: Vec::new(),
            component_styles: BTreeMap::new(),
            line_color: Color::BLACK,
        }
    }
}

impl View {
    pub fn builder() -> ViewBuilder {
        ViewBuilder::default()
    }

    pub(crate) fn is_root(&self, tags: &[String]) -> bool {
        self.root_component_tags.is_empty() || any_shared(&self.root_component_tags, tags)
    }

    pub(crate) fn is_visible(&self, tags: &[String]) -> bool {
        self.component_tags.is_empty() || any_shared(&self.component_tags, tags)
    }
}

fn any_shared(wanted: &[String], tags: &[String]) -> bool {
    wanted.iter().any(|w| tags.contains(w))
}

#[derive(Default)]
pub struct ViewBuilder {
    view: View,
}

impl ViewBuilder {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.view.title = title.into();
        self
    }

    pub fn with_root_component_tag(mut self, tag: impl Into<String>) -> Self {
        self.view.root_component_tags.push(tag.into());
        self
    }

    pub fn with_component_tag(mut self, tag: impl Into<String>) -> Self {
        self.view.component_tags.push(tag.into());
        self
    }

    /// 同 id 的样式后者覆盖前者
    pub fn with_component_style(mut self, style: ComponentStyle) -> Self {
        self.view.component_styles.insert(style.id.clone(), style);
        self
    }

    pub fn with_line_color(mut self, color: Color) -> Self {
        self.view.line_color = color;
        self
    }

    pub fn build(self) -> View {
        self.view
    }
}
