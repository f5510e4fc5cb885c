//! view - 架构图渲染
//!
//! 分层广度优先展开结构图，输出 PlantUML 组件图

mod diagram;
mod render;
mod simple;
mod snippets;
mod style;

pub use diagram::{View, ViewBuilder, DEFAULT_TITLE};
pub use render::RenderError;
pub use simple::{graphviz, plantuml_components, sanitize_id};
pub use style::{Color, ComponentStyle, ComponentStyleBuilder, DEFAULT_SHAPE, DEFAULT_STYLE};

pub type Result<T> = std::result::Result<T, RenderError>;
