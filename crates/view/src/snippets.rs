//! PlantUML 文本片段

use crate::simple::sanitize_id;
use crate::style::{Color, ComponentStyle};
use model::Component;
use std::fmt::Write;

/// 分组矩形的样式 id
pub const GROUP_STYLE: &str = "_GROUP";

const SKINPARAM_DEFAULT: &str = "
skinparam {
  shadowing false
  arrowFontSize 10
  defaultTextAlignment center
  wrapWidth 200
  maxMessageSize 100
}
hide stereotype
top to bottom direction
";

const SCALE: &str = "
scale 4096 width
";

pub fn head(out: &mut String) {
    out.push_str("@startuml\n");
}

pub fn tail(out: &mut String) {
    out.push_str("\n@enduml\n");
}

pub fn title(out: &mut String, title: &str) {
    let _ = writeln!(out, "\ntitle {}", title);
}

/// 全局样式、缩放、分组样式
pub fn preamble(out: &mut String) {
    out.push_str(SKINPARAM_DEFAULT);
    out.push_str(SCALE);
    let _ = write!(
        out,
        "\nskinparam rectangle<<{}>> {{\n  FontColor {}\n  BorderColor {}\n}}\n",
        GROUP_STYLE,
        Color::WHITE,
        Color::WHITE
    );
}

pub fn style(out: &mut String, style: &ComponentStyle) {
    let _ = write!(
        out,
        "\nskinparam {}<<{}>> {{\n  BackgroundColor {}\n  FontColor {}\n  BorderColor {}\n}}\n",
        style.shape, style.id, style.background_color, style.font_color, style.border_color
    );
}

/// 分组包裹的组件声明
pub fn component(out: &mut String, c: &Component, shape: &str, style_id: &str, group: &str) {
    let technology = if c.technology.is_empty() {
        String::new()
    } else {
        format!(":{}", c.technology)
    };
    let _ = write!(
        out,
        "\nrectangle {} <<{}>> {{\n\t{} \"=={}\\n<size:10>[{}{}]</size>\\n\\n{}\" <<{}>> as {}\n}}",
        group,
        GROUP_STYLE,
        shape,
        c.name,
        c.kind,
        technology,
        c.description,
        style_id,
        sanitize_id(&c.id)
    );
}

pub fn connection(out: &mut String, from: &str, to: &str, line_color: Color) {
    let _ = write!(
        out,
        "\n{} .[{}].> {} : \"\"",
        sanitize_id(from),
        line_color,
        sanitize_id(to)
    );
}
