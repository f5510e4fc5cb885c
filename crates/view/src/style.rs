//! 颜色与组件样式

use std::fmt;

/// 未登记样式时的形状
pub const DEFAULT_SHAPE: &str = "rectangle";
/// 无 tag 组件的样式 id
pub const DEFAULT_STYLE: &str = "DEFAULT";

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// "#rrggbb"
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 组件样式，作用于第一个 tag 等于 id 的组件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStyle {
    pub id: String,
    pub background_color: Color,
    pub font_color: Color,
    pub border_color: Color,
    /// PlantUML 形状: rectangle, component, database ...
    pub shape: String,
}

impl ComponentStyle {
    pub fn builder(id: impl Into<String>) -> ComponentStyleBuilder {
        ComponentStyleBuilder::new(id)
    }
}

pub struct ComponentStyleBuilder {
    style: ComponentStyle,
}

impl ComponentStyleBuilder {
    /// 默认白底黑字黑边矩形
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            style: ComponentStyle {
                id: id.into(),
                background_color: Color::WHITE,
                font_color: Color::BLACK,
                border_color: Color::BLACK,
                shape: DEFAULT_SHAPE.to_string(),
            },
        }
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.style.background_color = color;
        self
    }

    pub fn with_font_color(mut self, color: Color) -> Self {
        self.style.font_color = color;
        self
    }

    pub fn with_border_color(mut self, color: Color) -> Self {
        self.style.border_color = color;
        self
    }

    /// 空字符串保留默认形状
    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        let shape = shape.into();
        if !shape.is_empty() {
            self.style.shape = shape;
        }
        self
    }

    pub fn build(self) -> ComponentStyle {
        self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::BLACK.to_hex(), "#000000");
        assert_eq!(Color::WHITE.to_hex(), "#ffffff");
        assert_eq!(Color::rgb(0x0a, 0xbc, 0x01).to_string(), "#0abc01");
    }

    #[test]
    fn test_style_defaults() {
        let style = ComponentStyle::builder("DB").build();
        assert_eq!(style.id, "DB");
        assert_eq!(style.background_color, Color::WHITE);
        assert_eq!(style.font_color, Color::BLACK);
        assert_eq!(style.border_color, Color::BLACK);
        assert_eq!(style.shape, DEFAULT_SHAPE);
    }

    #[test]
    fn test_empty_shape_keeps_default() {
        let style = ComponentStyle::builder("X").with_shape("").build();
        assert_eq!(style.shape, "rectangle");

        let style = ComponentStyle::builder("X").with_shape("database").build();
        assert_eq!(style.shape, "database");
    }
}
