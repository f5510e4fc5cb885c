use crate::diagram::View;
use crate::simple::sanitize_id;
use crate::snippets;
use crate::style::{DEFAULT_SHAPE, DEFAULT_STYLE};
use model::{Component, Structure};
use std::collections::{BTreeSet, HashSet};
use std::io;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// 单次渲染的状态
struct Layers<'a> {
    view: &'a View,
    structure: &'a Structure,
    out: String,
    excluded: HashSet<&'a str>,
    rendered: HashSet<&'a str>,
    rendered_edges: HashSet<(&'a str, &'a str)>,
    level: usize,
}

impl View {
    /// 渲染到任意 writer，写失败原样返回
    pub fn render_structure_to<W: io::Write>(
        &self,
        structure: &Structure,
        writer: &mut W,
    ) -> crate::Result<()> {
        let out = self.render(structure);
        writer.write_all(out.as_bytes())?;
        Ok(())
    }

    /// 渲染为 PlantUML 文本
    pub fn render(&self, structure: &Structure) -> String {
        let mut out = String::new();
        snippets::head(&mut out);
        snippets::title(&mut out, &self.title);
        snippets::preamble(&mut out);
        for style in self.component_styles.values() {
            snippets::style(&mut out, style);
        }
        out.push_str(&self.render_body(structure));
        snippets::tail(&mut out);
        out
    }

    fn render_body(&self, structure: &Structure) -> String {
        let mut layers = Layers {
            view: self,
            structure,
            out: String::new(),
            excluded: self.excluded_ids(structure),
            rendered: HashSet::new(),
            rendered_edges: HashSet::new(),
            level: 0,
        };

        let mut frontier = layers.render_roots();
        while !frontier.is_empty() {
            layers.level += 1;
            frontier = layers.render_next_layer(&frontier);
        }

        debug!(
            components = layers.rendered.len(),
            edges = layers.rendered_edges.len(),
            levels = layers.level,
            "view rendered"
        );
        layers.out
    }

    fn excluded_ids<'a>(&self, structure: &'a Structure) -> HashSet<&'a str> {
        structure
            .components
            .values()
            .filter(|c| !self.is_visible(&c.tags))
            .map(|c| {
                debug!(id = %c.id, name = %c.name, "component excluded from view");
                c.id.as_str()
            })
            .collect()
    }

    /// (形状, 样式 id): 第一个 tag 决定样式；未登记样式的 tag 仍作为样式 id
    fn resolve_style<'a>(&'a self, c: &'a Component) -> (&'a str, &'a str) {
        match c.tags.first() {
            Some(tag) => {
                let shape = self
                    .component_styles
                    .get(tag)
                    .map_or(DEFAULT_SHAPE, |s| s.shape.as_str());
                (shape, tag.as_str())
            }
            None => (DEFAULT_SHAPE, DEFAULT_STYLE),
        }
    }
}

impl<'a> Layers<'a> {
    fn render_roots(&mut self) -> BTreeSet<&'a str> {
        let structure = self.structure;
        let mut roots = BTreeSet::new();
        for c in structure.components.values() {
            if !self.view.is_root(&c.tags) {
                continue;
            }
            if self.render_component(c, "") {
                debug!(id = %c.id, name = %c.name, "root component");
                roots.insert(c.id.as_str());
            }
        }
        roots
    }

    /// 展开上一层渲染出的组件，返回本层新渲染的组件
    fn render_next_layer(&mut self, previous: &BTreeSet<&'a str>) -> BTreeSet<&'a str> {
        let structure = self.structure;
        let mut next = BTreeSet::new();
        for &src in previous {
            for trg in structure.targets(src) {
                // 悬空关系直接忽略
                let Some(c) = structure.components.get(trg) else {
                    continue;
                };
                if self.render_component(c, src) {
                    next.insert(c.id.as_str());
                }
                self.render_edge(src, c.id.as_str());
            }
        }
        next
    }

    fn render_component(&mut self, c: &'a Component, parent_id: &str) -> bool {
        let id = c.id.as_str();
        if self.excluded.contains(id) || self.rendered.contains(id) {
            return false;
        }

        let (shape, style_id) = self.view.resolve_style(c);
        let group = sanitize_id(&format!("{}{}{}", parent_id, self.level, style_id));
        debug!(id, shape, style = style_id, group = %group, "rendering component");

        snippets::component(&mut self.out, c, shape, style_id, &group);
        self.rendered.insert(id);
        true
    }

    fn render_edge(&mut self, src: &'a str, trg: &'a str) {
        if !self.rendered.contains(trg) || !self.rendered_edges.insert((src, trg)) {
            return;
        }
        snippets::connection(&mut self.out, src, trg, self.view.line_color);
    }
}
