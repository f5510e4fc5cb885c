//! 无样式的简易渲染: 只有节点与边

use model::Structure;
use std::fmt::Write;

/// 非字母数字字符替换为下划线
pub fn sanitize_id(input: &str) -> String {
    input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn escape_label(input: &str) -> String {
    input.replace('\\', "\\\\").replace('"', "\\\"")
}

/// PlantUML 组件 + 箭头
pub fn plantuml_components(structure: &Structure) -> String {
    let mut out = String::from("@startuml\n");
    for c in structure.components.values() {
        let _ = writeln!(out, "component [{}] as {}", c.name, sanitize_id(&c.id));
    }
    for (src, targets) in &structure.relations {
        for trg in targets {
            let _ = writeln!(out, "{} -> {}", sanitize_id(src), sanitize_id(trg));
        }
    }
    out.push_str("@enduml\n");
    out
}

/// Graphviz DOT
pub fn graphviz(structure: &Structure) -> String {
    let mut out = String::from("digraph architecture {\n");
    out.push_str("  node [shape=box];\n");
    for c in structure.components.values() {
        let _ = writeln!(
            out,
            "  {} [label=\"{}\"];",
            sanitize_id(&c.id),
            escape_label(&c.name)
        );
    }
    for (src, targets) in &structure.relations {
        for trg in targets {
            let _ = writeln!(out, "  {} -> {};", sanitize_id(src), sanitize_id(trg));
        }
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Component;

    fn structure() -> Structure {
        let mut s = Structure::new();
        for (id, name, parent) in [("a-1", "shop.Api", ""), ("b.2", "shop.\"Db\"", "a-1")] {
            s.add_component(
                Component {
                    id: id.to_string(),
                    name: name.to_string(),
                    ..Component::default()
                },
                parent,
            );
        }
        s
    }

    #[test]
    fn test_sanitize_id() {
        assert_eq!(sanitize_id("ID_1"), "ID_1");
        assert_eq!(sanitize_id("0tag 1"), "0tag_1");
        assert_eq!(sanitize_id("a::b.c"), "a__b_c");
    }

    #[test]
    fn test_plantuml_components() {
        let out = plantuml_components(&structure());
        assert_eq!(
            out,
            "@startuml\ncomponent [shop.Api] as a_1\ncomponent [shop.\"Db\"] as b_2\na_1 -> b_2\n@enduml\n"
        );
    }

    #[test]
    fn test_graphviz_escapes_labels() {
        let out = graphviz(&structure());
        assert!(out.starts_with("digraph architecture {\n"));
        assert!(out.contains("  b_2 [label=\"shop.\\\"Db\\\"\"];\n"));
        assert!(out.contains("  a_1 -> b_2;\n"));
        assert!(out.ends_with("}\n"));
    }
}
