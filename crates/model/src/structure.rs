use crate::info::Info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;

const CHECKSUM_VERSION: &str = "v1";

/// 内容哈希 (SHA256 前16位)
pub fn hash(s: &str) -> String {
    let digest = Sha256::digest(s.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    format!("{:016x}", u64::from_be_bytes(head))
}

/// 组件 - 结构图中的节点，代表一个类型而非实例
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub description: String,
    pub technology: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Component {
    pub fn from_info(id: impl Into<String>, info: Info) -> Self {
        Self {
            id: id.into(),
            kind: info.kind,
            name: info.name,
            description: info.description,
            technology: info.technology,
            tags: info.tags,
        }
    }
}

/// 架构结构图
///
/// components: id -> Component
/// relations: 父组件 id -> 子组件 id 集合 (目标不一定存在于 components)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub components: BTreeMap<String, Component>,
    #[serde(default)]
    pub relations: BTreeMap<String, BTreeSet<String>>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按 id 覆盖写入组件，并建立来自 parent_id 的关系
    ///
    /// parent_id 为空时不建立关系。
    pub fn add_component(&mut self, component: Component, parent_id: &str) {
        let id = component.id.clone();
        self.components.insert(id.clone(), component);
        if !parent_id.is_empty() {
            self.relations
                .entry(parent_id.to_string())
                .or_default()
                .insert(id);
        }
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// 某组件的所有关系目标 (按 id 排序)
    pub fn targets<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a String> + 'a {
        self.relations.get(id).into_iter().flatten()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.relations.is_empty()
    }

    /// 与构建顺序、tag 顺序无关的校验和
    pub fn checksum(&self) -> Result<String> {
        let mut hasher = Sha256::new();

        // BTreeMap 按 id 有序
        for component in self.components.values() {
            let mut normalized = component.clone();
            normalized.tags.sort();
            hasher.update(serde_json::to_vec(&normalized)?);
        }

        let sources: BTreeSet<&String> = self
            .components
            .keys()
            .chain(self.relations.keys())
            .collect();
        for source in sources {
            for target in self.targets(source) {
                // 每条关系独立编码，id 中的任意字符都不会造成拼接歧义
                hasher.update(serde_json::to_vec(&(source, target))?);
                hasher.update(b"\n");
            }
        }

        let digest = hasher.finalize();
        let hex: String = digest[..16].iter().map(|b| format!("{:02x}", b)).collect();
        Ok(format!("{}_{}", CHECKSUM_VERSION, hex))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(id: &str, tags: &[&str]) -> Component {
        Component {
            id: id.to_string(),
            kind: "component".to_string(),
            name: "test.Component".to_string(),
            description: "description".to_string(),
            technology: "technology".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn simple_structure() -> Structure {
        let mut s = Structure::new();
        s.add_component(component("ID_1", &["TAG_1"]), "");
        s.add_component(component("ID_2", &["TAG_2"]), "ID_1");
        s.add_component(component("ID_3", &["TAG_1", "TAG_2"]), "ID_1");
        s.relations.entry("ID_2".into()).or_default().insert("ID_3".into());
        s
    }

    fn simple_structure_with_different_orders() -> Structure {
        let mut s = Structure::new();
        s.add_component(component("ID_3", &["TAG_2", "TAG_1"]), "");
        s.add_component(component("ID_2", &["TAG_2"]), "");
        s.add_component(component("ID_1", &["TAG_1"]), "");
        s.relations.entry("ID_2".into()).or_default().insert("ID_3".into());
        s.relations.entry("ID_1".into()).or_default().insert("ID_3".into());
        s.relations.entry("ID_1".into()).or_default().insert("ID_2".into());
        s
    }

    #[test]
    fn test_hash_is_stable_and_short() {
        let a = hash("shop::orders.OrderService");
        assert_eq!(a, hash("shop::orders.OrderService"));
        assert_eq!(a.len(), 16);
        assert_ne!(a, hash("shop::orders.OrderRepository"));
    }

    #[test]
    fn test_add_component_creates_relation() {
        let mut s = Structure::new();
        s.add_component(component("A", &[]), "");
        s.add_component(component("B", &[]), "A");

        assert_eq!(s.components.len(), 2);
        assert!(s.relations.get("").is_none());
        assert_eq!(s.targets("A").collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_add_component_is_idempotent() {
        let mut s = Structure::new();
        s.add_component(component("A", &[]), "");
        s.add_component(component("B", &[]), "A");
        s.add_component(component("B", &["NEW"]), "A");

        assert_eq!(s.components.len(), 2);
        assert_eq!(s.relation_count(), 1);
        assert_eq!(s.components["B"].tags, vec!["NEW"]);
    }

    #[test]
    fn test_relation_to_unknown_parent_is_kept() {
        let mut s = Structure::new();
        s.add_component(component("B", &[]), "MISSING");
        assert_eq!(s.targets("MISSING").count(), 1);
        assert!(s.component("MISSING").is_none());
    }

    #[test]
    fn test_checksum_empty_structures_match() {
        let empty = Structure::default().checksum().unwrap();
        assert_eq!(empty, Structure::new().checksum().unwrap());
        assert!(empty.starts_with("v1_"));
        assert_eq!(empty.len(), "v1_".len() + 32);
    }

    #[test]
    fn test_checksum_ignores_orders() {
        let a = simple_structure().checksum().unwrap();
        let b = simple_structure_with_different_orders().checksum().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_checksum_detects_changes() {
        let base = simple_structure();

        let mut extra_relation = base.clone();
        extra_relation.add_component(component("ID_1", &["TAG_1"]), "ID_3");
        assert_ne!(base.checksum().unwrap(), extra_relation.checksum().unwrap());

        let mut renamed = base.clone();
        if let Some(c) = renamed.components.get_mut("ID_2") {
            c.name = "test.Renamed".to_string();
        }
        assert_ne!(base.checksum().unwrap(), renamed.checksum().unwrap());
    }

    #[test]
    fn test_checksum_separates_relation_pairs() {
        let mut split = Structure::new();
        split.relations.entry("a".into()).or_default().insert("b".into());
        split.relations.entry("c".into()).or_default().insert("d".into());

        let mut joined = Structure::new();
        joined.relations.entry("a".into()).or_default().insert("bc-d".into());

        let mut dashed = Structure::new();
        dashed.relations.entry("a-b".into()).or_default().insert("c".into());
        let mut dashed_other = Structure::new();
        dashed_other.relations.entry("a".into()).or_default().insert("b-c".into());

        assert_ne!(split.checksum().unwrap(), joined.checksum().unwrap());
        assert_ne!(dashed.checksum().unwrap(), dashed_other.checksum().unwrap());
    }

    #[test]
    fn test_json_snapshot_preserves_checksum() {
        let s = simple_structure();
        let restored = Structure::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(s, restored);
        assert_eq!(s.checksum().unwrap(), restored.checksum().unwrap());
    }

    #[test]
    fn test_from_json_accepts_missing_sections() {
        let s = Structure::from_json("{}").unwrap();
        assert!(s.is_empty());
    }
}
