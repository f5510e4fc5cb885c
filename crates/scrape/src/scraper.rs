use crate::config::Configuration;
use crate::rule::Rule;
use crate::shape::{Declared, Pointee, Record, Scrape, Shape, TypeIdentity, Wrapped};
use model::{Component, Info, Structure};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};

/// 架构抓取器
///
/// 从根值出发按形状遍历对象图，把自描述或命中规则的记录登记为组件。
pub struct Scraper {
    config: Configuration,
    rules: Vec<Box<dyn Rule>>,
}

impl Scraper {
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            rules: Vec::new(),
        }
    }

    /// 注册规则，按注册顺序匹配，先匹配先得
    pub fn register_rule(&mut self, rule: impl Rule + 'static) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = Box<dyn Rule>>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// 抓取一次，每次调用拥有独立的结构图与访问计数
    pub fn scrape(&self, root: &dyn Scrape) -> Structure {
        let mut run = Run {
            scraper: self,
            structure: Structure::new(),
            visits: HashMap::new(),
            descending: HashSet::new(),
            expanding: HashSet::new(),
        };
        run.visit(root, "", 0);

        info!(
            components = run.structure.components.len(),
            relations = run.structure.relation_count(),
            "scrape finished"
        );
        run.structure
    }

    /// 第一个适用规则给出的 Info，规则看到的是裸类型名
    fn info_from_rules(&self, identity: &TypeIdentity) -> Option<Info> {
        self.rules
            .iter()
            .find(|r| r.applies(identity.namespace, identity.name))
            .map(|r| r.apply(identity.name))
    }
}

/// 单次抓取的状态
struct Run<'s> {
    scraper: &'s Scraper,
    structure: Structure,
    /// 组件 id -> 被分类为组件的次数
    visits: HashMap<String, usize>,
    /// 当前下降路径上的记录 (地址, 身份)
    descending: HashSet<(usize, TypeIdentity)>,
    /// 当前正以零值展开的声明类型
    expanding: HashSet<TypeIdentity>,
}

impl Run<'_> {
    fn visit(&mut self, value: &dyn Scrape, parent_id: &str, level: usize) {
        match value.shape() {
            Shape::Wrapper(wrapped) => self.visit_wrapper(wrapped, parent_id, level),
            Shape::Reference(pointee) => self.visit_reference(pointee, parent_id, level),
            Shape::Map(values) => self.visit_map(values, parent_id, level),
            Shape::Sequence(items) => self.visit_sequence(items, parent_id, level),
            Shape::Function(returns) => self.visit_function(returns, parent_id, level),
            Shape::Record(record) => {
                let address = value as *const dyn Scrape as *const () as usize;
                self.visit_record(address, record, parent_id, level)
            }
            Shape::Scalar => {}
        }
    }

    fn visit_wrapper(&mut self, wrapped: Wrapped<'_>, parent_id: &str, level: usize) {
        match wrapped {
            Wrapped::Held(inner) => self.visit(inner, parent_id, level),
            // 空值只剩声明类型，仅能按规则分类
            Wrapped::Empty(Some(identity)) => self.classify_declared(identity, parent_id, level),
            Wrapped::Empty(None) => {}
        }
    }

    fn visit_reference(&mut self, pointee: Pointee<'_>, parent_id: &str, level: usize) {
        match pointee {
            Pointee::Held(target) => self.visit(target, parent_id, level),
            Pointee::Borrowed(guard) => self.visit(guard.get(), parent_id, level),
            Pointee::Null(declared) => self.visit_declared(declared, parent_id, level),
            Pointee::Unavailable => {
                debug!(parent = parent_id, level, "skipping value that cannot be borrowed");
            }
        }
    }

    fn visit_map<'a>(
        &mut self,
        values: Box<dyn Iterator<Item = &'a dyn Scrape> + 'a>,
        parent_id: &str,
        level: usize,
    ) {
        for value in values {
            self.visit(value, parent_id, level);
        }
    }

    fn visit_sequence<'a>(
        &mut self,
        items: Box<dyn Iterator<Item = &'a dyn Scrape> + 'a>,
        parent_id: &str,
        level: usize,
    ) {
        for item in items {
            self.visit(item, parent_id, level);
        }
    }

    fn visit_function(&mut self, returns: Vec<Declared>, parent_id: &str, level: usize) {
        for declared in returns {
            self.visit_declared(declared, parent_id, level);
        }
    }

    /// 有零值则在占位值上继续，否则按声明类型匹配规则
    fn visit_declared(&mut self, declared: Declared, parent_id: &str, level: usize) {
        match (declared.zeroed, declared.identity) {
            (Some(placeholder), Some(identity)) => {
                // 零值里再次出现同一声明类型时不再展开
                if !self.expanding.insert(identity) {
                    self.classify_declared(identity, parent_id, level);
                    return;
                }
                self.visit(&*placeholder, parent_id, level);
                self.expanding.remove(&identity);
            }
            (Some(placeholder), None) => self.visit(&*placeholder, parent_id, level),
            (None, Some(identity)) => self.classify_declared(identity, parent_id, level),
            (None, None) => {}
        }
    }

    fn visit_record(&mut self, address: usize, record: Record<'_>, parent_id: &str, level: usize) {
        let identity = record.identity;
        if !self.scraper.config.in_scope(identity.namespace) {
            trace!(namespace = identity.namespace, name = identity.name, "out of scope");
            return;
        }

        let info = match record.describe {
            Some(describe) => Some(describe.info()),
            None => self.scraper.info_from_rules(&identity),
        };

        // 已在下降路径上的值: 只登记组件与关系，不再展开
        let key = (address, identity);
        let on_path = self.descending.contains(&key);

        let parent = match info {
            Some(info) => {
                let id = identity.id();
                if !self.admit(&id, &identity) {
                    return;
                }
                self.add_component(&id, &identity, info, parent_id, level);
                id
            }
            None => parent_id.to_string(),
        };

        if on_path {
            trace!(namespace = identity.namespace, name = identity.name, "cycle, not descending");
            return;
        }

        self.descending.insert(key);
        for field in record.fields {
            trace!(field = field.name, level = level + 1, "visiting field");
            self.visit(field.value, &parent, level + 1);
        }
        self.descending.remove(&key);
    }

    /// 无实例可展开的声明类型
    fn classify_declared(&mut self, identity: TypeIdentity, parent_id: &str, level: usize) {
        if !self.scraper.config.in_scope(identity.namespace) {
            return;
        }
        if let Some(info) = self.scraper.info_from_rules(&identity) {
            let id = identity.id();
            if self.admit(&id, &identity) {
                self.add_component(&id, &identity, info, parent_id, level);
            }
        }
    }

    /// 分类计数，超过上限后不再处理该身份
    fn admit(&mut self, id: &str, identity: &TypeIdentity) -> bool {
        let visits = self.visits.entry(id.to_string()).or_insert(0);
        *visits += 1;
        if *visits > self.scraper.config.max_revisits {
            debug!(
                namespace = identity.namespace,
                name = identity.name,
                visits = *visits,
                "revisit limit reached"
            );
            return false;
        }
        true
    }

    fn add_component(
        &mut self,
        id: &str,
        identity: &TypeIdentity,
        mut info: Info,
        parent_id: &str,
        level: usize,
    ) {
        if info.name.is_empty() {
            info.name = identity.qualified_name();
        }
        debug!(id, name = %info.name, parent = parent_id, level, "component");
        self.structure
            .add_component(Component::from_info(id, info), parent_id);
    }
}
