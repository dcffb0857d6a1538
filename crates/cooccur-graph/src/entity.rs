//! Entities (one per normalized word) and their outgoing weighted links.

use std::collections::BTreeMap;

/// A directed, weighted edge to another entity.
///
/// The target is held by name: entities are owned by the graph's map and a
/// link is only a key into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    target: String,
    weight: u32,
}

impl Link {
    fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            weight: 0,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Number of co-occurrence passes recorded for this pair.
    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// A uniquely named node of the co-occurrence graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    name: String,
    links: BTreeMap<String, Link>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outgoing links keyed (and ordered) by target name.
    pub fn links(&self) -> &BTreeMap<String, Link> {
        &self.links
    }

    pub fn link(&self, target: &str) -> Option<&Link> {
        self.links.get(target)
    }

    /// Strengthen the link to `other` by one, creating it first if needed.
    ///
    /// Linking an entity to itself is a no-op.
    pub fn link_to(&mut self, other: &str) {
        if other == self.name {
            return;
        }
        let link = self
            .links
            .entry(other.to_string())
            .or_insert_with(|| Link::new(other));
        link.weight = link.weight.saturating_add(1);
    }

    /// `link_to` for every element, in order. Repeated names each count.
    pub fn link_to_all<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for other in others {
            self.link_to(other);
        }
    }

    /// Name header followed by one `target (weight)` line per link.
    pub fn describe(&self) -> String {
        let mut out = format!("{}: ", self.name);
        for (target, link) in &self.links {
            out.push('\n');
            out.push_str(target);
            out.push_str(&format!(" ({})", link.weight));
        }
        out
    }

    /// The `n` strongest links, heaviest first.
    ///
    /// Equal weights are ordered by target name ascending.
    pub fn top_relations(&self, n: usize) -> Vec<&Link> {
        let mut ranked: Vec<&Link> = self.links.values().collect();
        ranked.sort_by(|a, b| {
            b.weight
                .cmp(&a.weight)
                .then_with(|| a.target.cmp(&b.target))
        });
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_link_accumulates_in_one_direction_only() {
        let mut a = Entity::new("a");
        let b = Entity::new("b");

        a.link_to("b");
        a.link_to("b");

        assert_eq!(a.link("b").map(Link::weight), Some(2));
        assert!(b.link("a").is_none());
        assert!(b.links().is_empty());
    }

    #[test]
    fn self_link_is_dropped() {
        let mut cat = Entity::new("cat");
        cat.link_to("cat");
        cat.link_to_all(["cat", "cat"]);
        assert!(cat.links().is_empty());
    }

    #[test]
    fn link_to_all_counts_duplicates() {
        let mut cat = Entity::new("cat");
        cat.link_to_all(["cat", "dog", "cat", "dog", "bird"]);
        assert_eq!(cat.link("dog").unwrap().weight(), 2);
        assert_eq!(cat.link("bird").unwrap().weight(), 1);
        assert_eq!(cat.links().len(), 2);
    }

    #[test]
    fn describe_lists_links_in_name_order() {
        let mut e = Entity::new("sun");
        e.link_to_all(["sky", "hot", "sky"]);
        assert_eq!(e.describe(), "sun: \nhot (1)\nsky (2)");
        assert_eq!(Entity::new("alone").describe(), "alone: ");
    }

    #[test]
    fn top_relations_orders_by_weight_then_name() {
        let mut e = Entity::new("x");
        e.link_to_all(["c", "b", "a", "b", "d", "d"]);

        let top: Vec<(&str, u32)> = e
            .top_relations(10)
            .into_iter()
            .map(|l| (l.target(), l.weight()))
            .collect();
        assert_eq!(top, vec![("b", 2), ("d", 2), ("a", 1), ("c", 1)]);

        assert_eq!(e.top_relations(1).len(), 1);
        assert_eq!(e.top_relations(1)[0].target(), "b");
        assert!(e.top_relations(0).is_empty());
    }
}
