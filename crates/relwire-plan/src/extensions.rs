//! Function anchor registry.
//!
//! Expressions refer to functions by a numeric anchor; the plan envelope
//! declares which name each anchor stands for. Anchors are handed out
//! sequentially from 1 in registration order and never change once assigned.

use std::collections::BTreeMap;

use relwire_proto::plan::{ExtensionFunction, MappingType, SimpleExtensionDeclaration};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionRegistry {
    anchors: BTreeMap<String, u32>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor for `name`, registering it on first use.
    pub fn register(&mut self, name: &str) -> u32 {
        if let Some(&anchor) = self.anchors.get(name) {
            return anchor;
        }
        let anchor = self.anchors.len() as u32 + 1;
        self.anchors.insert(name.to_string(), anchor);
        anchor
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.anchors.get(name).copied()
    }

    pub fn name_of(&self, anchor: u32) -> Option<&str> {
        self.anchors
            .iter()
            .find(|(_, &a)| a == anchor)
            .map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// `(anchor, name)` pairs in anchor order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        let mut pairs: Vec<(u32, &str)> = self
            .anchors
            .iter()
            .map(|(n, &a)| (a, n.as_str()))
            .collect();
        pairs.sort_unstable_by_key(|(a, _)| *a);
        pairs.into_iter()
    }

    /// One extension-function declaration per registered name, all pointing
    /// at the extension URI with anchor `uri_anchor`.
    pub fn declarations(&self, uri_anchor: u32) -> Vec<SimpleExtensionDeclaration> {
        self.iter()
            .map(|(anchor, name)| SimpleExtensionDeclaration {
                mapping_type: Some(MappingType::ExtensionFunction(ExtensionFunction {
                    extension_uri_reference: uri_anchor,
                    function_anchor: anchor,
                    name: name.to_string(),
                })),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_are_sequential_and_stable() {
        let mut reg = FunctionRegistry::new();
        assert_eq!(reg.register("gt"), 1);
        assert_eq!(reg.register("and"), 2);
        assert_eq!(reg.register("gt"), 1);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("and"), Some(2));
        assert_eq!(reg.name_of(1), Some("gt"));
        assert_eq!(reg.get("sum"), None);
    }

    #[test]
    fn declarations_follow_anchor_order() {
        let mut reg = FunctionRegistry::new();
        reg.register("lt");
        reg.register("count");
        reg.register("and");
        let decls = reg.declarations(1);
        let names: Vec<(u32, String)> = decls
            .into_iter()
            .map(|d| match d.mapping_type {
                Some(MappingType::ExtensionFunction(f)) => {
                    assert_eq!(f.extension_uri_reference, 1);
                    (f.function_anchor, f.name)
                }
                None => panic!("missing mapping"),
            })
            .collect();
        assert_eq!(
            names,
            vec![(1, "lt".into()), (2, "count".into()), (3, "and".into())]
        );
    }
}
