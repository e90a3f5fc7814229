//! Plan envelope: one or more operator trees plus the function declarations
//! their expressions reference.

use std::fmt::Write as _;

use relwire_core::config::PlanConfig;
use relwire_core::error::{Error, Result};
use relwire_core::hash::{hash_bytes, Hash256};
use relwire_proto::plan::{Plan, PlanRel, PlanRelType, RelRoot, SimpleExtensionUri, Version};
use relwire_proto::Message;

use crate::extensions::FunctionRegistry;
use crate::rel::RelNode;

/// Anchor of the single extension URI every declaration points at.
pub const EXTENSION_URI_ANCHOR: u32 = 1;

/// A top-level relation. With output names it is encoded as a `RelRoot`,
/// without them as a bare `Rel`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRoot {
    pub rel: RelNode,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanNode {
    roots: Vec<PlanRoot>,
    registry: FunctionRegistry,
    config: PlanConfig,
}

impl PlanNode {
    pub fn roots(&self) -> &[PlanRoot] {
        &self.roots
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn encode(&self) -> Plan {
        let (extension_uris, extensions) = if self.registry.is_empty() {
            (vec![], vec![])
        } else {
            (
                vec![SimpleExtensionUri {
                    extension_uri_anchor: EXTENSION_URI_ANCHOR,
                    uri: self.config.extension_uri.clone(),
                }],
                self.registry.declarations(EXTENSION_URI_ANCHOR),
            )
        };

        let relations = self
            .roots
            .iter()
            .map(|root| {
                let rel = root.rel.encode();
                let rel_type = if root.names.is_empty() {
                    PlanRelType::Rel(rel)
                } else {
                    PlanRelType::Root(RelRoot {
                        input: Some(rel),
                        names: root.names.clone(),
                    })
                };
                PlanRel {
                    rel_type: Some(rel_type),
                }
            })
            .collect();

        Plan {
            extension_uris,
            extensions,
            relations,
            version: Some(self.version()),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode().encode_to_vec()
    }

    /// blake3 over the wire bytes; equal trees give equal fingerprints.
    pub fn fingerprint(&self) -> Hash256 {
        hash_bytes(&self.to_bytes())
    }

    pub fn explain(&self) -> String {
        let mut out = String::new();
        for (anchor, name) in self.registry.iter() {
            let _ = writeln!(out, "fn#{anchor} = {name}");
        }
        for (i, root) in self.roots.iter().enumerate() {
            if root.names.is_empty() {
                let _ = writeln!(out, "relation {i}:");
            } else {
                let _ = writeln!(out, "root {i} names=[{}]:", root.names.join(", "));
            }
            for line in root.rel.explain().lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
        out
    }

    fn version(&self) -> Version {
        let mut parts = relwire_core::VERSION
            .split('.')
            .map(|p| p.parse::<u32>().unwrap_or(0));
        Version {
            major_number: parts.next().unwrap_or(0),
            minor_number: parts.next().unwrap_or(0),
            patch_number: parts.next().unwrap_or(0),
            git_hash: String::new(),
            producer: self.config.producer.clone(),
        }
    }
}

/// Collects roots and function registrations, then validates in `build`.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    config: PlanConfig,
    registry: FunctionRegistry,
    roots: Vec<PlanRoot>,
}

impl PlanBuilder {
    pub fn new(config: PlanConfig) -> Self {
        Self {
            config,
            registry: FunctionRegistry::new(),
            roots: Vec::new(),
        }
    }

    /// Start from an existing registry, keeping its anchors.
    pub fn with_registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Anchor to use in expressions calling `name`.
    pub fn register_function(&mut self, name: &str) -> u32 {
        self.registry.register(name)
    }

    pub fn add_root(&mut self, rel: RelNode, names: Vec<String>) -> &mut Self {
        self.roots.push(PlanRoot { rel, names });
        self
    }

    pub fn add_relation(&mut self, rel: RelNode) -> &mut Self {
        self.add_root(rel, Vec::new())
    }

    pub fn build(self) -> Result<PlanNode> {
        if self.roots.is_empty() {
            return Err(Error::malformed("plan", "no relations"));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            roots = self.roots.len(),
            functions = self.registry.len(),
            "built plan"
        );

        Ok(PlanNode {
            roots: self.roots,
            registry: self.registry,
            config: self.config,
        })
    }
}
