//! `substrait.Plan` envelope and simple extension declarations.

use serde::Serialize;

use crate::rel::Rel;
use crate::wire::{self, Message, WireBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    pub extension_uris: Vec<SimpleExtensionUri>,
    pub extensions: Vec<SimpleExtensionDeclaration>,
    pub relations: Vec<PlanRel>,
    pub version: Option<Version>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanRel {
    pub rel_type: Option<PlanRelType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlanRelType {
    /// A relation without output names (e.g. a shared subtree).
    Rel(Rel),
    Root(RelRoot),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelRoot {
    pub input: Option<Rel>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimpleExtensionUri {
    pub extension_uri_anchor: u32,
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimpleExtensionDeclaration {
    pub mapping_type: Option<MappingType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MappingType {
    ExtensionFunction(ExtensionFunction),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionFunction {
    pub extension_uri_reference: u32,
    pub function_anchor: u32,
    /// Compound name, e.g. `equal:any_any`, or a plain function name.
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major_number: u32,
    pub minor_number: u32,
    pub patch_number: u32,
    pub git_hash: String,
    pub producer: String,
}

impl Message for Plan {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::repeated_message(1, &self.extension_uris, buf);
        wire::repeated_message(2, &self.extensions, buf);
        wire::repeated_message(3, &self.relations, buf);
        wire::optional_message(6, self.version.as_ref(), buf);
    }
}

impl Message for PlanRel {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        match &self.rel_type {
            Some(PlanRelType::Rel(r)) => wire::message(1, r, buf),
            Some(PlanRelType::Root(r)) => wire::message(2, r, buf),
            None => {}
        }
    }
}

impl Message for RelRoot {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        wire::optional_message(1, self.input.as_ref(), buf);
        wire::repeated_string(2, &self.names, buf);
    }
}

impl Message for SimpleExtensionUri {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.extension_uri_anchor != 0 {
            wire::uint32(1, self.extension_uri_anchor, buf);
        }
        if !self.uri.is_empty() {
            wire::string(2, &self.uri, buf);
        }
    }
}

impl Message for SimpleExtensionDeclaration {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if let Some(MappingType::ExtensionFunction(f)) = &self.mapping_type {
            wire::message(3, f, buf);
        }
    }
}

impl Message for ExtensionFunction {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.extension_uri_reference != 0 {
            wire::uint32(1, self.extension_uri_reference, buf);
        }
        if self.function_anchor != 0 {
            wire::uint32(2, self.function_anchor, buf);
        }
        if !self.name.is_empty() {
            wire::string(3, &self.name, buf);
        }
    }
}

impl Message for Version {
    fn encode_raw<B: WireBuf>(&self, buf: &mut B) {
        if self.major_number != 0 {
            wire::uint32(1, self.major_number, buf);
        }
        if self.minor_number != 0 {
            wire::uint32(2, self.minor_number, buf);
        }
        if self.patch_number != 0 {
            wire::uint32(3, self.patch_number, buf);
        }
        if !self.git_hash.is_empty() {
            wire::string(4, &self.git_hash, buf);
        }
        if !self.producer.is_empty() {
            wire::string(5, &self.producer, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_function_layout() {
        let f = ExtensionFunction {
            extension_uri_reference: 1,
            function_anchor: 2,
            name: "lt".into(),
        };
        assert_eq!(
            f.encode_to_vec(),
            vec![0x08, 0x01, 0x10, 0x02, 0x1a, 0x02, b'l', b't']
        );
    }

    #[test]
    fn root_with_names() {
        let pr = PlanRel {
            rel_type: Some(PlanRelType::Root(RelRoot {
                input: Some(Rel::default()),
                names: vec!["x".into()],
            })),
        };
        assert_eq!(
            pr.encode_to_vec(),
            vec![0x12, 0x05, 0x0a, 0x00, 0x12, 0x01, b'x']
        );
    }

    #[test]
    fn empty_plan_is_empty() {
        assert!(Plan::default().encode_to_vec().is_empty());
    }
}
