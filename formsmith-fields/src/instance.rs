//! Field instances: a placed field with identity and a mutable attribute bag.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::attributes::AttributeBag;

/// Identity of a field instance, unique within its owning form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh id for a newly placed field.
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A concrete field placed in a form.
///
/// `id` and `type_tag` are fixed at construction. The attribute bag is only
/// ever replaced as a whole, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInstance {
    id: InstanceId,
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default)]
    attributes: AttributeBag,
}

impl FieldInstance {
    /// Build an instance directly. Hosts normally go through
    /// `FieldRegistry::construct`, which seeds the bag from the descriptor.
    pub fn new(id: InstanceId, type_tag: impl Into<String>, attributes: AttributeBag) -> Self {
        Self {
            id,
            type_tag: type_tag.into(),
            attributes,
        }
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    /// Replace the whole attribute bag, returning the previous one.
    pub fn replace_attributes(&mut self, attributes: AttributeBag) -> AttributeBag {
        std::mem::replace(&mut self.attributes, attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(InstanceId::generate(), InstanceId::generate());
    }

    #[test]
    fn replace_is_wholesale() {
        let mut before = AttributeBag::new();
        before.insert("label", "Name");
        before.insert("required", true);
        let mut instance = FieldInstance::new("f1".into(), "TextField", before.clone());

        let mut after = AttributeBag::new();
        after.insert("label", "Email");
        let old = instance.replace_attributes(after.clone());

        assert_eq!(old, before);
        assert_eq!(instance.attributes(), &after);
        assert!(!instance.attributes().contains_key("required"));
    }

    #[test]
    fn instance_yaml_uses_type_key() {
        let mut attrs = AttributeBag::new();
        attrs.insert("label", "Name");
        let instance = FieldInstance::new("f1".into(), "TextField", attrs);
        let yaml = serde_yaml_ng::to_string(&instance).unwrap();
        assert!(yaml.contains("type: TextField"));
        assert!(!yaml.contains("type_tag"));
        let parsed: FieldInstance = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed, instance);
    }
}
