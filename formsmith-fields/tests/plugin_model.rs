//! End-to-end checks of the plugin model through the public API only.

use std::collections::HashMap;

use formsmith_fields::{
    AttributeBag, FieldDescriptor, FieldInstance, FieldKind, FieldRegistry, FieldsError,
    FormContext, InstanceId, PaletteEntry, PropertiesContext, RenderMode, TextField, View,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Minimal host: an id-keyed instance sequence that applies bags wholesale.
#[derive(Default)]
struct Host {
    instances: Vec<FieldInstance>,
}

impl Host {
    fn apply(&mut self, id: &InstanceId, bag: AttributeBag) -> formsmith_fields::Result<()> {
        let instance = self
            .instances
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or_else(|| FieldsError::InstanceNotFound { id: id.to_string() })?;
        instance.replace_attributes(bag);
        Ok(())
    }

    fn get(&self, id: &str) -> &FieldInstance {
        self.instances.iter().find(|i| i.id().as_str() == id).unwrap()
    }
}

fn required_text(registry: &FieldRegistry, id: &str) -> FieldInstance {
    let mut instance = registry.construct("TextField", id.into()).unwrap();
    let mut bag = instance.attributes().clone();
    bag.insert("required", true);
    instance.replace_attributes(bag);
    instance
}

#[test]
fn every_builtin_is_complete_after_registration() {
    let registry = FieldRegistry::with_builtins().unwrap();
    for tag in ["TextField", "ImageField", "BannerField"] {
        let field = registry.lookup(tag).unwrap();
        assert_eq!(field.type_tag(), tag);
        assert_eq!(field.variants(), RenderMode::ALL);
    }
}

#[test]
fn construct_copies_defaults_without_aliasing() {
    let registry = FieldRegistry::with_builtins().unwrap();
    let template = registry.lookup("TextField").unwrap().default_attributes().clone();

    let mut a = registry.construct("TextField", "a".into()).unwrap();
    let b = registry.construct("TextField", "b".into()).unwrap();
    assert_eq!(a.attributes(), &template);

    let mut changed = a.attributes().clone();
    changed.insert("label", "Changed");
    a.replace_attributes(changed);

    assert_eq!(b.attributes(), &template);
    assert_eq!(
        registry.lookup("TextField").unwrap().default_attributes(),
        &template
    );
}

#[test]
fn designer_render_is_idempotent() {
    let registry = FieldRegistry::with_builtins().unwrap();
    for tag in registry.type_tags() {
        let instance = registry.construct(tag, "x".into()).unwrap();
        let first = registry.render_designer(&instance).unwrap();
        let second = registry.render_designer(&instance).unwrap();
        assert_eq!(first, second, "{tag} designer output changed");
    }
}

#[test]
fn required_text_field_scenario() {
    let registry = FieldRegistry::with_builtins().unwrap();
    let instance = required_text(&registry, "f1");
    assert!(!registry.validate(&instance, Some("")).unwrap());
    assert!(!registry.validate(&instance, Some("   ")).unwrap());
    assert!(!registry.validate(&instance, None).unwrap());
    assert!(registry.validate(&instance, Some("hello")).unwrap());
    assert!(registry.validate(&instance, Some("x")).unwrap());
}

#[test]
fn optional_fields_accept_everything() {
    let registry = FieldRegistry::with_builtins().unwrap();
    for tag in registry.type_tags() {
        let instance = registry.construct(tag, "o".into()).unwrap();
        for value in [None, Some(""), Some("   "), Some("anything")] {
            assert!(registry.validate(&instance, value).unwrap(), "{tag} rejected {value:?}");
        }
    }
}

#[test]
fn unknown_type_fails_lookup() {
    let registry = FieldRegistry::with_builtins().unwrap();
    assert!(matches!(
        registry.lookup("NoSuchType"),
        Err(FieldsError::UnknownFieldType { ref type_tag }) if type_tag == "NoSuchType"
    ));
}

#[test]
fn applied_bag_reads_back_exactly() {
    let registry = FieldRegistry::with_builtins().unwrap();
    let mut host = Host::default();
    host.instances
        .push(registry.construct("TextField", "f1".into()).unwrap());

    let mut editor = registry
        .render_properties(host.get("f1"), PropertiesContext::new())
        .unwrap();
    editor.set("label", json!("Email address")).unwrap();
    editor.set("required", json!(true)).unwrap();
    let submitted = editor.draft().unwrap();

    let mut apply = |id: &InstanceId, bag: AttributeBag| host.apply(id, bag);
    assert!(editor.commit(&mut apply).unwrap());

    assert_eq!(host.get("f1").attributes(), &submitted);
}

#[test]
fn mutating_one_instance_leaves_the_other_at_defaults() {
    let registry = FieldRegistry::with_builtins().unwrap();
    let mut host = Host::default();
    host.instances
        .push(registry.construct("ImageField", "a".into()).unwrap());
    host.instances
        .push(registry.construct("ImageField", "b".into()).unwrap());

    let mut bag = host.get("a").attributes().clone();
    bag.insert("label", "Profile photo");
    host.apply(&"a".into(), bag).unwrap();

    let defaults = registry.lookup("ImageField").unwrap().default_attributes();
    assert_eq!(host.get("b").attributes(), defaults);
    assert_eq!(host.get("a").attributes().get_str("label"), Some("Profile photo"));
}

#[test]
fn mutation_of_removed_instance_is_reported_not_applied() {
    let registry = FieldRegistry::with_builtins().unwrap();
    let mut host = Host::default();
    host.instances
        .push(registry.construct("ImageField", "f1".into()).unwrap());
    let mut editor = registry
        .render_properties(host.get("f1"), PropertiesContext::new())
        .unwrap();

    host.instances.clear();

    editor
        .set("image_url", json!("/uploads/1700000000000-cat.png"))
        .unwrap();
    let mut apply = |id: &InstanceId, bag: AttributeBag| host.apply(id, bag);
    let err = editor.commit(&mut apply).unwrap_err();
    assert!(err.is_instance_not_found());
    assert!(host.instances.is_empty());
}

#[test]
fn form_control_submits_under_its_own_id() {
    let registry = FieldRegistry::with_builtins().unwrap();
    let instance = required_text(&registry, "f1");
    let mut control = registry.render_form(&instance, FormContext::new()).unwrap();

    let mut values: HashMap<InstanceId, String> = HashMap::new();
    let mut submit = |id: &InstanceId, value: &str| {
        values.insert(id.clone(), value.to_string());
    };

    control.change("");
    assert!(!control.finalize(&mut submit));
    control.change("Ada");
    assert!(control.finalize(&mut submit));

    assert_eq!(values.len(), 1);
    assert_eq!(values[&InstanceId::from("f1")], "Ada");
}

#[test]
fn banner_never_submits() {
    let registry = FieldRegistry::with_builtins().unwrap();
    let instance = registry.construct("BannerField", "b".into()).unwrap();
    let mut control = registry.render_form(&instance, FormContext::new()).unwrap();
    let mut calls = 0;
    let mut submit = |_: &InstanceId, _: &str| calls += 1;
    assert!(!control.finalize(&mut submit));
    assert_eq!(calls, 0);
}

#[test]
fn wrong_mode_unwrap_is_an_error() {
    let registry = FieldRegistry::with_builtins().unwrap();
    let instance = registry.construct("TextField", "t".into()).unwrap();
    let rendered = registry
        .render(&instance, formsmith_fields::RenderContext::Designer)
        .unwrap();
    assert!(matches!(
        rendered.into_form(),
        Err(FieldsError::WrongRenderMode { .. })
    ));
}

// A third-party kind registers next to the builtins without touching them.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct RatingAttributes {
    label: String,
    max: u8,
}

struct RatingField;

impl FieldKind for RatingField {
    const TYPE_TAG: &'static str = "RatingField";
    type Attributes = RatingAttributes;

    fn palette() -> PaletteEntry {
        PaletteEntry::new("star", "Rating")
    }

    fn designer_view(attrs: &RatingAttributes) -> View {
        View::label(&attrs.label, false, false)
    }

    fn form_view(
        _id: &InstanceId,
        attrs: &RatingAttributes,
        state: &formsmith_fields::ControlState,
    ) -> View {
        View::label(&attrs.label, false, state.error)
    }

    fn properties_view(
        _id: &InstanceId,
        draft: &RatingAttributes,
        _state: &formsmith_fields::EditorState,
    ) -> View {
        View::text(format!("max {}", draft.max))
    }

    fn validate(attrs: &RatingAttributes, value: Option<&str>) -> bool {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => true,
            Some(v) => v.parse::<u8>().map(|n| n <= attrs.max).unwrap_or(false),
        }
    }
}

#[test]
fn custom_kind_joins_the_registry() {
    let registry = FieldRegistry::builder()
        .builtins()
        .kind::<RatingField>()
        .build()
        .unwrap();
    assert_eq!(registry.len(), 4);

    let mut instance = registry.construct("RatingField", "r".into()).unwrap();
    let mut bag = instance.attributes().clone();
    bag.insert("max", 5);
    instance.replace_attributes(bag);

    assert!(registry.validate(&instance, Some("4")).unwrap());
    assert!(!registry.validate(&instance, Some("9")).unwrap());
    assert_eq!(registry.lookup("RatingField").unwrap().palette().label, "Rating");
}

#[test]
fn descriptor_missing_a_variant_is_rejected() {
    let mut registry = FieldRegistry::with_builtins().unwrap();
    let descriptor = FieldDescriptor::new("Sketch", AttributeBag::new())
        .designer(|_| Ok(View::text("sketch")))
        .validator(|_, _| true);
    match registry.register(descriptor) {
        Err(FieldsError::IncompleteDescriptor { missing, .. }) => {
            assert_eq!(missing, vec!["form", "properties"]);
        }
        other => panic!("expected IncompleteDescriptor, got {other:?}"),
    }
    assert!(!registry.contains("Sketch"));
    assert!(registry.contains(TextField::TYPE_TAG));
}
