//! Round-trip tests: synthetic members are encoded by the writer, serialized, parsed again and
//! compared by their resolved graph.

use cilgraph::prelude::*;
use std::sync::Arc;

/// Builds a small module:
///
/// ```text
/// [Obsolete] class Demo.Widget<T> : System.Object where T : System.IComparable {
///     event EventHandler Changed;     // add/remove
///     int Count { get; set; }
///     U Convert<U>() where U : <spec>;
/// }
/// ```
fn build() -> Result<Arc<MetadataImage>> {
    let object = TypeRef::new(None, "System", "Object")?;
    let handler = TypeRef::new(None, "System", "EventHandler")?;
    let comparable = TypeRef::new(None, "System", "IComparable")?;
    let obsolete = TypeRef::new(None, "System", "ObsoleteAttribute")?;
    let spec = TypeSpec::new(vec![0x1E, 0x00])?;
    let obsolete_ctor = MemberRef::new(obsolete.clone().into(), ".ctor", vec![0x20, 0x00, 0x01])?;

    let widget = TypeDef::new("Demo", "Widget", TypeAttributes::PUBLIC)?;
    widget.set_base_type(Some(object.clone().into()));
    let attribute = CustomAttribute::new(obsolete_ctor.clone().into(), vec![0x01, 0, 0, 0])?;
    widget.custom_attributes().push(attribute)?;

    let t = GenericParam::new(0, "T", GenericParamAttributes::empty())?;
    t.constraints()
        .push(GenericParamConstraint::new(comparable.clone().into()))?;
    widget.generic_params().push(t)?;

    let accessor = MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME;
    let add = MethodDef::new("add_Changed", accessor, vec![0x20, 0x01, 0x01, 0x12, 0x08])?;
    let remove = MethodDef::new("remove_Changed", accessor, vec![0x20, 0x01, 0x01, 0x12, 0x08])?;
    let get = MethodDef::new("get_Count", accessor, vec![0x20, 0x00, 0x08])?;
    let set = MethodDef::new("set_Count", accessor, vec![0x20, 0x01, 0x01, 0x08])?;
    let convert = MethodDef::new(
        "Convert",
        MethodAttributes::PUBLIC,
        vec![0x30, 0x01, 0x00, 0x1E, 0x00],
    )?;
    let u = GenericParam::new(0, "U", GenericParamAttributes::COVARIANT)?;
    u.constraints()
        .push(GenericParamConstraint::new(spec.clone().into()))?;
    convert.generic_params().push(u)?;

    for method in [&add, &remove, &get, &set, &convert] {
        widget.methods().push(method.clone())?;
    }

    let changed = Event::new("Changed", handler.clone().into(), EventAttributes::empty())?;
    changed.semantics().push(MethodSemantics::new(
        MethodSemanticsAttributes::ADD_ON,
        add.clone(),
    ))?;
    changed.semantics().push(MethodSemantics::new(
        MethodSemanticsAttributes::REMOVE_ON,
        remove.clone(),
    ))?;
    EventMap::new(&widget).events().push(changed)?;

    let count = Property::new("Count", vec![0x28, 0x00, 0x08], PropertyAttributes::empty())?;
    count
        .semantics()
        .push(MethodSemantics::new(MethodSemanticsAttributes::GETTER, get))?;
    count
        .semantics()
        .push(MethodSemantics::new(MethodSemanticsAttributes::SETTER, set))?;
    PropertyMap::new(&widget).properties().push(count)?;

    let mut writer = MetadataWriter::new();
    for ty in [&object, &handler, &comparable, &obsolete] {
        writer.add_type_ref(ty);
    }
    writer.add_type_spec(&spec);
    writer.add_member_ref(&obsolete_ctor);
    // Adds the event and property maps of the type as well
    writer.add_type_def(&widget);
    writer.finish()
}

/// Flattens the resolved graph of `image` into comparable lines
fn describe(image: &MetadataImage) -> Vec<String> {
    let mut lines = Vec::new();

    for ty in image.members_of::<TypeDef>() {
        let base = ty.base_type().map(|base| base.full_name()).unwrap_or_default();
        lines.push(format!("type {} : {base}", ty.full_name()));

        for attribute in ty.custom_attributes().items() {
            let constructor = attribute
                .constructor()
                .and_then(|ctor| ctor.full_name())
                .unwrap_or_default();
            lines.push(format!("  attribute {constructor} {:?}", attribute.value()));
        }

        for param in ty.generic_params().items() {
            lines.push(describe_param(&param));
        }

        for method in ty.methods().items() {
            lines.push(format!("  method {} {:?}", method.full_name(), method.signature()));
            for param in method.generic_params().items() {
                lines.push(describe_param(&param));
            }
        }
    }

    for event in image.members_of::<Event>() {
        let ty = event.event_type().map(|ty| ty.full_name()).unwrap_or_default();
        let add = event.add_method().map(|m| m.name()).unwrap_or_default();
        let remove = event.remove_method().map(|m| m.name()).unwrap_or_default();
        lines.push(format!("event {} : {ty} [{add}, {remove}]", event.full_name()));
    }

    for property in image.members_of::<Property>() {
        let get = property.get_method().map(|m| m.name()).unwrap_or_default();
        let set = property.set_method().map(|m| m.name()).unwrap_or_default();
        lines.push(format!("property {} [{get}, {set}]", property.full_name()));
    }

    lines
}

fn describe_param(param: &GenericParamRc) -> String {
    let constraints: Vec<String> = param
        .constraints()
        .items()
        .iter()
        .filter_map(|constraint| constraint.constraint())
        .map(|ty| ty.token().to_string())
        .collect();
    format!(
        "  param {} #{} {:?} {constraints:?}",
        param.name(),
        param.number(),
        param.flags()
    )
}

#[test]
fn writer_preserves_graph() -> Result<()> {
    let image = build()?;

    assert_eq!(
        describe(&image),
        vec![
            "type Demo.Widget : System.Object".to_string(),
            "  attribute System.ObsoleteAttribute::.ctor [1, 0, 0, 0]".to_string(),
            format!(
                "  param T #0 {:?} [\"0x01000003\"]",
                GenericParamAttributes::empty()
            ),
            "  method Demo.Widget::add_Changed [32, 1, 1, 18, 8]".to_string(),
            "  method Demo.Widget::remove_Changed [32, 1, 1, 18, 8]".to_string(),
            "  method Demo.Widget::get_Count [32, 0, 8]".to_string(),
            "  method Demo.Widget::set_Count [32, 1, 1, 8]".to_string(),
            "  method Demo.Widget::Convert [48, 1, 0, 30, 0]".to_string(),
            format!(
                "  param U #0 {:?} [\"0x1b000001\"]",
                GenericParamAttributes::COVARIANT
            ),
            "event Demo.Widget::Changed : System.EventHandler [add_Changed, remove_Changed]"
                .to_string(),
            "property Demo.Widget::Count [get_Count, set_Count]".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn generic_params_are_sorted_by_owner() -> Result<()> {
    let image = build()?;

    let params = image.members_of::<GenericParam>();
    let owners: Vec<Token> = params
        .iter()
        .filter_map(|param| param.owner().map(|owner| owner.token()))
        .collect();
    // TypeDef 1 encodes below MethodDef 5
    assert_eq!(owners, vec![Token::new(0x0200_0001), Token::new(0x0600_0005)]);

    let constraint = &image.members_of::<GenericParamConstraint>()[1];
    assert!(Arc::ptr_eq(&constraint.owner().unwrap(), &params[1]));
    Ok(())
}

#[test]
fn constraint_image_leaves_parameter_unresolved() -> Result<()> {
    let image = build()?;
    let bytes = image.to_bytes()?;
    let reloaded =
        MetadataImage::from_bytes(&bytes, image.strings().data(), image.blobs().data())?;

    let constraint = reloaded
        .resolve_member(Token::from_parts(TableId::GenericParamConstraint, 1))?
        .downcast::<GenericParamConstraint>()
        .unwrap();
    let resolved = reloaded.cached_count();

    assert!(Arc::ptr_eq(&constraint.image().unwrap(), &reloaded));
    assert_eq!(reloaded.cached_count(), resolved);
    assert_eq!(constraint.owner().unwrap().name(), "T");
    Ok(())
}

#[test]
fn bytes_roundtrip_preserves_graph() -> Result<()> {
    let image = build()?;
    let bytes = image.to_bytes()?;

    let reloaded =
        MetadataImage::from_bytes(&bytes, image.strings().data(), image.blobs().data())?;
    assert_eq!(describe(&reloaded), describe(&image));
    assert_eq!(reloaded.to_bytes()?, bytes);

    for kind in [
        TableId::TypeRef,
        TableId::TypeDef,
        TableId::MethodDef,
        TableId::MemberRef,
        TableId::CustomAttribute,
        TableId::Event,
        TableId::MethodSemantics,
        TableId::GenericParamConstraint,
    ] {
        assert_eq!(
            reloaded.tables().row_count(kind),
            image.tables().row_count(kind),
            "{kind:?}"
        );
    }
    Ok(())
}

#[test]
fn rewriting_a_loaded_image() -> Result<()> {
    let image = build()?;

    // Members read from an image can be written again
    let mut writer = MetadataWriter::new();
    for ty in image.members_of::<TypeRef>() {
        writer.add_type_ref(&ty);
    }
    for ty in image.members_of::<TypeSpec>() {
        writer.add_type_spec(&ty);
    }
    for member in image.members_of::<MemberRef>() {
        writer.add_member_ref(&member);
    }
    for ty in image.members_of::<TypeDef>() {
        writer.add_type_def(&ty);
    }
    for map in image.members_of::<EventMap>() {
        writer.add_event_map(&map);
    }
    for map in image.members_of::<PropertyMap>() {
        writer.add_property_map(&map);
    }

    let rewritten = writer.finish()?;
    assert_eq!(describe(&rewritten), describe(&image));
    assert_eq!(rewritten.to_bytes()?, image.to_bytes()?);
    Ok(())
}

#[test]
fn edits_survive_a_rewrite() -> Result<()> {
    let image = build()?;

    let widget = image.type_by_name("Demo", "Widget").unwrap();
    widget.set_name("Gadget");
    let count = image.members_of::<Property>().remove(0);
    count.set_name("Total");

    let mut writer = MetadataWriter::new();
    for ty in image.members_of::<TypeRef>() {
        writer.add_type_ref(&ty);
    }
    for ty in image.members_of::<TypeSpec>() {
        writer.add_type_spec(&ty);
    }
    for member in image.members_of::<MemberRef>() {
        writer.add_member_ref(&member);
    }
    writer.add_type_def(&widget);

    let rewritten = writer.finish()?;
    assert!(rewritten.type_by_name("Demo", "Widget").is_none());
    let gadget = rewritten.type_by_name("Demo", "Gadget").unwrap();
    assert_eq!(gadget.methods().len(), 5);

    let total = rewritten.members_of::<Property>().remove(0);
    assert_eq!(total.full_name(), "Demo.Gadget::Total");
    assert_eq!(total.get_method().unwrap().full_name(), "Demo.Gadget::get_Count");
    Ok(())
}
