use paycard_core::{
    BindConfig, EventKind, Field, FieldBinding, Filter, JoinRule, MemorySurface, Network, Phase,
    Surface, ValidityClasses, ValidityKind,
};

struct Page {
    surface: MemorySurface,
    inputs: Vec<paycard_core::ElementId>,
    outputs: Vec<paycard_core::ElementId>,
}

fn page(values: &[&str], placeholders: &[&str]) -> Page {
    let mut surface = MemorySurface::new();
    let doc = surface.document();
    let inputs = values
        .iter()
        .map(|v| surface.input(doc, "part", v))
        .collect();
    let outputs = placeholders
        .iter()
        .map(|p| {
            let el = surface.create(doc, "div");
            surface.set_text(el, p);
            el
        })
        .collect();
    Page {
        surface,
        inputs,
        outputs,
    }
}

fn bind(page: &mut Page, field: Field, config: BindConfig) -> FieldBinding {
    FieldBinding::bind(
        &mut page.surface,
        field,
        page.inputs.clone(),
        page.outputs.clone(),
        config,
        Network::Unknown,
        &ValidityClasses::default(),
    )
}

#[test]
fn bind_captures_defaults_and_syncs_prefilled_values() {
    let mut p = page(&["Ada"], &["Full Name"]);
    let b = bind(&mut p, Field::Name, BindConfig::default());
    assert_eq!(b.defaults(), ["Full Name"]);
    assert_eq!(p.surface.text(p.outputs[0]), "Ada");
}

#[test]
fn fill_mode_keeps_the_placeholder_tail() {
    let mut p = page(&["42"], &["•••• ••••"]);
    let b = bind(
        &mut p,
        Field::Number,
        BindConfig {
            fill: true,
            ..BindConfig::default()
        },
    );
    assert_eq!(p.surface.text(p.outputs[0]), "42•• ••••");

    let first = p.inputs[0];
    p.surface.type_into(first, "");
    b.handle(
        &mut p.surface,
        EventKind::Input,
        Network::Unknown,
        &ValidityClasses::default(),
    );
    assert_eq!(p.surface.text(p.outputs[0]), "•••• ••••");
}

#[test]
fn same_value_goes_to_every_output() {
    let mut p = page(&["7"], &["•••", "•••"]);
    let b = bind(
        &mut p,
        Field::Cvc,
        BindConfig {
            filters: vec![Filter::validity(ValidityKind::Cvc)],
            ..BindConfig::default()
        },
    );
    let classes = ValidityClasses::default();
    p.surface.type_into(p.inputs[0], "737");
    assert_eq!(
        b.sync(&mut p.surface, Network::Visa, &classes),
        "737"
    );
    for &out in &p.outputs {
        assert_eq!(p.surface.text(out), "737");
        assert!(p.surface.has_class(out, &classes.valid));
    }
}

#[test]
fn custom_join_and_filter_order() {
    let mut p = page(&["ab", "cd"], &["--"]);
    let b = bind(
        &mut p,
        Field::Name,
        BindConfig {
            filters: vec![
                Filter::Mask('*'),
                Filter::normalize(|s| s.to_uppercase()),
            ],
            join: JoinRule::Custom(Box::new(|v: &[String]| {
                if v.iter().all(|s| !s.is_empty()) {
                    "+".to_string()
                } else {
                    String::new()
                }
            })),
            ..BindConfig::default()
        },
    );
    assert_eq!(
        b.pipeline().phases().collect::<Vec<_>>(),
        vec![Phase::Normalize, Phase::Mask]
    );
    // no digits, so the mask leaves the text alone
    assert_eq!(p.surface.text(p.outputs[0]), "AB+CD");
}

#[test]
fn focus_marks_outputs_only() {
    let mut p = page(&[""], &["x"]);
    let b = bind(&mut p, Field::Expiry, BindConfig::default());
    let classes = ValidityClasses::default();
    b.handle(&mut p.surface, EventKind::Focus, Network::Unknown, &classes);
    assert!(p.surface.has_class(p.outputs[0], "jp-card-focused"));
    assert!(!p.surface.has_class(p.inputs[0], "jp-card-focused"));
    b.handle(&mut p.surface, EventKind::Blur, Network::Unknown, &classes);
    assert!(!p.surface.has_class(p.outputs[0], "jp-card-focused"));
    assert!(b.listens_to(p.inputs[0]));
    assert!(!b.listens_to(p.outputs[0]));
}
