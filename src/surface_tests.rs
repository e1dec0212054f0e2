use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::surface::{
    extract_script_surface, extract_slot_props, Event, Prop, TypeReferenceSet,
};
use crate::template::parse_template;

fn script_surface(script: &str) -> (Vec<Prop>, Vec<Event>, TypeReferenceSet) {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_typescript(true)
        .with_module(true);
    let ret = Parser::new(&allocator, script, source_type).parse();
    assert!(ret.errors.is_empty(), "script should parse: {:?}", ret.errors);
    extract_script_surface(&ret.program, script)
}

fn prop(name: &str, ty: &str, is_optional: bool) -> Prop {
    Prop {
        name: name.to_string(),
        ty: ty.to_string(),
        is_optional,
    }
}

#[test]
fn test_exported_let_is_prop() {
    let (props, events, references) = script_surface("export let label: string;");
    assert_eq!(props, vec![prop("label", "string", false)]);
    assert!(events.is_empty());
    assert!(references.is_empty());
}

#[test]
fn test_nullish_union_members_make_prop_optional() {
    let (props, _, _) = script_surface("export let x: string | undefined;");
    assert_eq!(props, vec![prop("x", "string", true)]);

    let (props, _, _) = script_surface("export let y: number | null | boolean;");
    assert_eq!(props, vec![prop("y", "number | boolean", true)]);
}

#[test]
fn test_union_of_only_nullish_members_is_never() {
    let (props, _, _) = script_surface("export let nothing: null | undefined;");
    assert_eq!(props, vec![prop("nothing", "never", true)]);
}

#[test]
fn test_unannotated_prop_is_any() {
    let (props, _, _) = script_surface("export let value = 3;");
    assert_eq!(props, vec![prop("value", "any", false)]);
}

#[test]
fn test_multiple_declarators_in_order() {
    let (props, _, _) = script_surface("export let a: string, b: number;\nexport const c = 'x';");
    assert_eq!(
        props,
        vec![
            prop("a", "string", false),
            prop("b", "number", false),
            prop("c", "any", false),
        ]
    );
}

#[test]
fn test_non_exported_bindings_are_ignored() {
    let script = r#"
        let internal: string = "hidden";
        function helper() {}
        export let shown: boolean;
    "#;
    let (props, events, _) = script_surface(script);
    assert_eq!(props, vec![prop("shown", "boolean", false)]);
    assert!(events.is_empty());
}

#[test]
fn test_type_references_are_recorded_once() {
    let script = r#"
        export let item: Item;
        export let other: Item;
        export let list: Array<Entry>;
    "#;
    let (props, _, references) = script_surface(script);
    assert_eq!(props[0], prop("item", "Item", false));
    assert_eq!(props[2], prop("list", "Array<Entry>", false));
    assert_eq!(references.iter().collect::<Vec<_>>(), vec!["Item", "Array"]);
}

#[test]
fn test_events_from_dispatcher_type_literal() {
    let script = r#"
        import { createEventDispatcher } from "svelte";
        export let label: string;
        const dispatch = createEventDispatcher<{ close: { id: number }; open: string }>();
    "#;
    let (props, events, _) = script_surface(script);
    assert_eq!(props, vec![prop("label", "string", false)]);
    assert_eq!(
        events,
        vec![
            Event {
                name: "close".to_string(),
                ty: "{ id: number }".to_string(),
            },
            Event {
                name: "open".to_string(),
                ty: "string".to_string(),
            },
        ]
    );
}

#[test]
fn test_dispatcher_without_type_argument_has_no_events() {
    let (_, events, _) = script_surface("const dispatch = createEventDispatcher();");
    assert!(events.is_empty());
}

#[test]
fn test_other_calls_are_not_dispatchers() {
    let (_, events, _) = script_surface("const store = writable<{ count: number }>();");
    assert!(events.is_empty());
}

#[test]
fn test_slot_props_in_preorder_without_dedup() {
    let markup = r#"
        <div>
            <slot item={current} index={i} />
            <section>
                <slot item={other}></slot>
            </section>
        </div>
    "#;
    let ir = parse_template(markup, "List.svelte").unwrap();
    let names: Vec<String> = extract_slot_props(&ir.nodes)
        .into_iter()
        .map(|slot| {
            assert_eq!(slot.ty, "any");
            slot.name
        })
        .collect();
    assert_eq!(names, vec!["item", "index", "item"]);
}

fn slot_prop_names(markup: &str) -> Vec<String> {
    let ir = parse_template(markup, "Test.svelte").unwrap();
    extract_slot_props(&ir.nodes)
        .into_iter()
        .map(|slot| slot.name)
        .collect()
}

#[test]
fn test_nested_slots_each_contribute() {
    assert_eq!(
        slot_prop_names(r#"<slot name="outer" a={1}><slot name="inner" b={2} /></slot>"#),
        vec!["name", "a", "name", "b"]
    );
}

#[test]
fn test_slots_under_special_elements() {
    assert_eq!(
        slot_prop_names(r#"<select bind:value><slot name="opts" item={x} /></select>"#),
        vec!["name", "item"]
    );
    assert_eq!(slot_prop_names(r#"<template><slot name="t" /></template>"#), vec!["name"]);
    assert_eq!(
        slot_prop_names(r#"<svelte:head><title><slot name="t"/></title></svelte:head>"#),
        vec!["name"]
    );
}

#[test]
fn test_quoted_angle_bracket_in_slot_attribute() {
    assert_eq!(
        slot_prop_names(r#"<slot title="a > b" item={x} />"#),
        vec!["title", "item"]
    );
}

#[test]
fn test_slot_inside_component_is_found() {
    let markup = r#"<Card><slot name="header" /></Card>"#;
    let ir = parse_template(markup, "Panel.svelte").unwrap();
    let slot_props = extract_slot_props(&ir.nodes);
    assert_eq!(slot_props.len(), 1);
    assert_eq!(slot_props[0].name, "name");
}

#[test]
fn test_markup_without_slots_has_no_slot_props() {
    let ir = parse_template("<button on:click={go}>{label}</button>", "Button.svelte").unwrap();
    assert!(extract_slot_props(&ir.nodes).is_empty());
}
