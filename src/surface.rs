//! Public surface of a component: props, events and slot props.
//!
//! Two independent passes feed one [`ComponentSurface`]: [`extract_script_surface`]
//! over the typed script's syntax tree, and [`extract_slot_props`] over the markup
//! tree. Neither pass deduplicates; repeated names produce repeated entries.

use oxc_ast::ast::{
    Declaration, Expression, Program, Statement, TSSignature, TSType, TSTypeAnnotation,
    VariableDeclaration,
};
use oxc_span::GetSpan;

use crate::template::{AttributeIR, TemplateNode};

/// Callee that creates a component's typed event dispatcher.
pub const EVENT_DISPATCHER_FACTORY: &str = "createEventDispatcher";

pub const ANY_TYPE: &str = "any";

/// Rendered type of a union made only of `null` and `undefined` members.
pub const EMPTY_UNION_TYPE: &str = "never";

const SLOT_TAG: &str = "slot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prop {
    pub name: String,
    pub ty: String,
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotProp {
    pub name: String,
    pub ty: String,
}

/// Named types referenced by props, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeReferenceSet {
    names: Vec<String>,
}

impl TypeReferenceSet {
    pub fn insert(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentSurface {
    pub props: Vec<Prop>,
    pub events: Vec<Event>,
    pub slot_props: Vec<SlotProp>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCRIPT PASS
// ═══════════════════════════════════════════════════════════════════════════════

/// Props, events and referenced type names of a typed script.
///
/// Only top-level statements are inspected. `export let` / `export const`
/// bindings become props; a declaration initialized by `createEventDispatcher<T>()`
/// turns each property of the type literal `T` into an event. Everything else is
/// skipped.
pub fn extract_script_surface(
    program: &Program<'_>,
    source: &str,
) -> (Vec<Prop>, Vec<Event>, TypeReferenceSet) {
    let mut props = Vec::new();
    let mut events = Vec::new();
    let mut references = TypeReferenceSet::default();

    for stmt in &program.body {
        match stmt {
            Statement::ExportNamedDeclaration(export) => {
                if let Some(Declaration::VariableDeclaration(var_decl)) = &export.declaration {
                    collect_props(var_decl, source, &mut props, &mut references);
                }
            }
            Statement::VariableDeclaration(var_decl) if is_event_dispatcher(var_decl, source) => {
                collect_events(var_decl, source, &mut events);
            }
            _ => {}
        }
    }

    (props, events, references)
}

fn collect_props(
    var_decl: &VariableDeclaration<'_>,
    source: &str,
    props: &mut Vec<Prop>,
    references: &mut TypeReferenceSet,
) {
    for decl in &var_decl.declarations {
        let name = decl.id.span().source_text(source).to_string();
        let (ty, is_optional) = match &decl.type_annotation {
            Some(annotation) => render_prop_type(&annotation.type_annotation, source, references),
            None => (ANY_TYPE.to_string(), false),
        };

        props.push(Prop {
            name,
            ty,
            is_optional,
        });
    }
}

/// Rendered type text and optionality of a prop annotation.
fn render_prop_type(
    ty: &TSType<'_>,
    source: &str,
    references: &mut TypeReferenceSet,
) -> (String, bool) {
    match ty {
        TSType::TSUnionType(union_type) => {
            let mut is_optional = false;
            let members: Vec<&str> = union_type
                .types
                .iter()
                .filter(|member| {
                    let nullish = matches!(
                        member,
                        TSType::TSNullKeyword(_) | TSType::TSUndefinedKeyword(_)
                    );
                    is_optional |= nullish;
                    !nullish
                })
                .map(|member| member.span().source_text(source))
                .collect();

            if members.is_empty() {
                (EMPTY_UNION_TYPE.to_string(), is_optional)
            } else {
                (members.join(" | "), is_optional)
            }
        }
        TSType::TSTypeReference(reference) => {
            references.insert(reference.type_name.span().source_text(source));
            (ty.span().source_text(source).to_string(), false)
        }
        _ => (ty.span().source_text(source).to_string(), false),
    }
}

fn is_event_dispatcher(var_decl: &VariableDeclaration<'_>, source: &str) -> bool {
    var_decl.declarations.iter().any(|decl| {
        matches!(
            &decl.init,
            Some(Expression::CallExpression(call))
                if call.callee.span().source_text(source) == EVENT_DISPATCHER_FACTORY
        )
    })
}

fn collect_events(var_decl: &VariableDeclaration<'_>, source: &str, events: &mut Vec<Event>) {
    for decl in &var_decl.declarations {
        let Some(Expression::CallExpression(call)) = &decl.init else {
            continue;
        };
        let Some(type_arguments) = &call.type_arguments else {
            continue;
        };

        for argument in &type_arguments.params {
            let TSType::TSTypeLiteral(literal) = argument else {
                continue;
            };
            for member in &literal.members {
                if let TSSignature::TSPropertySignature(signature) = member {
                    events.push(Event {
                        name: signature.key.span().source_text(source).to_string(),
                        ty: annotation_text(signature.type_annotation.as_deref(), source),
                    });
                }
            }
        }
    }
}

fn annotation_text(annotation: Option<&TSTypeAnnotation<'_>>, source: &str) -> String {
    annotation
        .map(|a| a.type_annotation.span().source_text(source).to_string())
        .unwrap_or_else(|| ANY_TYPE.to_string())
}

// ═══════════════════════════════════════════════════════════════════════════════
// MARKUP PASS
// ═══════════════════════════════════════════════════════════════════════════════

/// One slot prop per attribute of every `<slot>`, in pre-order.
pub fn extract_slot_props(nodes: &[TemplateNode]) -> Vec<SlotProp> {
    fn traverse(node: &TemplateNode, slot_props: &mut Vec<SlotProp>) {
        if let TemplateNode::Element(el) = node {
            if el.tag == SLOT_TAG {
                slot_props.extend(el.attributes.iter().filter_map(AttributeIR::name).map(
                    |name| SlotProp {
                        name: name.to_string(),
                        ty: ANY_TYPE.to_string(),
                    },
                ));
            }
        }

        for child in node.children() {
            traverse(child, slot_props);
        }
    }

    let mut slot_props = Vec::new();
    for node in nodes {
        traverse(node, &mut slot_props);
    }
    slot_props
}
