//! Markup parsing for `.svelte` components.
//!
//! The component source is reduced to its markup and run through html5ever. Svelte
//! syntax that HTML5 would mangle is protected first:
//!
//! - `{...}` expressions become `__dts_expr_N__` placeholders
//! - original tag and attribute names are stashed in `data-dts-*` marker
//!   attributes, because html5ever lowercases both
//! - elements with special insertion modes or raw-text content (`select`,
//!   `template`, `title`, ...) are renamed to neutral custom elements, so their
//!   children stay ordinary child elements
//! - self-closing non-void tags are expanded, otherwise following siblings
//!   would nest inside them
//!
//! Only what slot extraction needs survives: tags, attribute names and nesting.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use lazy_static::lazy_static;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

use crate::error::{DtsError, Result};

const TAG_MARKER: &str = "data-dts-tag";
const ATTRS_MARKER: &str = "data-dts-attrs";
const NEUTRAL_TAG_PREFIX: &str = "dts-";

lazy_static! {
    static ref EXPR_PLACEHOLDER_RE: Regex = Regex::new(r"__dts_expr_(\d+)__").unwrap();

    static ref SCRIPT_RE: Regex = Regex::new(r"(?is)<script\b[^>]*>[\s\S]*?</script>").unwrap();
    static ref STYLE_RE: Regex = Regex::new(r"(?is)<style\b[^>]*>[\s\S]*?</style>").unwrap();

    /// Opening tags, after expressions have been replaced. Attributes are matched
    /// one whole unit at a time so quoted values may contain `>`.
    static ref OPEN_TAG_RE: Regex = Regex::new(
        r#"<([A-Za-z][A-Za-z0-9:._-]*)((?:\s+[^\s"'<>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>]*[^\s"'<>/]))?)*)\s*(/?)>"#
    )
    .unwrap();

    static ref ATTR_NAME_RE: Regex = Regex::new(
        r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>]*[^\s"'<>/]))?"#
    )
    .unwrap();

    static ref NEUTRALIZED_CLOSE_TAG_RE: Regex = Regex::new(
        r"</(select|option|optgroup|datalist|template|title|textarea|noscript|iframe|xmp|noembed|noframes|plaintext)\s*>"
    )
    .unwrap();

    static ref VOID_TAGS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect();

    /// Tags html5ever would not treat as plain containers: their children get
    /// dropped, moved into template contents, or read as raw text.
    static ref NEUTRALIZED_TAGS: HashSet<&'static str> = [
        "select", "option", "optgroup", "datalist", "template", "title", "textarea",
        "noscript", "iframe", "xmp", "noembed", "noframes", "plaintext",
    ]
    .into_iter()
    .collect();
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE TREE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    Element(ElementNode),
    Component(ComponentNode),
}

impl TemplateNode {
    pub fn children(&self) -> &[TemplateNode] {
        match self {
            TemplateNode::Element(el) => &el.children,
            TemplateNode::Component(comp) => &comp.children,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub attributes: Vec<AttributeIR>,
    pub children: Vec<TemplateNode>,
}

/// An element whose tag starts with an uppercase letter.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    pub name: String,
    pub attributes: Vec<AttributeIR>,
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeIR {
    Named { name: String },
    /// `{...rest}`
    Spread,
}

impl AttributeIR {
    pub fn name(&self) -> Option<&str> {
        match self {
            AttributeIR::Named { name } => Some(name),
            AttributeIR::Spread => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateIR {
    pub nodes: Vec<TemplateNode>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRE-PASSES
// ═══════════════════════════════════════════════════════════════════════════════

/// Strip script and style blocks before parsing.
fn strip_blocks(source: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(source, "");
    STYLE_RE.replace_all(&without_scripts, "").into_owned()
}

/// Find the end of a balanced brace expression, handling strings and template literals.
/// Returns the index after the closing brace, or None if unbalanced.
fn find_balanced_brace_end(chars: &[char], start_index: usize) -> Option<usize> {
    let mut depth = 0;
    let mut i = start_index;
    let mut in_string: Option<char> = None;
    let mut in_template_literal = false;
    let mut template_brace_depth = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' && i + 1 < chars.len() {
            i += 2;
            continue;
        }

        if in_string.is_some() {
            if Some(c) == in_string {
                in_string = None;
            }
            i += 1;
            continue;
        }

        if in_template_literal {
            if c == '`' && template_brace_depth == 0 {
                in_template_literal = false;
            } else if c == '$' && i + 1 < chars.len() && chars[i + 1] == '{' {
                template_brace_depth += 1;
                i += 2;
                continue;
            } else if c == '}' && template_brace_depth > 0 {
                template_brace_depth -= 1;
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' => in_string = Some(c),
            '`' => in_template_literal = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }

        i += 1;
    }

    None
}

/// Replace every balanced `{...}` with a placeholder so html5ever sees plain text.
fn normalize_all_expressions(html: &str) -> (String, HashMap<String, String>) {
    let chars: Vec<char> = html.chars().collect();
    let mut normalized = String::with_capacity(html.len());
    let mut expressions = HashMap::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '{' {
            if let Some(end) = find_balanced_brace_end(&chars, i) {
                let placeholder = format!("__dts_expr_{}__", expressions.len());
                let code: String = chars[i + 1..end - 1].iter().collect();
                normalized.push_str(&placeholder);
                expressions.insert(placeholder, code);
                i = end;
                continue;
            }
        }

        normalized.push(chars[i]);
        i += 1;
    }

    (normalized, expressions)
}

/// Record original tag names and attribute names on every opening tag, rename
/// tags with special parsing rules, and expand self-closing non-void tags.
fn mark_tags(html: &str) -> String {
    let marked = OPEN_TAG_RE.replace_all(html, |caps: &Captures| {
        let tag = &caps[1];
        let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let self_closing = !caps[3].is_empty();

        let neutralized = NEUTRALIZED_TAGS.contains(tag);
        let emitted_tag = if neutralized {
            format!("{}{}", NEUTRAL_TAG_PREFIX, tag)
        } else {
            tag.to_string()
        };

        let mut out = format!("<{}", emitted_tag);
        if neutralized || tag.chars().any(|c| c.is_ascii_uppercase()) {
            out.push_str(&format!(" {}=\"{}\"", TAG_MARKER, tag));
        }

        let names: Vec<&str> = ATTR_NAME_RE
            .captures_iter(attrs)
            .filter_map(|attr| attr.get(1).map(|m| m.as_str()))
            .collect();
        if !names.is_empty() {
            out.push_str(&format!(" {}=\"{}\"", ATTRS_MARKER, names.join(" ")));
        }

        out.push_str(attrs);
        out.push('>');

        if self_closing && !VOID_TAGS.contains(tag.to_ascii_lowercase().as_str()) {
            out.push_str(&format!("</{}>", emitted_tag));
        }
        out
    });

    NEUTRALIZED_CLOSE_TAG_RE
        .replace_all(&marked, |caps: &Captures| {
            format!("</{}{}>", NEUTRAL_TAG_PREFIX, &caps[1])
        })
        .into_owned()
}

// ═══════════════════════════════════════════════════════════════════════════════
// DOM CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Check if a tag name represents a component (starts with uppercase)
pub fn is_component_tag(tag_name: &str) -> bool {
    tag_name
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
}

struct DomConverter<'e> {
    expressions: &'e HashMap<String, String>,
}

impl<'e> DomConverter<'e> {
    fn whole_placeholder(&self, value: &str) -> Option<&'e str> {
        let caps = EXPR_PLACEHOLDER_RE.captures(value)?;
        let m = caps.get(0)?;
        if m.start() == 0 && m.end() == value.len() {
            self.expressions.get(m.as_str()).map(String::as_str)
        } else {
            None
        }
    }

    fn convert(&self, handle: &Handle, out: &mut Vec<TemplateNode>) {
        match &handle.data {
            NodeData::Document => self.convert_children(handle, out),

            NodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let local = name.local.to_string();
                // html5ever always synthesizes these wrappers; components never own them.
                if matches!(local.as_str(), "html" | "head" | "body") {
                    self.convert_children(handle, out);
                    return;
                }

                let attrs = attrs.borrow();
                let marked = |marker: &str| {
                    attrs
                        .iter()
                        .find(|attr| &*attr.name.local == marker)
                        .map(|attr| attr.value.to_string())
                };

                let tag = marked(TAG_MARKER).unwrap_or(local);
                let attributes = match marked(ATTRS_MARKER) {
                    Some(names) => names
                        .split_whitespace()
                        .map(|name| self.marked_attribute(name))
                        .collect(),
                    None => attrs
                        .iter()
                        .filter(|attr| !attr.name.local.starts_with("data-dts-"))
                        .map(|attr| AttributeIR::Named {
                            name: attr.name.local.to_string(),
                        })
                        .collect(),
                };

                let mut children = Vec::new();
                self.convert_children(handle, &mut children);
                // Only reachable when a `<template>` slipped past renaming.
                if let Some(contents) = template_contents.borrow().as_ref() {
                    self.convert_children(contents, &mut children);
                }

                if is_component_tag(&tag) {
                    out.push(TemplateNode::Component(ComponentNode {
                        name: tag,
                        attributes,
                        children,
                    }));
                } else {
                    out.push(TemplateNode::Element(ElementNode {
                        tag,
                        attributes,
                        children,
                    }));
                }
            }

            NodeData::Text { .. }
            | NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }
    }

    fn convert_children(&self, handle: &Handle, out: &mut Vec<TemplateNode>) {
        for child in handle.children.borrow().iter() {
            self.convert(child, out);
        }
    }

    /// Rebuild one attribute from its original source name.
    fn marked_attribute(&self, name: &str) -> AttributeIR {
        let Some(code) = self.whole_placeholder(name) else {
            return AttributeIR::Named {
                name: name.to_string(),
            };
        };

        let code = code.trim();
        if code.starts_with("...") {
            AttributeIR::Spread
        } else {
            // `{item}` is shorthand for `item={item}`
            AttributeIR::Named {
                name: code.to_string(),
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse the markup of a component source into a template tree.
pub fn parse_template(source: &str, file_path: &str) -> Result<TemplateIR> {
    let stripped = strip_blocks(source);
    let (normalized, expressions) = normalize_all_expressions(&stripped);
    let marked = mark_tags(&normalized);

    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut marked.as_bytes())
        .map_err(|e| DtsError::Template {
            file: file_path.to_string(),
            message: e.to_string(),
        })?;

    let converter = DomConverter {
        expressions: &expressions,
    };
    let mut nodes = Vec::new();
    converter.convert(&dom.document, &mut nodes);

    Ok(TemplateIR { nodes })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(ir: &TemplateIR) -> &ElementNode {
        match &ir.nodes[0] {
            TemplateNode::Element(el) => el,
            other => panic!("expected element, got {:?}", other),
        }
    }

    fn attribute_names(attributes: &[AttributeIR]) -> Vec<Option<&str>> {
        attributes.iter().map(AttributeIR::name).collect()
    }

    fn find_tag<'n>(nodes: &'n [TemplateNode], tag: &str) -> Option<&'n ElementNode> {
        nodes.iter().find_map(|node| match node {
            TemplateNode::Element(el) if el.tag == tag => Some(el),
            other => find_tag(other.children(), tag),
        })
    }

    #[test]
    fn test_is_component_tag() {
        assert!(is_component_tag("Button"));
        assert!(is_component_tag("HeroSection"));
        assert!(!is_component_tag("div"));
        assert!(!is_component_tag("slot"));
    }

    #[test]
    fn test_find_balanced_brace() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(find_balanced_brace_end(&chars("{hello}"), 0), Some(7));
        assert_eq!(find_balanced_brace_end(&chars("{obj.map(x => x)}"), 0), Some(17));
        assert_eq!(find_balanced_brace_end(&chars("{'string with { brace'}"), 0), Some(23));
        assert_eq!(find_balanced_brace_end(&chars("{`a ${b} c`}"), 0), Some(12));
        assert_eq!(find_balanced_brace_end(&chars("{unclosed"), 0), None);
    }

    #[test]
    fn test_normalize_expressions() {
        let (normalized, exprs) = normalize_all_expressions("<div title={a}>{count}</div>");
        assert_eq!(normalized, "<div title=__dts_expr_0__>__dts_expr_1__</div>");
        assert_eq!(exprs.get("__dts_expr_0__").map(String::as_str), Some("a"));
        assert_eq!(exprs.get("__dts_expr_1__").map(String::as_str), Some("count"));
    }

    #[test]
    fn test_mark_tags_expands_self_closing() {
        assert_eq!(
            mark_tags("<slot name=\"x\" />"),
            "<slot data-dts-attrs=\"name\" name=\"x\"></slot>"
        );
        assert_eq!(mark_tags("<br/>"), "<br>");
        assert_eq!(
            mark_tags("<Icon/>"),
            "<Icon data-dts-tag=\"Icon\"></Icon>"
        );
    }

    #[test]
    fn test_mark_tags_renames_special_tags() {
        assert_eq!(
            mark_tags("<select bind:value><option>a</option></select>"),
            "<dts-select data-dts-tag=\"select\" data-dts-attrs=\"bind:value\" bind:value>\
             <dts-option data-dts-tag=\"option\">a</dts-option></dts-select>"
        );
        assert_eq!(mark_tags("<Select></Select>"), "<Select data-dts-tag=\"Select\"></Select>");
    }

    #[test]
    fn test_mark_tags_quoted_value_with_angle_bracket() {
        assert_eq!(
            mark_tags("<slot title=\"a > b\" item=__dts_expr_0__ />"),
            "<slot data-dts-attrs=\"title item\" title=\"a > b\" item=__dts_expr_0__></slot>"
        );
    }

    #[test]
    fn test_strip_blocks() {
        let source = "<script lang=\"ts\">let a = '<p>';</script><p>hi</p><style>p { color: red; }</style>";
        assert_eq!(strip_blocks(source), "<p>hi</p>");
    }

    #[test]
    fn test_attribute_names_keep_case() {
        let ir = parse_template(r#"<slot itemData={item} isOpen></slot>"#, "Test.svelte").unwrap();
        let slot = first_element(&ir);
        assert_eq!(slot.tag, "slot");
        assert_eq!(attribute_names(&slot.attributes), vec![Some("itemData"), Some("isOpen")]);
    }

    #[test]
    fn test_shorthand_and_spread_attributes() {
        let ir = parse_template("<slot {item} {...rest} />", "Test.svelte").unwrap();
        let slot = first_element(&ir);
        assert_eq!(attribute_names(&slot.attributes), vec![Some("item"), None]);
        assert_eq!(slot.attributes[1], AttributeIR::Spread);
    }

    #[test]
    fn test_quoted_angle_bracket_keeps_later_attributes() {
        let ir = parse_template(r#"<slot title="a > b" item={x} />"#, "Test.svelte").unwrap();
        let slot = first_element(&ir);
        assert_eq!(attribute_names(&slot.attributes), vec![Some("title"), Some("item")]);
        assert!(slot.children.is_empty());
    }

    #[test]
    fn test_components_keep_children() {
        let ir = parse_template(
            "<script lang=\"ts\">export let a: string;</script>\n<Card title=\"Hi {name}\">Hello {name}!<slot /></Card>",
            "Test.svelte",
        )
        .unwrap();
        assert_eq!(ir.nodes.len(), 1);
        let TemplateNode::Component(card) = &ir.nodes[0] else {
            panic!("expected component");
        };
        assert_eq!(card.name, "Card");
        assert_eq!(attribute_names(&card.attributes), vec![Some("title")]);
        assert_eq!(card.children.len(), 1);
        assert!(find_tag(&card.children, "slot").is_some());
    }

    #[test]
    fn test_self_closing_slot_keeps_siblings() {
        let ir = parse_template("<div><slot /><span>after</span></div>", "Test.svelte").unwrap();
        let div = first_element(&ir);
        assert_eq!(div.children.len(), 2);
        assert!(div.children[0].children().is_empty());
    }

    #[test]
    fn test_slot_inside_select_survives() {
        let ir = parse_template(
            r#"<select bind:value><slot name="opts" item={x} /></select>"#,
            "Test.svelte",
        )
        .unwrap();
        let select = first_element(&ir);
        assert_eq!(select.tag, "select");
        let slot = find_tag(&select.children, "slot").expect("slot inside select");
        assert_eq!(attribute_names(&slot.attributes), vec![Some("name"), Some("item")]);
    }

    #[test]
    fn test_slot_inside_template_survives() {
        let ir = parse_template(r#"<template><slot name="t" /></template>"#, "Test.svelte").unwrap();
        let template = first_element(&ir);
        assert_eq!(template.tag, "template");
        let slot = find_tag(&template.children, "slot").expect("slot inside template");
        assert_eq!(attribute_names(&slot.attributes), vec![Some("name")]);
    }

    #[test]
    fn test_slot_inside_title_survives() {
        let ir = parse_template(
            r#"<svelte:head><title><slot name="t"/></title></svelte:head>"#,
            "Test.svelte",
        )
        .unwrap();
        let title = find_tag(&ir.nodes, "title").expect("title element");
        let slot = find_tag(&title.children, "slot").expect("slot inside title");
        assert_eq!(attribute_names(&slot.attributes), vec![Some("name")]);
    }

    #[test]
    fn test_slot_inside_textarea_survives() {
        let ir = parse_template(r#"<textarea><slot value={v} /></textarea>"#, "Test.svelte").unwrap();
        assert!(find_tag(&ir.nodes, "slot").is_some());
    }
}
