//! Rendering of declaration fragments.
//!
//! Every fragment is one `declare module '<name>'` block terminated by a blank
//! line. The layout is reproduced exactly, tabs included, so generated files
//! diff cleanly between runs.

use std::path::{Path, MAIN_SEPARATOR};

use crate::emit::strip_declare;
use crate::surface::ComponentSurface;

/// First line of every generated declaration file.
pub const OUTPUT_HEADER: &str = "import { SvelteComponentTyped } from \"svelte\";\n\n";

pub const COMPONENT_BASE_TYPE: &str = "SvelteComponentTyped";
pub const EVENT_WRAPPER: &str = "CustomEvent";

/// Module specifier consumers import a file by.
///
/// The entry point is the package itself; every other file is
/// `<package><subdir>/<file name>`, where `subdir` is the file's directory
/// relative to `root`, each segment led by the platform separator.
pub fn module_name(package_name: &str, root: &Path, file: &Path, is_entry: bool) -> String {
    if is_entry {
        return package_name.to_string();
    }

    let subdir: String = file
        .parent()
        .and_then(|dir| dir.strip_prefix(root).ok())
        .map(|relative| {
            relative
                .components()
                .map(|c| format!("{}{}", MAIN_SEPARATOR, c.as_os_str().to_string_lossy()))
                .collect()
        })
        .unwrap_or_default();

    let base_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!("{}{}/{}", package_name, subdir, base_name)
}

/// `declare module '<name>';` with no body.
pub fn render_opaque_fragment(module: &str) -> String {
    format!("declare module '{}';\n\n", module)
}

/// Wrap emitted declarations of a plain TypeScript module.
///
/// Blank lines are dropped and every remaining line is indented one tab, with
/// `declare` modifiers removed.
pub fn render_module_fragment(module: &str, declarations: &str) -> String {
    let body = declarations
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| format!("\t{}", strip_declare(line)))
        .collect::<Vec<_>>()
        .join("\n");

    format!("declare module '{}' {{\n{}\n}}\n\n", module, body)
}

/// Indent emitted local declarations for inlining into a component module.
///
/// Every line gets a tab, blank ones included, and a newline closes the block.
pub fn indent_inlined_declarations(emitted: &str) -> String {
    let body = emitted
        .split('\n')
        .map(|line| format!("\t{}", strip_declare(line)))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n", body)
}

/// Full fragment of a component: imports, inlined types, props interface and
/// component class.
pub fn render_component_fragment(
    module: &str,
    component_name: &str,
    surface: &ComponentSurface,
    imports: &[String],
    inlined: Option<&str>,
) -> String {
    let mut out = format!("declare module '{}' {{\n", module);

    if !imports.is_empty() {
        for import in imports {
            out.push_str(&format!("\t{}\n", import));
        }
        out.push('\n');
    }

    if let Some(inlined) = inlined {
        out.push_str(inlined);
    }

    out.push_str(&format!("\tinterface {}Props {{", component_name));
    for prop in &surface.props {
        let optional = if prop.is_optional { "?" } else { "" };
        out.push_str(&format!("\n\t\t{}{}: {};", prop.name, optional, prop.ty));
    }
    out.push_str("\n\t}\n\n");

    let events = surface
        .events
        .iter()
        .map(|event| format!("{}: {}<{}>", event.name, EVENT_WRAPPER, event.ty))
        .collect::<Vec<_>>()
        .join(", ");
    let slot_props = surface
        .slot_props
        .iter()
        .map(|slot| format!("{}: {}", slot.name, slot.ty))
        .collect::<Vec<_>>()
        .join(", ");

    out.push_str(&format!(
        "\tclass {name} extends {base}<\n\t\t{name}Props,\n\t\t{{ {events} }},\n\t\t{{ {slots} }}\n\t> {{}}",
        name = component_name,
        base = COMPONENT_BASE_TYPE,
        events = events,
        slots = slot_props,
    ));
    out.push_str(&format!("\n\n\texport default {};\n}}\n\n", component_name));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Event, Prop, SlotProp};
    use std::path::PathBuf;

    fn sep() -> String {
        MAIN_SEPARATOR.to_string()
    }

    #[test]
    fn test_module_name_entry_point() {
        let root = PathBuf::from("/project/src");
        let file = root.join("index.ts");
        assert_eq!(module_name("ui-kit", &root, &file, true), "ui-kit");
    }

    #[test]
    fn test_module_name_root_and_nested() {
        let root = PathBuf::from("/project/src");
        assert_eq!(
            module_name("ui-kit", &root, &root.join("Button.svelte"), false),
            "ui-kit/Button.svelte"
        );
        assert_eq!(
            module_name("ui-kit", &root, &root.join("widgets").join("forms").join("Input.svelte"), false),
            format!("ui-kit{s}widgets{s}forms/Input.svelte", s = sep())
        );
    }

    #[test]
    fn test_opaque_fragment() {
        assert_eq!(
            render_opaque_fragment("ui-kit/widgets/Button.js"),
            "declare module 'ui-kit/widgets/Button.js';\n\n"
        );
    }

    #[test]
    fn test_module_fragment_strips_and_indents() {
        let emitted = "export declare function add(a: number): number;\n\nexport interface A {\n\tx: string;\n}\n";
        assert_eq!(
            render_module_fragment("ui-kit/math.ts", emitted),
            "declare module 'ui-kit/math.ts' {\n\
             \texport function add(a: number): number;\n\
             \texport interface A {\n\
             \t\tx: string;\n\
             \t}\n\
             }\n\n"
        );
    }

    #[test]
    fn test_empty_component_fragment() {
        let fragment = render_component_fragment("ui-kit", "Empty", &ComponentSurface::default(), &[], None);
        assert_eq!(
            fragment,
            "declare module 'ui-kit' {\n\
             \tinterface EmptyProps {\n\
             \t}\n\
             \n\
             \tclass Empty extends SvelteComponentTyped<\n\
             \t\tEmptyProps,\n\
             \t\t{  },\n\
             \t\t{  }\n\
             \t> {}\n\
             \n\
             \texport default Empty;\n\
             }\n\n"
        );
    }

    #[test]
    fn test_full_component_fragment() {
        let surface = ComponentSurface {
            props: vec![
                Prop {
                    name: "label".to_string(),
                    ty: "string".to_string(),
                    is_optional: false,
                },
                Prop {
                    name: "item".to_string(),
                    ty: "Item".to_string(),
                    is_optional: true,
                },
            ],
            events: vec![Event {
                name: "close".to_string(),
                ty: "{ id: number }".to_string(),
            }],
            slot_props: vec![
                SlotProp {
                    name: "name".to_string(),
                    ty: "any".to_string(),
                },
                SlotProp {
                    name: "item".to_string(),
                    ty: "any".to_string(),
                },
            ],
        };
        let imports = vec!["import { User } from './types';".to_string()];
        let inlined = indent_inlined_declarations("interface Item {\n\tid: number;\n}\n");

        let fragment = render_component_fragment(
            "ui-kit/Card.svelte",
            "Card",
            &surface,
            &imports,
            Some(&inlined),
        );
        assert_eq!(
            fragment,
            "declare module 'ui-kit/Card.svelte' {\n\
             \timport { User } from './types';\n\
             \n\
             \tinterface Item {\n\
             \t\tid: number;\n\
             \t}\n\
             \t\n\
             \tinterface CardProps {\n\
             \t\tlabel: string;\n\
             \t\titem?: Item;\n\
             \t}\n\
             \n\
             \tclass Card extends SvelteComponentTyped<\n\
             \t\tCardProps,\n\
             \t\t{ close: CustomEvent<{ id: number }> },\n\
             \t\t{ name: any, item: any }\n\
             \t> {}\n\
             \n\
             \texport default Card;\n\
             }\n\n"
        );
    }
}
