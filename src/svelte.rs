//! Svelte component transformer.
//!
//! The typed instance script yields props, events and the type names they use;
//! the markup yields slot props. Local types are run through the declaration
//! emitter so they can be inlined next to the generated props interface.

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::Path;
use tracing::debug;

use crate::declaration::{indent_inlined_declarations, render_component_fragment};
use crate::emit::DeclarationEmitter;
use crate::error::Result;
use crate::resolve::{resolve_type_references, ResolvedTypes};
use crate::script::typed_instance_script;
use crate::surface::{extract_script_surface, extract_slot_props, ComponentSurface};
use crate::template::{parse_template, TemplateIR};
use crate::transformer::Transform;

#[derive(Debug, Clone)]
pub struct SvelteTransformer {
    file_name: String,
    component_name: String,
    module_name: String,
    script: String,
    template: TemplateIR,
    surface: ComponentSurface,
    resolved: ResolvedTypes,
    inlined: Option<String>,
}

impl SvelteTransformer {
    /// `None` when the component has no `lang="ts"` instance script.
    pub fn from_source(path: &Path, source: &str, module_name: String) -> Result<Option<Self>> {
        let file_name = path.display().to_string();

        let Some(script) = typed_instance_script(source) else {
            debug!(file = %file_name, "skipping component without typed script");
            return Ok(None);
        };

        let template = parse_template(source, &file_name)?;
        let component_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Some(Self {
            file_name,
            component_name,
            module_name,
            script: script.content,
            template,
            surface: ComponentSurface::default(),
            resolved: ResolvedTypes::default(),
            inlined: None,
        }))
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn surface(&self) -> &ComponentSurface {
        &self.surface
    }

    pub fn resolved(&self) -> &ResolvedTypes {
        &self.resolved
    }

    /// Emit every resolved local declaration on its own. In one shared source an
    /// `export` would turn it into a module and drop unexported siblings.
    fn inline_declarations(&self, emitter: &dyn DeclarationEmitter) -> Result<Option<String>> {
        if self.resolved.declarations.is_empty() {
            return Ok(None);
        }

        let mut inlined = String::new();
        for (index, declaration) in self.resolved.declarations.iter().enumerate() {
            let synthetic_name = format!("{}.types.{}.ts", self.file_name, index);
            let emitted = emitter.emit(&synthetic_name, &format!("{}\n", declaration))?;
            inlined.push_str(&indent_inlined_declarations(&emitted));
        }
        Ok(Some(inlined))
    }
}

impl Transform for SvelteTransformer {
    fn analyze(&mut self, emitter: &dyn DeclarationEmitter) -> Result<()> {
        let allocator = Allocator::default();
        let source_type = SourceType::default()
            .with_typescript(true)
            .with_module(true);
        let ret = Parser::new(&allocator, &self.script, source_type).parse();

        if !ret.errors.is_empty() {
            debug!(
                file = %self.file_name,
                errors = ret.errors.len(),
                "script has syntax errors, extracting what parsed"
            );
        }

        let (props, events, references) = extract_script_surface(&ret.program, &self.script);
        self.surface = ComponentSurface {
            props,
            events,
            slot_props: extract_slot_props(&self.template.nodes),
        };
        self.resolved =
            resolve_type_references(&ret.program, &self.script, &references, &self.file_name);

        self.inlined = self.inline_declarations(emitter)?;

        debug!(
            file = %self.file_name,
            props = self.surface.props.len(),
            events = self.surface.events.len(),
            slot_props = self.surface.slot_props.len(),
            "analyzed component"
        );
        Ok(())
    }

    fn render(&self) -> String {
        render_component_fragment(
            &self.module_name,
            &self.component_name,
            &self.surface,
            &self.resolved.imports,
            self.inlined.as_deref(),
        )
    }
}
