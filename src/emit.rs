//! Declaration emission for TypeScript sources.
//!
//! The generator only needs "give me the `.d.ts` text of this source", so the
//! emitter sits behind [`DeclarationEmitter`]. The default implementation runs
//! oxc's isolated-declarations transform and prints the result with oxc codegen.

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_isolated_declarations::{IsolatedDeclarations, IsolatedDeclarationsOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use tracing::{debug, warn};

use crate::error::{DtsError, Result};

pub trait DeclarationEmitter: Sync {
    /// Declaration text for `source`. `file_name` only labels diagnostics.
    fn emit(&self, file_name: &str, source: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OxcDeclarationEmitter {
    /// Drop declarations tagged `@internal`.
    pub strip_internal: bool,
}

impl DeclarationEmitter for OxcDeclarationEmitter {
    fn emit(&self, file_name: &str, source: &str) -> Result<String> {
        let allocator = Allocator::default();
        let source_type = SourceType::default()
            .with_typescript(true)
            .with_module(true);

        let ret = Parser::new(&allocator, source, source_type).parse();
        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(DtsError::emit(file_name, message));
        }

        let declarations = IsolatedDeclarations::new(
            &allocator,
            IsolatedDeclarationsOptions {
                strip_internal: self.strip_internal,
            },
        )
        .build(&ret.program);

        for error in &declarations.errors {
            warn!(file = file_name, "{}", error);
        }

        let code = Codegen::new().build(&declarations.program).code;
        debug!(file = file_name, bytes = code.len(), "emitted declarations");
        Ok(code)
    }
}

/// Remove the `declare` modifier from one line of declaration output.
///
/// Inside a `declare module` block every declaration is already ambient, so
/// `declare const x` and `export declare function f` lose the keyword.
pub fn strip_declare(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];

    let stripped = if let Some(rest) = body.strip_prefix("declare ") {
        rest.to_string()
    } else if let Some(rest) = body.strip_prefix("export declare ") {
        format!("export {}", rest)
    } else if let Some(rest) = body.strip_prefix("export default declare ") {
        format!("export default {}", rest)
    } else {
        body.to_string()
    };

    format!("{}{}", indent, stripped)
}
