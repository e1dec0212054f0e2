//! Per-file transformers, one variant per recognized file kind.

use std::fs;
use std::path::Path;

use crate::emit::DeclarationEmitter;
use crate::error::{DtsError, Result};
use crate::javascript::JavaScriptTransformer;
use crate::svelte::SvelteTransformer;
use crate::typescript::TypeScriptTransformer;

/// Produces the declaration fragment of one file.
///
/// `analyze` may be called any number of times with the same result; `render`
/// never touches the filesystem.
pub trait Transform {
    fn analyze(&mut self, emitter: &dyn DeclarationEmitter) -> Result<()>;
    fn render(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Svelte,
    TypeScript,
    JavaScript,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            ".svelte" => Some(FileKind::Svelte),
            ".ts" => Some(FileKind::TypeScript),
            ".js" => Some(FileKind::JavaScript),
            _ => None,
        }
    }
}

/// Dotted extension of `path`, e.g. `.svelte`.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

#[derive(Debug)]
pub enum Transformer {
    Svelte(SvelteTransformer),
    TypeScript(TypeScriptTransformer),
    JavaScript(JavaScriptTransformer),
}

impl Transformer {
    /// Build the transformer for `path`, reading its source when the kind needs it.
    ///
    /// Returns `None` for components without a typed instance script; those have
    /// no surface worth declaring.
    pub fn load(kind: FileKind, path: &Path, module_name: String) -> Result<Option<Self>> {
        let transformer = match kind {
            FileKind::Svelte => {
                let source = read_source(path)?;
                SvelteTransformer::from_source(path, &source, module_name)?.map(Transformer::Svelte)
            }
            FileKind::TypeScript => {
                let source = read_source(path)?;
                Some(Transformer::TypeScript(TypeScriptTransformer::new(
                    path,
                    source,
                    module_name,
                )))
            }
            FileKind::JavaScript => Some(Transformer::JavaScript(JavaScriptTransformer::new(
                module_name,
            ))),
        };
        Ok(transformer)
    }

    pub fn module_name(&self) -> &str {
        match self {
            Transformer::Svelte(t) => t.module_name(),
            Transformer::TypeScript(t) => t.module_name(),
            Transformer::JavaScript(t) => t.module_name(),
        }
    }
}

impl Transform for Transformer {
    fn analyze(&mut self, emitter: &dyn DeclarationEmitter) -> Result<()> {
        match self {
            Transformer::Svelte(t) => t.analyze(emitter),
            Transformer::TypeScript(t) => t.analyze(emitter),
            Transformer::JavaScript(t) => t.analyze(emitter),
        }
    }

    fn render(&self) -> String {
        match self {
            Transformer::Svelte(t) => t.render(),
            Transformer::TypeScript(t) => t.render(),
            Transformer::JavaScript(t) => t.render(),
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| DtsError::io(path, e))
}
