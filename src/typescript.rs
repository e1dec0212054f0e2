use std::path::Path;
use tracing::debug;

use crate::declaration::render_module_fragment;
use crate::emit::DeclarationEmitter;
use crate::error::Result;
use crate::transformer::Transform;

/// Plain TypeScript modules: the emitter's declarations, rewrapped as an ambient
/// module.
#[derive(Debug, Clone)]
pub struct TypeScriptTransformer {
    file_name: String,
    source: String,
    module_name: String,
    declarations: String,
}

impl TypeScriptTransformer {
    pub fn new(path: &Path, source: String, module_name: String) -> Self {
        Self {
            file_name: path.display().to_string(),
            source,
            module_name,
            declarations: String::new(),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }
}

impl Transform for TypeScriptTransformer {
    fn analyze(&mut self, emitter: &dyn DeclarationEmitter) -> Result<()> {
        debug!(file = %self.file_name, "emitting module declarations");
        self.declarations = emitter.emit(&self.file_name, &self.source)?;
        Ok(())
    }

    fn render(&self) -> String {
        render_module_fragment(&self.module_name, &self.declarations)
    }
}
