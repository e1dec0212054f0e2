use crate::declaration::render_opaque_fragment;
use crate::emit::DeclarationEmitter;
use crate::error::Result;
use crate::transformer::Transform;

/// Untyped modules are declared opaquely; there is nothing to analyze.
#[derive(Debug, Clone)]
pub struct JavaScriptTransformer {
    module_name: String,
}

impl JavaScriptTransformer {
    pub fn new(module_name: String) -> Self {
        Self { module_name }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }
}

impl Transform for JavaScriptTransformer {
    fn analyze(&mut self, _emitter: &dyn DeclarationEmitter) -> Result<()> {
        Ok(())
    }

    fn render(&self) -> String {
        render_opaque_fragment(&self.module_name)
    }
}
