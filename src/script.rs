//! Script segment extraction for `.svelte` sources.
//!
//! Splits a component into its `<script>` blocks and their attributes. The typed
//! text is handed to the analyzer untouched.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    /// Script block regex
    static ref SCRIPT_REGEX: Regex = Regex::new(r"(?is)<script\b([^>]*)>([\s\S]*?)</script>").unwrap();

    /// Attribute regex for parsing script attributes
    static ref ATTR_REGEX: Regex = Regex::new(r#"(?i)([a-z0-9:-]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^>\s]+)))?"#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSegment {
    pub content: String,
    pub attributes: HashMap<String, String>,
}

impl ScriptSegment {
    /// `lang="ts"` or `lang="typescript"`.
    pub fn is_typed(&self) -> bool {
        matches!(
            self.attributes.get("lang").map(|lang| lang.to_ascii_lowercase()),
            Some(ref lang) if lang == "ts" || lang == "typescript"
        )
    }

    /// `<script context="module">` (or Svelte 5's bare `module` attribute).
    pub fn is_module_context(&self) -> bool {
        self.attributes.get("context").map(String::as_str) == Some("module")
            || self.attributes.contains_key("module")
    }
}

/// Every `<script>` block in source order.
pub fn extract_scripts(source: &str) -> Vec<ScriptSegment> {
    SCRIPT_REGEX
        .captures_iter(source)
        .map(|caps| {
            let attr_string = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let content = caps.get(2).map(|m| m.as_str()).unwrap_or("");

            let mut attributes = HashMap::new();
            for attr_caps in ATTR_REGEX.captures_iter(attr_string) {
                if let Some(name) = attr_caps.get(1) {
                    let value = attr_caps
                        .get(2)
                        .or_else(|| attr_caps.get(3))
                        .or_else(|| attr_caps.get(4))
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_else(|| "true".to_string());
                    attributes.insert(name.as_str().to_ascii_lowercase(), value);
                }
            }

            ScriptSegment {
                content: content.to_string(),
                attributes,
            }
        })
        .collect()
}

/// The typed instance script of a component, if it has one.
///
/// Module-context scripts hold no props, so only the instance block counts.
pub fn typed_instance_script(source: &str) -> Option<ScriptSegment> {
    extract_scripts(source)
        .into_iter()
        .find(|script| !script.is_module_context())
        .filter(ScriptSegment::is_typed)
}
