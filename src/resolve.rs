//! Resolution of prop type names against the component's own script.

use oxc_ast::ast::{
    Declaration, ImportDeclaration, ImportDeclarationSpecifier, Program, Statement,
};
use oxc_span::GetSpan;
use tracing::warn;

use crate::surface::TypeReferenceSet;

/// Declarations and imports that make referenced type names available inside a
/// generated module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTypes {
    /// Verbatim source of local interfaces, classes and type aliases.
    pub declarations: Vec<String>,
    /// `import { Name } from '...';` lines, one per resolved name.
    pub imports: Vec<String>,
}

impl ResolvedTypes {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.imports.is_empty()
    }
}

/// Resolve every referenced name to a local declaration or, failing that, to the
/// import that brings it in. Unresolved names are logged and left alone.
pub fn resolve_type_references(
    program: &Program<'_>,
    source: &str,
    references: &TypeReferenceSet,
    file_name: &str,
) -> ResolvedTypes {
    let mut resolved = ResolvedTypes::default();

    for name in references.iter() {
        if let Some(text) = find_local_declaration(program, source, name) {
            resolved.declarations.push(text.to_string());
            continue;
        }

        let imports = find_imports(program, source, name);
        if imports.is_empty() {
            warn!(file = file_name, name, "unresolved type reference");
        }
        resolved.imports.extend(imports);
    }

    resolved
}

fn declared_type_name<'d>(decl: &'d Declaration<'_>) -> Option<&'d str> {
    match decl {
        Declaration::TSInterfaceDeclaration(interface) => Some(interface.id.name.as_str()),
        Declaration::TSTypeAliasDeclaration(alias) => Some(alias.id.name.as_str()),
        Declaration::ClassDeclaration(class) => class.id.as_ref().map(|id| id.name.as_str()),
        _ => None,
    }
}

/// Source text of the top-level interface, class or type alias called `name`.
fn find_local_declaration<'s>(
    program: &Program<'_>,
    source: &'s str,
    name: &str,
) -> Option<&'s str> {
    program.body.iter().find_map(|stmt| {
        let declared = match stmt {
            Statement::TSInterfaceDeclaration(interface) => Some(interface.id.name.as_str()),
            Statement::TSTypeAliasDeclaration(alias) => Some(alias.id.name.as_str()),
            Statement::ClassDeclaration(class) => class.id.as_ref().map(|id| id.name.as_str()),
            Statement::ExportNamedDeclaration(export) => {
                export.declaration.as_ref().and_then(declared_type_name)
            }
            _ => None,
        };

        (declared == Some(name)).then(|| stmt.span().source_text(source))
    })
}

/// Import lines that bind `name`, one per matching import declaration.
fn find_imports(program: &Program<'_>, source: &str, name: &str) -> Vec<String> {
    program
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ImportDeclaration(import) => import_line_for(import, source, name),
            _ => None,
        })
        .collect()
}

fn import_line_for(import: &ImportDeclaration<'_>, source: &str, name: &str) -> Option<String> {
    let specifiers = import.specifiers.as_ref()?;

    let matching: Vec<&str> = specifiers
        .iter()
        .filter_map(|specifier| match specifier {
            ImportDeclarationSpecifier::ImportSpecifier(s) if s.local.name == name => {
                Some(s.span.source_text(source))
            }
            _ => None,
        })
        .collect();

    if matching.is_empty() {
        return None;
    }

    Some(format!(
        "import {{ {} }} from {};",
        matching.join(", "),
        import.source.span.source_text(source)
    ))
}
