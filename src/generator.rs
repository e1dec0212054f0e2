//! The declaration generator: discover, read, analyze, render, write.
//!
//! Files are analyzed in parallel, but fragments are collected in discovery
//! order and written once, so the output is byte-identical across runs.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{GeneratorOptions, PackageManifest};
use crate::declaration::{module_name, OUTPUT_HEADER};
use crate::discovery::discover_files;
use crate::emit::{DeclarationEmitter, OxcDeclarationEmitter};
use crate::error::{DtsError, Result};
use crate::transformer::{Transform, Transformer};

#[cfg(feature = "napi")]
use napi_derive::napi;

pub struct Generator<E = OxcDeclarationEmitter> {
    manifest: PackageManifest,
    options: GeneratorOptions,
    /// Canonical entry point.
    input: PathBuf,
    /// Directory discovery starts from.
    root: PathBuf,
    output: PathBuf,
    emitter: E,
}

impl Generator<OxcDeclarationEmitter> {
    /// Set up a run for the entry point `input`, relative to `options.cwd`.
    ///
    /// Fails when the entry point or `package.json` is missing, or when no output
    /// path is given and the manifest has no `types` field.
    pub fn new(input: impl AsRef<Path>, options: GeneratorOptions) -> Result<Self> {
        let emitter = OxcDeclarationEmitter {
            strip_internal: options.strip_internal,
        };
        Self::with_emitter(input, options, emitter)
    }
}

impl<E: DeclarationEmitter> Generator<E> {
    pub fn with_emitter(input: impl AsRef<Path>, options: GeneratorOptions, emitter: E) -> Result<Self> {
        let manifest = PackageManifest::load(&options.cwd)?;

        let input_path = options.cwd.join(input.as_ref());
        let input = input_path
            .canonicalize()
            .map_err(|e| DtsError::io(&input_path, e))?;
        let root = input
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| DtsError::Config(format!("entry point {} has no parent directory", input.display())))?;

        let output = match (&options.output, &manifest.types) {
            (Some(output), _) => options.cwd.join(output),
            (None, Some(types)) => options.cwd.join(types),
            (None, None) => {
                return Err(DtsError::Config(
                    "no output path given and package.json has no `types` field".to_string(),
                ))
            }
        };

        debug!(
            package = %manifest.name,
            input = %input.display(),
            output = %output.display(),
            "generator configured"
        );

        Ok(Self {
            manifest,
            options,
            input,
            root,
            output,
            emitter,
        })
    }

    pub fn package_name(&self) -> &str {
        &self.manifest.name
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Discover files and build a transformer for each one that contributes.
    pub fn read(&self) -> Result<Vec<Transformer>> {
        // A previous run's output inside the root must not be read back as a source.
        let previous_output = self.output.canonicalize().ok();
        let files = discover_files(
            &self.root,
            &self.input,
            previous_output.as_deref(),
            &self.options,
        )?;
        debug!(count = files.len(), "discovered files");

        let loaded = files
            .par_iter()
            .map(|file| {
                let name = module_name(&self.manifest.name, &self.root, &file.path, file.is_entry);
                Transformer::load(file.kind, &file.path, name)
            })
            .collect::<Result<Vec<Option<Transformer>>>>()?;

        Ok(loaded.into_iter().flatten().collect())
    }

    /// Analyze and render every transformer, keeping their order.
    pub fn generate(&self, transformers: Vec<Transformer>) -> Result<Vec<String>> {
        let emitter: &dyn DeclarationEmitter = &self.emitter;
        transformers
            .into_par_iter()
            .map(|mut transformer| -> Result<String> {
                transformer.analyze(emitter)?;
                Ok(transformer.render())
            })
            .collect()
    }

    /// The complete declaration file text.
    pub fn render(&self) -> Result<String> {
        let fragments = self.generate(self.read()?)?;
        Ok(assemble(&fragments))
    }

    /// Run the whole pipeline and write the output file. Returns the number of
    /// module fragments written.
    pub fn write(&self) -> Result<usize> {
        let fragments = self.generate(self.read()?)?;
        let text = assemble(&fragments);

        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| DtsError::io(parent, e))?;
            }
        }
        fs::write(&self.output, text).map_err(|e| DtsError::io(&self.output, e))?;

        info!(
            package = %self.manifest.name,
            modules = fragments.len(),
            output = %self.output.display(),
            "wrote declarations"
        );
        Ok(fragments.len())
    }
}

fn assemble(fragments: &[String]) -> String {
    let mut text = String::from(OUTPUT_HEADER);
    for fragment in fragments {
        text.push_str(fragment);
    }
    text
}

/// Generate the declaration file for `input`, relative to the process's working
/// directory. Returns the number of module fragments written.
#[cfg(feature = "napi")]
#[napi]
pub fn generate_declarations_native(
    input: String,
    output: Option<String>,
    extensions: Option<Vec<String>>,
    strip_internal: Option<bool>,
) -> napi::Result<u32> {
    let mut options = GeneratorOptions::default().with_strip_internal(strip_internal.unwrap_or(false));
    if let Some(output) = output {
        options = options.with_output(output);
    }
    if let Some(extensions) = extensions {
        options = options.with_extensions(extensions);
    }

    let count = Generator::new(input, options)
        .and_then(|generator| generator.write())
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(count as u32)
}
