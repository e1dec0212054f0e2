//! # svelte-dts
//!
//! Generates a single ambient TypeScript declaration file for a Svelte
//! component library.
//!
//! Starting from the library's entry point, every `.svelte`, `.ts` and `.js`
//! file in the entry's directory tree contributes one `declare module` block:
//!
//! - **Components** with a `lang="ts"` instance script become a class extending
//!   `SvelteComponentTyped<Props, Events, Slots>`. Props come from exported
//!   variables, events from the type argument of `createEventDispatcher`, and
//!   slot props from the attributes of `<slot>` elements. Type names used by
//!   props are either inlined from the script or re-imported.
//! - **TypeScript modules** are re-declared from their emitted declarations.
//! - **JavaScript modules** are declared opaquely.
//!
//! The entry point is declared under the package name; every other file under
//! `<package>/<relative dir>/<file name>`.
//!
//! ```no_run
//! use svelte_dts::{Generator, GeneratorOptions};
//!
//! let options = GeneratorOptions::new("my-lib").with_output("types/index.d.ts");
//! let count = Generator::new("src/index.ts", options)?.write()?;
//! println!("{count} modules declared");
//! # Ok::<(), svelte_dts::DtsError>(())
//! ```

pub mod config;
pub mod declaration;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod generator;
pub mod javascript;
pub mod resolve;
pub mod script;
pub mod surface;
pub mod svelte;
pub mod template;
pub mod tracing_config;
pub mod transformer;
pub mod typescript;

pub use config::{GeneratorOptions, PackageManifest};
pub use emit::{DeclarationEmitter, OxcDeclarationEmitter};
pub use error::{DtsError, Result};
pub use generator::Generator;
pub use surface::{ComponentSurface, Event, Prop, SlotProp};
pub use transformer::{FileKind, Transform, Transformer};

#[cfg(feature = "napi")]
pub use generator::generate_declarations_native;

#[cfg(test)]
mod surface_tests;
