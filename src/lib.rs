//! Template monomorphization preprocessor.
//!
//! `monomorph` rewrites a tree of declaration files written in a C-family
//! style so that a consumer with no notion of parametric types can read
//! them. Template definitions like `template<typename T> struct Box { T
//! value; };` are replaced by a non-parametric placeholder, every use site
//! `Box<int>` triggers a monomorphized `struct Box_int { ... };` emitted
//! ahead of the use, and the use itself is rewritten to the generated
//! name. Files are discovered through `import "path"` directives and the
//! transformed tree is written to a staging directory alongside a
//! bidirectional original ↔ processed path map.
//!
//! The transformation is lexical and best-effort: anything that is not a
//! recognizable definition or use site is copied through byte-for-byte,
//! and running the transformer over its own output is the identity.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use monomorph::process_source;
//!
//! let source = "template<typename T> struct Box { T value; };\nBox<int> b;\n";
//! let result = process_source(Path::new("widgets.gx"), source);
//!
//! assert!(result.had_templates);
//! assert!(result.processed.contains("struct Box { void* value; };"));
//! assert!(result.processed.contains("struct Box_int { int value; };"));
//! assert!(result.processed.contains("Box_int b;"));
//! ```
//!
//! For whole trees, [`process_tree`] stages every reachable file and
//! returns a [`PreprocessResult`]; pass it to [`cleanup`] to drop the
//! staging directory when done.

pub mod driver;
pub mod eval;
pub mod imports;
pub mod scan;
pub mod template;
pub mod transform;

pub use driver::{cleanup, process_tree, PreprocessResult};
pub use eval::{evaluate, reduce_bracket_expressions, EvalError};
pub use imports::extract_imports;
pub use transform::{process_source, FileProcessResult};
