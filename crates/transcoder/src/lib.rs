//! Token-table-driven translation of a Python client library into other
//! languages.
//!
//! The translator walks the syntax tree produced by [`transcoder_syntax`]
//! and renders each node by concatenating strings taken from a per-target
//! [`TranslationConfig`]. No target language is built in: a new target is a
//! new token table.
//!
//! # Pipeline
//!
//! ```text
//! package dir ─> discover() ─> extract_discovered() ─> PackageUnits ─> translate()
//!                                   │                                    │
//!                                   └── Reader::members()                └── Translator
//! ```
//!
//! Nothing along the way aborts on an unsupported construct. The node
//! renders empty and a [`Diagnostic`] is recorded, so callers can treat a
//! clean [`Diagnostics`] as the acceptance gate for generated output.
//!
//! # Example
//!
//! ```
//! use transcoder::{TranslationConfig, translate_function};
//! use transcoder_syntax::{Expr, FunctionDef, Stmt};
//!
//! let config = TranslationConfig::from_pairs([
//!     ("function.define_key", "fn "),
//!     ("function.open_body", " {"),
//!     ("function.close_body", "\n}"),
//!     ("function.return_key", "return "),
//! ])
//! .unwrap();
//! let def = FunctionDef::new("id", vec!["x".into()], vec![Stmt::return_stmt(Some(Expr::name("x")))]);
//!
//! let (translation, diagnostics) = translate_function(&def, &config);
//! assert_eq!(translation.text(), "fn id(x) {\n\treturn x\n}");
//! assert!(diagnostics.is_clean());
//! ```

pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod extract;
pub mod operators;
pub mod translate;
pub mod units;

pub use config::{ConfigError, TranslationConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Level};
pub use discovery::{DiscoveredModule, DiscoveryError, discover};
pub use extract::{
    CLIENT_MODULE, ExtractionPolicy, ModuleSource, PackageTranslation, PackageUnits,
    extract_discovered, extract_module, extract_package,
};
pub use translate::{Translation, Translator, translate_expr, translate_function, translate_stmt};
pub use units::{ClientModuleUnit, FunctionUnit, ImportUnit, ModuleUnit, TranslationUnit};
