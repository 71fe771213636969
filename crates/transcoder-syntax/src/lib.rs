//! Syntax node IR and source readers for the transcoder.
//!
//! `transcoder-syntax` is the front-end half of the transcoder: it parses
//! source text of the authoritative library into a closed syntax tree and
//! enumerates a module's top-level members, each with its own source text so
//! that callables can be reparsed standalone.
//!
//! # Architecture
//!
//! ```text
//! Source              Front-end                 Translator
//! ──────────    ─────────────────────    ──────────────────────
//! module.py ──> members() ─> Callable ──> read_function() ─> FunctionDef
//!                        └─> Submodule
//! ```
//!
//! The IR mirrors the shape of the source language's own syntax tree, but
//! only for the constructs the translator has rules for. Everything else is
//! kept as an opaque [`Expr::Other`] / [`Stmt::Other`] node so the
//! translator can report it instead of silently losing it.
//!
//! # Example
//!
//! ```ignore
//! use transcoder_syntax::input::read_python_function;
//!
//! let def = read_python_function("def f(a, b):\n    return a\n")?;
//! assert_eq!(def.params, vec!["a", "b"]);
//! ```

pub mod ir;
pub mod member;
pub mod registry;
pub mod traits;

pub mod input;

// Re-exports: IR types
pub use ir::{
    BinaryOperator, BooleanOperator, CompareOperator, Constant, DictEntry, Expr, FunctionDef,
    Keyword, Module, Stmt,
};

// Re-exports: module members
pub use member::{MemberKind, ModuleMember};

// Re-exports: Traits
pub use traits::{ReadError, Reader};

// Re-exports: Registry
pub use registry::{reader_for_extension, reader_for_language, readers, register_reader};

// Re-exports: Built-in readers
#[cfg(feature = "read-python")]
pub use input::python::PythonReader;
#[cfg(feature = "read-python")]
pub use input::{read_python, read_python_function, read_python_members};
