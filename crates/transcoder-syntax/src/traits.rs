//! Traits for language readers.

use crate::ir::{FunctionDef, Module, Stmt};
use crate::member::ModuleMember;

/// Error that can occur when reading source code into IR.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported syntax: {0}")]
    Unsupported(String),

    #[error("expected {expected}, got {got}")]
    UnexpectedNode { expected: String, got: String },
}

/// A reader parses source code into the syntax IR.
pub trait Reader: Send + Sync {
    /// Language identifier (e.g., "python").
    fn language(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["py"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse a whole source file into the IR.
    fn read(&self, source: &str) -> Result<Module, ReadError>;

    /// List the top-level members of a module, each with its own source text.
    fn members(&self, source: &str) -> Result<Vec<ModuleMember>, ReadError>;

    /// Parse the isolated source of one callable.
    ///
    /// The source must hold exactly one top-level statement and that
    /// statement must be a function definition.
    fn read_function(&self, source: &str) -> Result<FunctionDef, ReadError> {
        let module = self.read(source)?;
        let mut body = module.body.into_iter();
        match (body.next(), body.next()) {
            (Some(Stmt::FunctionDef(def)), None) => Ok(def),
            (Some(Stmt::FunctionDef(_)), Some(extra)) => Err(ReadError::UnexpectedNode {
                expected: "a single function definition".into(),
                got: format!("trailing {}", extra.kind_name()),
            }),
            (Some(other), _) => Err(ReadError::UnexpectedNode {
                expected: "FunctionDef".into(),
                got: other.kind_name().to_string(),
            }),
            (None, _) => Err(ReadError::UnexpectedNode {
                expected: "FunctionDef".into(),
                got: "empty source".into(),
            }),
        }
    }
}
