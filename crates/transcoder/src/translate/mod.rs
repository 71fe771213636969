//! Token-table-driven translation of syntax trees to target source text.
//!
//! Every node either renders or degrades to empty text with exactly one
//! diagnostic. A failing child contributes empty text and its parent keeps
//! going, so one unsupported construct never takes a whole function down.

mod expr;
mod stmt;

use crate::config::{TokenName, TokenTable, TranslationConfig};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use serde::Serialize;
use transcoder_syntax::{Expr, FunctionDef, Stmt};

/// Outcome of translating one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Translation {
    Translated(String),
    Unsupported(DiagnosticKind),
}

impl Translation {
    /// Rendered text, empty when unsupported.
    pub fn text(&self) -> &str {
        match self {
            Translation::Translated(text) => text,
            Translation::Unsupported(_) => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Translation::Translated(text) => text,
            Translation::Unsupported(_) => String::new(),
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, Translation::Translated(_))
    }
}

/// Why a node could not render.
#[derive(Debug)]
struct Unsupported {
    kind: DiagnosticKind,
    message: String,
}

impl Unsupported {
    fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn construct(kind_name: &str) -> Self {
        Self::new(
            DiagnosticKind::UnsupportedConstruct,
            format!("no translation for {} nodes", kind_name),
        )
    }
}

type Fragment = Result<String, Unsupported>;

/// Translator bound to one token table, collecting diagnostics as it goes.
pub struct Translator<'c> {
    config: &'c TranslationConfig,
    diagnostics: Diagnostics,
}

impl<'c> Translator<'c> {
    pub fn new(config: &'c TranslationConfig) -> Self {
        Self {
            config,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn expr(&mut self, expr: &Expr) -> Translation {
        let fragment = self.render_expr(expr);
        self.settle(fragment)
    }

    pub fn stmt(&mut self, stmt: &Stmt) -> Translation {
        let fragment = self.render_stmt(stmt);
        self.settle(fragment)
    }

    pub fn function(&mut self, def: &FunctionDef) -> Translation {
        let fragment = self.render_function(def);
        self.settle(fragment)
    }

    pub fn finish(self) -> Diagnostics {
        self.diagnostics
    }

    fn settle(&mut self, fragment: Fragment) -> Translation {
        match fragment {
            Ok(text) => Translation::Translated(text),
            Err(unsupported) => {
                self.diagnostics
                    .report(unsupported.kind, unsupported.message);
                Translation::Unsupported(unsupported.kind)
            }
        }
    }

    /// Token the current node cannot render without.
    fn require<T: TokenName>(&self, table: &'c TokenTable<T>, token: T) -> Result<&'c str, Unsupported> {
        table.get(token).ok_or_else(|| {
            Unsupported::new(
                DiagnosticKind::MissingToken,
                format!("token {} is not configured", token.qualified()),
            )
        })
    }

    /// Join rendered items. The separator is only needed between two or more.
    fn join<T: TokenName>(
        &self,
        items: Vec<String>,
        table: &'c TokenTable<T>,
        separator: T,
    ) -> Fragment {
        if items.len() < 2 {
            return Ok(items.concat());
        }
        let separator = self.require(table, separator)?;
        Ok(items.join(separator))
    }

    /// Render a block body: one `\n\t` per statement, with a bare expression
    /// in first position (a docstring) elided.
    fn body(&mut self, body: &[Stmt]) -> String {
        let mut out = String::new();
        for (index, stmt) in body.iter().enumerate() {
            if index == 0 && matches!(stmt, Stmt::Expr(_)) {
                continue;
            }
            out.push_str("\n\t");
            out.push_str(self.stmt(stmt).text());
        }
        out
    }
}

/// Translate one expression with a fresh collector.
pub fn translate_expr(expr: &Expr, config: &TranslationConfig) -> (Translation, Diagnostics) {
    let mut translator = Translator::new(config);
    let translation = translator.expr(expr);
    (translation, translator.finish())
}

/// Translate one statement with a fresh collector.
pub fn translate_stmt(stmt: &Stmt, config: &TranslationConfig) -> (Translation, Diagnostics) {
    let mut translator = Translator::new(config);
    let translation = translator.stmt(stmt);
    (translation, translator.finish())
}

/// Translate one function definition with a fresh collector.
pub fn translate_function(
    def: &FunctionDef,
    config: &TranslationConfig,
) -> (Translation, Diagnostics) {
    let mut translator = Translator::new(config);
    let translation = translator.function(def);
    (translation, translator.finish())
}
