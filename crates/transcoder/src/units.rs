//! Translation units: the pieces a package is cut into for translation.
//!
//! Only [`FunctionUnit`] renders text. Module, import and client units exist
//! so a caller can lay out the generated package; they render empty.

use crate::config::TranslationConfig;
use crate::diagnostics::Diagnostics;
use crate::translate::{Translation, Translator};
use serde::Serialize;
use std::collections::BTreeMap;
use transcoder_syntax::{FunctionDef, ReadError, Reader};

/// A named unit that can be rendered with a token table.
pub trait TranslationUnit {
    fn name(&self) -> &str;

    /// Target source for this unit. Limitations are recorded in
    /// `diagnostics`; the text degrades instead of failing.
    fn templated_source(&self, config: &TranslationConfig, diagnostics: &mut Diagnostics)
    -> String;
}

/// One callable, parsed standalone from its own source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionUnit {
    name: String,
    definition: FunctionDef,
}

impl FunctionUnit {
    pub fn new(definition: FunctionDef) -> Self {
        Self {
            name: definition.name.clone(),
            definition,
        }
    }

    /// Reparse a callable's source, which must hold exactly one function
    /// definition.
    pub fn from_source(source: &str, reader: &dyn Reader) -> Result<Self, ReadError> {
        reader.read_function(source).map(Self::new)
    }

    pub fn definition(&self) -> &FunctionDef {
        &self.definition
    }

    pub fn translate(&self, config: &TranslationConfig) -> (Translation, Diagnostics) {
        let mut translator = Translator::new(config);
        let translation = translator.function(&self.definition);
        (translation, translator.finish())
    }
}

impl TranslationUnit for FunctionUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn templated_source(
        &self,
        config: &TranslationConfig,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let (translation, collected) = self.translate(config);
        diagnostics.extend(collected);
        translation.into_text()
    }
}

/// A reference from one module to another (`from . import client`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportUnit {
    name: String,
    path: String,
}

impl ImportUnit {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Dotted path of the referenced module.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Enclosing packages of the referenced module, outermost first.
    /// `a.b.c` yields `a`, `a.b`.
    pub fn parents(&self) -> Vec<&str> {
        self.path
            .match_indices('.')
            .map(|(index, _)| &self.path[..index])
            .collect()
    }
}

impl TranslationUnit for ImportUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn templated_source(&self, _: &TranslationConfig, _: &mut Diagnostics) -> String {
        String::new()
    }
}

/// The function and import units of one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleUnit {
    name: String,
    functions: BTreeMap<String, FunctionUnit>,
    imports: BTreeMap<String, ImportUnit>,
}

impl ModuleUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn add_function(&mut self, unit: FunctionUnit) {
        self.functions.insert(unit.name.clone(), unit);
    }

    pub(crate) fn add_import(&mut self, unit: ImportUnit) {
        self.imports.insert(unit.name.clone(), unit);
    }

    pub fn functions(&self) -> &BTreeMap<String, FunctionUnit> {
        &self.functions
    }

    pub fn imports(&self) -> &BTreeMap<String, ImportUnit> {
        &self.imports
    }

    pub fn function(&self, name: &str) -> Option<&FunctionUnit> {
        self.functions.get(name)
    }

    /// Render every function unit, keyed by function name.
    pub fn translate_functions(
        &self,
        config: &TranslationConfig,
        diagnostics: &mut Diagnostics,
    ) -> BTreeMap<String, String> {
        self.functions
            .iter()
            .map(|(name, unit)| (name.clone(), unit.templated_source(config, diagnostics)))
            .collect()
    }
}

impl TranslationUnit for ModuleUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn templated_source(&self, _: &TranslationConfig, _: &mut Diagnostics) -> String {
        String::new()
    }
}

/// The `client` module: the transport helpers every other module calls into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClientModuleUnit {
    module: ModuleUnit,
}

impl ClientModuleUnit {
    pub fn new(module: ModuleUnit) -> Self {
        Self { module }
    }

    pub fn module(&self) -> &ModuleUnit {
        &self.module
    }
}

impl TranslationUnit for ClientModuleUnit {
    fn name(&self) -> &str {
        &self.module.name
    }

    fn templated_source(&self, _: &TranslationConfig, _: &mut Diagnostics) -> String {
        String::new()
    }
}
