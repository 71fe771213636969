//! Cut modules and packages into translation units.

use crate::config::TranslationConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::discovery::DiscoveredModule;
use crate::units::{ClientModuleUnit, FunctionUnit, ImportUnit, ModuleUnit, TranslationUnit};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use transcoder_syntax::{MemberKind, ModuleMember, Reader};

/// Name of the module whose private helpers are kept.
pub const CLIENT_MODULE: &str = "client";

/// Which members of a module become units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionPolicy {
    /// Public members only.
    #[default]
    Uniform,
    /// Public members, plus underscore-prefixed callables.
    Client,
}

impl ExtractionPolicy {
    pub fn for_module(name: &str) -> Self {
        if name == CLIENT_MODULE {
            ExtractionPolicy::Client
        } else {
            ExtractionPolicy::Uniform
        }
    }

    pub fn admits(self, member: &ModuleMember) -> bool {
        match self {
            ExtractionPolicy::Uniform => member.is_public(),
            ExtractionPolicy::Client => {
                member.is_public() || matches!(member.kind, MemberKind::Callable { .. })
            }
        }
    }
}

/// Build the module unit for one module's members.
///
/// Callables are reparsed from their own source; one that does not hold
/// exactly one function definition is skipped with `ExtractionFailure`.
pub fn extract_module(
    name: &str,
    members: &[ModuleMember],
    reader: &dyn Reader,
    policy: ExtractionPolicy,
    diagnostics: &mut Diagnostics,
) -> ModuleUnit {
    let mut module = ModuleUnit::new(name);

    for member in members.iter().filter(|m| policy.admits(m)) {
        match &member.kind {
            MemberKind::Callable { source } => match FunctionUnit::from_source(source, reader) {
                Ok(unit) => module.add_function(unit),
                Err(err) => diagnostics.report(
                    DiagnosticKind::ExtractionFailure,
                    format!(
                        "Skipping function {} of module {}: {}",
                        member.name, name, err
                    ),
                ),
            },
            MemberKind::Submodule { path } => {
                module.add_import(ImportUnit::new(member.name.clone(), path.clone()))
            }
            MemberKind::Other { shape } => {
                tracing::debug!(module = name, member = %member.name, shape = %shape, "skipping member");
            }
        }
    }

    tracing::debug!(
        module = name,
        functions = module.functions().len(),
        imports = module.imports().len(),
        "extracted module"
    );
    module
}

/// Source text of one module of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    pub name: String,
    pub source: String,
}

impl ModuleSource {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Every unit of a package: the client module and all others by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackageUnits {
    pub client: Option<ClientModuleUnit>,
    pub modules: BTreeMap<String, ModuleUnit>,
}

/// Rendered function units of a package, by module then function name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackageTranslation {
    pub functions: BTreeMap<String, BTreeMap<String, String>>,
    pub diagnostics: Diagnostics,
}

impl PackageUnits {
    /// All module units, client included, in name order.
    pub fn all_modules(&self) -> impl Iterator<Item = &ModuleUnit> {
        let mut all: Vec<&ModuleUnit> = self
            .client
            .iter()
            .map(ClientModuleUnit::module)
            .chain(self.modules.values())
            .collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all.into_iter()
    }

    pub fn function_count(&self) -> usize {
        self.all_modules().map(|m| m.functions().len()).sum()
    }

    /// Render every function unit in parallel. Output and diagnostics come
    /// back in module then function name order.
    pub fn translate(&self, config: &TranslationConfig) -> PackageTranslation {
        let jobs: Vec<(&str, &FunctionUnit)> = self
            .all_modules()
            .flat_map(|module| {
                module
                    .functions()
                    .values()
                    .map(move |unit| (module.name(), unit))
            })
            .collect();

        let rendered: Vec<(&str, &str, String, Diagnostics)> = jobs
            .into_par_iter()
            .map(|(module, unit)| {
                let mut diagnostics = Diagnostics::new();
                let text = unit.templated_source(config, &mut diagnostics);
                (module, unit.name(), text, diagnostics)
            })
            .collect();

        let mut translation = PackageTranslation::default();
        for (module, function, text, diagnostics) in rendered {
            translation
                .functions
                .entry(module.to_string())
                .or_default()
                .insert(function.to_string(), text);
            translation.diagnostics.extend(diagnostics);
        }
        translation
    }
}

/// Extract every module of a package.
///
/// The `client` module goes through [`ExtractionPolicy::Client`]; its
/// absence is reported as `MissingCollaborator` and extraction continues.
pub fn extract_package(
    modules: &[ModuleSource],
    reader: &dyn Reader,
    diagnostics: &mut Diagnostics,
) -> PackageUnits {
    let mut units = PackageUnits::default();

    for module in modules {
        let members = match reader.members(&module.source) {
            Ok(members) => members,
            Err(err) => {
                diagnostics.report(
                    DiagnosticKind::ExtractionFailure,
                    format!("Skipping module {}: {}", module.name, err),
                );
                continue;
            }
        };

        let policy = ExtractionPolicy::for_module(&module.name);
        let unit = extract_module(&module.name, &members, reader, policy, diagnostics);
        match policy {
            ExtractionPolicy::Client => units.client = Some(ClientModuleUnit::new(unit)),
            ExtractionPolicy::Uniform => {
                units.modules.insert(module.name.clone(), unit);
            }
        }
    }

    if units.client.is_none() {
        diagnostics.report(
            DiagnosticKind::MissingCollaborator,
            format!("no {} module in package", CLIENT_MODULE),
        );
    }

    units
}

/// Read discovered module files and extract the package.
pub fn extract_discovered(
    modules: &[DiscoveredModule],
    reader: &dyn Reader,
    diagnostics: &mut Diagnostics,
) -> PackageUnits {
    let mut sources = Vec::with_capacity(modules.len());
    for module in modules {
        match std::fs::read_to_string(&module.path) {
            Ok(source) => sources.push(ModuleSource::new(module.name.clone(), source)),
            Err(err) => diagnostics.report(
                DiagnosticKind::ExtractionFailure,
                format!(
                    "Skipping module {} ({}): {}",
                    module.name,
                    module.path.display(),
                    err
                ),
            ),
        }
    }
    extract_package(&sources, reader, diagnostics)
}
