//! Main translator coordinating the semantic passes.

use crate::diag::Diag;
use crate::ir::TranslationOutcome;
use crate::parsed::SymbolTable;
use crate::semantic::constrained_primitives::determine_constrained_primitives;
use crate::semantic::construction::understand_all;
use crate::semantic::first_pass::{self, Prerequisites};
use crate::semantic::hierarchy_validation::check_hierarchy;
use crate::semantic::inlining::inline_constructors;
use crate::semantic::ontology::Ontology;
use crate::semantic::pattern_verification::understand_verification_functions;
use crate::semantic::resolver::{finalize, resolve};
use crate::semantic::serialization::resolve_serializations;
use crate::semantic::verification::{
    verify_argument_references, verify_contracts, verify_discriminators,
    verify_property_initialization,
};

/// Configuration of the checks on the finished symbol table.
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// Require every mandatory property of a concrete class to be assigned
    /// by its constructor.
    pub verify_property_initialization: bool,

    /// Require every ``:paramref:`` to name an argument of the documented
    /// method or constructor.
    pub verify_argument_references: bool,

    /// Require the classes used as property types, and their concrete
    /// implementers, to serialize with their model type.
    pub verify_discriminators: bool,

    /// Require invariants and contracts to call only verification functions
    /// and built-ins with the right number of arguments, and contracts to
    /// depend only on arguments of their signature.
    pub verify_contracts: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            verify_property_initialization: true,
            verify_argument_references: true,
            verify_discriminators: true,
            verify_contracts: true,
        }
    }
}

impl TranslationConfig {
    pub fn with_property_initialization(mut self, enabled: bool) -> Self {
        self.verify_property_initialization = enabled;
        self
    }

    pub fn with_argument_references(mut self, enabled: bool) -> Self {
        self.verify_argument_references = enabled;
        self
    }

    pub fn with_discriminators(mut self, enabled: bool) -> Self {
        self.verify_discriminators = enabled;
        self
    }

    pub fn with_contracts(mut self, enabled: bool) -> Self {
        self.verify_contracts = enabled;
        self
    }
}

/// Translates a parsed symbol table into the IR.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslationConfig,
}

impl Translator {
    /// Creates a translator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a translator with a custom configuration.
    pub fn with_config(config: TranslationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    /// Runs all passes on `table`.
    ///
    /// # Stages
    ///
    /// 1. Ontology - sort the classes; stops at the first cycle
    /// 2. Hierarchy validation - member conflicts and missing constructors
    /// 3. Constructors, serialization settings and verification functions -
    ///    understood independently, reported together
    /// 4. Constructor inlining
    /// 5. Constrained primitives
    /// 6. First pass - IR nodes with placeholders
    /// 7. Resolution - every placeholder category, then finalization
    /// 8. Verification of the finished table, as configured
    ///
    /// A stage runs only if all previous stages succeeded, since each builds
    /// upon the results of the previous ones. Within a stage, independent
    /// problems are all reported.
    #[tracing::instrument(skip_all, fields(symbols = table.len()))]
    pub fn translate(&self, table: &SymbolTable) -> TranslationOutcome {
        let ontology = match Ontology::build(table) {
            Ok(ontology) => ontology,
            Err(diag) => return TranslationOutcome::failure(vec![diag]),
        };

        let conflicts = check_hierarchy(table, &ontology);
        if !conflicts.is_empty() {
            return TranslationOutcome::failure(conflicts);
        }

        let constructors = understand_all(table);
        let serializations = resolve_serializations(table, &ontology);
        let verifications = understand_verification_functions(table);
        let (constructors, serializations, verifications) =
            match (constructors, serializations, verifications) {
                (Ok(constructors), Ok(serializations), Ok(verifications)) => {
                    (constructors, serializations, verifications)
                }
                (constructors, serializations, verifications) => {
                    let diagnostics: Vec<Diag> =
                        [constructors.err(), serializations.err(), verifications.err()]
                            .into_iter()
                            .flatten()
                            .collect();
                    return TranslationOutcome::failure(diagnostics);
                }
            };

        let inlined = inline_constructors(&ontology, &constructors);

        let constrainees = match determine_constrained_primitives(table, &ontology) {
            Ok(constrainees) => constrainees,
            Err(diagnostics) => return TranslationOutcome::failure(diagnostics),
        };

        let first = match first_pass::run(
            table,
            Prerequisites {
                ontology: &ontology,
                constrainees: &constrainees,
                serializations: &serializations,
                constructors: &inlined,
                verifications: &verifications,
            },
        ) {
            Ok(first) => first,
            Err(diagnostics) => return TranslationOutcome::failure(diagnostics),
        };

        let resolved = match resolve(table, &first) {
            Ok(resolved) => resolved,
            Err(diagnostics) => return TranslationOutcome::failure(diagnostics),
        };
        let symbol_table = finalize(table, &ontology, first, &resolved);

        let mut diagnostics = Vec::new();
        if self.config.verify_discriminators {
            diagnostics.extend(verify_discriminators(&symbol_table));
        }
        if self.config.verify_property_initialization {
            diagnostics.extend(verify_property_initialization(&symbol_table));
        }
        if self.config.verify_argument_references {
            diagnostics.extend(verify_argument_references(&symbol_table));
        }
        if self.config.verify_contracts {
            diagnostics.extend(verify_contracts(&symbol_table));
        }

        if !diagnostics.is_empty() {
            tracing::debug!(errors = diagnostics.len(), "verification failed");
            return TranslationOutcome::failure(diagnostics);
        }

        tracing::debug!(
            symbols = symbol_table.len(),
            interfaces = symbol_table.interfaces().count(),
            "translated the symbol table"
        );
        TranslationOutcome::success(symbol_table)
    }
}
