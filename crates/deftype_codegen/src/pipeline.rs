//! The compile pipeline: source text to declaration tree.
//!
//! Parse, fill shorthand defaults, build the semantic model, validate,
//! generate. Any failure aborts the compilation with one error.

use deftype_foundation::{CompilerConfig, Result};
use deftype_language::{AbstractSyntaxTree, ConventionsDecl, apply_defaults, parse};
use deftype_semantic::SemanticModel;
use tracing::{debug, info};

use crate::generator::CodeGenerator;
use crate::tree::CompilationOutput;

/// A configured compiler.
///
/// Holds no per-compilation state, so one compiler can be reused and
/// shared across threads.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: CompilerConfig,
    base_conventions: ConventionsDecl,
    source_name: Option<String>,
}

impl Compiler {
    /// Creates a compiler with the default configuration and empty base
    /// conventions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the base conventions a `defconventions` declaration overrides.
    #[must_use]
    pub fn with_base_conventions(mut self, conventions: ConventionsDecl) -> Self {
        self.base_conventions = conventions;
        self
    }

    /// Names the source in error context, e.g. a file path.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles DSL source to a declaration tree.
    ///
    /// # Errors
    /// Returns the parse error, or the first semantic or generation error.
    pub fn compile(&self, source: &str) -> Result<CompilationOutput> {
        info!(bytes = source.len(), source = self.source_name.as_deref(), "compiling");
        parse(source)
            .and_then(|ast| self.compile_ast(&ast))
            .map_err(|err| match &self.source_name {
                Some(name) => err.in_source(name.clone()),
                None => err,
            })
    }

    /// Compiles an already parsed tree.
    ///
    /// # Errors
    /// Returns the first semantic or generation error.
    pub fn compile_ast(&self, ast: &AbstractSyntaxTree) -> Result<CompilationOutput> {
        let ast = apply_defaults(ast, &self.config.default_property_name);
        let model = SemanticModel::new(&ast, &self.base_conventions, self.config.clone());
        model.validate()?;
        debug!(known_types = model.known_types()?.len(), "semantic model validated");
        let output = CodeGenerator::new(&model).generate_all()?;
        info!(
            namespaces = output.namespaces.len(),
            types = output.types().count(),
            "compiled"
        );
        Ok(output)
    }
}

/// Compiles DSL source with the default configuration.
///
/// # Errors
/// See [`Compiler::compile`].
pub fn compile(source: &str) -> Result<CompilationOutput> {
    Compiler::new().compile(source)
}
