//! Pipeline configuration.

use jmm_compiler::{JasminOptions, StackLimit};

/// Settings for one [`Compiler`](crate::Compiler).
///
/// ```
/// use jmm::{CompilerConfig, StackLimit};
///
/// let config = CompilerConfig::new()
///     .with_stack_limit(StackLimit::Fixed(99))
///     .with_default_super_class("java/lang/Object");
/// assert!(!config.emit_on_errors());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    stack_limit: StackLimit,
    default_super_class: String,
    emit_on_errors: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let options = JasminOptions::default();
        Self {
            stack_limit: options.stack_limit,
            default_super_class: options.default_super_class,
            emit_on_errors: false,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// How `.limit stack` is declared.
    pub fn with_stack_limit(mut self, limit: StackLimit) -> Self {
        self.stack_limit = limit;
        self
    }

    /// Superclass of classes that extend nothing, as an internal name.
    pub fn with_default_super_class<S: Into<String>>(mut self, name: S) -> Self {
        self.default_super_class = name.into();
        self
    }

    /// Keep emitting IR and assembly after error diagnostics.
    pub fn with_emit_on_errors(mut self, emit: bool) -> Self {
        self.emit_on_errors = emit;
        self
    }

    pub fn stack_limit(&self) -> StackLimit {
        self.stack_limit
    }

    pub fn default_super_class(&self) -> &str {
        &self.default_super_class
    }

    pub fn emit_on_errors(&self) -> bool {
        self.emit_on_errors
    }

    /// The bytecode emitter's share of the settings.
    pub fn jasmin_options(&self) -> JasminOptions {
        JasminOptions {
            stack_limit: self.stack_limit,
            default_super_class: self.default_super_class.clone(),
        }
    }
}
