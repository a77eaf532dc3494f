//! Bytecode assembly emission.
//!
//! Turns a built [`ClassUnit`] into Jasmin assembly text for an external
//! assembler:
//!
//! ```text
//! .class public Calc
//! .super java/lang/Object
//! .field public total I
//!
//! .method public <init>()V
//!    aload_0
//!    invokespecial java/lang/Object/<init>()V
//!    return
//! .end method
//!
//! .method public add(II)I
//!    .limit stack 2
//!    .limit locals 3
//!    iload_1
//!    iload_2
//!    iadd
//!    ireturn
//! .end method
//! ```
//!
//! Class names are resolved through the unit's imports: `Console` becomes
//! `java/io/Console` when `java.io.Console` is imported.

mod instr;
mod stack;

pub use stack::StackDepth;

use std::fmt::Write as _;

use jmm_core::InternalError;

use crate::ir::{ClassUnit, IrType, Method};

type Result<T> = std::result::Result<T, InternalError>;

/// Line terminator of the assembly text.
const NL: &str = "\n";
/// Indentation of instructions inside a method.
const TAB: &str = "   ";

/// How the `.limit stack` directive is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackLimit {
    /// The exact maximum depth reached while emitting.
    #[default]
    Computed,
    /// A constant upper bound.
    Fixed(u16),
}

/// Bytecode emission settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JasminOptions {
    pub stack_limit: StackLimit,
    /// Internal name of the superclass of classes that declare none.
    pub default_super_class: String,
}

impl Default for JasminOptions {
    fn default() -> Self {
        Self {
            stack_limit: StackLimit::Computed,
            default_super_class: "java/lang/Object".to_string(),
        }
    }
}

/// The narrowest instruction pushing the int `value`.
///
/// ```text
/// -1..=5            iconst_m1, iconst_N
/// -128..=127        bipush N
/// -32768..=32767    sipush N
/// otherwise         ldc N
/// ```
pub fn push_constant(value: i32) -> String {
    match value {
        -1 => "iconst_m1".to_string(),
        0..=5 => format!("iconst_{value}"),
        -128..=127 => format!("bipush {value}"),
        -32768..=32767 => format!("sipush {value}"),
        _ => format!("ldc {value}"),
    }
}

/// Type descriptor: `I`, `Z`, `V`, `Ljava/lang/String;`, `[I`, `LName;`.
pub(crate) fn descriptor(unit: &ClassUnit, ty: &IrType) -> String {
    match ty {
        IrType::Int32 => "I".to_string(),
        IrType::Boolean => "Z".to_string(),
        IrType::String => "Ljava/lang/String;".to_string(),
        IrType::Void => "V".to_string(),
        IrType::Array(element) => format!("[{}", descriptor(unit, element)),
        IrType::Object(name) | IrType::Class(name) | IrType::This(name) => {
            format!("L{};", unit.resolve_class(name))
        }
    }
}

/// Emits assembly for one class unit.
pub struct JasminGenerator<'a> {
    unit: &'a ClassUnit,
    options: &'a JasminOptions,
}

impl<'a> JasminGenerator<'a> {
    pub fn new(unit: &'a ClassUnit, options: &'a JasminOptions) -> Self {
        Self { unit, options }
    }

    /// Emit the whole class.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(&self) -> Result<String> {
        let unit = self.unit;
        let mut code = String::from(".class ");
        if let Some(keyword) = unit.access.keyword() {
            let _ = write!(code, "{keyword} ");
        }
        let _ = write!(code, "{}{NL}.super {}{NL}", unit.name, self.super_class());

        for field in &unit.fields {
            code.push_str(".field ");
            if let Some(keyword) = field.access.keyword() {
                let _ = write!(code, "{keyword} ");
            }
            let _ = write!(code, "{} {}{NL}", field.name, descriptor(unit, &field.ty));
        }

        for method in &unit.methods {
            if method.is_construct {
                code.push_str(&self.constructor());
            } else {
                code.push_str(&self.method(method)?);
            }
        }

        log::debug!(
            "assembly emitted for class {} ({} methods)",
            unit.name,
            unit.methods.len()
        );
        Ok(code)
    }

    fn super_class(&self) -> String {
        match &self.unit.super_class {
            Some(name) => self.unit.resolve_class(name),
            None => self.options.default_super_class.clone(),
        }
    }

    /// `<init>` calling the superclass constructor.
    fn constructor(&self) -> String {
        format!(
            "{NL}.method public <init>()V{NL}\
             {TAB}aload_0{NL}\
             {TAB}invokespecial {}/<init>()V{NL}\
             {TAB}return{NL}\
             .end method{NL}",
            self.super_class()
        )
    }

    fn method(&self, method: &Method) -> Result<String> {
        log::trace!("emitting method {}", method.name);
        let body = instr::MethodEmitter::new(self.unit, method).emit()?;

        let mut code = format!("{NL}.method ");
        if let Some(keyword) = method.access.keyword() {
            let _ = write!(code, "{keyword} ");
        }
        if method.is_static() {
            code.push_str("static ");
        }
        if method.is_final() {
            code.push_str("final ");
        }

        let params: String = method
            .params
            .iter()
            .map(|p| descriptor(self.unit, p.ty()))
            .collect();
        let _ = write!(
            code,
            "{}({params}){}{NL}",
            method.name,
            descriptor(self.unit, &method.return_type)
        );

        let stack = match self.options.stack_limit {
            StackLimit::Computed => body.max_stack,
            StackLimit::Fixed(limit) => limit,
        };
        let locals = method.variable_count() + usize::from(!method.is_static());
        let _ = write!(code, "{TAB}.limit stack {stack}{NL}{TAB}.limit locals {locals}{NL}");
        code.push_str(&body.code);
        let _ = write!(code, ".end method{NL}");
        Ok(code)
    }
}
