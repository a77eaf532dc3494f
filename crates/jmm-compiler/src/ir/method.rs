//! Methods, fields and the class unit.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use super::{Element, Instruction, IrType};

/// Access modifier of a class, field or method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessModifier {
    Public,
    Private,
    Protected,
    /// No keyword.
    #[default]
    Default,
}

impl AccessModifier {
    /// Lowercase keyword, or `None` for package access.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            AccessModifier::Public => Some("public"),
            AccessModifier::Private => Some("private"),
            AccessModifier::Protected => Some("protected"),
            AccessModifier::Default => None,
        }
    }
}

bitflags! {
    /// Method qualifiers beyond access.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodFlags: u8 {
        const STATIC = 1 << 0;
        const FINAL = 1 << 1;
    }
}

/// Virtual register assigned to a named operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub reg: u16,
    pub ty: IrType,
}

/// One method of a [`ClassUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    /// The implicit constructor; emitted as the default `<init>`.
    pub is_construct: bool,
    pub access: AccessModifier,
    pub modifiers: MethodFlags,
    pub params: Vec<Element>,
    pub return_type: IrType,
    pub instructions: Vec<Instruction>,
    /// Label name to the index of the instruction it precedes. An index equal
    /// to the instruction count marks the end of the method.
    pub labels: FxHashMap<String, usize>,
    pub var_table: FxHashMap<String, Descriptor>,
}

impl Method {
    /// A public instance method with no body.
    pub fn new(name: impl Into<String>, return_type: IrType) -> Self {
        Self {
            name: name.into(),
            is_construct: false,
            access: AccessModifier::Public,
            modifiers: MethodFlags::empty(),
            params: Vec::new(),
            return_type,
            instructions: Vec::new(),
            labels: FxHashMap::default(),
            var_table: FxHashMap::default(),
        }
    }

    /// The implicit constructor of `class`.
    pub fn construct(class: impl Into<String>) -> Self {
        Self {
            is_construct: true,
            ..Self::new(class, IrType::Void)
        }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(MethodFlags::STATIC)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(MethodFlags::FINAL)
    }

    // ==========================================================================
    // Graph construction
    // ==========================================================================

    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.modifiers |= flags;
        self
    }

    pub fn with_access(mut self, access: AccessModifier) -> Self {
        self.access = access;
        self
    }

    /// Append a parameter and give it the next free register.
    pub fn param(mut self, name: &str, ty: IrType) -> Self {
        self.params.push(Element::operand(name, ty.clone()));
        self.var(name, ty);
        self
    }

    /// Register a variable if it has no register yet. Instance methods
    /// reserve register 0 for `this`.
    pub fn var(&mut self, name: &str, ty: IrType) -> u16 {
        if let Some(existing) = self.var_table.get(name) {
            return existing.reg;
        }
        let reserved = u16::from(!self.is_static());
        let reg = self.var_table.len() as u16 + reserved;
        self.var_table.insert(name.to_string(), Descriptor { reg, ty });
        reg
    }

    /// Append an instruction, registering the operands it writes.
    pub fn push(&mut self, instruction: Instruction) {
        if let Instruction::Assign {
            dest: Element::Operand { name, ty },
            ..
        } = &instruction
        {
            let (name, ty) = (name.clone(), ty.clone());
            self.var(&name, ty);
        }
        self.instructions.push(instruction);
    }

    /// Label the next instruction pushed.
    pub fn label(&mut self, name: impl Into<String>) {
        self.labels.insert(name.into(), self.instructions.len());
    }

    /// Labels that precede instruction `index`, sorted by name.
    pub fn labels_at(&self, index: usize) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .labels
            .iter()
            .filter(|(_, at)| **at == index)
            .map(|(name, _)| name.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }

    /// Entries of the var table other than `this`.
    pub fn variable_count(&self) -> usize {
        self.var_table.keys().filter(|name| name.as_str() != "this").count()
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: IrType,
    pub access: AccessModifier,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
            access: AccessModifier::Public,
        }
    }
}

/// The IR graph of one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUnit {
    pub name: String,
    pub access: AccessModifier,
    pub super_class: Option<String>,
    /// Qualified import names, e.g. `java.io.Console`.
    pub imports: Vec<String>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

impl ClassUnit {
    /// A public class with only its implicit constructor.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            methods: vec![Method::construct(name.clone())],
            name,
            access: AccessModifier::Public,
            super_class: None,
            imports: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| !m.is_construct && m.name == name)
    }

    /// Internal name of a class: the matching import with `.` replaced by
    /// `/`, or the name unchanged.
    pub fn resolve_class(&self, name: &str) -> String {
        let suffix = format!(".{name}");
        self.imports
            .iter()
            .find(|import| import.ends_with(&suffix) || import.as_str() == name)
            .map_or_else(|| name.to_string(), |import| import.replace('.', "/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_skip_this_for_instance_methods() {
        let mut m = Method::new("run", IrType::Void).param("a", IrType::Int32);
        assert_eq!(m.var("b", IrType::Boolean), 2);
        assert_eq!(m.var("a", IrType::Int32), 1);

        let mut s = Method::new("main", IrType::Void)
            .with_flags(MethodFlags::STATIC)
            .param("args", IrType::Array(Box::new(IrType::String)));
        assert_eq!(s.var("x", IrType::Int32), 1);
        assert_eq!(s.var_table["args"].reg, 0);
    }

    #[test]
    fn assignments_register_their_destination() {
        let mut m = Method::new("run", IrType::Void);
        m.push(Instruction::assign(
            Element::operand("t0", IrType::Int32),
            Instruction::SingleOp(Element::literal(1)),
        ));
        assert_eq!(m.var_table["t0"], Descriptor { reg: 1, ty: IrType::Int32 });
        assert_eq!(m.variable_count(), 1);
    }

    #[test]
    fn labels_point_at_the_next_instruction() {
        let mut m = Method::new("run", IrType::Void);
        m.label("b");
        m.label("a");
        m.push(Instruction::Goto("a".into()));
        m.label("end");
        assert_eq!(m.labels_at(0), vec!["a", "b"]);
        assert_eq!(m.labels_at(1), vec!["end"]);
    }

    #[test]
    fn class_resolution_through_imports() {
        let mut unit = ClassUnit::new("A");
        unit.imports = vec!["java.io.Console".into(), "io".into()];
        assert_eq!(unit.resolve_class("Console"), "java/io/Console");
        assert_eq!(unit.resolve_class("io"), "io");
        assert_eq!(unit.resolve_class("Other"), "Other");
        assert!(unit.methods[0].is_construct);
        assert!(unit.method("A").is_none());
    }

    #[test]
    fn access_keywords() {
        assert_eq!(AccessModifier::Public.keyword(), Some("public"));
        assert_eq!(AccessModifier::Default.keyword(), None);
    }
}
