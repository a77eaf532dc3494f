//! Per-instruction lowering.

use std::fmt::Write as _;

use jmm_core::InternalError;

use super::{NL, Result, StackDepth, TAB, descriptor, push_constant};
use crate::ir::{
    BinaryOpKind, CallInstruction, CallKind, ClassUnit, Element, Instruction, IrType, Method,
};

/// Instruction text of one method with its deepest stack.
pub(super) struct MethodBody {
    pub(super) code: String,
    pub(super) max_stack: u16,
}

/// Emits the instructions of one method.
pub(super) struct MethodEmitter<'a> {
    unit: &'a ClassUnit,
    method: &'a Method,
    code: String,
    stack: StackDepth,
    comparisons: u32,
}

impl<'a> MethodEmitter<'a> {
    pub(super) fn new(unit: &'a ClassUnit, method: &'a Method) -> Self {
        Self {
            unit,
            method,
            code: String::new(),
            stack: StackDepth::new(),
            comparisons: 0,
        }
    }

    pub(super) fn emit(mut self) -> Result<MethodBody> {
        let method = self.method;
        for (index, instruction) in method.instructions.iter().enumerate() {
            self.labels(index);
            self.instruction(instruction)?;
        }
        self.labels(method.instructions.len());
        Ok(MethodBody {
            code: self.code,
            max_stack: self.stack.max(),
        })
    }

    fn labels(&mut self, index: usize) {
        let method = self.method;
        for label in method.labels_at(index) {
            let _ = write!(self.code, "{label}:{NL}");
        }
    }

    fn line(&mut self, text: &str) {
        let _ = write!(self.code, "{TAB}{text}{NL}");
    }

    fn unsupported(&self, what: impl Into<String>) -> InternalError {
        InternalError::UnsupportedInstruction {
            what: what.into(),
            method: self.method.name.clone(),
        }
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    fn instruction(&mut self, instruction: &Instruction) -> Result<()> {
        match instruction {
            Instruction::Assign { dest, rhs } => self.assign(dest, rhs),
            Instruction::Call(call) => {
                let left = self.call(call)?;
                for _ in 0..left {
                    self.line("pop");
                    self.stack.pop(1);
                }
                // The reference duplicated by `new` is still on the stack.
                if call.kind == CallKind::InvokeSpecial
                    && call.return_type == IrType::Void
                    && !matches!(call.caller.ty(), IrType::This(_))
                {
                    self.line("pop");
                    self.stack.pop(1);
                }
                Ok(())
            }
            Instruction::Return { ty, operand } => {
                match operand {
                    Some(value) if *ty != IrType::Void => {
                        self.load(value)?;
                        let op = if ty.is_int_like() { "ireturn" } else { "areturn" };
                        self.line(op);
                        self.stack.pop(1);
                    }
                    _ => self.line("return"),
                }
                Ok(())
            }
            Instruction::PutField {
                object,
                field,
                value,
            } => {
                self.load(object)?;
                self.load(value)?;
                let text = format!("putfield {}", self.field_ref(field)?);
                self.line(&text);
                self.stack.pop(2);
                Ok(())
            }
            Instruction::CondBranch { condition, label } => self.branch(condition, label),
            Instruction::Goto(label) => {
                self.line(&format!("goto {label}"));
                Ok(())
            }
            Instruction::SingleOp(_) | Instruction::BinaryOp { .. } | Instruction::GetField { .. } => {
                self.value(instruction)?;
                self.line("pop");
                self.stack.pop(1);
                Ok(())
            }
        }
    }

    fn assign(&mut self, dest: &Element, rhs: &Instruction) -> Result<()> {
        match dest {
            Element::Operand { name, ty } => {
                self.value(rhs)?;
                let reg = self.register(name)?;
                let family = if ty.is_int_like() { "istore" } else { "astore" };
                self.line(&slot(family, reg));
                self.stack.pop(1);
            }
            Element::ArrayElement { name, index, ty } => {
                let reg = self.register(name)?;
                self.line(&slot("aload", reg));
                self.stack.push(1);
                self.load(index)?;
                self.value(rhs)?;
                self.line(if ty.is_int_like() { "iastore" } else { "aastore" });
                self.stack.pop(3);
            }
            Element::Literal { value, .. } => {
                return Err(self.unsupported(format!("assignment to literal {value}")));
            }
        }
        Ok(())
    }

    /// `if_icmp<cc>` for comparisons, `ifne` on any other boolean.
    fn branch(&mut self, condition: &Instruction, label: &str) -> Result<()> {
        if let Instruction::BinaryOp { op, left, right } = condition {
            if let Some(cc) = condition_code(*op) {
                self.load(left)?;
                self.load(right)?;
                self.line(&format!("if_icmp{cc} {label}"));
                self.stack.pop(2);
                return Ok(());
            }
        }
        self.value(condition)?;
        self.line(&format!("ifne {label}"));
        self.stack.pop(1);
        Ok(())
    }

    // ==========================================================================
    // Values
    // ==========================================================================

    /// Emit an instruction that leaves exactly one value on the stack.
    fn value(&mut self, instruction: &Instruction) -> Result<()> {
        match instruction {
            Instruction::SingleOp(element) => self.load(element),
            Instruction::BinaryOp { op, left, right } => {
                self.load(left)?;
                self.load(right)?;
                self.binary(*op);
                Ok(())
            }
            Instruction::Call(call) => {
                if call.return_type == IrType::Void {
                    return Err(self.unsupported("void call used as a value"));
                }
                self.call(call)?;
                Ok(())
            }
            Instruction::GetField { object, field } => {
                self.load(object)?;
                let text = format!("getfield {}", self.field_ref(field)?);
                self.line(&text);
                Ok(())
            }
            other => Err(self.unsupported(format!("{} used as a value", other.describe()))),
        }
    }

    fn binary(&mut self, op: BinaryOpKind) {
        let opcode = match op {
            BinaryOpKind::Add => "iadd",
            BinaryOpKind::Sub => "isub",
            BinaryOpKind::Mul => "imul",
            BinaryOpKind::Div => "idiv",
            BinaryOpKind::And => "iand",
            BinaryOpKind::Or => "ior",
            BinaryOpKind::Lt | BinaryOpKind::Gt | BinaryOpKind::Le | BinaryOpKind::Ge => {
                self.comparison(op);
                return;
            }
        };
        self.line(opcode);
        self.stack.pop(1);
    }

    /// Materialise a comparison of the two topmost ints as 0 or 1.
    fn comparison(&mut self, op: BinaryOpKind) {
        let n = self.comparisons;
        self.comparisons += 1;
        let cc = condition_code(op).unwrap_or("ne");
        self.line(&format!("if_icmp{cc} cmp_true_{n}"));
        self.line("iconst_0");
        self.line(&format!("goto cmp_end_{n}"));
        let _ = write!(self.code, "cmp_true_{n}:{NL}");
        self.line("iconst_1");
        let _ = write!(self.code, "cmp_end_{n}:{NL}");
        self.stack.pop(1);
    }

    /// Push an operand.
    fn load(&mut self, element: &Element) -> Result<()> {
        match element {
            Element::Literal { value, .. } => {
                self.line(&push_constant(*value));
                self.stack.push(1);
            }
            Element::Operand { name, ty } => {
                if matches!(ty, IrType::This(_)) || name == "this" {
                    self.line("aload_0");
                } else if ty.is_int_like() || ty.is_reference() {
                    let reg = self.register(name)?;
                    let family = if ty.is_int_like() { "iload" } else { "aload" };
                    self.line(&slot(family, reg));
                } else {
                    return Err(self.unsupported(format!("operand {name} used as a value")));
                }
                self.stack.push(1);
            }
            Element::ArrayElement { name, index, ty } => {
                let reg = self.register(name)?;
                self.line(&slot("aload", reg));
                self.stack.push(1);
                self.load(index)?;
                self.line(if ty.is_int_like() { "iaload" } else { "aaload" });
                self.stack.pop(1);
            }
        }
        Ok(())
    }

    fn register(&self, name: &str) -> Result<u16> {
        self.method
            .var_table
            .get(name)
            .map(|d| d.reg)
            .ok_or_else(|| InternalError::UnresolvedRegister {
                name: name.to_string(),
                method: self.method.name.clone(),
            })
    }

    /// `Class/field DESC`, qualified by the class being emitted.
    fn field_ref(&self, field: &Element) -> Result<String> {
        let name = field
            .name()
            .ok_or_else(|| self.unsupported("literal used as a field"))?;
        Ok(format!(
            "{}/{name} {}",
            self.unit.name,
            descriptor(self.unit, field.ty())
        ))
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    /// Emit a call; returns how many values it leaves on the stack.
    fn call(&mut self, call: &CallInstruction) -> Result<u16> {
        match call.kind {
            CallKind::New => match call.caller.ty() {
                IrType::Object(class) => {
                    let class = self.unit.resolve_class(class);
                    self.line(&format!("new {class}"));
                    self.line("dup");
                    self.stack.push(2);
                    Ok(2)
                }
                IrType::Array(_) => {
                    let size = call
                        .args
                        .first()
                        .ok_or_else(|| self.unsupported("array allocation without a size"))?;
                    self.load(size)?;
                    self.line("newarray int");
                    Ok(1)
                }
                other => Err(self.unsupported(format!("allocation of {other:?}"))),
            },
            CallKind::ArrayLength => {
                self.load(&call.caller)?;
                self.line("arraylength");
                Ok(1)
            }
            CallKind::InvokeStatic | CallKind::InvokeVirtual | CallKind::InvokeSpecial => {
                self.invoke(call)
            }
        }
    }

    fn invoke(&mut self, call: &CallInstruction) -> Result<u16> {
        let method = call
            .method
            .as_deref()
            .ok_or_else(|| self.unsupported("invocation without a method name"))?;
        let owner = match call.caller.ty() {
            IrType::Object(class) | IrType::Class(class) | IrType::This(class) => {
                self.unit.resolve_class(class)
            }
            other => return Err(self.unsupported(format!("call on a value of type {other:?}"))),
        };

        let opcode = match call.kind {
            CallKind::InvokeStatic => "invokestatic",
            CallKind::InvokeSpecial => "invokespecial",
            _ => "invokevirtual",
        };
        let mut consumed = 0u16;
        if call.kind != CallKind::InvokeStatic {
            self.load(&call.caller)?;
            consumed += 1;
        }
        let mut params = String::new();
        for arg in &call.args {
            self.load(arg)?;
            params.push_str(&descriptor(self.unit, arg.ty()));
            consumed += 1;
        }
        self.line(&format!(
            "{opcode} {owner}/{method}({params}){}",
            descriptor(self.unit, &call.return_type)
        ));
        self.stack.pop(consumed);
        if call.return_type == IrType::Void {
            Ok(0)
        } else {
            self.stack.push(1);
            Ok(1)
        }
    }
}

/// `load_2` for registers 0..=3, `load 7` above.
fn slot(family: &str, reg: u16) -> String {
    if reg <= 3 {
        format!("{family}_{reg}")
    } else {
        format!("{family} {reg}")
    }
}

/// Suffix of the `if_icmp<cc>` taken when the comparison holds.
fn condition_code(op: BinaryOpKind) -> Option<&'static str> {
    match op {
        BinaryOpKind::Lt => Some("lt"),
        BinaryOpKind::Gt => Some("gt"),
        BinaryOpKind::Le => Some("le"),
        BinaryOpKind::Ge => Some("ge"),
        _ => None,
    }
}
