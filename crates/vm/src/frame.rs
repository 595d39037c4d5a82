//! Per-call execution state: local variables, operand stack, program counter.

use std::fmt;

use minijvm_classfile::{CodeAttribute, Member};

use crate::error::RuntimeError;
use crate::value::Value;

/// Fixed-size local variable slots, sized from `max_locals`.
///
/// Slots start out `null`; loading one as an int before a store is a type
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVars {
    slots: Vec<Value>,
}

impl LocalVars {
    pub fn new(max_locals: u16) -> Self {
        Self {
            slots: vec![Value::Null; max_locals as usize],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: u16) -> Option<Value> {
        self.slots.get(index as usize).copied()
    }

    /// Overwrite a slot. Returns `None` if `index` is out of range.
    pub fn set(&mut self, index: u16, value: Value) -> Option<()> {
        let slot = self.slots.get_mut(index as usize)?;
        *slot = value;
        Some(())
    }
}

/// Bounded LIFO of values, capacity `max_stack`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandStack {
    slots: Vec<Value>,
    max_stack: usize,
}

impl OperandStack {
    pub fn new(max_stack: u16) -> Self {
        Self {
            slots: Vec::with_capacity(max_stack as usize),
            max_stack: max_stack as usize,
        }
    }

    /// Number of values currently on the stack.
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.max_stack
    }

    /// Push, handing the value back if the stack is full.
    pub fn push(&mut self, value: Value) -> Result<(), Value> {
        if self.slots.len() >= self.max_stack {
            return Err(value);
        }
        self.slots.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.slots.pop()
    }

    pub fn peek(&self) -> Option<Value> {
        self.slots.last().copied()
    }

    /// Values from bottom to top.
    pub fn as_slice(&self) -> &[Value] {
        &self.slots
    }
}

fn write_slots(f: &mut fmt::Formatter<'_>, slots: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, value) in slots.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    f.write_str("]")
}

impl fmt::Display for LocalVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_slots(f, &self.slots)
    }
}

impl fmt::Display for OperandStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_slots(f, &self.slots)
    }
}

/// The execution context of one method invocation.
///
/// Borrows its code from the decoded class, which outlives every frame
/// running it.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    code: &'a [u8],
    local_vars: LocalVars,
    operand_stack: OperandStack,
    /// pc of the instruction currently executing.
    pc: usize,
    /// pc of the next instruction to fetch.
    next_pc: usize,
}

impl<'a> Frame<'a> {
    /// Build a frame sized from a Code attribute, positioned at pc 0.
    pub fn new(code: &'a CodeAttribute) -> Self {
        Self {
            code: &code.code,
            local_vars: LocalVars::new(code.max_locals),
            operand_stack: OperandStack::new(code.max_stack),
            pc: 0,
            next_pc: 0,
        }
    }

    /// Build a frame for a method, failing if it has no Code attribute.
    pub fn for_method(method: Member<'a>) -> Result<Self, RuntimeError> {
        let code = method.code().ok_or_else(|| RuntimeError::MissingCode {
            method: method
                .name()
                .map(str::to_owned)
                .unwrap_or_else(|_| format!("#{}", method.info().name_index)),
        })?;
        Ok(Self::new(code))
    }

    pub fn code(&self) -> &'a [u8] {
        self.code
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn next_pc(&self) -> usize {
        self.next_pc
    }

    /// Redirect the next fetch. Branch instructions call this while executing.
    pub fn set_next_pc(&mut self, next_pc: usize) {
        self.next_pc = next_pc;
    }

    /// Record that the instruction at `pc` was decoded and the next fetch
    /// starts at `next_pc`.
    pub(crate) fn commit(&mut self, pc: usize, next_pc: usize) {
        self.pc = pc;
        self.next_pc = next_pc;
    }

    pub fn local_vars(&self) -> &LocalVars {
        &self.local_vars
    }

    pub fn operand_stack(&self) -> &OperandStack {
        &self.operand_stack
    }

    pub fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        self.operand_stack
            .push(value)
            .map_err(|_| RuntimeError::StackOverflow { pc: self.pc })
    }

    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.operand_stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow { pc: self.pc })
    }

    pub fn peek(&self) -> Result<Value, RuntimeError> {
        self.operand_stack
            .peek()
            .ok_or(RuntimeError::StackUnderflow { pc: self.pc })
    }

    pub fn pop_int(&mut self) -> Result<i32, RuntimeError> {
        let pc = self.pc;
        self.pop()?
            .as_int()
            .ok_or(RuntimeError::TypeMismatch { expected: "int", pc })
    }

    pub fn load(&self, index: u16) -> Result<Value, RuntimeError> {
        self.local_vars
            .get(index)
            .ok_or_else(|| self.local_out_of_range(index))
    }

    pub fn load_int(&self, index: u16) -> Result<i32, RuntimeError> {
        self.load(index)?.as_int().ok_or(RuntimeError::TypeMismatch {
            expected: "int",
            pc: self.pc,
        })
    }

    pub fn store(&mut self, index: u16, value: Value) -> Result<(), RuntimeError> {
        match self.local_vars.set(index, value) {
            Some(()) => Ok(()),
            None => Err(self.local_out_of_range(index)),
        }
    }

    fn local_out_of_range(&self, index: u16) -> RuntimeError {
        RuntimeError::LocalIndexOutOfRange {
            index,
            max_locals: self.local_vars.len() as u16,
            pc: self.pc,
        }
    }
}
