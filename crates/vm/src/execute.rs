//! Fetch-decode-execute loop.

use minijvm_classfile::Member;
use tracing::trace;

use crate::bytecode::BytecodeReader;
use crate::error::RuntimeError;
use crate::frame::Frame;
use crate::instruction::Instruction;
use crate::machine::Thread;
use crate::opcode::Opcode;

/// Record of one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub pc: usize,
    pub opcode: Opcode,
    pub instruction: Instruction,
}

/// Fetch, decode and execute one instruction in the thread's active frame.
///
/// The frame's next pc is committed past the instruction's operands before
/// the instruction runs, so an instruction that sets it wins. Failures
/// during fetch or decode leave the frame untouched.
pub fn step(thread: &mut Thread<'_>) -> Result<Step, RuntimeError> {
    let frame = thread.active_frame_mut()?;
    let pc = frame.next_pc();
    let mut reader = BytecodeReader::new(frame.code(), pc);

    let byte = reader.read_u8()?;
    let opcode = Opcode::try_from(byte)
        .map_err(|opcode| RuntimeError::UnsupportedOpcode { opcode, pc })?;
    let mut instruction = Instruction::for_opcode(opcode);
    instruction.fetch_operands(opcode, &mut reader)?;
    frame.commit(pc, reader.pc());

    trace!(
        target: "minijvm::interp",
        pc,
        opcode = byte,
        mnemonic = opcode.mnemonic(),
        instruction = %instruction,
        stack = %frame.operand_stack(),
        locals = %frame.local_vars(),
        "step"
    );

    thread.set_pc(pc);
    instruction.execute(thread)?;
    Ok(Step {
        pc,
        opcode,
        instruction,
    })
}

/// Step until the call stack is empty. Returns the number of instructions
/// executed.
pub fn run(thread: &mut Thread<'_>) -> Result<u64, RuntimeError> {
    let mut executed = 0u64;
    while !thread.is_finished() {
        step(thread)?;
        executed += 1;
    }
    Ok(executed)
}

/// Run `method` to completion on a fresh thread.
pub fn interpret(method: Member<'_>) -> Result<u64, RuntimeError> {
    let mut thread = Thread::new();
    thread.push_frame(Frame::for_method(method)?)?;
    run(&mut thread)
}
