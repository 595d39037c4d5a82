//! Integration tests for the interpreter and launcher.

use minijvm_classfile::{ClassFile, CodeAttribute, DecodeError, MAGIC, MAIN_METHOD_DESCRIPTOR};
use minijvm_vm::{
    interpret, launch, run, step, ClassProvider, Frame, Instruction, MemoryClassProvider, Opcode,
    RuntimeError, Thread, Value, VmError,
};
use proptest::prelude::*;

// ============================================================
// Helpers
// ============================================================

fn code(max_stack: u16, max_locals: u16, bytes: &[u8]) -> CodeAttribute {
    CodeAttribute {
        max_stack,
        max_locals,
        code: bytes.to_vec(),
        exception_table: vec![],
    }
}

/// Step until the next instruction is `return`, leaving its frame in place.
fn run_to_return(thread: &mut Thread<'_>) {
    loop {
        let frame = thread.current_frame().unwrap();
        if frame.code()[frame.next_pc()] == Opcode::Return as u8 {
            return;
        }
        step(thread).unwrap();
    }
}

fn top_of_stack(thread: &Thread<'_>) -> Value {
    thread.current_frame().unwrap().operand_stack().peek().unwrap()
}

/// Class-file bytes with one class whose methods are `(flags, name,
/// descriptor, code)`.
fn class_bytes(name: &str, methods: &[(u16, &str, &str, Option<CodeAttribute>)]) -> Vec<u8> {
    fn utf8(text: &str, pool: &mut Vec<Vec<u8>>) -> u16 {
        let mut entry = vec![1];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        pool.push(entry);
        pool.len() as u16
    }

    let mut pool: Vec<Vec<u8>> = Vec::new();
    let name_index = utf8(name, &mut pool);
    let mut class_entry = vec![7];
    class_entry.extend_from_slice(&name_index.to_be_bytes());
    pool.push(class_entry);
    let this_class = pool.len() as u16;
    let code_name = utf8("Code", &mut pool);

    let mut method_bytes = Vec::new();
    for (flags, method_name, descriptor, body) in methods {
        let n = utf8(method_name, &mut pool);
        let d = utf8(descriptor, &mut pool);
        method_bytes.extend_from_slice(&flags.to_be_bytes());
        method_bytes.extend_from_slice(&n.to_be_bytes());
        method_bytes.extend_from_slice(&d.to_be_bytes());
        match body {
            Some(attr) => {
                let mut body = Vec::new();
                body.extend_from_slice(&attr.max_stack.to_be_bytes());
                body.extend_from_slice(&attr.max_locals.to_be_bytes());
                body.extend_from_slice(&(attr.code.len() as u32).to_be_bytes());
                body.extend_from_slice(&attr.code);
                body.extend_from_slice(&[0, 0, 0, 0]);
                method_bytes.extend_from_slice(&1u16.to_be_bytes());
                method_bytes.extend_from_slice(&code_name.to_be_bytes());
                method_bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
                method_bytes.extend(body);
            }
            None => method_bytes.extend_from_slice(&0u16.to_be_bytes()),
        }
    }

    let mut bytes = MAGIC.to_be_bytes().to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 52]);
    bytes.extend_from_slice(&(pool.len() as u16 + 1).to_be_bytes());
    for entry in &pool {
        bytes.extend_from_slice(entry);
    }
    bytes.extend_from_slice(&0x0021u16.to_be_bytes());
    bytes.extend_from_slice(&this_class.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes.extend_from_slice(&(methods.len() as u16).to_be_bytes());
    bytes.extend(method_bytes);
    bytes.extend_from_slice(&0u16.to_be_bytes());
    bytes
}

fn main_class(name: &str, body: &[u8], max_stack: u16, max_locals: u16) -> Vec<u8> {
    class_bytes(
        name,
        &[(
            0x0009,
            "main",
            MAIN_METHOD_DESCRIPTOR,
            Some(code(max_stack, max_locals, body)),
        )],
    )
}

// ============================================================
// Interpreter scenarios
// ============================================================

#[test]
fn sum_of_constants_empties_call_stack() {
    // iconst_3, bipush -1, iadd, return
    let attr = code(2, 1, &[0x06, 0x10, 0xFF, 0x60, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&attr)).unwrap();

    run_to_return(&mut thread);
    let frame = thread.current_frame().unwrap();
    assert_eq!(frame.operand_stack().as_slice(), &[Value::Int(2)]);

    step(&mut thread).unwrap();
    assert!(thread.is_finished());
}

#[test]
fn store_then_load_twice() {
    // sipush 10, istore_0, iload_0, iload_0, iadd, return
    let attr = code(2, 1, &[0x11, 0x00, 0x0A, 0x3B, 0x1A, 0x1A, 0x60, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&attr)).unwrap();

    run_to_return(&mut thread);
    assert_eq!(top_of_stack(&thread), Value::Int(20));
    assert_eq!(
        thread.current_frame().unwrap().local_vars().get(0),
        Some(Value::Int(10))
    );
    assert_eq!(run(&mut thread), Ok(1));
}

#[test]
fn generic_forms_reach_high_slots() {
    // bipush 7, istore 5, iload 5, iconst_2, imul, iconst_4, isub, return
    let attr = code(2, 6, &[0x10, 7, 0x36, 5, 0x15, 5, 0x05, 0x68, 0x07, 0x64, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&attr)).unwrap();
    run_to_return(&mut thread);
    assert_eq!(top_of_stack(&thread), Value::Int(10));
}

#[test]
fn step_records_each_instruction() {
    let attr = code(2, 0, &[0x02, 0x59, 0x60, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&attr)).unwrap();

    let mut steps = Vec::new();
    while !thread.is_finished() {
        steps.push(step(&mut thread).unwrap());
    }
    let trace: Vec<_> = steps.iter().map(|s| (s.pc, s.instruction)).collect();
    assert_eq!(
        trace,
        vec![
            (0, Instruction::Iconst(-1)),
            (1, Instruction::Dup),
            (2, Instruction::Iadd),
            (3, Instruction::Return),
        ]
    );
}

#[test]
fn nested_frames_return_in_order() {
    let outer = code(1, 0, &[0x04, 0xB1]);
    let inner = code(1, 0, &[0x05, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&outer)).unwrap();
    thread.push_frame(Frame::new(&inner)).unwrap();

    step(&mut thread).unwrap();
    step(&mut thread).unwrap();
    assert_eq!(thread.depth(), 1);
    assert_eq!(thread.current_frame().unwrap().next_pc(), 0);
    assert_eq!(run(&mut thread), Ok(2));
}

// ============================================================
// Failures
// ============================================================

#[test]
fn unsupported_opcode_leaves_call_stack_untouched() {
    // iconst_1, istore_0, iconst_2, getstatic #1, return
    let attr = code(2, 1, &[0x04, 0x3B, 0x05, 0xB2, 0x00, 0x01, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&attr)).unwrap();
    for _ in 0..3 {
        step(&mut thread).unwrap();
    }
    let before = thread.current_frame().unwrap().clone();

    assert_eq!(
        step(&mut thread),
        Err(RuntimeError::UnsupportedOpcode { opcode: 0xB2, pc: 3 })
    );
    let after = thread.current_frame().unwrap();
    assert_eq!(thread.depth(), 1);
    assert_eq!(after.next_pc(), before.next_pc());
    assert_eq!(after.pc(), before.pc());
    assert_eq!(after.operand_stack(), before.operand_stack());
    assert_eq!(after.local_vars(), before.local_vars());
}

#[test]
fn operand_stack_bound_enforced() {
    let attr = code(1, 0, &[0x04, 0x05, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&attr)).unwrap();
    assert_eq!(run(&mut thread), Err(RuntimeError::StackOverflow { pc: 1 }));
}

#[test]
fn local_index_out_of_range() {
    let attr = code(1, 1, &[0x04, 0x3C, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&attr)).unwrap();
    assert_eq!(
        run(&mut thread),
        Err(RuntimeError::LocalIndexOutOfRange {
            index: 1,
            max_locals: 1,
            pc: 1
        })
    );
}

#[test]
fn uninitialised_local_is_not_an_int() {
    let attr = code(1, 1, &[0x1A, 0xB1]);
    let mut thread = Thread::new();
    thread.push_frame(Frame::new(&attr)).unwrap();
    assert_eq!(
        run(&mut thread),
        Err(RuntimeError::TypeMismatch {
            expected: "int",
            pc: 0
        })
    );
}

// ============================================================
// Decoded classes
// ============================================================

#[test]
fn interpret_decoded_main() {
    let bytes = main_class("demo/Main", &[0x06, 0x10, 0xFF, 0x60, 0xB1], 2, 1);
    let class = ClassFile::parse(&bytes).unwrap();
    assert_eq!(interpret(class.main_method().unwrap().unwrap()), Ok(4));
}

#[test]
fn interpret_method_without_code() {
    let bytes = class_bytes(
        "demo/Native",
        &[(0x0109, "main", MAIN_METHOD_DESCRIPTOR, None)],
    );
    let class = ClassFile::parse(&bytes).unwrap();
    assert_eq!(
        interpret(class.main_method().unwrap().unwrap()),
        Err(RuntimeError::MissingCode {
            method: "main".to_owned()
        })
    );
}

// ============================================================
// Launcher
// ============================================================

#[test]
fn launch_by_dotted_name() {
    let mut provider = MemoryClassProvider::new();
    provider.insert(
        "com.example.Main",
        main_class("com/example/Main", &[0x11, 0x00, 0x0A, 0x3B, 0xB1], 1, 1),
    );
    assert_eq!(launch(&provider, "com.example.Main"), Ok(3));
    assert_eq!(launch(&provider, "com/example/Main"), Ok(3));
}

#[test]
fn launch_without_main() {
    let mut provider = MemoryClassProvider::new();
    provider.insert(
        "Lib",
        class_bytes("Lib", &[(0x0009, "helper", "()V", Some(code(0, 0, &[0xB1])))]),
    );
    assert_eq!(
        launch(&provider, "Lib"),
        Err(VmError::MainMethodNotFound {
            class: "Lib".to_owned()
        })
    );
}

#[test]
fn launch_reports_dangling_method_name() {
    let mut bytes = class_bytes("M", &[]);
    bytes.truncate(bytes.len() - 4);
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x09, 0x7F, 0x00, 0x7F, 0x01, 0x00, 0x00]);
    bytes.extend_from_slice(&0u16.to_be_bytes());

    let mut provider = MemoryClassProvider::new();
    provider.insert("M", bytes);
    assert_eq!(
        launch(&provider, "M"),
        Err(VmError::Decode(DecodeError::InvalidConstantIndex {
            index: 0x7F00
        }))
    );
}

#[test]
fn launch_surfaces_runtime_errors() {
    let mut provider = MemoryClassProvider::new();
    provider.insert("Bad", main_class("Bad", &[0xCA], 0, 0));
    assert_eq!(
        launch(&provider, "Bad"),
        Err(VmError::Runtime(RuntimeError::UnsupportedOpcode {
            opcode: 0xCA,
            pc: 0
        }))
    );
}

/// Provider that serves a single fixed class under any name.
struct Fixed(Vec<u8>);

impl ClassProvider for Fixed {
    fn find_class(&self, _name: &str) -> Option<Vec<u8>> {
        Some(self.0.clone())
    }
}

#[test]
fn custom_provider() {
    let provider = Fixed(main_class("Any", &[0x00, 0xB1], 0, 0));
    assert_eq!(launch(&provider, "whatever.Name"), Ok(2));
}

// ============================================================
// Properties
// ============================================================

proptest! {
    #[test]
    fn iadd_wraps(a: i32, b: i32) {
        let attr = code(2, 2, &[0x1A, 0x1B, 0x60, 0xB1]);
        let mut thread = Thread::new();
        let mut frame = Frame::new(&attr);
        frame.store(0, Value::Int(a)).unwrap();
        frame.store(1, Value::Int(b)).unwrap();
        thread.push_frame(frame).unwrap();

        run_to_return(&mut thread);
        prop_assert_eq!(top_of_stack(&thread), Value::Int(a.wrapping_add(b)));
    }

    #[test]
    fn bipush_sign_extends(byte: u8) {
        let attr = code(1, 0, &[0x10, byte, 0xB1]);
        let mut thread = Thread::new();
        thread.push_frame(Frame::new(&attr)).unwrap();
        run_to_return(&mut thread);
        prop_assert_eq!(top_of_stack(&thread), Value::Int(byte as i8 as i32));
    }
}
