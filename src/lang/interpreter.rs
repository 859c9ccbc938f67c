//! Program interpreter.
//!
//! Runs instructions one at a time against a [`VariableStore`]. Function-Execute
//! inlines the callee's body through an explicit frame list rather than host
//! recursion; a call in tail position replaces its caller's frame, so
//! self-recursive programs run until interrupted without growing memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};

use super::console::Console;
use super::program::{ArithmeticOp, Function, Instruction, Program};
use super::store::VariableStore;
use super::value::Value;
use crate::error::{RuntimeError, RuntimeErrorKind};

/// Shared flag that stops a running interpreter before its next instruction
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Body being executed and the next instruction in it
struct Frame {
    body: Function,
    cursor: usize,
    /// Function-Execute nesting, counted even across replaced tail frames
    depth: usize,
}

impl Frame {
    fn new(body: Function, depth: usize) -> Self {
        Self {
            body,
            cursor: 0,
            depth,
        }
    }
}

/// What the dispatcher wants done after an instruction
enum Flow {
    Next,
    Inline(Function),
}

/// Executes programs against a store, talking to the outside through a console
pub struct Interpreter<C: Console> {
    console: C,
    interrupt: Interrupt,
    executed: u64,
}

impl<C: Console> Interpreter<C> {
    pub fn new(console: C) -> Self {
        Self {
            console,
            interrupt: Interrupt::new(),
            executed: 0,
        }
    }

    /// Use an externally owned interrupt flag
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Handle that can stop this interpreter from another thread
    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Instructions executed so far, inlined bodies included
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Run `program` to completion or to the first error.
    ///
    /// On error the store keeps whatever state execution had reached.
    pub fn run(&mut self, program: &Program, store: &mut VariableStore) -> Result<(), RuntimeError> {
        let mut frames = vec![Frame::new(program.root().clone(), 0)];

        while let Some(frame) = frames.last_mut() {
            if frame.cursor >= frame.body.len() {
                frames.pop();
                continue;
            }

            let index = frame.cursor;
            frame.cursor += 1;
            let at_tail = frame.cursor == frame.body.len();
            let depth = frame.depth;
            let body = frame.body.clone();
            let instruction = &body.instructions()[index];

            let fail = |kind| RuntimeError {
                index,
                depth,
                action: instruction.action(),
                kind,
            };

            if self.interrupt.is_triggered() {
                debug!("interrupted after {} instructions", self.executed);
                return Err(fail(RuntimeErrorKind::Interrupted));
            }

            trace!("[{}:{}] {}", depth, index, instruction.to_string().trim_end());
            self.executed += 1;

            match self.execute(instruction, store).map_err(fail)? {
                Flow::Next => {}
                Flow::Inline(callee) => {
                    if at_tail {
                        frames.pop();
                    }
                    frames.push(Frame::new(callee, depth + 1));
                }
            }
        }

        Ok(())
    }

    fn execute(
        &mut self,
        instruction: &Instruction,
        store: &mut VariableStore,
    ) -> Result<Flow, RuntimeErrorKind> {
        match instruction {
            Instruction::Immediate { target, literal } => {
                store.write(*target, Value::Number(literal.0 as f64));
            }

            Instruction::Print { source } => {
                let text = store.read(*source).render().ok_or_else(|| {
                    RuntimeErrorKind::Type(format!("cannot print a function (variable {})", source))
                })?;
                self.console
                    .print(&text)
                    .map_err(|e| RuntimeErrorKind::Console(e.to_string()))?;
            }

            Instruction::Arithmetic {
                op,
                target,
                left,
                right,
            } => {
                let left = store.read(*left).clone();
                let right = store.read(*right).clone();
                store.write(*target, arithmetic(*op, left, right)?);
            }

            Instruction::CycleType { target } => {
                let cycled = cycle_type(store.read(*target))?;
                store.write(*target, cycled);
            }

            Instruction::StringDefine { target, literals } => {
                store.write(*target, Value::String(literals.iter().collect()));
            }

            Instruction::UserInput { target } => {
                let line = self
                    .console
                    .read_line()
                    .map_err(|e| RuntimeErrorKind::Console(e.to_string()))?
                    .ok_or(RuntimeErrorKind::InputClosed)?;
                store.write(*target, Value::String(line));
            }

            // Also bound while parsing, so earlier calls already see it
            Instruction::FunctionDefine { target, body } => {
                trace!("defining function {}", target);
                store.write(*target, Value::Function(body.clone()));
            }

            Instruction::FunctionExecute { source } => {
                return match store.read(*source) {
                    Value::Function(body) => Ok(Flow::Inline(body.clone())),
                    other => Err(RuntimeErrorKind::Type(format!(
                        "cannot execute a {} (variable {})",
                        other.type_name(),
                        source
                    ))),
                };
            }

            Instruction::VariableInit { target } => store.init(*target),
        }

        Ok(Flow::Next)
    }
}

/// Apply a binary operator; strings only support Add (concatenation)
fn arithmetic(op: ArithmeticOp, left: Value, right: Value) -> Result<Value, RuntimeErrorKind> {
    match (op, left, right) {
        (ArithmeticOp::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (ArithmeticOp::Add, Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (ArithmeticOp::Subtract, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (ArithmeticOp::Multiply, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        // Zero divisor wins over the numerator's type
        (ArithmeticOp::Divide, _, Value::Number(b)) if b == 0.0 => {
            Err(RuntimeErrorKind::DivisionByZero)
        }
        (ArithmeticOp::Divide, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
        (op, left, right) => Err(RuntimeErrorKind::Type(format!(
            "{} is not supported between {} and {}",
            op.action(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Number to text or text to number
fn cycle_type(value: &Value) -> Result<Value, RuntimeErrorKind> {
    match value {
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Number)
            .ok_or_else(|| RuntimeErrorKind::Type(format!("cannot convert {:?} to a number", text))),
        Value::Function(_) => Err(RuntimeErrorKind::Type(
            "a function cannot change type".to_string(),
        )),
    }
}
