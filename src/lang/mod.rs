//! The tone language: symbols, instructions, values and their execution.
//!
//! Classified symbols flow through the [`parser`] into an immutable
//! [`Program`], which the [`Interpreter`] runs against a [`VariableStore`].

pub mod console;
pub mod interpreter;
pub mod parser;
pub mod program;
pub mod store;
pub mod symbol;
pub mod value;

// Re-export public types
pub use console::{Console, ScriptedConsole, StdConsole};
pub use interpreter::{Interpreter, Interrupt};
pub use parser::parse;
pub use program::{ArithmeticOp, Function, Instruction, Program};
pub use store::VariableStore;
pub use symbol::{Action, Classifier, Symbol, Token, VarId};
pub use value::Value;
