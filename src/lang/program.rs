//! Resolved instructions, function bodies and programs.

use std::fmt;
use std::sync::Arc;

use super::symbol::{Action, VarId};

/// Binary numeric/string operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    pub fn action(self) -> Action {
        match self {
            ArithmeticOp::Add => Action::Add,
            ArithmeticOp::Subtract => Action::Subtract,
            ArithmeticOp::Multiply => Action::Multiply,
            ArithmeticOp::Divide => Action::Divide,
        }
    }
}

/// One resolved action invocation with its operands
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `target := Number(literal's own identifier)`
    Immediate { target: VarId, literal: VarId },
    Print { source: VarId },
    /// `target := left op right`
    Arithmetic {
        op: ArithmeticOp,
        target: VarId,
        left: VarId,
        right: VarId,
    },
    CycleType { target: VarId },
    /// Code-point literals, already joined in encounter order
    StringDefine { target: VarId, literals: Vec<char> },
    UserInput { target: VarId },
    /// Bound while parsing and stored again when reached at run time
    FunctionDefine { target: VarId, body: Function },
    FunctionExecute { source: VarId },
    VariableInit { target: VarId },
}

impl Instruction {
    pub fn action(&self) -> Action {
        match self {
            Instruction::Immediate { .. } => Action::Immediate,
            Instruction::Print { .. } => Action::Print,
            Instruction::Arithmetic { op, .. } => op.action(),
            Instruction::CycleType { .. } => Action::CycleType,
            Instruction::StringDefine { .. } => Action::StringDefine,
            Instruction::UserInput { .. } => Action::UserInput,
            Instruction::FunctionDefine { .. } => Action::FunctionDefine,
            Instruction::FunctionExecute { .. } => Action::FunctionExecute,
            Instruction::VariableInit { .. } => Action::VariableInit,
        }
    }

    /// Variable this instruction assigns, if any
    pub fn target(&self) -> Option<VarId> {
        match self {
            Instruction::Immediate { target, .. }
            | Instruction::Arithmetic { target, .. }
            | Instruction::CycleType { target }
            | Instruction::StringDefine { target, .. }
            | Instruction::UserInput { target }
            | Instruction::FunctionDefine { target, .. }
            | Instruction::VariableInit { target } => Some(*target),
            Instruction::Print { .. } | Instruction::FunctionExecute { .. } => None,
        }
    }

    fn write_listing(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        let action = self.action();
        match self {
            Instruction::Immediate { target, literal } => {
                writeln!(f, "{pad}{action} {target} <- {}", literal.0)
            }
            Instruction::Print { source } => writeln!(f, "{pad}{action} {source}"),
            Instruction::Arithmetic {
                target, left, right, ..
            } => writeln!(f, "{pad}{action} {target} <- {left}, {right}"),
            Instruction::CycleType { target }
            | Instruction::UserInput { target }
            | Instruction::VariableInit { target } => writeln!(f, "{pad}{action} {target}"),
            Instruction::StringDefine { target, literals } => {
                let text: String = literals.iter().collect();
                writeln!(f, "{pad}{action} {target} <- {:?}", text)
            }
            Instruction::FunctionDefine { target, body } => {
                writeln!(f, "{pad}{action} {target} {{")?;
                for instruction in body.instructions() {
                    instruction.write_listing(f, indent + 1)?;
                }
                writeln!(f, "{pad}}}")
            }
            Instruction::FunctionExecute { source } => writeln!(f, "{pad}{action} {source}"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_listing(f, 0)
    }
}

/// Immutable instruction sequence shared between the store and running frames
#[derive(Debug, Clone, PartialEq)]
pub struct Function(Arc<[Instruction]>);

impl Function {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self(instructions.into())
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Root instruction sequence produced by the parser
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    root: Function,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            root: Function::new(instructions),
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        self.root.instructions()
    }

    /// The program as an inlinable body
    pub fn root(&self) -> &Function {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, instruction) in self.instructions().iter().enumerate() {
            write!(f, "{index:>4}: ")?;
            instruction.write_listing(f, 0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_listing_nests_function_bodies() {
        let body = Function::new(vec![Instruction::StringDefine {
            target: VarId(72),
            literals: vec!['H', 'i'],
        }]);
        let program = Program::new(vec![
            Instruction::FunctionDefine {
                target: VarId(440),
                body,
            },
            Instruction::FunctionExecute { source: VarId(440) },
        ]);

        let listing = program.to_string();
        assert!(listing.contains("Function-Define 440Hz {"));
        assert!(listing.contains("  String-Define 72Hz <- \"Hi\""));
        assert!(listing.contains("1: Function-Execute 440Hz"));
    }

    #[test]
    fn test_instruction_action_codes() {
        let add = Instruction::Arithmetic {
            op: ArithmeticOp::Divide,
            target: VarId(1),
            left: VarId(2),
            right: VarId(3),
        };
        assert_eq!(add.action(), Action::Divide);
        assert_eq!(add.action().frequency_hz(), 260);
    }
}
