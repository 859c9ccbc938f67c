//! Instruction parser.
//!
//! A single forward pass over the classified token stream. Normal actions
//! take a fixed number of variable arguments; encasing actions (String-Define
//! and Function-Define) read their target and then everything up to the next
//! occurrence of their own tone. A same-tone construct inside an open one is
//! never counted: the first recurrence closes.
//!
//! Function bodies are parsed recursively and bound into the variable store
//! as they close, before any instruction runs. A definition whose target is
//! assigned by any earlier instruction in the stream is refused.

use std::collections::HashSet;

use log::{debug, warn};

use super::program::{ArithmeticOp, Function, Instruction, Program};
use super::store::VariableStore;
use super::symbol::{Action, Symbol, Token, VarId};
use crate::error::{BindingError, ParseError};

/// Parse a token stream into a program, binding function definitions into `store`
pub fn parse(tokens: &[Token], store: &mut VariableStore) -> Result<Program, ParseError> {
    let mut parser = Parser::new(tokens, store);
    let instructions = parser.sequence(None)?;
    debug!(
        "parsed {} top-level instructions from {} symbols",
        instructions.len(),
        tokens.len()
    );
    Ok(Program::new(instructions))
}

/// Open Function-Define whose body is being parsed
#[derive(Debug, Clone, Copy)]
struct Enclosing {
    position: usize,
    at_s: Option<f64>,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    store: &'a mut VariableStore,
    /// Targets of every instruction parsed so far, function bodies included
    assigned: HashSet<VarId>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], store: &'a mut VariableStore) -> Self {
        Self {
            tokens,
            pos: 0,
            store,
            assigned: HashSet::new(),
        }
    }

    /// Next token and its position
    fn advance(&mut self) -> Option<(usize, Token)> {
        let token = *self.tokens.get(self.pos)?;
        self.pos += 1;
        Some((self.pos - 1, token))
    }

    /// Parse instructions until the input ends (top level) or the enclosing
    /// Function-Define tone recurs (function body).
    fn sequence(&mut self, enclosing: Option<Enclosing>) -> Result<Vec<Instruction>, ParseError> {
        let mut instructions = Vec::new();

        while let Some((position, token)) = self.advance() {
            match token.symbol {
                Symbol::Action(Action::FunctionDefine) if enclosing.is_some() => {
                    return Ok(instructions);
                }
                Symbol::Action(action) => {
                    let instruction = self.action(action, position, token.at_s, enclosing)?;
                    instructions.push(instruction);
                }
                // Frequencies outside any action are not part of the program
                Symbol::Variable(_) | Symbol::Unclassified => {}
            }
        }

        match enclosing {
            Some(open) => Err(ParseError::Unterminated {
                action: Action::FunctionDefine,
                position: open.position,
                at_s: open.at_s,
            }),
            None => Ok(instructions),
        }
    }

    fn action(
        &mut self,
        action: Action,
        position: usize,
        at_s: Option<f64>,
        enclosing: Option<Enclosing>,
    ) -> Result<Instruction, ParseError> {
        let args = self.arguments(action, position, at_s, enclosing)?;

        let instruction = match action {
            Action::Immediate => Instruction::Immediate {
                target: args[0],
                literal: args[1],
            },
            Action::Print => Instruction::Print { source: args[0] },
            Action::Add => arithmetic(ArithmeticOp::Add, &args),
            Action::Subtract => arithmetic(ArithmeticOp::Subtract, &args),
            Action::Multiply => arithmetic(ArithmeticOp::Multiply, &args),
            Action::Divide => arithmetic(ArithmeticOp::Divide, &args),
            Action::CycleType => Instruction::CycleType { target: args[0] },
            Action::StringDefine => Instruction::StringDefine {
                target: args[0],
                literals: self.literals(position, at_s)?,
            },
            Action::UserInput => Instruction::UserInput { target: args[0] },
            Action::FunctionDefine => {
                if self.assigned.contains(&args[0]) {
                    return Err(BindingError(args[0]).into());
                }
                self.assigned.insert(args[0]);
                let body = Function::new(self.sequence(Some(Enclosing { position, at_s }))?);
                self.store.bind_function(args[0], body.clone())?;
                Instruction::FunctionDefine {
                    target: args[0],
                    body,
                }
            }
            Action::FunctionExecute => Instruction::FunctionExecute { source: args[0] },
            Action::VariableInit => Instruction::VariableInit { target: args[0] },
        };

        if let Some(target) = instruction.target() {
            self.assigned.insert(target);
        }
        debug!("symbol {}: {}", position, instruction.to_string().trim_end());
        Ok(instruction)
    }

    /// Collect the action's fixed variable arguments.
    ///
    /// Symbols that are not variables are skipped, except the closing tone of
    /// an enclosing function body, which ends the body and leaves the action
    /// short of arguments.
    fn arguments(
        &mut self,
        action: Action,
        position: usize,
        at_s: Option<f64>,
        enclosing: Option<Enclosing>,
    ) -> Result<Vec<VarId>, ParseError> {
        let required = action.arity();
        let mut args = Vec::with_capacity(required);

        while args.len() < required {
            let truncated = ParseError::Truncated {
                action,
                position,
                at_s,
                required,
                found: args.len(),
            };
            let Some(token) = self.tokens.get(self.pos) else {
                return Err(truncated);
            };

            match token.symbol {
                Symbol::Variable(id) => args.push(id),
                Symbol::Action(Action::FunctionDefine) if enclosing.is_some() => {
                    return Err(truncated);
                }
                Symbol::Action(skipped) => {
                    warn!(
                        "symbol {}: {} skipped while reading arguments of {}",
                        self.pos, skipped, action
                    );
                }
                Symbol::Unclassified => {}
            }
            self.pos += 1;
        }

        Ok(args)
    }

    /// String-Define body: every symbol up to the next String-Define tone is a
    /// code point, actions included.
    fn literals(&mut self, open: usize, at_s: Option<f64>) -> Result<Vec<char>, ParseError> {
        let mut literals = Vec::new();

        while let Some((position, token)) = self.advance() {
            match token.symbol {
                Symbol::Action(Action::StringDefine) => return Ok(literals),
                Symbol::Unclassified => {}
                Symbol::Action(_) | Symbol::Variable(_) => {
                    let literal = char::from_u32(token.hz).ok_or(ParseError::InvalidCodePoint {
                        value: token.hz,
                        position,
                    })?;
                    literals.push(literal);
                }
            }
        }

        Err(ParseError::Unterminated {
            action: Action::StringDefine,
            position: open,
            at_s,
        })
    }
}

fn arithmetic(op: ArithmeticOp, args: &[VarId]) -> Instruction {
    Instruction::Arithmetic {
        op,
        target: args[0],
        left: args[1],
        right: args[2],
    }
}
