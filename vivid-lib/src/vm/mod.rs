//! The vm executes a [`Program`] one instruction at a time.
//!
//! Every instruction is executed by the handler of its directive. A handler receives the
//! current [`Stack`] and the arguments of the instruction, and returns the new stack.
//! Everything else a handler may touch lives in the [`Env`]: the document, the context and the
//! bundle scope.
//!
//! Nothing happens in the background. Work is only done inside [`Interpreter::step`], so
//! cancelling a run means to stop calling it.

use std::iter::FusedIterator;
use std::result::Result as StdResult;
use thiserror::Error;
use tracing::{debug, trace};

use crate::bytecode::Program;
use crate::context::Context;
use crate::core::{Directive, Instruction};
use crate::document::{Document, QueryError};

mod stack;
pub use stack::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The layout directive can only be the header of a program, the bytecode is malformed")]
    LayoutAtRuntime,

    #[error("Invalid regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("The xpath {0:?} doesn't evaluate to a node-set")]
    NotANodeSet(String),

    #[error("Argument {0} is missing")]
    MissingArgument(usize),
}

/// A runtime error together with the instruction that caused it
#[derive(Error, Debug)]
#[error("Runtime error in instruction {index} ({directive}): {source}")]
pub struct Fault {
    /// index into [`Program::instructions`]
    pub index: usize,
    pub directive: Directive,
    #[source]
    pub source: Error,
}

pub type Result<T> = StdResult<T, Error>;

/// The signature every `exec_` fn has. The table from directive to handler is generated by the
/// `Dispatch` derive on [`Directive`].
pub type Handler<D> = fn(&mut Env<'_, D>, Stack, &[String]) -> Result<Stack>;

macro_rules! bail{
    ($($err:tt)*) => {
        return Err(Error::$($err)*)
    };
}

/// the argument at `idx`
pub(crate) fn arg(args: &[String], idx: usize) -> Result<&str> {
    args.get(idx)
        .map(String::as_str)
        .ok_or(Error::MissingArgument(idx))
}

/// Everything besides the stack that a handler can read or change
pub struct Env<'a, D: Document> {
    pub document: &'a D,
    pub context: &'a mut Context,
    /// the nodes selected by the last `bundle`, None in global mode
    pub scope: Option<Vec<D::Node>>,
    /// nodes touched by the last `follow`, `select` or `bundle`, read by `style`
    pub visited: Vec<D::Node>,
}

impl<'a, D: Document> Env<'a, D> {
    pub fn new(document: &'a D, context: &'a mut Context) -> Self {
        Env {
            document,
            context,
            scope: None,
            visited: vec![],
        }
    }
}

pub enum StepResult {
    /// an instruction was executed, contains the stack as it is afterwards
    Ok(Stack),
    /// there are no instructions left, or the run failed earlier
    Done,
    Err(Fault),
}

/// Executes a program. Single use: once it reported Done or an error, it stays done. To run
/// the program again, create a new one.
pub struct Interpreter<'a, D: Document> {
    program: &'a Program,
    pc: usize,
    stack: Stack,
    env: Env<'a, D>,
    halted: bool,
}

impl<'a, D: Document> Interpreter<'a, D> {
    pub fn new(program: &'a Program, document: &'a D, context: &'a mut Context) -> Self {
        Interpreter {
            program,
            pc: 0,
            stack: Stack::new(),
            env: Env::new(document, context),
            halted: false,
        }
    }

    /// executes the instruction under the pc and advances it
    pub fn step(&mut self) -> StepResult {
        let program = self.program;
        let instruction = match program.instructions.get(self.pc) {
            Some(instruction) if !self.halted => instruction,
            _ => {
                self.halted = true;
                return StepResult::Done;
            }
        };

        let index = self.pc;
        debug!(index, %instruction, "executing");
        let handler = instruction.directive.handler::<D>();
        match handler(&mut self.env, self.stack.clone(), &instruction.args) {
            Ok(stack) => {
                trace!(frames = stack.len(), top = ?stack.top(), "executed");
                self.stack = stack;
                self.pc += 1;
                StepResult::Ok(self.stack.clone())
            }
            Err(source) => {
                self.halted = true;
                StepResult::Err(Fault {
                    index,
                    directive: instruction.directive,
                    source,
                })
            }
        }
    }

    /// steps until the program is exhausted, returns the final stack
    pub fn run(mut self) -> StdResult<Stack, Fault> {
        loop {
            match self.step() {
                StepResult::Ok(_) => {}
                StepResult::Done => return Ok(self.stack),
                StepResult::Err(fault) => return Err(fault),
            }
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// index of the next instruction
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// the instruction the next step will execute
    pub fn current_instruction(&self) -> Option<&'a Instruction> {
        if self.halted {
            None
        } else {
            self.program.instructions.get(self.pc)
        }
    }

    pub fn is_done(&self) -> bool {
        self.current_instruction().is_none()
    }

    pub fn scope(&self) -> Option<&[D::Node]> {
        self.env.scope.as_deref()
    }

    pub fn context(&self) -> &Context {
        &*self.env.context
    }
}

impl<'a, D: Document> Iterator for Interpreter<'a, D> {
    type Item = StdResult<Stack, Fault>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            StepResult::Ok(stack) => Some(Ok(stack)),
            StepResult::Done => None,
            StepResult::Err(fault) => Some(Err(fault)),
        }
    }
}

impl<'a, D: Document> FusedIterator for Interpreter<'a, D> {}

pub mod directives;
