use serde::{Deserialize, Serialize};

use std::fmt;

use crate::bytecode::NUL;
use crate::core::{Directive, LineRecord};

/// A single decoded instruction: a directive and its arguments. Instructions produced by the
/// compiler or the loader always have at least one argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    pub directive: Directive,
    pub args: Vec<String>,
}

impl Instruction {
    pub fn new<S: Into<String>>(directive: Directive, args: impl IntoIterator<Item = S>) -> Self {
        Instruction {
            directive,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// builds the instruction for a record, returns None if the call isn't a directive
    pub fn from_record(record: &LineRecord) -> Option<Self> {
        Some(Self::new(record.directive()?, record.args.iter().cloned()))
    }

    pub fn opcode(&self) -> u8 {
        self.directive.opcode()
    }

    /// Appends the binary representation:
    /// `opcode { utf8(arg) 0x00 }* 0x00`
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.opcode());
        for arg in &self.args {
            out.extend_from_slice(arg.as_bytes());
            out.push(NUL);
        }
        out.push(NUL);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut res = vec![];
        self.encode(&mut res);
        res
    }

    /// the number of bytes `encode` will write
    pub fn serialized_size(&self) -> usize {
        2 + self.args.iter().map(|a| a.len() + 1).sum::<usize>()
    }
}

/// renders the instruction as a line of layout source
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directive)?;
        for arg in &self.args {
            write!(f, "\t{}", arg)?;
        }
        Ok(())
    }
}
