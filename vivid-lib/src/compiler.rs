//! Turns line records into bytecode.
//!
//! Every record is encoded as `opcode { utf8(arg) 0x00 }* 0x00`, and the instructions are
//! simply concatenated. There is no header, the mandatory `layout` instruction at the start
//! doubles as the file signature.

use thiserror::Error;
use tracing::debug;

use crate::core::*;
use crate::parser::{self, PestError, Rule};

pub type CompilationResult = Result<Vec<u8>, CompilationError>;

#[derive(Error, Debug)]
pub enum CompilationError {
    #[error(
        "line {}: {}: {:?}",
        .line_nr,
        .problems.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
        .raw
    )]
    InvalidLine {
        line_nr: usize,
        raw: String,
        call: String,
        args: Vec<String>,
        problems: Vec<Problem>,
    },

    #[error("layout directive not set or not on first line")]
    MissingLayout,

    #[error("Could not parse layout:\n{0}")]
    Syntax(#[from] Box<PestError<Rule>>),
}

macro_rules! compilation_error {
    ($($err:tt)+) => {
        return Err(CompilationError::$($err)*)
    };
}

/// Compiles the records in order. Fails on the first record that has a problem, and if
/// the resulting bytecode doesn't start with the `layout` instruction.
pub fn compile(records: &[Option<LineRecord>]) -> CompilationResult {
    let mut text = vec![];
    for record in records.iter().flatten() {
        let instruction = match Instruction::from_record(record) {
            Some(instruction) if record.is_ok() => instruction,
            _ => {
                let LineRecord {
                    line_nr,
                    raw,
                    call,
                    args,
                    problems,
                } = record.clone();
                compilation_error!(InvalidLine {
                    line_nr,
                    raw,
                    call,
                    args,
                    problems
                });
            }
        };
        debug!(line_nr = record.line_nr, %instruction, "compiling");
        instruction.encode(&mut text);
    }

    if text.first() != Some(&Directive::LAYOUT) {
        compilation_error!(MissingLayout);
    }
    Ok(text)
}

/// parses and compiles layout source
pub fn compile_source(src: &str) -> CompilationResult {
    let records = parser::parse(src).map_err(Box::new)?;
    compile(&records)
}
