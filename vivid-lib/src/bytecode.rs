//! Loads bytecode into a [`Program`].
//!
//! The format in short: `opcode(1B) { utf8(arg) 0x00 }* 0x00`, repeated. The first instruction
//! must be `layout vivid <version>`, so a valid file starts with the six bytes `08 "vivid"`,
//! followed by a null and three ascii bytes holding the version, e.g. `1.0`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use std::fmt;
use std::ops::Range;

use crate::core::{Directive, Instruction};

/// terminates every argument, and every instruction
pub const NUL: u8 = 0x00;

/// the first bytes of every bytecode file
pub const SIGNATURE: [u8; 6] = [Directive::LAYOUT, b'v', b'i', b'v', b'i', b'd'];

/// newest bytecode version this crate can execute
pub const SUPPORTED_VERSION: f64 = 1.0;

/// where the version is stored, right behind the null that ends "vivid". Shorter versions
/// end at the next null.
const VERSION_BYTES: Range<usize> = 7..10;

#[derive(Error, Debug, PartialEq)]
pub enum LoadError {
    #[error("Not vivid bytecode, the signature doesn't match")]
    Signature,

    #[error("Could not read the bytecode version: {0:?}")]
    InvalidVersion(String),

    #[error("Bytecode version {0} is not supported, the newest supported version is {1:.1}")]
    UnsupportedVersion(String, f64),

    #[error("Unknown opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode { offset: usize, opcode: u8 },

    #[error("Instruction at offset {0} has no arguments")]
    EmptyInstruction(usize),

    #[error("Argument of the instruction at offset {offset} is not valid utf-8")]
    Utf8 {
        offset: usize,
        #[source]
        source: std::str::Utf8Error,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// A loaded program. The `layout` instruction is the header of the file, it's kept apart
/// from the instructions that the vm executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub version: f64,
    /// the arguments of the layout instruction, `["vivid", "1.0"]` usually
    pub layout: Vec<String>,
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// creates a program with the default header
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Program {
            version: SUPPORTED_VERSION,
            layout: vec!["vivid".into(), format!("{:.1}", SUPPORTED_VERSION)],
            instructions,
        }
    }

    pub fn layout_instruction(&self) -> Instruction {
        Instruction::new(Directive::Layout, self.layout.iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// encodes the program again, header included
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut res = self.layout_instruction().to_bytes();
        for instruction in &self.instructions {
            instruction.encode(&mut res);
        }
        res
    }
}

/// renders the program as layout source, one instruction per line
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.layout_instruction())?;
        for instruction in &self.instructions {
            write!(f, "\n{}", instruction)?;
        }
        Ok(())
    }
}

/// Checks signature and version, then decodes all instructions
pub fn load(bytes: &[u8]) -> LoadResult<Program> {
    if bytes.get(..SIGNATURE.len()) != Some(&SIGNATURE[..]) {
        return Err(LoadError::Signature);
    }
    let version = read_version(bytes)?;

    let (header, mut offset) = decode_instruction(bytes, 0)?;
    let mut instructions = vec![];
    while offset < bytes.len() {
        let (instruction, next) = decode_instruction(bytes, offset)?;
        debug!(offset, %instruction, "decoded");
        instructions.push(instruction);
        offset = next;
    }

    Ok(Program {
        version,
        layout: header.args,
        instructions,
    })
}

/// The version is compared as a whole decimal number, so 1.1 is rejected as well as 2.0
fn read_version(bytes: &[u8]) -> LoadResult<f64> {
    let end = bytes.len().min(VERSION_BYTES.end);
    let Some(raw) = bytes.get(VERSION_BYTES.start..end) else {
        return Err(LoadError::InvalidVersion(String::new()));
    };
    let raw = raw.split(|b| *b == NUL).next().unwrap_or_default();
    let text = String::from_utf8_lossy(raw).into_owned();
    let version = match text.parse::<f64>() {
        Ok(version) if version.is_finite() => version,
        _ => return Err(LoadError::InvalidVersion(text)),
    };
    if version > SUPPORTED_VERSION {
        return Err(LoadError::UnsupportedVersion(text, SUPPORTED_VERSION));
    }
    Ok(version)
}

/// Decodes the instruction that starts at `offset`, returns it together with the offset of the
/// next one. The instruction ends at the first double null. If there is none, the rest of the
/// buffer is the last instruction.
fn decode_instruction(bytes: &[u8], offset: usize) -> LoadResult<(Instruction, usize)> {
    let opcode = bytes[offset];
    let directive =
        Directive::from_opcode(opcode).ok_or(LoadError::UnknownOpcode { offset, opcode })?;

    let body_start = offset + 1;
    let rest = &bytes[body_start..];
    let (body, next) = match find_terminator(rest) {
        Some(end) => (&rest[..end], body_start + end + 2),
        None => (rest.strip_suffix(&[NUL]).unwrap_or(rest), bytes.len()),
    };
    if body.is_empty() {
        return Err(LoadError::EmptyInstruction(offset));
    }

    let args = body
        .split(|b| *b == NUL)
        .map(|arg| {
            std::str::from_utf8(arg)
                .map(str::to_string)
                .map_err(|source| LoadError::Utf8 { offset, source })
        })
        .collect::<LoadResult<Vec<_>>>()?;
    Ok((Instruction { directive, args }, next))
}

/// index of the first byte of the first double null
fn find_terminator(bytes: &[u8]) -> Option<usize> {
    bytes.windows(2).position(|w| w[0] == NUL && w[1] == NUL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_source;

    const HEADER: &[u8] = b"\x08vivid\x001.0\x00\x00";

    fn with_header(body: &[u8]) -> Vec<u8> {
        let mut res = HEADER.to_vec();
        res.extend_from_slice(body);
        res
    }

    #[test]
    fn test_header() {
        let program = load(HEADER).unwrap();
        assert_eq!(HEADER.len(), 12);
        assert_eq!(program.version, 1.0);
        assert_eq!(program.layout, ["vivid", "1.0"]);
        assert!(program.is_empty());
    }

    #[test]
    fn test_instructions() {
        let program = load(&with_header(b"\x03//h1\x00\x00\x0bx\x00<space>\x00\x00")).unwrap();
        assert_eq!(
            program.instructions,
            [
                Instruction::new(Directive::Follow, ["//h1"]),
                Instruction::new(Directive::Replace, ["x", "<space>"]),
            ]
        );
    }

    #[test]
    fn test_bundle_opcode_is_null() {
        let program = load(&with_header(b"\x00//li\x00\x00\x00*\x00\x00")).unwrap();
        assert_eq!(
            program.instructions,
            [
                Instruction::new(Directive::Bundle, ["//li"]),
                Instruction::new(Directive::Bundle, ["*"]),
            ]
        );
    }

    #[test]
    fn test_missing_final_separator() {
        for tail in [&b"\x07items"[..], &b"\x07items\x00"[..]] {
            let program = load(&with_header(tail)).unwrap();
            assert_eq!(
                program.instructions,
                [Instruction::new(Directive::Label, ["items"])]
            );
        }
    }

    #[test]
    fn test_signature() {
        assert_eq!(load(b"\x08vivi"), Err(LoadError::Signature));
        assert_eq!(
            load(b"\x08vivax\x001.0\x00\x00"),
            Err(LoadError::Signature)
        );
        assert_eq!(load(b""), Err(LoadError::Signature));
    }

    #[test]
    fn test_version() {
        assert!(load(b"\x08vivid\x000.9\x00\x00").is_ok());
        assert_eq!(
            load(b"\x08vivid\x001.1\x00\x00"),
            Err(LoadError::UnsupportedVersion("1.1".into(), 1.0))
        );
        assert_eq!(
            load(b"\x08vivid\x002.0\x00\x00"),
            Err(LoadError::UnsupportedVersion("2.0".into(), 1.0))
        );
        assert!(matches!(
            load(b"\x08vivid\x00one\x00\x00"),
            Err(LoadError::InvalidVersion(_))
        ));
        assert_eq!(
            load(b"\x08vivid\x00"),
            Err(LoadError::InvalidVersion(String::new()))
        );
    }

    #[test]
    fn test_version_is_a_finite_number() {
        for version in ["NaN", "inf"] {
            let bc = compile_source(&format!("layout\tvivid\t{}\nglue\ta", version)).unwrap();
            assert_eq!(load(&bc), Err(LoadError::InvalidVersion(version.into())));
        }
    }

    #[test]
    fn test_short_version() {
        let bc = compile_source("layout\tvivid\t1\nglue\ta").unwrap();
        let program = load(&bc).unwrap();
        assert_eq!(program.version, 1.0);
        assert_eq!(program.layout, ["vivid", "1"]);
        assert_eq!(program.instructions, [Instruction::new(Directive::Glue, ["a"])]);
        assert_eq!(program.to_bytes(), bc);

        assert_eq!(load(b"\x08vivid\x001").unwrap().version, 1.0);
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            load(&with_header(b"\x2a//a\x00\x00")),
            Err(LoadError::UnknownOpcode {
                offset: 12,
                opcode: 0x2a
            })
        );
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(matches!(
            load(&with_header(b"\x04\xff\xfe\x00\x00")),
            Err(LoadError::Utf8 { offset: 12, .. })
        ));
    }

    #[test]
    fn test_disassembly_compiles_to_same_bytes() {
        let src = "layout\tvivid\t1.0\nfollow\t//a/@href\nkeep\t^https\ninsert\t%\t<%>\nlabel\tlinks";
        let bc = compile_source(src).unwrap();
        let program = load(&bc).unwrap();
        assert_eq!(program.to_string(), src);
        assert_eq!(program.to_bytes(), bc);
        assert_eq!(compile_source(&program.to_string()).unwrap(), bc);
    }
}
