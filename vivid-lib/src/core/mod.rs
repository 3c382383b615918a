//! contains the data structures shared by the parser, compiler, loader and vm

pub mod directive;
pub use directive::*;

pub mod record;
pub use record::*;

pub mod instruction;
pub use instruction::*;
