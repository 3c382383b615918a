//! The directive table. It is closed: the token, the opcode and the handler of every
//! directive are fixed at compile time.

use proc_macros::Dispatch;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// Representing the directives of the language. The discriminant of a variant is its opcode,
/// which is the index of its token in alphabetical order. Because of that, `layout` ends up as
/// `0x08`, and that byte doubles as the first byte of every bytecode file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    EnumIter,
    EnumCount,
    FromRepr,
    Dispatch,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Directive {
    /// narrows `follow` and `select` to the nodes of an xpath, `*` restores global mode
    Bundle = 0x00,
    /// removes every string of the top frame that matches a regex
    Drop = 0x01,
    /// first capture group of a regex
    Extract = 0x02,
    /// evaluates an xpath
    Follow = 0x03,
    /// prepends a prefix
    Glue = 0x04,
    /// puts each string into a template, in place of a placeholder
    Insert = 0x05,
    /// retains every string of the top frame that matches a regex
    Keep = 0x06,
    /// appends the top frame to the repository under a name
    Label = 0x07,
    /// header of every layout, never executed
    Layout = 0x08,
    /// hands the top frame to a host command
    Prompt = 0x09,
    /// removes the first occurrence of a literal
    Remove = 0x0A,
    /// global regex substitution
    Replace = 0x0B,
    /// evaluates a css selector
    Select = 0x0C,
    /// computed style of the nodes visited last
    Style = 0x0D,
}

impl Directive {
    /// the token that represents the directive in layout source
    pub fn token(self) -> &'static str {
        self.into()
    }

    pub fn opcode(self) -> u8 {
        self as u8
    }

    pub fn from_token(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::from_repr(opcode)
    }

    /// Whether executing the directive pushes a new frame onto the stack. The others only have
    /// side effects and leave the stack as it is.
    pub fn produces_frame(self) -> bool {
        use Directive::*;
        !matches!(self, Bundle | Label | Layout | Prompt)
    }
}
