//! contains the exec functions that correspond to the [Directive](crate::core::Directive)
//! variants. Their names must stay `exec_<token>`, the `Dispatch` derive relies on that.

mod control;
mod css;
mod html;
mod text;

pub use control::*;
pub use css::*;
pub use html::*;
pub use text::*;

use crate::document::Document;

/// text content of a node, empty if it has none
fn text_of<D: Document>(doc: &D, node: &D::Node) -> String {
    doc.text_content(node).unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::vm::Stack;

    pub fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// a stack with a single frame
    pub fn stack_of(values: &[&str]) -> Stack {
        Stack::new().with_frame(strings(values))
    }
}
