//! directives that evaluate xpath

use tracing::trace;

use super::text_of;
use crate::document::{Document, XPathResult};
use crate::utils::format_number;
use crate::vm::{arg, Env, Error, Result, Stack};

/// the argument of `bundle` that switches back to global mode
pub const CLEAR_SCOPE: &str = "*";

/// In global mode, the result is converted according to its type: scalars become a single
/// string, a single node its text, and a node-set one text per node. In a bundle scope, the
/// xpath is evaluated once per scoped node, and the text of the first match is taken, so the
/// frame has exactly one string per scoped node.
pub fn exec_follow<D: Document>(
    env: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let xpath = arg(args, 0)?;
    let doc = env.document;
    env.visited.clear();

    let frame = match &env.scope {
        None => match doc.evaluate(xpath, None)? {
            XPathResult::Number(n) => vec![format_number(n)],
            XPathResult::String(s) => vec![s],
            XPathResult::Boolean(b) => vec![b.to_string()],
            XPathResult::Node(node) => {
                let text = node.as_ref().map(|n| text_of(doc, n)).unwrap_or_default();
                env.visited.extend(node);
                vec![text]
            }
            XPathResult::NodeSet(nodes) => {
                let texts = nodes.iter().map(|n| text_of(doc, n)).collect();
                env.visited = nodes;
                texts
            }
        },
        Some(scope) => {
            let mut frame = Vec::with_capacity(scope.len());
            for element in scope {
                let text = match doc.evaluate(xpath, Some(element))? {
                    XPathResult::Number(n) => format_number(n),
                    XPathResult::String(s) => s,
                    XPathResult::Boolean(b) => b.to_string(),
                    XPathResult::Node(node) => first_text(doc, node, &mut env.visited),
                    XPathResult::NodeSet(nodes) => {
                        first_text(doc, nodes.into_iter().next(), &mut env.visited)
                    }
                };
                frame.push(text);
            }
            frame
        }
    };

    trace!(xpath, matches = frame.len(), "follow");
    Ok(stack.with_frame(frame))
}

fn first_text<D: Document>(
    doc: &D,
    node: Option<D::Node>,
    visited: &mut Vec<D::Node>,
) -> String {
    match node {
        Some(node) => {
            let text = text_of(doc, &node);
            visited.push(node);
            text
        }
        None => String::new(),
    }
}

/// Replaces the scope with the nodes of an xpath, or clears it with `*`. Leaves the stack as
/// it is.
pub fn exec_bundle<D: Document>(
    env: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let xpath = arg(args, 0)?;
    if xpath == CLEAR_SCOPE {
        trace!("bundle cleared");
        env.scope = None;
        return Ok(stack);
    }

    let nodes = env
        .document
        .evaluate(xpath, None)?
        .into_nodes()
        .ok_or_else(|| Error::NotANodeSet(xpath.into()))?;
    trace!(xpath, nodes = nodes.len(), "bundle");
    env.visited = nodes.clone();
    env.scope = Some(nodes);
    Ok(stack)
}
