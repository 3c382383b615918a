//! directives that use css

use tracing::trace;

use super::text_of;
use crate::document::Document;
use crate::vm::{arg, Env, Result, Stack};

/// One string per matching element in global mode. In a bundle scope, one string per scoped
/// element: the text of its first matching descendant, or an empty string.
pub fn exec_select<D: Document>(
    env: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let selector = arg(args, 0)?;
    let doc = env.document;
    env.visited.clear();

    let frame = match &env.scope {
        None => {
            let nodes = doc.query_selector_all(selector, None)?;
            let texts = nodes.iter().map(|n| text_of(doc, n)).collect();
            env.visited = nodes;
            texts
        }
        Some(scope) => {
            let mut frame = Vec::with_capacity(scope.len());
            for element in scope {
                let node = doc.query_selector(selector, Some(element))?;
                frame.push(node.as_ref().map(|n| text_of(doc, n)).unwrap_or_default());
                env.visited.extend(node);
            }
            frame
        }
    };

    trace!(selector, matches = frame.len(), "select");
    Ok(stack.with_frame(frame))
}

/// the computed value of a css property, for every node the last query visited
pub fn exec_style<D: Document>(
    env: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let property = arg(args, 0)?;
    let frame = env
        .visited
        .iter()
        .map(|node| env.document.computed_style(node, property))
        .collect();
    Ok(stack.with_frame(frame))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::document::{StaticDocument, XPathResult};
    use crate::vm::directives::testing::*;
    use crate::vm::directives::{exec_bundle, exec_follow};

    fn list_document() -> (StaticDocument, Vec<usize>) {
        let mut doc = StaticDocument::new();
        let items: Vec<_> = ["one", "two", "three"]
            .into_iter()
            .map(|t| doc.add_node(t))
            .collect();
        doc.on_selector("li", None, items.clone())
            .set_style(items[0], "color", "red")
            .set_style(items[2], "color", "blue");
        (doc, items)
    }

    #[test]
    fn test_select_and_style() {
        let (doc, items) = list_document();
        let mut ctx = Context::new();
        let mut env = Env::new(&doc, &mut ctx);

        let stack = exec_select(&mut env, Stack::new(), &strings(&["li"])).unwrap();
        assert_eq!(stack.top(), ["one", "two", "three"]);
        assert_eq!(env.visited, items);

        let stack = exec_style(&mut env, stack, &strings(&["color"])).unwrap();
        assert_eq!(stack.top(), ["red", "", "blue"]);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_select_resets_visited() {
        let (doc, _) = list_document();
        let mut ctx = Context::new();
        let mut env = Env::new(&doc, &mut ctx);

        let stack = exec_select(&mut env, Stack::new(), &strings(&["li"])).unwrap();
        let stack = exec_select(&mut env, stack, &strings(&["p"])).unwrap();
        assert!(stack.top().is_empty());
        let stack = exec_style(&mut env, stack, &strings(&["color"])).unwrap();
        assert!(stack.top().is_empty());
    }

    #[test]
    fn test_select_in_scope() {
        let mut doc = StaticDocument::new();
        let rows = [doc.add_empty_node(), doc.add_empty_node()];
        let price = doc.add_node("9.99");
        doc.on_xpath("//tr", None, XPathResult::NodeSet(rows.to_vec()))
            .on_selector("td.price", Some(rows[1]), vec![price])
            .set_style(price, "font-weight", "700");
        let mut ctx = Context::new();
        let mut env = Env::new(&doc, &mut ctx);

        let stack = exec_bundle(&mut env, Stack::new(), &strings(&["//tr"])).unwrap();
        let stack = exec_select(&mut env, stack, &strings(&["td.price"])).unwrap();
        assert_eq!(stack.top(), ["", "9.99"]);
        let stack = exec_style(&mut env, stack, &strings(&["font-weight"])).unwrap();
        assert_eq!(stack.top(), ["700"]);
    }

    #[test]
    fn test_style_after_follow() {
        let mut doc = StaticDocument::new();
        let h1 = doc.add_node("title");
        doc.on_xpath("//h1", None, XPathResult::NodeSet(vec![h1]))
            .set_style(h1, "display", "block");
        let mut ctx = Context::new();
        let mut env = Env::new(&doc, &mut ctx);

        let stack = exec_follow(&mut env, Stack::new(), &strings(&["//h1"])).unwrap();
        let stack = exec_style(&mut env, stack, &strings(&["display"])).unwrap();
        assert_eq!(stack.top(), ["block"]);
    }
}
