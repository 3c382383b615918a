//! The capability the vm needs from the host: querying a document.
//!
//! The crate doesn't ship an xpath or css engine. Hosts implement [`Document`] for whatever
//! they have, the vm only calls through the trait.

use thiserror::Error;

use std::collections::HashMap;
use std::fmt::Debug;

/// Returned by a [`Document`] when it can't evaluate a query, e.g. because of a syntax error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid query {query:?}: {message}")]
pub struct QueryError {
    pub query: String,
    pub message: String,
}

/// The result of an xpath evaluation, typed the same way the xpath data model does it
#[derive(Debug, Clone, PartialEq)]
pub enum XPathResult<N> {
    Number(f64),
    String(String),
    Boolean(bool),
    /// a query for a single node, that may not exist
    Node(Option<N>),
    /// in document order
    NodeSet(Vec<N>),
}

impl<N> XPathResult<N> {
    /// the nodes of the result, None if the result isn't made of nodes
    pub fn into_nodes(self) -> Option<Vec<N>> {
        match self {
            XPathResult::Node(node) => Some(node.into_iter().collect()),
            XPathResult::NodeSet(nodes) => Some(nodes),
            XPathResult::Number(_) | XPathResult::String(_) | XPathResult::Boolean(_) => None,
        }
    }
}

/// A queryable document. `context` narrows a query to the subtree of a node, None means the
/// whole document.
pub trait Document {
    type Node: Clone + Debug;

    fn evaluate(
        &self,
        xpath: &str,
        context: Option<&Self::Node>,
    ) -> Result<XPathResult<Self::Node>, QueryError>;

    /// all matching elements in document order
    fn query_selector_all(
        &self,
        selector: &str,
        context: Option<&Self::Node>,
    ) -> Result<Vec<Self::Node>, QueryError>;

    fn query_selector(
        &self,
        selector: &str,
        context: Option<&Self::Node>,
    ) -> Result<Option<Self::Node>, QueryError> {
        Ok(self
            .query_selector_all(selector, context)?
            .into_iter()
            .next())
    }

    fn text_content(&self, node: &Self::Node) -> Option<String>;

    fn computed_style(&self, node: &Self::Node, property: &str) -> String;
}

/// Index of a node in a [`StaticDocument`]
pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
struct StaticNode {
    text: Option<String>,
    styles: HashMap<String, String>,
}

type QueryKey = (String, Option<NodeId>);

/// A document with canned answers. Every query it should know is registered up front, unknown
/// queries match nothing. Useful to test layouts without a browser.
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    nodes: Vec<StaticNode>,
    xpaths: HashMap<QueryKey, XPathResult<NodeId>>,
    selectors: HashMap<QueryKey, Vec<NodeId>>,
    rejected: HashMap<String, String>,
}

impl StaticDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// adds a node with text content
    pub fn add_node(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(Some(text.into()))
    }

    /// adds a node without text content, like a document node
    pub fn add_empty_node(&mut self) -> NodeId {
        self.push_node(None)
    }

    fn push_node(&mut self, text: Option<String>) -> NodeId {
        self.nodes.push(StaticNode {
            text,
            styles: HashMap::new(),
        });
        self.nodes.len() - 1
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> &mut Self {
        if let Some(n) = self.nodes.get_mut(node) {
            n.styles.insert(property.into(), value.into());
        }
        self
    }

    pub fn on_xpath(
        &mut self,
        xpath: &str,
        context: Option<NodeId>,
        result: XPathResult<NodeId>,
    ) -> &mut Self {
        self.xpaths.insert((xpath.into(), context), result);
        self
    }

    pub fn on_selector(
        &mut self,
        selector: &str,
        context: Option<NodeId>,
        nodes: Vec<NodeId>,
    ) -> &mut Self {
        self.selectors.insert((selector.into(), context), nodes);
        self
    }

    /// makes every evaluation of `query` fail, as a syntax error would
    pub fn reject(&mut self, query: &str, message: &str) -> &mut Self {
        self.rejected.insert(query.into(), message.into());
        self
    }

    fn check(&self, query: &str) -> Result<(), QueryError> {
        match self.rejected.get(query) {
            Some(message) => Err(QueryError {
                query: query.into(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Document for StaticDocument {
    type Node = NodeId;

    fn evaluate(
        &self,
        xpath: &str,
        context: Option<&NodeId>,
    ) -> Result<XPathResult<NodeId>, QueryError> {
        self.check(xpath)?;
        Ok(self
            .xpaths
            .get(&(xpath.to_string(), context.copied()))
            .cloned()
            .unwrap_or(XPathResult::NodeSet(vec![])))
    }

    fn query_selector_all(
        &self,
        selector: &str,
        context: Option<&NodeId>,
    ) -> Result<Vec<NodeId>, QueryError> {
        self.check(selector)?;
        Ok(self
            .selectors
            .get(&(selector.to_string(), context.copied()))
            .cloned()
            .unwrap_or_default())
    }

    fn text_content(&self, node: &NodeId) -> Option<String> {
        self.nodes.get(*node)?.text.clone()
    }

    fn computed_style(&self, node: &NodeId, property: &str) -> String {
        self.nodes
            .get(*node)
            .and_then(|n| n.styles.get(property))
            .cloned()
            .unwrap_or_default()
    }
}
