//! A small language for declarative content extraction. A layout is a tab separated script,
//! every line holds a directive and its arguments. Layouts are compiled to bytecode, which the
//! vm executes against a queryable document. The results end up in a repository of labeled
//! string collections.
//!
//! What you need to do to execute a layout is the following:
//! 1. load a source file into a string.
//! 1. convert that into line records using [`parser::parse`]. Records of defective lines
//!    carry their problems, the parser doesn't stop on them.
//! 1. compile the records to bytecode using [`compiler::compile`]
//!    ([`compiler::compile_source`] does both steps)
//! 1. load the bytecode into a [`bytecode::Program`] using [`bytecode::load`]
//! 1. implement [`document::Document`] for your document, create a [`context::Context`] and
//!    register the commands `prompt` may call.
//! 1. create a [`vm::Interpreter`] and step through it, or simply run it:
//!
//!    ```
//!    use vivid_lib::context::Context;
//!    use vivid_lib::document::{StaticDocument, XPathResult};
//!    use vivid_lib::vm::Interpreter;
//!    use vivid_lib::{bytecode, compiler};
//!
//!    let bc = compiler::compile_source("layout\tvivid\t1.0\nfollow\t//h1\nlabel\ttitle")?;
//!    let program = bytecode::load(&bc)?;
//!
//!    let mut doc = StaticDocument::new();
//!    let h1 = doc.add_node("this is a title");
//!    doc.on_xpath("//h1", None, XPathResult::NodeSet(vec![h1]));
//!
//!    let mut ctx = Context::new();
//!    for stack in Interpreter::new(&program, &doc, &mut ctx) {
//!        println!("{:?}", stack?.top());
//!    }
//!    assert_eq!(ctx.repository.get("title").unwrap(), ["this is a title"]);
//!    # Ok::<(), Box<dyn std::error::Error>>(())
//!    ```
//!
//! The context outlives runs, call [`context::Context::reset`] between independent ones.
pub mod bytecode;
pub mod compiler;
pub mod context;
pub mod core;
pub mod document;
pub mod parser;
pub mod utils;
pub mod vm;
