//! directives that only have side effects

use tracing::{trace, warn};

use crate::document::Document;
use crate::vm::{arg, Env, Error, Result, Stack};

/// appends the top frame to the repository, under the given name
pub fn exec_label<D: Document>(
    env: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let name = arg(args, 0)?;
    trace!(label = name, values = stack.top().len(), "label");
    env.context
        .repository
        .append(name, stack.top().iter().cloned());
    Ok(stack)
}

/// Calls a host command with the top frame and the remaining arguments. Does nothing if there
/// is no such command.
pub fn exec_prompt<D: Document>(
    env: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let command = arg(args, 0)?;
    if !env.context.call_command(command, stack.top(), &args[1..]) {
        warn!(command, "prompt for an unknown command, ignoring it");
    }
    Ok(stack)
}

/// `layout` is the header of a program and is consumed by the loader. Reaching it here means
/// the bytecode is broken.
pub fn exec_layout<D: Document>(
    _: &mut Env<'_, D>,
    _: Stack,
    _: &[String],
) -> Result<Stack> {
    bail!(LayoutAtRuntime)
}
