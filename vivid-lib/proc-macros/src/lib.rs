use proc_macro::TokenStream;
mod dispatch;

/// Used on the Directive enum.
///
/// A directive is a token in the layout source, a one byte opcode in the bytecode, and a
/// handler function in the vm. The token and opcode mapping is done with strum and the
/// enums discriminants, this macro takes care of the last part, so that adding a directive
/// without a handler is a compile error instead of a runtime lookup failure.
///
/// This Macro generates the following:
/// * an associated `u8` constant for each variant, named like the variant in upper case
///   (`Directive::LAYOUT`), which holds its opcode
/// * `Self::handler::<D>(self) -> crate::vm::Handler<D>`
///   Every directive will be executed at some point by the vm.
///   this function returns the associated fn for a directive. That fn must be called
///   `exec_<directive in lowercase>` and live in `crate::vm::directives`, with the signature
///   `fn(&mut Env<'_, D>, Stack, &[String]) -> Result<Stack>`
#[proc_macro_derive(Dispatch)]
pub fn dispatch(tokens: TokenStream) -> TokenStream {
    dispatch::dispatch_impl(tokens)
}
