//! Contains sample RILL modules, used to exercise module linking in tests.

use rill::builder::Builder;
use rill::identifier::Identifier;
use rill::instruction::Instruction;
use rill::linkage::InlinePolicy;
use rill::record::{Body, Linkage, ModuleIdentifier, SymbolRecord};
use std::borrow::Cow;

fn module_identifier(name: Identifier) -> ModuleIdentifier<'static> {
    let link_name = Identifier::try_from(format!("rill{}", name.as_str())).unwrap();
    ModuleIdentifier::new_owned(name, link_name)
}

/// Produces a module exporting a single function with a serialized body and the specified inline policy.
///
/// # Examples
///
/// ```
/// use rill::linkage::InlinePolicy;
///
/// let module = rill_samples::exported_function(
///     "core".try_into()?,
///     "$s4core3fooyyF".try_into()?,
///     InlinePolicy::Default,
/// );
///
/// assert!(module.symbols()[0].body_present());
/// # Result::<_, rill::identifier::InvalidIdentifier>::Ok(())
/// ```
pub fn exported_function(module: Identifier, symbol: Identifier, inline_policy: InlinePolicy) -> Builder {
    let mut builder = Builder::new(module_identifier(module));

    builder.add_symbol(
        SymbolRecord::function(Cow::Owned(symbol), Linkage::Public)
            .with_inline_policy(inline_policy)
            .with_body(Body::from_instructions(&[Instruction::Nop, Instruction::Ret]).unwrap()),
    );

    builder
}

/// Produces a module whose only export is a declaration; no body is shipped with the summary.
pub fn thin_interface(module: Identifier, symbol: Identifier) -> Builder {
    let mut builder = Builder::new(module_identifier(module));
    builder.add_symbol(SymbolRecord::function(Cow::Owned(symbol), Linkage::Public));
    builder
}

/// Produces a translation unit defining `caller`, whose body calls each of the `callees` in turn.
pub fn translation_unit(module: Identifier, caller: Identifier, callees: &[Identifier]) -> Builder {
    let mut builder = Builder::new(module_identifier(module));

    let mut instructions = Vec::with_capacity(callees.len() + 1);
    instructions.extend(callees.iter().cloned().map(Instruction::Call));
    instructions.push(Instruction::Ret);

    builder.add_symbol(
        SymbolRecord::function(Cow::Owned(caller), Linkage::Public)
            .with_body(Body::from_instructions(&instructions).unwrap()),
    );

    builder
}

/// Produces a translation unit that additionally defines a private `noinline` helper alongside the caller.
pub fn translation_unit_with_helper(
    module: Identifier,
    caller: Identifier,
    helper: Identifier,
    callees: &[Identifier],
) -> Builder {
    let mut builder = translation_unit(module, caller, callees);

    builder.add_symbol(
        SymbolRecord::function(Cow::Owned(helper), Linkage::Private)
            .with_inline_policy(InlinePolicy::NoInline)
            .with_body(Body::from_instructions(&[Instruction::Ret]).unwrap()),
    );

    builder
}
