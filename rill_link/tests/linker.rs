use rill::identifier::Identifier;
use rill::linkage::{InlinePolicy, Visibility};
use rill_link::error::LinkErrorKind;
use rill_link::module::Module;
use rill_link::symbol::Origin;
use rill_link::{link, Hint, State};

fn name(s: &str) -> Identifier {
    Identifier::try_from(s).unwrap()
}

fn textual(output: &rill_link::Output) -> String {
    let mut buffer = Vec::new();
    rill_link::emit::write_textual(output, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn cross_module_call_is_marked_serialized() {
    let state = State::new();
    state
        .load_import(rill_samples::exported_function(name("core"), name("$s4core3fooyyF"), InlinePolicy::Default))
        .unwrap();

    let unit = state
        .load_translation_unit(rill_samples::translation_unit(name("main"), name("main"), &[name("$s4core3fooyyF")]))
        .unwrap();

    let output = link(&state, &unit, Hint::CrossModuleInline).unwrap();
    assert!(output.unresolved.is_none());

    // Locals come first, referenced externals after.
    let caller = output.symbols[0].symbol().unwrap();
    assert_eq!(caller.name(), "main");
    assert_eq!(caller.origin(), Origin::Local);

    let imported = output.symbols[1].symbol().unwrap();
    assert_eq!(imported.name(), "$s4core3fooyyF");
    assert_eq!(imported.origin(), Origin::Imported);

    let attributes = output.symbols[1].attributes().unwrap();
    assert_eq!(attributes.visibility, Visibility::PublicExternal);
    assert!(attributes.serialized);

    let dump = textual(&output);
    assert!(dump.contains("function public_external [serialized] @$s4core3fooyyF {"));
    assert!(dump.contains("call @$s4core3fooyyF"));
}

#[test]
fn unresolved_reference_is_stubbed_and_batched() {
    let state = State::new();
    let unit = state
        .load_translation_unit(rill_samples::translation_unit(
            name("main"),
            name("main"),
            &[name("$s4core3baryyF"), name("$s4core3bazyyF")],
        ))
        .unwrap();

    let output = link(&state, &unit, Hint::CrossModuleInline).unwrap();

    let unresolved = output.unresolved.as_ref().unwrap();
    let missing: Vec<&str> = unresolved.references().iter().map(|r| r.as_str()).collect();
    assert_eq!(missing, ["$s4core3baryyF", "$s4core3bazyyF"]);

    let dump = textual(&output);
    assert!(dump.contains("function @unknown // $s4core3baryyF"));
    assert!(dump.contains("function @unknown // $s4core3bazyyF"));
}

#[test]
fn duplicate_symbol_across_imports_is_rejected() {
    let state = State::new();
    state
        .load_import(rill_samples::exported_function(name("core"), name("$s4core3bazyyF"), InlinePolicy::Default))
        .unwrap();

    let error = state
        .load_import(rill_samples::exported_function(name("extra"), name("$s4core3bazyyF"), InlinePolicy::Default))
        .unwrap_err();

    assert!(matches!(error.kind(), LinkErrorKind::Duplicate(_)));
    // The clashing module contributed nothing.
    assert_eq!(state.modules().len(), 1);
}

#[test]
fn local_definition_clashing_with_import_is_rejected() {
    let state = State::new();
    state
        .load_import(rill_samples::exported_function(name("core"), name("main"), InlinePolicy::Default))
        .unwrap();

    let error = state
        .load_translation_unit(rill_samples::translation_unit(name("main"), name("main"), &[]))
        .unwrap_err();

    match error.kind() {
        LinkErrorKind::Duplicate(duplicate) => {
            assert_eq!(duplicate.name(), "main");
            assert_eq!(duplicate.existing(), Origin::Imported);
            assert_eq!(duplicate.duplicate(), Origin::Local);
        }
        other => panic!("expected duplicate symbol error, got {:?}", other),
    }
}

#[test]
fn registered_symbols_are_found_by_lookup() {
    let state = State::new();
    let module = state
        .load_import(rill_samples::thin_interface(name("core"), name("$s4core3fooyyF")))
        .unwrap();

    let symbol = state.lookup(module.symbols()[0].name()).unwrap();
    assert_eq!(symbol.origin(), Origin::Imported);
    assert!(!symbol.body_present());
    assert!(state.lookup(&name("$s4core7missingyyF")).is_none());

    // A registered symbol still knows the module that defines it.
    let defining = Module::upgrade_weak(symbol.module()).unwrap();
    assert_eq!(defining.name(), "core");
}

#[test]
fn resolution_is_idempotent() {
    let state = State::new();
    state
        .load_import(rill_samples::exported_function(name("core"), name("$s4core3fooyyF"), InlinePolicy::Default))
        .unwrap();

    let first = rill_link::resolver::resolve(&state, &name("$s4core3fooyyF"));
    let second = rill_link::resolver::resolve(&state, &name("$s4core3fooyyF"));
    assert_eq!(first, second);

    let missing = rill_link::resolver::resolve(&state, &name("$s4core7missingyyF"));
    assert_eq!(missing, rill_link::resolver::resolve(&state, &name("$s4core7missingyyF")));
}

#[test]
fn noinline_policy_is_inherited_by_serialized_imports() {
    let state = State::new();
    state
        .load_import(rill_samples::exported_function(name("core"), name("$s4core3fooyyF"), InlinePolicy::NoInline))
        .unwrap();

    let unit = state
        .load_translation_unit(rill_samples::translation_unit(name("main"), name("main"), &[name("$s4core3fooyyF")]))
        .unwrap();

    let output = link(&state, &unit, Hint::CrossModuleInline).unwrap();
    let dump = textual(&output);
    assert!(dump.contains("public_external [serialized] [noinline] @$s4core3fooyyF"));
}

#[test]
fn thin_imports_are_never_serialized() {
    let state = State::new();
    state
        .load_import(rill_samples::thin_interface(name("core"), name("$s4core3fooyyF")))
        .unwrap();

    let unit = state
        .load_translation_unit(rill_samples::translation_unit(name("main"), name("main"), &[name("$s4core3fooyyF")]))
        .unwrap();

    let output = link(&state, &unit, Hint::CrossModuleInline).unwrap();
    let attributes = output.symbols[1].attributes().unwrap();
    assert_eq!(attributes.visibility, Visibility::PublicExternal);
    assert!(!attributes.serialized);

    let dump = textual(&output);
    assert!(dump.contains("function public_external @$s4core3fooyyF\n"));
}

#[test]
fn declarations_only_hint_keeps_external_bodies_out() {
    let state = State::new();
    state
        .load_import(rill_samples::exported_function(name("core"), name("$s4core3fooyyF"), InlinePolicy::Default))
        .unwrap();

    let unit = state
        .load_translation_unit(rill_samples::translation_unit(name("main"), name("main"), &[name("$s4core3fooyyF")]))
        .unwrap();

    let output = link(&state, &unit, Hint::None).unwrap();
    let attributes = output.symbols[1].attributes().unwrap();
    assert!(!attributes.serialized);
}

#[test]
fn private_helpers_keep_declared_attributes() {
    let state = State::new();
    let unit = state
        .load_translation_unit(rill_samples::translation_unit_with_helper(
            name("main"),
            name("main"),
            name("$s4main6helperyyF"),
            &[],
        ))
        .unwrap();

    let output = link(&state, &unit, Hint::CrossModuleInline).unwrap();

    let helper = output
        .symbols
        .iter()
        .find(|entry| entry.symbol().map_or(false, |symbol| symbol.name() == "$s4main6helperyyF"))
        .unwrap();

    let attributes = helper.attributes().unwrap();
    assert_eq!(attributes.visibility, Visibility::Private);
    assert!(!attributes.serialized);
    assert_eq!(attributes.inline_policy, InlinePolicy::NoInline);
}

#[test]
fn linked_output_round_trips_through_binary_form() {
    let state = State::new();
    state
        .load_import(rill_samples::exported_function(name("core"), name("$s4core3fooyyF"), InlinePolicy::Default))
        .unwrap();

    let unit = state
        .load_translation_unit(rill_samples::translation_unit(name("main"), name("main"), &[name("$s4core3fooyyF")]))
        .unwrap();

    let output = link(&state, &unit, Hint::CrossModuleInline).unwrap();

    let mut image = Vec::new();
    rill_link::emit::write_binary(&output, &mut image).unwrap();

    let contents = rill::reader::Reader::new(image.as_slice()).read_contents().unwrap();
    assert_eq!(contents.identifier.name(), "main");
    assert_eq!(contents.symbols.len(), 2);

    let caller = contents.find_symbol(&name("main")).unwrap();
    assert!(caller.body_present());

    // The serialized import ships its body in the linked image.
    let imported = contents.find_symbol(&name("$s4core3fooyyF")).unwrap();
    assert!(imported.body_present());
    assert_eq!(imported.linkage(), rill::record::Linkage::Public);
}
