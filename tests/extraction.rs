//! End-to-end extraction scenarios over in-memory source units.

use arbex::core::{ExtractorOptions, Language, ResourceExtractor, SourceUnit};
use arbex::prompt::ScriptedConsole;
use pretty_assertions::assert_eq;

fn silent() -> ResourceExtractor {
    ResourceExtractor::new(ExtractorOptions::default())
}

fn process(extractor: &mut ResourceExtractor) {
    let mut console = ScriptedConsole::default();
    extractor.process(&mut console).unwrap();
}

#[test]
fn mixed_corpus_shares_one_bundle_and_counter() {
    let mut extractor = silent();
    extractor.add_unit(SourceUnit::from_source(
        "app.js",
        "alert('Hello');",
        Language::Javascript,
    ));
    extractor.add_unit(SourceUnit::from_source(
        "page.html",
        "<html><body><p>World</p></body></html>",
        Language::Html,
    ));
    process(&mut extractor);

    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "alert(r$.MSG_00000);"
    );
    assert_eq!(
        extractor.units()[1].rewritten().unwrap(),
        "<html><body><p arb:id=\"MSG_00001\">World</p></body></html>"
    );
    assert_eq!(
        extractor.resource_content().unwrap(),
        "{\n  \"MSG_00000\": \"Hello\",\n  \"MSG_00001\": \"World\"\n}"
    );
}

#[test]
fn literal_only_chains_merge_to_one_entry() {
    for (source, expected) in [
        ("var s = 'a' + 'b';", "ab"),
        ("var s = 'a' + 'b' + 'c';", "abc"),
        ("var s = 'Hello, ' + 'big ' + 'wide ' + 'world';", "Hello, big wide world"),
    ] {
        let mut extractor = silent();
        extractor.add_unit(SourceUnit::from_source("t.js", source, Language::Javascript));
        process(&mut extractor);
        assert_eq!(
            extractor.resource_content().unwrap(),
            format!("{{\n  \"MSG_00000\": \"{}\"\n}}", expected),
            "source: {source}"
        );
        assert_eq!(
            extractor.units()[0].rewritten().unwrap(),
            "var s = r$.MSG_00000;"
        );
    }
}

#[test]
fn placeholder_indices_follow_operand_order() {
    let mut extractor = silent();
    extractor.add_unit(SourceUnit::from_source(
        "t.js",
        "var s = 'a' + x + 'b' + y + 'c';",
        Language::Javascript,
    ));
    process(&mut extractor);
    assert_eq!(
        extractor.resource_content().unwrap(),
        "{\n  \"MSG_00000\": \"a{0}b{1}c\"\n}"
    );
    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "var s = arb.msg(r$.MSG_00000, x, y);"
    );
}

#[test]
fn leading_variable_operand_is_argument_zero() {
    let mut extractor = silent();
    extractor.add_unit(SourceUnit::from_source(
        "t.js",
        "var s = count + ' items';",
        Language::Javascript,
    ));
    process(&mut extractor);
    assert_eq!(
        extractor.resource_content().unwrap(),
        "{\n  \"MSG_00000\": \"{0} items\"\n}"
    );
    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "var s = arb.msg(r$.MSG_00000, count);"
    );
}

#[test]
fn function_call_operand_becomes_argument() {
    let mut extractor = silent();
    extractor.add_unit(SourceUnit::from_source(
        "t.js",
        "var s = 'Hi ' + getName(user);",
        Language::Javascript,
    ));
    process(&mut extractor);
    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "var s = arb.msg(r$.MSG_00000, getName(user));"
    );
}

#[test]
fn zero_replacement_units_round_trip_byte_for_byte() {
    let script = "// leading comment\nvar re = /ab+c/;\nvar t = `sum ${1 + 2}`;  /* inline */\nfor (var i = 0; i < 3; i++) { tick(i); }\n";
    let markup = "<!DOCTYPE html>\n<html>\n  <!-- nothing localizable -->\n  <body>\n    <img src=\"x.png\">\n  </body>\n</html>\n";

    let mut extractor = silent();
    extractor.add_unit(SourceUnit::from_source("t.js", script, Language::Javascript));
    extractor.add_unit(SourceUnit::from_source("t.html", markup, Language::Html));
    process(&mut extractor);

    assert_eq!(extractor.units()[0].rewritten().unwrap(), script);
    assert_eq!(extractor.units()[1].rewritten().unwrap(), markup);
    assert_eq!(extractor.resource_content().unwrap(), "{}");
}

#[test]
fn formatting_around_replacements_is_preserved() {
    let mut extractor = silent();
    extractor.add_unit(SourceUnit::from_source(
        "t.js",
        "if (ready) {\n    log( 'Done' );   // trailing note\n}\n",
        Language::Javascript,
    ));
    process(&mut extractor);
    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "if (ready) {\n    log( r$.MSG_00000 );   // trailing note\n}\n"
    );
}

#[test]
fn strings_in_function_arguments_and_returns() {
    let mut extractor = silent();
    extractor.add_unit(SourceUnit::from_source(
        "t.js",
        "function greet() {\n  return 'Welcome back';\n}\nshow(greet(), 'and enjoy');\n",
        Language::Javascript,
    ));
    process(&mut extractor);
    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "function greet() {\n  return r$.MSG_00000;\n}\nshow(greet(), r$.MSG_00001);\n"
    );
    assert_eq!(
        extractor.resource_content().unwrap(),
        "{\n  \"MSG_00000\": \"Welcome back\",\n  \"MSG_00001\": \"and enjoy\"\n}"
    );
}

#[test]
fn interactive_existing_markup_id_flow() {
    // element carries its own id, not yet in the bundle: reviewer confirms
    // the change and keeps the existing id
    let mut extractor = ResourceExtractor::new(ExtractorOptions {
        silent: false,
        ..ExtractorOptions::default()
    });
    extractor.add_unit(SourceUnit::from_source(
        "page.html",
        "<p id=\"greeting\">Hello</p>",
        Language::Html,
    ));
    let mut console = ScriptedConsole::new(["y", "y"]);
    extractor.process(&mut console).unwrap();

    // the element keeps its plain id, the bundle gains the entry
    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "<p id=\"greeting\">Hello</p>"
    );
    assert_eq!(
        extractor.resource_content().unwrap(),
        "{\n  \"greeting\": \"Hello\"\n}"
    );
}

#[test]
fn interactive_mixed_accept_and_reject() {
    let mut extractor = ResourceExtractor::new(ExtractorOptions {
        silent: false,
        ..ExtractorOptions::default()
    });
    extractor.add_unit(SourceUnit::from_source(
        "t.js",
        "alert('Keep me');\nalert('Drop me');",
        Language::Javascript,
    ));
    // accept the first with the suggested id, reject the second
    let mut console = ScriptedConsole::new(["y", "", "n"]);
    extractor.process(&mut console).unwrap();

    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "alert(r$.MSG_00000);\nalert('Drop me');"
    );
    assert_eq!(
        extractor.resource_content().unwrap(),
        "{\n  \"MSG_00000\": \"Keep me\"\n}"
    );
}

#[test]
fn rejected_preview_ids_leave_no_gaps() {
    let mut extractor = ResourceExtractor::new(ExtractorOptions {
        silent: false,
        ..ExtractorOptions::default()
    });
    extractor.add_unit(SourceUnit::from_source(
        "t.js",
        "alert('One');\nalert('Two');\nalert('Three');",
        Language::Javascript,
    ));
    // reject the first two candidates, accept the third with the suggestion
    let mut console = ScriptedConsole::new(["n", "n", "y", ""]);
    extractor.process(&mut console).unwrap();

    // the previews for the rejected records were recycled: the accepted one
    // still starts at zero
    assert_eq!(
        extractor.resource_content().unwrap(),
        "{\n  \"MSG_00000\": \"Three\"\n}"
    );
}

#[test]
fn markup_ids_collected_across_units_block_collisions() {
    // the second unit's element id is collected during preprocessing, so the
    // first unit's generated id must skip it
    let mut extractor = silent();
    extractor.add_unit(SourceUnit::from_source(
        "a.html",
        "<p>Text</p>",
        Language::Html,
    ));
    extractor.add_unit(SourceUnit::from_source(
        "b.html",
        "<div id=\"MSG_00000\">anchor</div>",
        Language::Html,
    ));
    process(&mut extractor);

    assert_eq!(
        extractor.units()[0].rewritten().unwrap(),
        "<p arb:id=\"MSG_00001\">Text</p>"
    );
}
