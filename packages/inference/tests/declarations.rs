//! End-to-end declaration generation over multi-template families.

use stache_inference::{generate_declarations, InferenceError, StructureGraph};
use stache_parser::parse;

fn graph_of(entries: &[(&str, &str)]) -> StructureGraph {
    let mut graph = StructureGraph::new();
    for (name, source) in entries {
        graph.add_template(name, &parse(source).unwrap());
    }
    graph
}

const TEST_PARTIAL: &str = "{{name}} is {{age}} years old";

const TEST_NAMETAG: &str = "
    {{#person}}{{> _person}}{{/person}} or {{name}} it shouldn't matter
  ";

const TEST_PROFILE: &str = "
  {{> _person}}'s profile
";

#[test]
fn test_family_with_shared_partial() {
    let graph = graph_of(&[
        ("_person", TEST_PARTIAL),
        ("nametag", TEST_NAMETAG),
        ("profile", TEST_PROFILE),
    ]);
    let output = generate_declarations(&graph).unwrap();

    // The partial's own type
    assert!(output.contains("interface _person {\n  name: MustacheValue\n  age: MustacheValue\n}"));

    // Its fields are inlined into the section type and into each includer
    assert!(output.contains(
        "interface NametagPerson {\n  name: MustacheValue\n  age: MustacheValue\n}"
    ));
    assert!(output.contains("person?: MustacheSection<NametagPerson>"));
    assert!(output.contains("interface Profile {\n  name: MustacheValue\n  age: MustacheValue\n}"));

    // Index blocks in registration order
    assert!(output.contains(
        "export type TemplateMap = {\n  '_person': _person,\n  'nametag': Nametag,\n  'profile': Profile,\n}"
    ));
    assert!(output.contains("export type TemplateName = keyof TemplateMap"));
    assert!(output
        .contains("export const TEMPLATES = [\n  '_person',\n  'nametag',\n  'profile',\n] as const"));
}

#[test]
fn test_nested_properties() {
    let graph = graph_of(&[("test", "{{ foo.bar }}")]);
    let output = generate_declarations(&graph).unwrap();

    assert!(output.contains("interface Test {\n  foo: MustacheRecord<TestFoo>\n}"));
    assert!(output.contains("interface TestFoo {\n  bar: MustacheValue\n}"));
}

#[test]
fn test_nested_properties_in_sections() {
    let graph = graph_of(&[("test", "{{# foo.bar }} {{pleaseDontButOk}} {{/ foo.bar}}")]);
    let output = generate_declarations(&graph).unwrap();

    assert!(output.contains("interface Test {\n  foo: MustacheRecord<TestFoo>\n}"));
    assert!(output.contains("interface TestFoo {\n  bar?: MustacheSection<TestFooBar>\n}"));
    assert!(output.contains("interface TestFooBar {\n  pleaseDontButOk: MustacheValue\n}"));
}

#[test]
fn test_text_only_template_resolves_to_empty_type() {
    let graph = graph_of(&[("static", "Just text, a {{! comment }}, nothing else.")]);
    let output = generate_declarations(&graph).unwrap();

    assert!(output.starts_with("interface Static {}"));
}

#[test]
fn test_repeated_paths_do_not_duplicate() {
    let graph = graph_of(&[
        ("a", "{{user.email}} {{user.email}}"),
        ("b", "{{user.email}}"),
    ]);
    let output = generate_declarations(&graph).unwrap();

    assert_eq!(output.matches("interface AUser").count(), 1);
    assert!(output.contains("interface A {\n  user: MustacheRecord<AUser>\n}"));
    assert!(output.contains("interface B {\n  user: MustacheRecord<BUser>\n}"));
}

#[test]
fn test_self_referential_list_template() {
    let graph = graph_of(&[("list", "{{#items}}{{.}}{{/items}}")]);
    let output = generate_declarations(&graph).unwrap();

    assert!(output.contains("interface List {\n  items?: MustacheSection<ListItems>\n}"));
    assert!(output.contains("type ListItems = MustacheValue"));
}

#[test]
fn test_unknown_partial_fails_with_template_name() {
    let graph = graph_of(&[("broken", "{{> does_not_exist}}")]);

    let err = generate_declarations(&graph).unwrap_err();
    assert_eq!(
        err,
        InferenceError::UnknownTemplate("does_not_exist".to_string())
    );
    assert_eq!(err.to_string(), "Unknown template: does_not_exist");
}

#[test]
fn test_partial_supplied_later_succeeds() {
    let graph = graph_of(&[("page", "{{> _footer}}"), ("_footer", "{{year}}")]);
    let output = generate_declarations(&graph).unwrap();

    assert!(output.contains("interface Page {\n  year: MustacheValue\n}"));
}

#[test]
fn test_serialization_is_idempotent_across_calls() {
    let graph = graph_of(&[
        ("_person", TEST_PARTIAL),
        ("nametag", TEST_NAMETAG),
        ("profile", TEST_PROFILE),
    ]);

    let first = generate_declarations(&graph).unwrap();
    let second = generate_declarations(&graph).unwrap();
    assert_eq!(first, second);
}
