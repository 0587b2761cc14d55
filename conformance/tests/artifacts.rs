//! Conformance of freshly generated artifacts, and detection of broken ones.

use std::fs;
use std::path::Path;

use semio_codegen::{dispatch, registry, TemplateSource};
use semio_conformance::{run_all, ConformanceReport};
use semio_schema::{build_schema, Cardinality, Characterization, DefinitionRecord, Schema};

fn schema() -> Schema {
    let records = [
        DefinitionRecord::package("Geometry"),
        DefinitionRecord::class("Point"),
        DefinitionRecord::property("Point", "X").kind("Number"),
        DefinitionRecord::property("Point", "Y").kind("Number"),
        DefinitionRecord::package("Model").imports(&["Geometry"]),
        DefinitionRecord::class("Artifact"),
        DefinitionRecord::property("Artifact", "Name"),
        DefinitionRecord::class("Layout").kind("Artifact"),
        DefinitionRecord::property("Layout", "Origin")
            .kind("Point")
            .owns(true),
        DefinitionRecord::property("Layout", "Anchors")
            .kind("Point")
            .cardinality(Cardinality::ZeroOrMany),
        DefinitionRecord::property("Layout", "Value")
            .kind("Number | Text | Point")
            .cardinality(Cardinality::ZeroOrOne),
        DefinitionRecord::class("Repository"),
        DefinitionRecord::property("Repository", "Url").owns(true),
        DefinitionRecord::property("Repository", "Layouts")
            .kind("Layout")
            .cardinality(Cardinality::OneOrMany)
            .owns(true),
    ];
    build_schema(
        Schema::new(Characterization::named("Semio"), "0.1.0"),
        &records,
    )
    .unwrap()
}

fn generate(schema: &Schema, out: &Path) {
    let generators = registry::builtin(&TemplateSource::Bundled);
    for outcome in dispatch(&generators, out, schema) {
        outcome.result.unwrap();
    }
}

fn failures(report: &ConformanceReport) -> Vec<String> {
    report
        .failures()
        .map(|r| format!("{}: {} {:?}", r.validator, r.message, r.details))
        .collect()
}

#[test]
fn generated_artifacts_conform() {
    let schema = schema();
    let out = tempfile::tempdir().unwrap();
    generate(&schema, out.path());

    let report = run_all(&schema, out.path()).unwrap();
    assert!(report.all_passed(), "{:#?}", failures(&report));
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn missing_proto_file_fails() {
    let schema = schema();
    let out = tempfile::tempdir().unwrap();
    generate(&schema, out.path());
    fs::remove_file(out.path().join("geometry.proto")).unwrap();

    let report = run_all(&schema, out.path()).unwrap();
    let failures = failures(&report);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("geometry.proto not found"));
}

#[test]
fn stray_proto_file_fails() {
    let schema = schema();
    let out = tempfile::tempdir().unwrap();
    generate(&schema, out.path());
    fs::write(out.path().join("legacy.proto"), "syntax = \"proto2\";\n").unwrap();

    let report = run_all(&schema, out.path()).unwrap();
    let failures = failures(&report);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("legacy.proto"));
}

#[test]
fn missing_message_fails() {
    let schema = schema();
    let out = tempfile::tempdir().unwrap();
    generate(&schema, out.path());
    let path = out.path().join("model.proto");
    let proto = fs::read_to_string(&path).unwrap();
    fs::write(&path, proto.replace("message Repository {", "message Repo {")).unwrap();

    let report = run_all(&schema, out.path()).unwrap();
    let failures = failures(&report);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("missing message Repository"));
}

#[test]
fn malformed_shapes_fail() {
    let schema = schema();
    let out = tempfile::tempdir().unwrap();
    generate(&schema, out.path());
    fs::write(out.path().join("semio.shapes.ttl"), "@prefix sh: <http://www.w3.org/ns/shacl#> .\nsh:a sh:b").unwrap();

    let report = run_all(&schema, out.path()).unwrap();
    let failures = failures(&report);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("is not valid Turtle"));
}

#[test]
fn missing_node_shape_fails() {
    let schema = schema();
    let out = tempfile::tempdir().unwrap();
    generate(&schema, out.path());
    let path = out.path().join("semio.shapes.ttl");
    let shapes = fs::read_to_string(&path).unwrap();
    fs::write(
        &path,
        shapes.replace("sh:targetClass semio:Point ;", "sh:targetClass semio:Spot ;"),
    )
    .unwrap();

    let report = run_all(&schema, out.path()).unwrap();
    let failures = failures(&report);
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("no shape targets Point"));
}

#[test]
fn empty_directory_fails_everything() {
    let schema = schema();
    let out = tempfile::tempdir().unwrap();
    let report = run_all(&schema, out.path()).unwrap();
    // Two packages without files plus the missing shapes document.
    assert_eq!(report.failure_count(), 3);
}
