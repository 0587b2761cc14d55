//! The sample definition table at the workspace root builds and conforms.

use std::path::{Path, PathBuf};

use semio_clients::config::{BuildConfig, FileConfig, Overrides};
use semio_clients::load_schema;
use semio_codegen::{dispatch, registry, GenerationReport};
use semio_conformance::run_all;

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .to_path_buf()
}

fn sample_config(out: &Path) -> BuildConfig {
    let root = workspace_root();
    let file = FileConfig::load(&root.join("semio.toml")).unwrap();
    BuildConfig::resolve(
        file,
        Overrides {
            definitions: Some(root.join("definitions.csv")),
            out: Some(out.to_path_buf()),
            ..Overrides::default()
        },
    )
}

#[test]
fn sample_builds_and_conforms() {
    let out = tempfile::tempdir().unwrap();
    let config = sample_config(out.path());

    let schema = load_schema(&config.definitions, &config.schema).unwrap();
    assert_eq!(schema.characterization.name, "Semio");
    assert_eq!(schema.packages.len(), 2);
    assert_eq!(schema.class_count(), 6);
    assert_eq!(schema.property_count(), 16);

    let generators = registry::select(&config.generators, &config.templates).unwrap();
    let outcomes = dispatch(&generators, &config.out, &schema);
    let report = GenerationReport::new(&schema, &config.out, &outcomes);
    assert!(report.all_passed(), "{:?}", report.failures);

    let mut files = report.files.clone();
    files.sort();
    assert_eq!(files, vec!["geometry.proto", "model.proto", "semio.shapes.ttl"]);

    let conformance = run_all(&schema, &config.out).unwrap();
    let failures: Vec<String> = conformance
        .failures()
        .map(|r| format!("{}: {} {:?}", r.validator, r.message, r.details))
        .collect();
    assert!(conformance.all_passed(), "{failures:#?}");
    assert_eq!(conformance.warning_count(), 0);
}

#[test]
fn sample_types_reach_the_protobuf_output() {
    let out = tempfile::tempdir().unwrap();
    let config = sample_config(out.path());
    let schema = load_schema(&config.definitions, &config.schema).unwrap();

    let generators = registry::select(&["protobuf"], &config.templates).unwrap();
    for outcome in dispatch(&generators, &config.out, &schema) {
        outcome.result.unwrap();
    }

    let model = std::fs::read_to_string(out.path().join("model.proto")).unwrap();
    assert!(model.contains("import \"geometry.proto\";"));
    assert!(model.contains("message Repository {"));
    assert!(model.contains("required Entity base = 2;"));
    assert!(model.contains("repeated Kit kits ="));
    assert!(model.contains("optional string repository_id ="));
    assert!(model.contains("oneof variant {"));
}
