//! SHACL shapes validator.
//!
//! Validates the generated shapes document:
//! - the file exists and parses as Turtle 1.1
//! - there is one `sh:NodeShape` per class name, targeting that class
//! - each node shape carries one `sh:property` per property of its class

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use sophia_api::source::TripleSource;
use sophia_api::term::SimpleTerm;

use semio_codegen::mapping;
use semio_schema::Schema;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "artifacts/shacl";

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const SH_NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
const SH_TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";
const SH_PROPERTY: &str = "http://www.w3.org/ns/shacl#property";

type Triple = [SimpleTerm<'static>; 3];

/// Validates the shapes document under `artifacts`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn validate(schema: &Schema, artifacts: &Path) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    let file_name = mapping::shapes_file_name(&schema.characterization.name);
    let path = artifacts.join(&file_name);
    if !path.exists() {
        report.push(TestResult::fail(
            VALIDATOR,
            format!("{file_name} not found in artifacts directory"),
        ));
        return Ok(report);
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let triples: Vec<Triple> = match sophia_turtle::parser::turtle::parse_str(&content)
        .collect_triples::<Vec<Triple>>()
    {
        Ok(triples) => triples,
        Err(err) => {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{file_name} is not valid Turtle"),
                vec![err.to_string()],
            ));
            return Ok(report);
        }
    };
    report.push(TestResult::pass(
        VALIDATOR,
        format!("{file_name} parses as Turtle ({} triples)", triples.len()),
    ));

    check_node_shapes(schema, &triples, &mut report);
    check_property_shapes(schema, &triples, &mut report);

    Ok(report)
}

fn check_node_shapes(schema: &Schema, triples: &[Triple], report: &mut ConformanceReport) {
    let namespace = mapping::shapes_namespace(&schema.characterization.name);
    let classes: BTreeSet<&str> = schema
        .class_entries()
        .map(|(_, class)| class.characterization.name.as_str())
        .collect();

    let node_shapes: BTreeSet<&str> = triples
        .iter()
        .filter(|[_, p, o]| iri(p) == Some(RDF_TYPE) && iri(o) == Some(SH_NODE_SHAPE))
        .filter_map(|[s, _, _]| iri(s))
        .collect();
    let targets: BTreeSet<&str> = triples
        .iter()
        .filter(|[s, p, _]| {
            iri(p) == Some(SH_TARGET_CLASS) && iri(s).is_some_and(|s| node_shapes.contains(s))
        })
        .filter_map(|[_, _, o]| iri(o))
        .collect();

    let untargeted: Vec<String> = classes
        .iter()
        .filter(|name| !targets.contains(format!("{namespace}{name}").as_str()))
        .map(|name| (*name).to_string())
        .collect();

    if node_shapes.len() == classes.len() && untargeted.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("One sh:NodeShape for each of {} classes", classes.len()),
        ));
    } else {
        let mut details = vec![format!(
            "{} node shapes for {} classes",
            node_shapes.len(),
            classes.len()
        )];
        details.extend(untargeted.into_iter().map(|name| format!("no shape targets {name}")));
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "Node shapes do not match the schema classes",
            details,
        ));
    }
}

fn check_property_shapes(schema: &Schema, triples: &[Triple], report: &mut ConformanceReport) {
    let namespace = mapping::shapes_namespace(&schema.characterization.name);

    // Classes sharing a name render into the same shape.
    let mut expected: BTreeMap<String, usize> = BTreeMap::new();
    for (_, class) in schema.class_entries() {
        *expected
            .entry(format!("{namespace}{}Shape", class.characterization.name))
            .or_default() += class.properties.len();
    }

    let mut found: BTreeMap<&str, usize> = BTreeMap::new();
    for [s, p, _] in triples {
        if iri(p) == Some(SH_PROPERTY) {
            if let Some(shape) = iri(s) {
                *found.entry(shape).or_default() += 1;
            }
        }
    }

    let mismatched: Vec<String> = expected
        .iter()
        .filter_map(|(shape, count)| {
            let actual = found.get(shape.as_str()).copied().unwrap_or_default();
            (actual != *count).then(|| format!("{shape}: {actual} property shapes, expected {count}"))
        })
        .collect();

    if mismatched.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("All {} properties have a property shape", schema.property_count()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "Property shapes do not match the schema properties",
            mismatched,
        ));
    }
}

fn iri<'a>(term: &'a SimpleTerm<'_>) -> Option<&'a str> {
    match term {
        SimpleTerm::Iri(iri) => Some(iri.as_str()),
        _ => None,
    }
}
