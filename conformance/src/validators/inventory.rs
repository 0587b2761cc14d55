//! Schema inventory validator.
//!
//! Reports the package/class/property counts of the schema the artifacts are
//! checked against, and warns about:
//! - an empty schema (nothing to generate)
//! - class names defined more than once (later definitions shadow earlier ones)

use std::collections::HashMap;

use semio_schema::Schema;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "schema/inventory";

/// Validates the shape of the schema itself. Performs no I/O.
pub fn validate(schema: &Schema) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    if schema.packages.is_empty() {
        report.push(TestResult::warn(VALIDATOR, "Schema defines no packages"));
    } else {
        report.push(TestResult::pass(
            VALIDATOR,
            format!(
                "Schema defines {} packages, {} classes, {} properties",
                schema.packages.len(),
                schema.class_count(),
                schema.property_count()
            ),
        ));
    }

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for (_, class) in schema.class_entries() {
        *occurrences
            .entry(class.characterization.name.as_str())
            .or_default() += 1;
    }
    let mut shadowed: Vec<String> = occurrences
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, count)| format!("{name} (defined {count} times)"))
        .collect();
    shadowed.sort();
    if !shadowed.is_empty() {
        report.push(TestResult::warn_with_details(
            VALIDATOR,
            "Class names defined more than once",
            shadowed,
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use semio_schema::{build_schema, Characterization, DefinitionRecord};

    fn seed() -> Schema {
        Schema::new(Characterization::named("Semio"), "0.1.0")
    }

    #[test]
    fn empty_schema_warns() {
        let report = validate(&seed());
        assert!(report.all_passed());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn shadowed_classes_warn() {
        let records = [
            DefinitionRecord::package("Model"),
            DefinitionRecord::class("Artifact"),
            DefinitionRecord::class("Artifact"),
        ];
        let report = validate(&build_schema(seed(), &records).unwrap());
        let warning = &report.results[1];
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.details, vec!["Artifact (defined 2 times)"]);
    }
}
