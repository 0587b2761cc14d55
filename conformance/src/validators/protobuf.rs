//! Protobuf artifact validator.
//!
//! Validates the generated `.proto` files against the schema:
//! - every package has its file, declaring proto2 syntax and its package name
//! - every class of the package has a `message` definition
//! - field numbers are unique within each message
//! - no `.proto` file exists that no package accounts for

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use semio_codegen::mapping;
use semio_schema::{PackageId, Schema};

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "artifacts/protobuf";

/// Validates the `.proto` files under `artifacts`.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read.
pub fn validate(schema: &Schema, artifacts: &Path) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    if !artifacts.is_dir() {
        report.push(TestResult::fail(
            VALIDATOR,
            format!("Artifacts directory not found: {}", artifacts.display()),
        ));
        return Ok(report);
    }

    for (id, _) in schema.package_entries() {
        validate_package(schema, id, artifacts, &mut report)?;
    }
    check_stray_files(schema, artifacts, &mut report);

    Ok(report)
}

fn validate_package(
    schema: &Schema,
    id: PackageId,
    artifacts: &Path,
    report: &mut ConformanceReport,
) -> Result<()> {
    let package = schema.package(id);
    let file_name = mapping::proto_file_name(&package.characterization.name);
    let path = artifacts.join(&file_name);
    if !path.exists() {
        report.push(TestResult::fail(
            VALIDATOR,
            format!(
                "{file_name} not found for package {}",
                package.characterization.name
            ),
        ));
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut issues = Vec::new();
    if !content.contains("syntax = \"proto2\";") {
        issues.push("missing `syntax = \"proto2\";`".to_string());
    }
    let package_line = format!("package {};", mapping::proto_package(schema, id));
    if !content.lines().any(|line| line.trim() == package_line) {
        issues.push(format!("missing `{package_line}`"));
    }

    let messages = message_numbers(&content);
    for class in &package.classes {
        let name = &class.characterization.name;
        if !messages.iter().any(|(message, _)| message == name) {
            issues.push(format!("missing message {name}"));
        }
    }
    for (message, numbers) in &messages {
        let mut seen = HashSet::new();
        let duplicates: BTreeSet<u32> = numbers
            .iter()
            .copied()
            .filter(|number| !seen.insert(*number))
            .collect();
        if !duplicates.is_empty() {
            issues.push(format!(
                "message {message} reuses field numbers {duplicates:?}"
            ));
        }
        if numbers.contains(&0) {
            issues.push(format!("message {message} uses field number 0"));
        }
    }

    if issues.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{file_name} defines all {} messages", package.classes.len()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{file_name} does not match package {}", package.characterization.name),
            issues,
        ));
    }
    Ok(())
}

fn check_stray_files(schema: &Schema, artifacts: &Path, report: &mut ConformanceReport) {
    let expected: HashSet<String> = schema
        .packages
        .iter()
        .map(|package| mapping::proto_file_name(&package.characterization.name))
        .collect();

    let mut stray: Vec<String> = WalkDir::new(artifacts)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(".proto") && !expected.contains(name))
        .collect();
    stray.sort();

    if stray.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            "No .proto files without a package",
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            ".proto files without a package",
            stray,
        ));
    }
}

/// Field numbers (including reserved ones) of every top-level message.
fn message_numbers(content: &str) -> Vec<(String, Vec<u32>)> {
    let mut messages = Vec::new();
    let mut current: Option<(String, Vec<u32>)> = None;
    let mut depth = 0usize;

    for line in content.lines() {
        let code = line.split("//").next().unwrap_or_default().trim();
        if let Some(rest) = code.strip_prefix("message ") {
            let name = rest.trim_end_matches('{').trim().to_string();
            current = Some((name, Vec::new()));
            depth = 1;
            continue;
        }
        let Some((_, numbers)) = current.as_mut() else {
            continue;
        };
        if code.starts_with("oneof ") {
            depth += 1;
        } else if code == "}" {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                messages.extend(current.take());
            }
        } else if let Some(reserved) = code.strip_prefix("reserved ") {
            numbers.extend(
                reserved
                    .trim_end_matches(';')
                    .split(',')
                    .filter_map(|n| n.trim().parse::<u32>().ok()),
            );
        } else if let Some((_, number)) = code.rsplit_once(" = ") {
            if let Ok(number) = number.trim_end_matches(';').trim().parse::<u32>() {
                numbers.push(number);
            }
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_numbers_per_message() {
        let proto = r#"
syntax = "proto2";
message Layout {
  required string id = 1;
  reserved 2;
  oneof value { // optional
    double value_number = 3;
    string value_point_id = 4; // reference to Point
  }
  repeated /* nonempty */ string name = 5;
}
message Point {
  required string id = 1;
  required Layout base = 2;
}
"#;
        assert_eq!(
            message_numbers(proto),
            vec![
                ("Layout".to_string(), vec![1, 2, 3, 4, 5]),
                ("Point".to_string(), vec![1, 2]),
            ]
        );
    }
}
