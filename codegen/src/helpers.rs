//! Named helper functions exposed to templates as Tera filters.
//!
//! | Filter        | Effect                                          |
//! |---------------|-------------------------------------------------|
//! | `lower_first` | lower-cases the first letter (`Model` → `model`) |
//! | `lower`       | lower-cases the whole string                     |
//! | `offset`      | adds `by` (default `2`) to an integer            |

use std::collections::HashMap;

use tera::{Tera, Value};

use crate::mapping;

/// Registers every helper on `tera`.
pub fn register(tera: &mut Tera) {
    tera.register_filter("lower_first", lower_first);
    tera.register_filter("lower", lower);
    tera.register_filter("offset", offset);
}

/// `{{ name | lower_first }}`
///
/// # Errors
///
/// Fails if the value is not a string.
pub fn lower_first(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = expect_str("lower_first", value)?;
    Ok(Value::String(mapping::lowercase_first_letter(text)))
}

/// `{{ name | lower }}`
///
/// # Errors
///
/// Fails if the value is not a string.
pub fn lower(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = expect_str("lower", value)?;
    Ok(Value::String(text.to_lowercase()))
}

/// `{{ position | offset(by=2) }}`
///
/// # Errors
///
/// Fails if the value or `by` is not an integer.
pub fn offset(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let base = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg(format!("filter `offset` expects an integer, got {value}")))?;
    let by = match args.get("by") {
        Some(by) => by
            .as_i64()
            .ok_or_else(|| tera::Error::msg(format!("`offset(by=...)` expects an integer, got {by}")))?,
        None => mapping::FIELD_NUMBER_OFFSET,
    };
    Ok(Value::from(base + by))
}

fn expect_str<'a>(filter: &str, value: &'a Value) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("filter `{filter}` expects a string, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(body: &str) -> tera::Result<String> {
        let mut tera = Tera::default();
        register(&mut tera);
        tera.add_raw_template("t", body)?;
        tera.render("t", &tera::Context::new())
    }

    #[test]
    fn lower_first_filter() {
        assert_eq!(render(r#"{{ "Repository" | lower_first }}"#).unwrap(), "repository");
    }

    #[test]
    fn lower_filter() {
        assert_eq!(render(r#"{{ "Semio" | lower }}"#).unwrap(), "semio");
    }

    #[test]
    fn offset_filter_defaults_to_structural_fields() {
        assert_eq!(render("{{ 1 | offset }}").unwrap(), "3");
        assert_eq!(render("{{ 1 | offset(by=10) }}").unwrap(), "11");
    }

    #[test]
    fn filters_reject_wrong_types() {
        assert!(render("{{ 1 | lower_first }}").is_err());
        assert!(render(r#"{{ "x" | offset }}"#).is_err());
    }
}
