//! Built-in generators, looked up by name.

use crate::error::GenerateError;
use crate::protobuf::ProtobufGenerator;
use crate::shacl::ShaclGenerator;
use crate::templates::TemplateSource;
use crate::Generator;

/// Names of the built-in generators, in dispatch order.
pub const BUILTIN: [&str; 2] = ["protobuf", "shacl"];

/// The built-in generator called `name`, if any.
#[must_use]
pub fn generator(name: &str, templates: &TemplateSource) -> Option<Box<dyn Generator>> {
    match name {
        "protobuf" => Some(Box::new(ProtobufGenerator::new(templates.clone()))),
        "shacl" => Some(Box::new(ShaclGenerator::new(templates.clone()))),
        _ => None,
    }
}

/// Every built-in generator.
#[must_use]
pub fn builtin(templates: &TemplateSource) -> Vec<Box<dyn Generator>> {
    BUILTIN
        .iter()
        .filter_map(|name| generator(name, templates))
        .collect()
}

/// The generators named in `names`, in that order; all of them when `names`
/// is empty. Repeated names are selected once.
///
/// # Errors
///
/// Returns [`GenerateError::UnknownGenerator`] for the first unknown name.
pub fn select<S: AsRef<str>>(
    names: &[S],
    templates: &TemplateSource,
) -> Result<Vec<Box<dyn Generator>>, GenerateError> {
    if names.is_empty() {
        return Ok(builtin(templates));
    }
    let mut seen: Vec<&str> = Vec::with_capacity(names.len());
    let mut selected = Vec::with_capacity(names.len());
    for name in names.iter().map(|name| name.as_ref()) {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        let found = generator(name, templates).ok_or_else(|| GenerateError::UnknownGenerator {
            name: name.to_string(),
            available: BUILTIN.join(", "),
        })?;
        selected.push(found);
    }
    Ok(selected)
}
