//! Template lookup and engine setup.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::GenerateError;
use crate::helpers;

/// Template rendered once per package by the protobuf generator.
pub const PROTOBUF_TEMPLATE: &str = "protobuf.tmpl.proto";

/// Template rendered once per schema by the SHACL generator.
pub const SHACL_TEMPLATE: &str = "shacl.tmpl.ttl";

const BUNDLED: [(&str, &str); 2] = [
    (
        PROTOBUF_TEMPLATE,
        include_str!("../templates/protobuf.tmpl.proto"),
    ),
    (SHACL_TEMPLATE, include_str!("../templates/shacl.tmpl.ttl")),
];

/// Where template bodies come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    /// The copies compiled into this crate.
    #[default]
    Bundled,
    /// `<dir>/<template name>` on disk.
    Directory(PathBuf),
}

impl TemplateSource {
    /// Reads the body of the named template.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnknownTemplate`] for a bundled name that does
    /// not exist and [`GenerateError::TemplateRead`] if the file in the
    /// configured directory cannot be read.
    pub fn load(&self, name: &str) -> Result<Cow<'static, str>, GenerateError> {
        match self {
            TemplateSource::Bundled => bundled(name)
                .map(Cow::Borrowed)
                .ok_or_else(|| GenerateError::UnknownTemplate {
                    name: name.to_string(),
                }),
            TemplateSource::Directory(dir) => {
                let path = dir.join(name);
                tracing::debug!(template = name, path = %path.display(), "reading template");
                fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|source| GenerateError::TemplateRead {
                        name: name.to_string(),
                        path,
                        source,
                    })
            }
        }
    }

    /// Builds an engine holding the named template with all helpers registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be read or does not parse.
    pub fn engine(&self, name: &str) -> Result<Tera, GenerateError> {
        let body = self.load(name)?;
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        helpers::register(&mut tera);
        tera.add_raw_template(name, &body)
            .map_err(|source| template_error(name, source))?;
        Ok(tera)
    }
}

/// The bundled body of a template, if one exists under `name`.
#[must_use]
pub fn bundled(name: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(bundled_name, _)| *bundled_name == name)
        .map(|(_, body)| *body)
}

/// Renders `name` with `value` bound to `key`, on top of `base`.
///
/// # Errors
///
/// Returns [`GenerateError::Template`] if rendering fails.
pub fn render<T: Serialize + ?Sized>(
    tera: &Tera,
    name: &str,
    base: &Context,
    key: &str,
    value: &T,
) -> Result<String, GenerateError> {
    let mut context = base.clone();
    context.insert(key, value);
    tera.render(name, &context)
        .map_err(|source| template_error(name, source))
}

fn template_error(name: &str, source: tera::Error) -> GenerateError {
    GenerateError::Template {
        name: name.to_string(),
        source,
    }
}
