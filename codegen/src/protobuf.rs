//! Protobuf generator: one `.proto` file per package.

use tera::Context;

use semio_schema::Schema;

use crate::emit::RenderedFile;
use crate::error::GenerateError;
use crate::templates::{self, TemplateSource, PROTOBUF_TEMPLATE};
use crate::view::SchemaView;
use crate::Generator;

/// Renders every package through [`PROTOBUF_TEMPLATE`].
#[derive(Debug, Clone, Default)]
pub struct ProtobufGenerator {
    templates: TemplateSource,
}

impl ProtobufGenerator {
    /// Creates a generator reading its template from `templates`.
    #[must_use]
    pub fn new(templates: TemplateSource) -> Self {
        Self { templates }
    }
}

impl Generator for ProtobufGenerator {
    fn name(&self) -> &'static str {
        "protobuf"
    }

    fn render(&self, schema: &Schema) -> Result<Vec<RenderedFile>, GenerateError> {
        let tera = self.templates.engine(PROTOBUF_TEMPLATE)?;
        let view = SchemaView::new(schema);
        let mut base = Context::new();
        base.insert("schema", &view.meta);
        view.packages
            .iter()
            .map(|package| {
                templates::render(&tera, PROTOBUF_TEMPLATE, &base, "package", package)
                    .map(|content| RenderedFile::new(package.file_name.clone(), content))
            })
            .collect()
    }
}
