//! SHACL generator: one shapes document for the whole schema.

use tera::Context;

use semio_schema::Schema;

use crate::emit::RenderedFile;
use crate::error::GenerateError;
use crate::mapping;
use crate::templates::{self, TemplateSource, SHACL_TEMPLATE};
use crate::view::SchemaView;
use crate::Generator;

/// Renders the schema through [`SHACL_TEMPLATE`] into
/// `<lower schema name>.shapes.ttl`.
#[derive(Debug, Clone, Default)]
pub struct ShaclGenerator {
    templates: TemplateSource,
}

impl ShaclGenerator {
    /// Creates a generator reading its template from `templates`.
    #[must_use]
    pub fn new(templates: TemplateSource) -> Self {
        Self { templates }
    }
}

impl Generator for ShaclGenerator {
    fn name(&self) -> &'static str {
        "shacl"
    }

    fn render(&self, schema: &Schema) -> Result<Vec<RenderedFile>, GenerateError> {
        let tera = self.templates.engine(SHACL_TEMPLATE)?;
        let view = SchemaView::new(schema);
        let content = templates::render(&tera, SHACL_TEMPLATE, &Context::new(), "schema", &view)?;
        Ok(vec![RenderedFile::new(
            mapping::shapes_file_name(&schema.characterization.name),
            content,
        )])
    }
}
