// tabulate.rs - Paginated interactive HTML view of a metadata table

use crate::data::{ColumnData, MetadataTable};
use crate::error::{MetadataError, Result};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

pub const DEFAULT_PAGE_SIZE: i64 = 100;

const INDEX_TEMPLATE: &str = include_str!("../../templates/tabulate/index.html");
const TABULATE_JS: &str = include_str!("../../templates/tabulate/tabulate.js");
const TABULATE_CSS: &str = include_str!("../../templates/tabulate/tabulate.css");

#[derive(Serialize)]
struct TablePayload<'a> {
    columns: Vec<(&'a str, &'a str)>,
    data: Vec<Vec<JsonValue>>,
}

/// Serialize a table as `{"columns": [[name, type], ...], "data": [[id, ...], ...]}`.
///
/// The ID column comes first with an empty type. Missing cells are `null`.
/// The result is safe to embed inside a `<script>` element.
pub fn serialize_table(table: &MetadataTable) -> Result<String> {
    let mut columns = vec![(table.id_header(), "")];
    columns.extend(
        table
            .columns()
            .iter()
            .map(|c| (c.name.as_str(), c.kind().as_str())),
    );

    let data = table
        .ids()
        .iter()
        .enumerate()
        .map(|(row, id)| {
            let mut record = Vec::with_capacity(table.n_columns() + 1);
            record.push(JsonValue::String(id.clone()));
            for column in table.columns() {
                let cell = match &column.data {
                    ColumnData::Numeric(values) => values
                        .get(row)
                        .copied()
                        .flatten()
                        .and_then(serde_json::Number::from_f64)
                        .map(JsonValue::Number),
                    ColumnData::Categorical(values) => values
                        .get(row)
                        .cloned()
                        .flatten()
                        .map(JsonValue::String),
                };
                record.push(cell.unwrap_or(JsonValue::Null));
            }
            record
        })
        .collect();

    let json = serde_json::to_string(&TablePayload { columns, data })?;
    Ok(json.replace('\'', "\\u0027").replace("</", "<\\/"))
}

/// Turns a serialized table into a rendered output directory
pub trait TableRenderer {
    fn render(&self, table_json: &str, page_size: usize, output_dir: &Path) -> Result<()>;
}

/// Built-in renderer: `index.html` plus `js/` and `css/` assets
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Fill the index template
    pub fn render_index(&self, table_json: &str, page_size: usize) -> String {
        INDEX_TEMPLATE
            .replacen("{{ page_size }}", &page_size.to_string(), 1)
            .replacen("{{ table }}", table_json, 1)
    }
}

impl TableRenderer for HtmlRenderer {
    fn render(&self, table_json: &str, page_size: usize, output_dir: &Path) -> Result<()> {
        let write = |path: &Path, content: &str| {
            fs::write(path, content).map_err(|e| MetadataError::io(path, e))
        };
        let js_dir = output_dir.join("js");
        let css_dir = output_dir.join("css");
        fs::create_dir_all(&js_dir).map_err(|e| MetadataError::io(&js_dir, e))?;
        fs::create_dir_all(&css_dir).map_err(|e| MetadataError::io(&css_dir, e))?;

        write(
            &output_dir.join("index.html"),
            &self.render_index(table_json, page_size),
        )?;
        write(&js_dir.join("tabulate.js"), TABULATE_JS)?;
        write(&css_dir.join("tabulate.css"), TABULATE_CSS)?;

        log::info!("Tabulated view written to: {}", output_dir.display());
        Ok(())
    }
}

/// Check the page size parameter
pub fn validate_page_size(page_size: i64) -> Result<usize> {
    if page_size < 1 {
        return Err(MetadataError::Configuration(
            "Cannot render less than one record per page.".to_string(),
        ));
    }
    usize::try_from(page_size)
        .map_err(|_| MetadataError::Configuration(format!("Page size {} is too large", page_size)))
}

/// Render `table` with a custom renderer
pub fn tabulate_with<R: TableRenderer + ?Sized>(
    renderer: &R,
    table: &MetadataTable,
    page_size: i64,
    output_dir: &Path,
) -> Result<()> {
    let page_size = validate_page_size(page_size)?;
    let json = serialize_table(table)?;
    renderer.render(&json, page_size, output_dir)
}

/// Render `table` as an interactive HTML page into `output_dir`
pub fn tabulate(table: &MetadataTable, page_size: i64, output_dir: &Path) -> Result<()> {
    tabulate_with(&HtmlRenderer, table, page_size, output_dir)
}
