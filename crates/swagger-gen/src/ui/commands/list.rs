use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use swagger_gen::{
  config::DocumentSource,
  generator::{Projection, ResponseType},
  utils::SpecLoader,
};

use crate::ui::{Colors, colors::IntoComfyColor, term_width};

/// Prints the action tree the API file would contain, one row per action.
pub async fn list_actions(input: &str, colors: &Colors) -> anyhow::Result<()> {
  let document = SpecLoader::load(&DocumentSource::parse(input)).await?;
  let projection = Projection::build(&document, ResponseType::default(), None)?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in ["GROUP", "ACTION", "METHOD", "PATH", "RETURNS"] {
    row.add_cell(Cell::new(header).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(row);

  for (group, action) in projection.api.iter_actions() {
    let mut row = Row::new();
    row.add_cell(Cell::new(group).fg(IntoComfyColor::into(colors.info())));
    row.add_cell(
      Cell::new(&action.name)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(action.method.to_string())
        .fg(IntoComfyColor::into(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(&action.url).fg(IntoComfyColor::into(colors.primary())));
    row.add_cell(Cell::new(&action.return_type).fg(IntoComfyColor::into(colors.info())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
