//! Grid placement of form widgets.
//!
//! A form is a grid four cells wide per field column. Row 0 holds the
//! optional picture (two cells) and the instructions (the rest). Column
//! forms put a heading on row 1 and a separator on row 2 above their
//! fields. Each field is a label followed by its input on one row, and the
//! OK / Cancel buttons close the grid on row `field_count + 3`, flush right.

use crate::spec::FormSpec;

/// Cells per field column.
pub const CELLS_PER_COLUMN: usize = 4;

/// Rows taken by a column heading and its separator.
const HEADING_ROWS: usize = 2;

/// Something placed on the form grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    /// The picture.
    Image,
    /// The instructions text.
    Instructions,
    /// Heading of field column `n`.
    Heading(usize),
    /// Rule under the heading of field column `n`.
    Separator(usize),
    /// Label of field `n` (declaration order).
    Label(usize),
    /// Entry or choice control of field `n`.
    Input(usize),
    /// Submit button.
    Ok,
    /// Cancel button.
    Cancel,
}

/// Position of a widget on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// What is placed.
    pub widget: Widget,
    /// Grid row.
    pub row: usize,
    /// First grid column.
    pub column: usize,
    /// Number of grid columns spanned.
    pub span: usize,
}

/// Widget placement of a whole form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormLayout {
    /// Every widget, in drawing order.
    pub placements: Vec<Placement>,
    /// Grid width in cells.
    pub columns: usize,
    /// Grid height in rows.
    pub rows: usize,
    width: u32,
    height: u32,
}

impl FormLayout {
    /// Lay out `spec`.
    pub fn compute(spec: &FormSpec) -> Self {
        let field_columns = if spec.has_columns() {
            spec.columns.len().max(1)
        } else {
            1
        };
        let columns = field_columns * CELLS_PER_COLUMN;
        let (label_span, entry_span) = if spec.compact_fields { (3, 1) } else { (2, 2) };
        let heading_rows = if spec.has_columns() { HEADING_ROWS } else { 0 };

        let mut placements = Vec::new();
        let image_span = if spec.image.is_some() {
            placements.push(Placement {
                widget: Widget::Image,
                row: 0,
                column: 0,
                span: 2,
            });
            2
        } else {
            0
        };
        placements.push(Placement {
            widget: Widget::Instructions,
            row: 0,
            column: image_span,
            span: columns - image_span,
        });

        // Without headings every field shares the one column
        let mut field = 0;
        for (col, column) in spec.columns.iter().enumerate() {
            let (col, left) = if spec.has_columns() {
                (col, col * CELLS_PER_COLUMN)
            } else {
                (0, 0)
            };
            if spec.has_columns() && !column.fields.is_empty() {
                placements.push(Placement {
                    widget: Widget::Heading(col),
                    row: heading_rows - 1,
                    column: left,
                    span: CELLS_PER_COLUMN,
                });
                placements.push(Placement {
                    widget: Widget::Separator(col),
                    row: heading_rows,
                    column: left,
                    span: CELLS_PER_COLUMN,
                });
            }
            let first_row = if spec.has_columns() { 0 } else { field };
            for i in 0..column.fields.len() {
                let row = first_row + i + 1 + heading_rows;
                placements.push(Placement {
                    widget: Widget::Label(field),
                    row,
                    column: left,
                    span: label_span,
                });
                placements.push(Placement {
                    widget: Widget::Input(field),
                    row,
                    column: left + label_span,
                    span: entry_span,
                });
                field += 1;
            }
        }

        let button_row = spec.field_count() + 3;
        placements.push(Placement {
            widget: Widget::Ok,
            row: button_row,
            column: columns - 2,
            span: 1,
        });
        placements.push(Placement {
            widget: Widget::Cancel,
            row: button_row,
            column: columns - 1,
            span: 1,
        });

        Self {
            placements,
            columns,
            rows: button_row + 1,
            width: spec.width,
            height: spec.height,
        }
    }

    /// Placement of `widget`, if the form has one.
    pub fn find(&self, widget: Widget) -> Option<&Placement> {
        self.placements.iter().find(|p| p.widget == widget)
    }

    /// Placements on grid row `row`, left to right.
    pub fn row(&self, row: usize) -> Vec<&Placement> {
        let mut on_row: Vec<_> = self.placements.iter().filter(|p| p.row == row).collect();
        on_row.sort_by_key(|p| p.column);
        on_row
    }

    /// Window size in pixels.
    pub fn window_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Top-left corner that centers the window on a screen.
    ///
    /// May be negative when the window is larger than the screen.
    pub fn center_window(&self, screen_width: u32, screen_height: u32) -> (i64, i64) {
        let x = screen_width as f64 / 2.0 - self.width as f64 / 2.0;
        let y = screen_height as f64 / 2.0 - self.height as f64 / 2.0;
        (x.trunc() as i64, y.trunc() as i64)
    }
}
