//! # Grid Table Renderer
//!
//! Renders the custom report as a bordered text grid:
//!
//! ```text
//! +------------------------+-----+
//! | Timestamp              | A_x |
//! +========================+=====+
//! | 2024-01-01 12:00:00.00 |   1 |
//! +------------------------+-----+
//! ```

/// Horizontal alignment of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// One rendered table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub align: Align,
}

impl Cell {
    pub fn left(text: impl Into<String>) -> Self {
        Self { text: text.into(), align: Align::Left }
    }

    pub fn right(text: impl Into<String>) -> Self {
        Self { text: text.into(), align: Align::Right }
    }

    pub fn empty() -> Self {
        Self::left("")
    }
}

/// Render `headers` and `rows` as a grid. Short rows are padded with empty cells.
pub fn render_grid(headers: &[String], rows: &[Vec<Cell>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.text.chars().count());
        }
    }

    let mut out = String::new();
    push_border(&mut out, &widths, '-');
    let header_cells: Vec<Cell> = headers.iter().map(Cell::left).collect();
    push_row(&mut out, &widths, &header_cells);
    push_border(&mut out, &widths, '=');

    for row in rows {
        push_row(&mut out, &widths, row);
        push_border(&mut out, &widths, '-');
    }
    out
}

fn push_border(out: &mut String, widths: &[usize], fill: char) {
    out.push('+');
    for &width in widths {
        out.extend(std::iter::repeat(fill).take(width + 2));
        out.push('+');
    }
    out.push('\n');
}

fn push_row(out: &mut String, widths: &[usize], cells: &[Cell]) {
    let empty = Cell::empty();
    out.push('|');
    for (i, &width) in widths.iter().enumerate() {
        let cell = cells.get(i).unwrap_or(&empty);
        let text = match cell.align {
            Align::Left => format!(" {:<width$} ", cell.text, width = width),
            Align::Right => format!(" {:>width$} ", cell.text, width = width),
        };
        out.push_str(&text);
        out.push('|');
    }
    out.push('\n');
}
