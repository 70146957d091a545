//! Character cell buffer
//!
//! Provides a character grid for HD44780-style displays. Cells hold
//! character ROM codes, not Unicode, so a flush can send them unchanged.

/// Largest supported column count
pub const MAX_COLS: usize = 40;

/// Largest supported row count
pub const MAX_ROWS: usize = 4;

/// HD44780 display RAM holds at most 80 characters
pub const MAX_CELLS: usize = 80;

/// ROM code for a blank cell
pub const BLANK: u8 = b' ';

/// ROM code for characters the display cannot show
pub const UNKNOWN: u8 = b'?';

/// Map a character to its HD44780 A00 ROM code
///
/// The A00 ROM follows JIS X 0201: ASCII in the lower half and half-width
/// katakana at 0xA1-0xDF.
pub fn rom_code(ch: char) -> u8 {
    match ch {
        // 0x7E and 0x7F are arrows on A00
        ' '..='}' => ch as u8,
        '°' => 0xDF,
        '\u{FF61}'..='\u{FF9F}' => (ch as u32 - 0xFF61 + 0xA1) as u8,
        _ => UNKNOWN,
    }
}

/// Character cell buffer
#[derive(Clone)]
pub struct CellBuffer {
    cells: [[u8; MAX_COLS]; MAX_ROWS],
    columns: usize,
    rows: usize,
}

impl CellBuffer {
    /// Create a blank buffer; callers validate the dimensions
    pub(crate) const fn new(columns: usize, rows: usize) -> Self {
        Self {
            cells: [[BLANK; MAX_COLS]; MAX_ROWS],
            columns,
            rows,
        }
    }

    /// Blank every cell
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(BLANK);
        }
    }

    /// Write `text` on `row` starting at column `col`
    ///
    /// Columns may be negative; characters outside the grid are skipped.
    pub fn put_str(&mut self, row: i32, col: i32, text: &str) {
        if row < 0 || row as usize >= self.rows {
            return;
        }
        let line = &mut self.cells[row as usize];

        for (i, ch) in text.chars().enumerate() {
            let x = col.saturating_add(i32::try_from(i).unwrap_or(i32::MAX));
            if x >= self.columns as i32 {
                break;
            }
            if x >= 0 {
                line[x as usize] = rom_code(ch);
            }
        }
    }

    /// ROM codes of one row, trimmed to the display width
    pub fn row(&self, row: usize) -> &[u8] {
        &self.cells[row][..self.columns]
    }

    /// Number of rows in use
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in use
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Whether every cell is blank
    pub fn is_blank(&self) -> bool {
        (0..self.rows).all(|r| self.row(r).iter().all(|&c| c == BLANK))
    }
}
