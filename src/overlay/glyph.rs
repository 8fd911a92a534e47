//! Bitmap glyph table for the overlay marker
//!
//! Each supported character is a 5×7 grid stored as seven row bitmasks. Bit 4
//! of a row is the leftmost column and bit 0 the rightmost. The table is a
//! plain `static` sorted by character, so lookups need no initialization and
//! are safe from any thread.

/// Number of columns in every glyph
pub const GLYPH_COLS: usize = 5;

/// Number of rows in every glyph
pub const GLYPH_ROWS: usize = 7;

/// A fixed-size boolean pixel pattern for one character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPattern {
    ch:   char,
    rows: [u8; GLYPH_ROWS],
}

impl GlyphPattern {
    const fn new(ch: char, rows: [u8; GLYPH_ROWS]) -> Self {
        Self { ch, rows }
    }

    /// The character this pattern draws
    pub fn character(&self) -> char {
        self.ch
    }

    /// Whether the cell at `(row, col)` is ink. Out-of-grid cells are blank.
    pub fn is_ink(&self, row: usize, col: usize) -> bool {
        if row >= GLYPH_ROWS || col >= GLYPH_COLS {
            return false;
        }
        self.rows[row] & (1 << (GLYPH_COLS - 1 - col)) != 0
    }

    /// Iterates over `(row, col)` of every ink cell, row-major
    pub fn ink_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..GLYPH_ROWS)
            .flat_map(move |row| (0..GLYPH_COLS).map(move |col| (row, col)))
            .filter(move |&(row, col)| self.is_ink(row, col))
    }
}

// Sorted by code point for binary search.
static GLYPHS: [GlyphPattern; 41] = [
    GlyphPattern::new(' ', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    GlyphPattern::new('!', [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100]),
    GlyphPattern::new('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    GlyphPattern::new('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    GlyphPattern::new('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    GlyphPattern::new('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    GlyphPattern::new('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    GlyphPattern::new('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    GlyphPattern::new('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    GlyphPattern::new('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    GlyphPattern::new('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    GlyphPattern::new('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    GlyphPattern::new('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    GlyphPattern::new('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    GlyphPattern::new('?', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100]),
    GlyphPattern::new('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    GlyphPattern::new('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    GlyphPattern::new('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    GlyphPattern::new('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
    GlyphPattern::new('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    GlyphPattern::new('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    GlyphPattern::new('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    GlyphPattern::new('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    GlyphPattern::new('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    GlyphPattern::new('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    GlyphPattern::new('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    GlyphPattern::new('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    GlyphPattern::new('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    GlyphPattern::new('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    GlyphPattern::new('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    GlyphPattern::new('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    GlyphPattern::new('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    GlyphPattern::new('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    GlyphPattern::new('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    GlyphPattern::new('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    GlyphPattern::new('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    GlyphPattern::new('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    GlyphPattern::new('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    GlyphPattern::new('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    GlyphPattern::new('Y', [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
    GlyphPattern::new('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
];

/// Looks up the glyph for `ch`
///
/// # Examples
///
/// ```
/// use lgtm_dog_mcp::overlay::glyph::glyph_for;
///
/// assert!(glyph_for('G').is_some());
/// assert!(glyph_for('g').is_none());
/// ```
pub fn glyph_for(ch: char) -> Option<&'static GlyphPattern> {
    GLYPHS
        .binary_search_by(|glyph| glyph.ch.cmp(&ch))
        .ok()
        .map(|index| &GLYPHS[index])
}

/// Every character the table can draw, in code point order
pub fn supported_characters() -> impl Iterator<Item = char> {
    GLYPHS.iter().map(|glyph| glyph.ch)
}
