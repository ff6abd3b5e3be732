//! The 3x5 dot-matrix patterns for the hex digits.

include!(concat!(env!("OUT_DIR"), "/digit_patterns_codegen.rs"));

pub const COLUMNS: usize = 3;
pub const ROWS: usize = 5;

/// The filled cells of one digit.
///
/// Bit `row * 3 + col` is set if the cell at (`col`, `row`) is filled;
/// column 0 is the left edge, row 0 is the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitPattern(u16);

impl DigitPattern {
    /// A pattern with no filled cells.
    pub const EMPTY: DigitPattern = DigitPattern(0);

    /// Look up the pattern for a hex digit, ignoring case.
    ///
    /// Anything that isn't a hex digit has the empty pattern.
    pub fn for_digit(digit: char) -> DigitPattern {
        let digit = digit.to_ascii_uppercase();
        DIGIT_PATTERNS
            .binary_search_by_key(&digit, |(d, _)| *d)
            .map(|idx| DigitPattern(DIGIT_PATTERNS[idx].1))
            .unwrap_or(DigitPattern::EMPTY)
    }

    pub fn is_filled(self, col: usize, row: usize) -> bool {
        col < COLUMNS && row < ROWS && self.0 & (1 << (row * COLUMNS + col)) != 0
    }

    /// Iterate the filled cells as `(col, row)`, bottom row first.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..ROWS)
            .flat_map(|row| (0..COLUMNS).map(move |col| (col, row)))
            .filter(move |(col, row)| self.is_filled(*col, *row))
    }

    pub fn cell_count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Every hex digit, in ascending order.
pub fn all_digits() -> impl Iterator<Item = char> {
    DIGIT_PATTERNS.iter().map(|(d, _)| *d)
}
