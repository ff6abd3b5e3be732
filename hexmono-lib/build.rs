//! Build script to generate our hex digit pattern table.

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

const OUT_FILE: &str = "digit_patterns_codegen.rs";
const COLUMNS: usize = 3;
const ROWS: usize = 5;

fn main() {
    println!("cargo:rerun-if-changed=resources/digits.txt");
    let path = Path::new(&env::var("OUT_DIR").unwrap()).join(OUT_FILE);
    let mut file = BufWriter::new(File::create(&path).unwrap());
    let patterns = include_str!("resources/digits.txt");

    let mut entries = patterns
        .split("\n\n")
        .map(|block| {
            block
                .lines()
                .filter(|l| !l.starts_with("//") && !l.trim().is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|block| !block.is_empty())
        .map(|block| PatternEntry::from_str(&block))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    entries.sort_by(|a, b| a.digit.cmp(&b.digit));
    assert_eq!(entries.len(), 16, "expected one pattern per hex digit");

    let formatted = entries
        .iter()
        .map(|e| format!("('{}', 0b{:015b})", e.digit, e.mask))
        .collect::<Vec<_>>();
    writeln!(
        &mut file,
        "static DIGIT_PATTERNS: [(char, u16); 16] = [\n{}];\n",
        formatted.join(",\n")
    )
    .unwrap();
}

/// One digit, with its filled cells packed as `1 << (row * 3 + col)`,
/// where row 0 is the bottom of the grid.
struct PatternEntry {
    digit: char,
    mask: u16,
}

impl FromStr for PatternEntry {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        let digit = match lines.next().map(str::trim) {
            Some(d) if d.len() == 1 && d.chars().all(|c| c.is_ascii_hexdigit()) => {
                d.chars().next().unwrap().to_ascii_uppercase()
            }
            _ => return Err(s.to_string()),
        };

        let rows = lines.map(str::trim).collect::<Vec<_>>();
        if rows.len() != ROWS || rows.iter().any(|r| r.len() != COLUMNS) {
            return Err(s.to_string());
        }

        let mut mask = 0u16;
        // rows are drawn top to bottom
        for (i, row) in rows.iter().enumerate() {
            let row_idx = ROWS - 1 - i;
            for (col, cell) in row.chars().enumerate() {
                match cell {
                    'X' => mask |= 1 << (row_idx * COLUMNS + col),
                    '.' => (),
                    _ => return Err(s.to_string()),
                }
            }
        }
        Ok(PatternEntry { digit, mask })
    }
}
