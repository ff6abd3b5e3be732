//! Rewriting the table directory of a compiled OpenType font.
//!
//! The compiler hands us a finished font; the [`ExportOptions`] are applied
//! afterwards by dropping or adding whole tables and writing the file back
//! with fresh checksums.

use std::fs;
use std::path::Path;

use crate::font::ExportOptions;
use crate::Error;

pub type Tag = [u8; 4];

const HEAD: Tag = *b"head";
const DSIG: Tag = *b"DSIG";
/// Tables holding TrueType hinting programs and their control values.
const INSTRUCTION_TABLES: [Tag; 3] = [*b"fpgm", *b"prep", *b"cvt "];

/// A version 1 signature table with no signatures.
const DSIG_STUB: [u8; 8] = [0, 0, 0, 1, 0, 0, 0, 0];

const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;
const HEADER_LEN: usize = 12;
const RECORD_LEN: usize = 16;
/// Offset of `checkSumAdjustment` in the head table.
const ADJUSTMENT_OFFSET: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub tag: Tag,
    pub data: Vec<u8>,
}

/// An sfnt font held as a list of tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    pub version: u32,
    pub tables: Vec<Table>,
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn tag_name(tag: &Tag) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

/// The OpenType checksum: the wrapping sum of big-endian words, with the
/// tail zero padded.
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

impl FontFile {
    pub fn parse(data: &[u8]) -> Result<FontFile, String> {
        let version = read_u32(data, 0).ok_or("file too short for an sfnt header")?;
        let num_tables = read_u16(data, 4).ok_or("file too short for an sfnt header")? as usize;
        let mut tables = Vec::with_capacity(num_tables);
        for i in 0..num_tables {
            let record = HEADER_LEN + i * RECORD_LEN;
            let tag = data
                .get(record..record + 4)
                .ok_or_else(|| format!("table record {} is truncated", i))?;
            let tag = [tag[0], tag[1], tag[2], tag[3]];
            let (offset, len) = match (read_u32(data, record + 8), read_u32(data, record + 12)) {
                (Some(offset), Some(len)) => (offset as usize, len as usize),
                _ => return Err(format!("table record {} is truncated", i)),
            };
            let table = offset
                .checked_add(len)
                .and_then(|end| data.get(offset..end))
                .ok_or_else(|| format!("table '{}' runs past the end of the file", tag_name(&tag)))?;
            tables.push(Table {
                tag,
                data: table.to_vec(),
            });
        }
        Ok(FontFile { version, tables })
    }

    pub fn table(&self, tag: &Tag) -> Option<&Table> {
        self.tables.iter().find(|t| &t.tag == tag)
    }

    /// Apply `options` to the table list; returns whether anything changed.
    pub fn apply(&mut self, options: &ExportOptions) -> bool {
        let mut changed = false;
        if options.omit_instructions {
            let before = self.tables.len();
            self.tables.retain(|t| !INSTRUCTION_TABLES.contains(&t.tag));
            if self.tables.len() != before {
                log::debug!("dropped {} hinting tables", before - self.tables.len());
                changed = true;
            }
        }
        if options.dummy_signature && self.table(&DSIG).is_none() {
            log::debug!("adding empty DSIG table");
            self.tables.push(Table {
                tag: DSIG,
                data: DSIG_STUB.to_vec(),
            });
            changed = true;
        }
        changed
    }

    /// Serialize with tables in tag order, recomputing every checksum and
    /// the head table's checksum adjustment.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut tables = self.tables.clone();
        tables.sort_by(|a, b| a.tag.cmp(&b.tag));
        for table in tables.iter_mut().filter(|t| t.tag == HEAD) {
            if let Some(adjustment) = table.data.get_mut(ADJUSTMENT_OFFSET..ADJUSTMENT_OFFSET + 4) {
                adjustment.copy_from_slice(&[0; 4]);
            }
        }

        let num_tables = tables.len();
        let (search_range, entry_selector) = search_params(num_tables);
        let range_shift = (num_tables * 16).saturating_sub(search_range as usize) as u16;

        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&(num_tables as u16).to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&range_shift.to_be_bytes());

        let mut offset = HEADER_LEN + num_tables * RECORD_LEN;
        let mut head_offset = None;
        for table in &tables {
            if table.tag == HEAD && table.data.len() >= ADJUSTMENT_OFFSET + 4 {
                head_offset = Some(offset);
            }
            out.extend_from_slice(&table.tag);
            out.extend_from_slice(&checksum(&table.data).to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(table.data.len() as u32).to_be_bytes());
            offset += padded_len(table.data.len());
        }
        for table in &tables {
            out.extend_from_slice(&table.data);
            out.resize(padded_len(out.len()), 0);
        }

        if let Some(head) = head_offset {
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&out));
            let at = head + ADJUSTMENT_OFFSET;
            out[at..at + 4].copy_from_slice(&adjustment.to_be_bytes());
        }
        out
    }
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// `searchRange` and `entrySelector` for a directory of `num_tables` entries.
fn search_params(num_tables: usize) -> (u16, u16) {
    let mut power = 1usize;
    let mut log2 = 0u16;
    while power * 2 <= num_tables {
        power *= 2;
        log2 += 1;
    }
    ((power * 16) as u16, log2)
}

/// Apply `options` to the compiled font at `path`, rewriting it in place.
pub fn finish_font(path: &Path, options: &ExportOptions) -> Result<(), Error> {
    let data = fs::read(path)?;
    let mut font = FontFile::parse(&data).map_err(|message| Error::Font {
        path: path.to_owned(),
        message,
    })?;
    if font.apply(options) {
        fs::write(path, font.to_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OTTO: u32 = 0x4F54_544F;

    fn compiled_font() -> FontFile {
        let tables: [(&Tag, usize); 6] = [
            (b"head", 54),
            (b"name", 23),
            (b"CFF ", 41),
            (b"fpgm", 10),
            (b"prep", 6),
            (b"cvt ", 8),
        ];
        FontFile {
            version: OTTO,
            tables: tables
                .iter()
                .map(|(tag, len)| Table {
                    tag: **tag,
                    data: (0..*len).map(|i| (i * 7 + 3) as u8).collect(),
                })
                .collect(),
        }
    }

    fn tags(font: &FontFile) -> Vec<String> {
        font.tables.iter().map(|t| tag_name(&t.tag)).collect()
    }

    #[test]
    fn adds_signature_and_drops_hinting() {
        let mut font = FontFile::parse(&compiled_font().to_bytes()).unwrap();
        assert!(font.apply(&ExportOptions::default()));
        let font = FontFile::parse(&font.to_bytes()).unwrap();
        assert_eq!(font.version, OTTO);
        assert_eq!(tags(&font), vec!["CFF ", "DSIG", "head", "name"]);
        assert_eq!(font.table(&DSIG).unwrap().data, DSIG_STUB.to_vec());
        assert_eq!(font.table(b"name").unwrap().data.len(), 23);
    }

    #[test]
    fn checksums() {
        let mut font = compiled_font();
        font.apply(&ExportOptions::default());
        let bytes = font.to_bytes();
        assert_eq!(checksum(&bytes), CHECKSUM_MAGIC);

        let parsed = FontFile::parse(&bytes).unwrap();
        for (i, table) in parsed.tables.iter().enumerate() {
            let record = HEADER_LEN + i * RECORD_LEN;
            let stored = read_u32(&bytes, record + 4).unwrap();
            let mut data = table.data.clone();
            if table.tag == HEAD {
                data[ADJUSTMENT_OFFSET..ADJUSTMENT_OFFSET + 4].copy_from_slice(&[0; 4]);
            }
            assert_eq!(stored, checksum(&data), "{}", tag_name(&table.tag));
            assert_eq!(read_u32(&bytes, record + 8).unwrap() % 4, 0);
        }
    }

    #[test]
    fn options_off_leave_tables_alone() {
        let mut font = compiled_font();
        let options = ExportOptions {
            omit_instructions: false,
            dummy_signature: false,
        };
        assert!(!font.apply(&options));
        assert_eq!(font, compiled_font());
    }

    #[test]
    fn existing_signature_is_kept() {
        let mut font = compiled_font();
        font.tables.push(Table {
            tag: DSIG,
            data: vec![0, 0, 0, 1, 0, 1, 0, 0, 9, 9, 9, 9],
        });
        let options = ExportOptions {
            omit_instructions: false,
            dummy_signature: true,
        };
        assert!(!font.apply(&options));
        assert_eq!(font.table(&DSIG).unwrap().data.len(), 12);
    }

    #[test]
    fn search_fields() {
        let mut font = compiled_font();
        font.tables.truncate(5);
        let bytes = font.to_bytes();
        assert_eq!(read_u16(&bytes, 4), Some(5));
        assert_eq!(read_u16(&bytes, 6), Some(64));
        assert_eq!(read_u16(&bytes, 8), Some(2));
        assert_eq!(read_u16(&bytes, 10), Some(16));
    }

    #[test]
    fn malformed_input() {
        assert!(FontFile::parse(&[0, 1, 0]).is_err());

        let mut bytes = compiled_font().to_bytes();
        bytes.truncate(HEADER_LEN + 2 * RECORD_LEN);
        assert!(FontFile::parse(&bytes).is_err());

        let mut bytes = compiled_font().to_bytes();
        let len = bytes.len();
        bytes.truncate(len - 16);
        let err = FontFile::parse(&bytes).unwrap_err();
        assert!(err.contains("past the end"), "{}", err);
    }

    #[test]
    fn finish_in_place() {
        let dir = std::env::temp_dir().join(format!("hexmono-sfnt-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("font.otf");
        fs::write(&path, compiled_font().to_bytes()).unwrap();
        finish_font(&path, &ExportOptions::default()).unwrap();
        let font = FontFile::parse(&fs::read(&path).unwrap()).unwrap();
        assert!(font.table(&DSIG).is_some());
        assert!(font.table(b"fpgm").is_none());

        fs::write(&path, b"not a font").unwrap();
        assert!(matches!(
            finish_font(&path, &ExportOptions::default()),
            Err(Error::Font { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
