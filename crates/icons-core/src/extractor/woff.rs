//! WOFF 1.0 unpacking.
//!
//! A WOFF file is an sfnt font whose tables are individually
//! zlib-compressed. [`to_sfnt`] rebuilds the plain sfnt so it can be handed
//! to `ttf_parser`.

use std::io::Read;

const SIGNATURE: &[u8; 4] = b"wOFF";
const HEADER_LEN: usize = 44;
const ENTRY_LEN: usize = 20;
const SFNT_RECORD_LEN: usize = 16;
/// Largest table count whose sfnt search parameters fit in `u16`.
const MAX_TABLES: u16 = 4095;
/// Upper bound for one decompressed table.
const MAX_TABLE_LEN: usize = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub(crate) enum WoffError {
    #[error("not a WOFF file")]
    Signature,
    #[error("truncated WOFF data")]
    Truncated,
    #[error("WOFF declares {0} tables")]
    TooManyTables(u16),
    #[error("table {tag} is malformed: {message}")]
    Table { tag: String, message: String },
}

/// Whether `data` starts with the WOFF signature.
pub(crate) fn is_woff(data: &[u8]) -> bool {
    data.starts_with(SIGNATURE)
}

struct TableEntry {
    tag: [u8; 4],
    offset: usize,
    comp_length: usize,
    orig_length: usize,
    checksum: u32,
}

/// Convert WOFF data into an uncompressed sfnt.
pub(crate) fn to_sfnt(data: &[u8]) -> Result<Vec<u8>, WoffError> {
    if !is_woff(data) {
        return Err(WoffError::Signature);
    }
    let flavor = read_u32(data, 4)?;
    let num_tables = read_u16(data, 12)?;
    if num_tables > MAX_TABLES {
        return Err(WoffError::TooManyTables(num_tables));
    }
    if HEADER_LEN + usize::from(num_tables) * ENTRY_LEN > data.len() {
        return Err(WoffError::Truncated);
    }

    let entries = (0..usize::from(num_tables))
        .map(|i| read_entry(data, HEADER_LEN + i * ENTRY_LEN))
        .collect::<Result<Vec<_>, _>>()?;

    let (search_range, entry_selector, range_shift) =
        search_params(num_tables).ok_or(WoffError::TooManyTables(num_tables))?;
    let mut out = Vec::new();
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    let mut offset = 12 + entries.len() * SFNT_RECORD_LEN;
    let mut tables = Vec::with_capacity(entries.len());
    for entry in &entries {
        let table = table_data(data, entry)?;
        out.extend_from_slice(&entry.tag);
        out.extend_from_slice(&entry.checksum.to_be_bytes());
        out.extend_from_slice(&to_u32(offset)?.to_be_bytes());
        out.extend_from_slice(&to_u32(table.len())?.to_be_bytes());
        offset += padded(table.len());
        tables.push(table);
    }
    for table in tables {
        let len = table.len();
        out.extend(table);
        out.resize(out.len() + padded(len) - len, 0);
    }
    Ok(out)
}

fn read_entry(data: &[u8], at: usize) -> Result<TableEntry, WoffError> {
    let tag = data
        .get(at..at + 4)
        .and_then(|t| <[u8; 4]>::try_from(t).ok())
        .ok_or(WoffError::Truncated)?;
    Ok(TableEntry {
        tag,
        offset: read_u32(data, at + 4)? as usize,
        comp_length: read_u32(data, at + 8)? as usize,
        orig_length: read_u32(data, at + 12)? as usize,
        checksum: read_u32(data, at + 16)?,
    })
}

fn table_data(data: &[u8], entry: &TableEntry) -> Result<Vec<u8>, WoffError> {
    let end = entry
        .offset
        .checked_add(entry.comp_length)
        .ok_or(WoffError::Truncated)?;
    let raw = data.get(entry.offset..end).ok_or(WoffError::Truncated)?;
    if entry.comp_length >= entry.orig_length {
        return Ok(raw.to_vec());
    }

    let table_error = |message: String| WoffError::Table {
        tag: String::from_utf8_lossy(&entry.tag).into_owned(),
        message,
    };
    if entry.orig_length > MAX_TABLE_LEN {
        return Err(table_error(format!(
            "declared length {} exceeds the {MAX_TABLE_LEN} byte limit",
            entry.orig_length
        )));
    }
    let mut table = Vec::with_capacity(entry.orig_length);
    // One extra byte is enough to detect a table larger than declared
    flate2::read::ZlibDecoder::new(raw)
        .take(entry.orig_length as u64 + 1)
        .read_to_end(&mut table)
        .map_err(|e| table_error(e.to_string()))?;
    if table.len() != entry.orig_length {
        return Err(table_error(format!(
            "expected {} bytes, got {}",
            entry.orig_length,
            table.len()
        )));
    }
    Ok(table)
}

/// `(searchRange, entrySelector, rangeShift)` of the sfnt header.
///
/// `None` when the values do not fit the header's `u16` fields.
fn search_params(num_tables: u16) -> Option<(u16, u16, u16)> {
    if num_tables == 0 {
        return Some((0, 0, 0));
    }
    let tables = u32::from(num_tables);
    let entry_selector = 31 - tables.leading_zeros();
    let search_range = (1u32 << entry_selector) * 16;
    let range_shift = tables * 16 - search_range;
    Some((
        u16::try_from(search_range).ok()?,
        u16::try_from(entry_selector).ok()?,
        u16::try_from(range_shift).ok()?,
    ))
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn to_u32(value: usize) -> Result<u32, WoffError> {
    u32::try_from(value).map_err(|_| WoffError::Truncated)
}

fn read_u16(data: &[u8], at: usize) -> Result<u16, WoffError> {
    data.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or(WoffError::Truncated)
}

fn read_u32(data: &[u8], at: usize) -> Result<u32, WoffError> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(WoffError::Truncated)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Pack `(tag, data)` tables into WOFF, compressing the ones marked so.
    pub(crate) fn build_woff(tables: &[(&[u8; 4], &[u8], bool)]) -> Vec<u8> {
        let mut bodies = Vec::new();
        for (_, data, compress) in tables {
            if *compress {
                let mut encoder =
                    flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
                encoder.write_all(data).unwrap();
                bodies.push(encoder.finish().unwrap());
            } else {
                bodies.push(data.to_vec());
            }
        }

        let mut out = Vec::new();
        out.extend_from_slice(SIGNATURE);
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.resize(HEADER_LEN, 0);

        let mut offset = HEADER_LEN + tables.len() * ENTRY_LEN;
        for ((tag, data, _), body) in tables.iter().zip(&bodies) {
            out.extend_from_slice(*tag);
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            out.extend_from_slice(&0u32.to_be_bytes());
            offset += body.len();
        }
        for body in bodies {
            out.extend(body);
        }
        out
    }

    #[test]
    fn test_to_sfnt_restores_tables() {
        let big = vec![7u8; 200];
        let woff = build_woff(&[(b"aaaa", big.as_slice(), true), (b"bbbb", &b"xyz"[..], false)]);

        let sfnt = to_sfnt(&woff).unwrap();

        assert_eq!(&sfnt[0..4], &0x0001_0000u32.to_be_bytes());
        assert_eq!(read_u16(&sfnt, 4).unwrap(), 2);
        assert_eq!(read_u16(&sfnt, 6).unwrap(), 32);
        assert_eq!(read_u16(&sfnt, 8).unwrap(), 1);
        assert_eq!(read_u16(&sfnt, 10).unwrap(), 0);

        let first = 12;
        assert_eq!(&sfnt[first..first + 4], b"aaaa");
        let offset = read_u32(&sfnt, first + 8).unwrap() as usize;
        let length = read_u32(&sfnt, first + 12).unwrap() as usize;
        assert_eq!(&sfnt[offset..offset + length], big.as_slice());

        let second = first + SFNT_RECORD_LEN;
        assert_eq!(&sfnt[second..second + 4], b"bbbb");
        let offset = read_u32(&sfnt, second + 8).unwrap() as usize;
        let length = read_u32(&sfnt, second + 12).unwrap() as usize;
        assert_eq!(offset % 4, 0);
        assert_eq!(&sfnt[offset..offset + length], b"xyz");
        assert_eq!(sfnt.len() % 4, 0);
    }

    #[test]
    fn test_to_sfnt_rejects_bad_input() {
        assert!(matches!(to_sfnt(b"OTTO"), Err(WoffError::Signature)));
        assert!(matches!(to_sfnt(b"wOFF\0\0"), Err(WoffError::Truncated)));
    }

    #[test]
    fn test_search_params() {
        assert_eq!(search_params(1), Some((16, 0, 0)));
        assert_eq!(search_params(9), Some((128, 3, 16)));
        assert_eq!(search_params(MAX_TABLES), Some((32768, 11, 32752)));
        assert_eq!(search_params(4096), None);
    }

    #[test]
    fn test_to_sfnt_rejects_huge_table_count() {
        let mut woff = Vec::new();
        woff.extend_from_slice(SIGNATURE);
        woff.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        woff.extend_from_slice(&0u32.to_be_bytes());
        woff.extend_from_slice(&4096u16.to_be_bytes());
        woff.resize(HEADER_LEN + 4096 * ENTRY_LEN, 0);

        assert!(matches!(to_sfnt(&woff), Err(WoffError::TooManyTables(4096))));
    }

    #[test]
    fn test_to_sfnt_rejects_missing_directory() {
        let mut woff = build_woff(&[(b"aaaa", &b"abc"[..], false)]);
        woff[12..14].copy_from_slice(&300u16.to_be_bytes());

        assert!(matches!(to_sfnt(&woff), Err(WoffError::Truncated)));
    }

    #[test]
    fn test_to_sfnt_rejects_oversized_tables() {
        let mut woff = build_woff(&[(b"aaaa", vec![1u8; 64].as_slice(), true)]);
        let orig_length = HEADER_LEN + 12;
        woff[orig_length..orig_length + 4].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(to_sfnt(&woff), Err(WoffError::Table { .. })));

        let mut woff = build_woff(&[(b"aaaa", vec![1u8; 4096].as_slice(), true)]);
        woff[orig_length..orig_length + 4].copy_from_slice(&100u32.to_be_bytes());
        assert!(matches!(to_sfnt(&woff), Err(WoffError::Table { .. })));
    }
}
