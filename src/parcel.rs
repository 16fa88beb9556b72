//! Flat binary record codec for [`QuestionRow`].
//!
//! The record layout is fixed and position-based — no field names, no
//! self-description. Multi-byte integers are big-endian. Field order:
//! visited, question_id, title, tags, votes, answers, views, answered,
//! creation_date, link, owner_profile_image_url, owner_display_name.
//!
//! Encoding rules:
//! - tri-state bool: one tag byte, `0x00` false / `0x01` true / `0x02` absent
//! - optional i64: presence byte (`0x00` / `0x01`) then 8 value bytes if present
//! - string: `i32` byte length then UTF-8 bytes; length `-1` is reserved for
//!   "no value" and is rejected on decode since rows carry real strings
//! - tag list: presence byte, `u32` element count, then each tag as a string
//! - creation date: unconditional 8-byte millisecond timestamp, `-1` = absent
//!
//! Decoding is all-or-nothing: any malformed byte yields a [`ParcelError`]
//! and no partially populated row.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::types::QuestionRow;

/// Leading magic of a persisted batch file.
pub const BATCH_MAGIC: [u8; 4] = *b"SOSR";
/// Current batch format version.
pub const BATCH_VERSION: u8 = 1;

/// Timestamp sentinel meaning "no creation date".
const NO_DATE: i64 = -1;

/// Upper bound on any length prefix. Anything larger is a corrupt record,
/// not a plausible title or tag list.
const MAX_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParcelError {
    #[error("record truncated")]
    Truncated,
    #[error("invalid encoding: {0}")]
    InvalidEncoding(&'static str),
    #[error("unsupported batch version {0}")]
    UnsupportedVersion(u8),
}

type Result<T> = std::result::Result<T, ParcelError>;

/// Encode one row to its binary record.
pub fn encode_row(row: &QuestionRow) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);
    put_row(&mut buf, row);
    buf
}

/// Decode one row from a binary record, requiring the whole input to be
/// consumed.
pub fn decode_row(bytes: &[u8]) -> Result<QuestionRow> {
    let mut r = Reader::new(bytes);
    let row = take_row(&mut r)?;
    if !r.is_empty() {
        return Err(ParcelError::InvalidEncoding("trailing bytes after record"));
    }
    Ok(row)
}

/// Encode a result batch with the `SOSR` framing: magic, version, row count,
/// then the rows back to back.
pub fn encode_batch(rows: &[QuestionRow]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16 + rows.len() * 128);
    buf.extend_from_slice(&BATCH_MAGIC);
    buf.push(BATCH_VERSION);
    buf.extend_from_slice(&(rows.len() as u32).to_be_bytes());
    for row in rows {
        put_row(&mut buf, row);
    }
    buf
}

/// Decode a framed result batch.
pub fn decode_batch(bytes: &[u8]) -> Result<Vec<QuestionRow>> {
    let mut r = Reader::new(bytes);
    if r.take_bytes(4)? != BATCH_MAGIC {
        return Err(ParcelError::InvalidEncoding("bad batch magic"));
    }
    let version = r.take_u8()?;
    if version != BATCH_VERSION {
        return Err(ParcelError::UnsupportedVersion(version));
    }
    let count = r.take_u32()? as usize;
    if count > MAX_LEN {
        return Err(ParcelError::InvalidEncoding("row count too large"));
    }
    let mut rows = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        rows.push(take_row(&mut r)?);
    }
    if !r.is_empty() {
        return Err(ParcelError::InvalidEncoding("trailing bytes after batch"));
    }
    Ok(rows)
}

fn put_row(buf: &mut Vec<u8>, row: &QuestionRow) {
    put_opt_bool(buf, row.visited);
    put_opt_i64(buf, row.question_id);
    put_str(buf, &row.title);
    put_tags(buf, row.tags.as_deref());
    put_opt_i64(buf, row.votes);
    put_opt_i64(buf, row.answers);
    put_opt_i64(buf, row.views);
    put_opt_bool(buf, row.answered);
    buf.extend_from_slice(
        &row.creation_date
            .map(|d| d.timestamp_millis())
            .unwrap_or(NO_DATE)
            .to_be_bytes(),
    );
    put_str(buf, &row.link);
    put_str(buf, &row.owner_profile_image_url);
    put_str(buf, &row.owner_display_name);
}

fn take_row(r: &mut Reader<'_>) -> Result<QuestionRow> {
    let visited = take_opt_bool(r)?;
    let question_id = take_opt_i64(r)?;
    let title = take_str(r)?;
    let tags = take_tags(r)?;
    let votes = take_opt_i64(r)?;
    let answers = take_opt_i64(r)?;
    let views = take_opt_i64(r)?;
    let answered = take_opt_bool(r)?;
    let creation_date = take_date(r)?;
    let link = take_str(r)?;
    let owner_profile_image_url = take_str(r)?;
    let owner_display_name = take_str(r)?;
    Ok(QuestionRow {
        visited,
        question_id,
        title,
        tags,
        votes,
        answers,
        views,
        answered,
        creation_date,
        link,
        owner_profile_image_url,
        owner_display_name,
    })
}

fn put_opt_bool(buf: &mut Vec<u8>, value: Option<bool>) {
    buf.push(match value {
        Some(false) => 0x00,
        Some(true) => 0x01,
        None => 0x02,
    });
}

fn take_opt_bool(r: &mut Reader<'_>) -> Result<Option<bool>> {
    match r.take_u8()? {
        0x00 => Ok(Some(false)),
        0x01 => Ok(Some(true)),
        0x02 => Ok(None),
        _ => Err(ParcelError::InvalidEncoding("bad tri-state tag byte")),
    }
}

fn put_opt_i64(buf: &mut Vec<u8>, value: Option<i64>) {
    match value {
        None => buf.push(0x00),
        Some(v) => {
            buf.push(0x01);
            buf.extend_from_slice(&v.to_be_bytes());
        }
    }
}

fn take_opt_i64(r: &mut Reader<'_>) -> Result<Option<i64>> {
    match r.take_u8()? {
        0x00 => Ok(None),
        0x01 => Ok(Some(r.take_i64()?)),
        _ => Err(ParcelError::InvalidEncoding("bad presence byte")),
    }
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as i32).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn take_str(r: &mut Reader<'_>) -> Result<String> {
    let len = r.take_i32()?;
    if len == -1 {
        // Reserved "no value" length. Rows model these fields as plain
        // strings, so a null here is a malformed record, not an empty one.
        return Err(ParcelError::InvalidEncoding("null string field"));
    }
    if len < 0 {
        return Err(ParcelError::InvalidEncoding("negative string length"));
    }
    let len = len as usize;
    if len > MAX_LEN {
        return Err(ParcelError::InvalidEncoding("string length too large"));
    }
    let bytes = r.take_bytes(len)?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| ParcelError::InvalidEncoding("string is not valid UTF-8"))
}

fn put_tags(buf: &mut Vec<u8>, tags: Option<&[String]>) {
    match tags {
        None => buf.push(0x00),
        Some(tags) => {
            buf.push(0x01);
            buf.extend_from_slice(&(tags.len() as u32).to_be_bytes());
            for tag in tags {
                put_str(buf, tag);
            }
        }
    }
}

fn take_tags(r: &mut Reader<'_>) -> Result<Option<Vec<String>>> {
    match r.take_u8()? {
        0x00 => Ok(None),
        0x01 => {
            let count = r.take_u32()? as usize;
            if count > MAX_LEN {
                return Err(ParcelError::InvalidEncoding("tag count too large"));
            }
            let mut tags = Vec::with_capacity(count.min(64));
            for _ in 0..count {
                tags.push(take_str(r)?);
            }
            Ok(Some(tags))
        }
        _ => Err(ParcelError::InvalidEncoding("bad presence byte")),
    }
}

fn take_date(r: &mut Reader<'_>) -> Result<Option<DateTime<Utc>>> {
    let millis = r.take_i64()?;
    if millis == NO_DATE {
        return Ok(None);
    }
    match Utc.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => Ok(Some(dt)),
        _ => Err(ParcelError::InvalidEncoding("timestamp out of range")),
    }
}

/// Cursor over the raw record bytes.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos == self.bytes.len()
    }

    fn take_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(ParcelError::Truncated)?;
        if end > self.bytes.len() {
            return Err(ParcelError::Truncated);
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_u8(&mut self) -> Result<u8> {
        Ok(self.take_bytes(1)?[0])
    }

    fn take_u32(&mut self) -> Result<u32> {
        let b = self.take_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn take_i32(&mut self) -> Result<i32> {
        let b = self.take_bytes(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn take_i64(&mut self) -> Result<i64> {
        let b = self.take_bytes(8)?;
        Ok(i64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }
}
