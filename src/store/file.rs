// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Binary sequence files.
//!
//! All fields are little-endian:
//!
//! ```text
//! offset  type              field
//! 0       u32               flags (FIXED_LEN, TIMING)
//! 4       u32               custom header size in bytes
//! 8       u32               record length in integers
//! 12      u32               record count
//! 16      f32               elapsed time in ms
//! 20      [u8; h]           custom header
//! 20+h    [u32; len*count]  records
//! ```
//!
//! The writer reserves the fixed header, streams records, and fills the header
//! in last, once the count is known.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, SearchError};

/// Every record has the length stored in the header.
pub const FIXED_LEN: u32 = 1 << 1;
/// The header carries an elapsed time.
pub const TIMING: u32 = 1 << 2;
/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 20;

/// The fixed file header.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FileHeader {
    pub flags: u32,
    pub custom_header_size: u32,
    pub record_len: u32,
    pub record_count: u32,
    pub time_ms: f32,
}

impl FileHeader {
    pub fn is_fixed_len(&self) -> bool {
        self.flags & FIXED_LEN != 0
    }

    pub fn has_timing(&self) -> bool {
        self.flags & TIMING != 0
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.flags.to_le_bytes());
        out[4..8].copy_from_slice(&self.custom_header_size.to_le_bytes());
        out[8..12].copy_from_slice(&self.record_len.to_le_bytes());
        out[12..16].copy_from_slice(&self.record_count.to_le_bytes());
        out[16..20].copy_from_slice(&self.time_ms.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Self {
        let word = |i: usize| [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]];
        Self {
            flags: u32::from_le_bytes(word(0)),
            custom_header_size: u32::from_le_bytes(word(4)),
            record_len: u32::from_le_bytes(word(8)),
            record_count: u32::from_le_bytes(word(12)),
            time_ms: f32::from_le_bytes(word(16)),
        }
    }
}

/// Streams fixed-length records into a sequence file.
#[derive(Debug)]
pub struct SequenceWriter {
    path: PathBuf,
    out: BufWriter<File>,
    custom_header_size: u32,
    record_len: Option<u32>,
    records: u32,
}

impl SequenceWriter {
    /// Create (or truncate) `path` and reserve the fixed header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut out = BufWriter::new(File::create(&path)?);
        out.write_all(&[0u8; HEADER_LEN])?;
        debug!(path = %path.display(), "sequence file created");
        Ok(Self {
            path,
            out,
            custom_header_size: 0,
            record_len: None,
            records: 0,
        })
    }

    /// Fix the record length before any record is written.
    pub fn set_record_len(&mut self, len: usize) -> Result<()> {
        let len = len as u32;
        match self.record_len {
            Some(current) if current != len => Err(SearchError::RecordLength {
                expected: current as usize,
                actual: len as usize,
            }),
            _ => {
                self.record_len = Some(len);
                Ok(())
            }
        }
    }

    /// Reserve `size` bytes for a custom header to be written later.
    pub fn reserve_custom_header(&mut self, size: u32) -> Result<()> {
        if self.records > 0 || self.custom_header_size != 0 {
            return Err(SearchError::BadHeader(
                "custom header must be reserved once, before any record".to_string(),
            ));
        }
        self.custom_header_size = size;
        self.out.write_all(&vec![0u8; size as usize])?;
        Ok(())
    }

    /// Write the custom header.
    ///
    /// Without a prior reservation this must happen before any record and
    /// fixes the header size; with one, `bytes` must fill it exactly.
    pub fn write_custom_header(&mut self, bytes: &[u8]) -> Result<()> {
        if self.custom_header_size == 0 {
            if self.records > 0 {
                return Err(SearchError::BadHeader(
                    "custom header size was not reserved before the first record".to_string(),
                ));
            }
            self.custom_header_size = bytes.len() as u32;
            self.out.write_all(bytes)?;
            return Ok(());
        }
        if bytes.len() != self.custom_header_size as usize {
            return Err(SearchError::BadHeader(format!(
                "custom header is {} bytes, {} were reserved",
                bytes.len(),
                self.custom_header_size
            )));
        }
        self.out.seek(SeekFrom::Start(HEADER_LEN as u64))?;
        self.out.write_all(bytes)?;
        self.out.seek(SeekFrom::End(0))?;
        Ok(())
    }

    /// Append one record.
    pub fn write_record(&mut self, record: &[u32]) -> Result<()> {
        self.set_record_len(record.len())?;
        for value in record {
            self.out.write_all(&value.to_le_bytes())?;
        }
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> u32 {
        self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fill in the fixed header and close the file.
    pub fn finish(mut self, time_ms: Option<f32>) -> Result<FileHeader> {
        let mut header = FileHeader {
            custom_header_size: self.custom_header_size,
            record_count: self.records,
            ..FileHeader::default()
        };
        if let Some(len) = self.record_len {
            header.flags |= FIXED_LEN;
            header.record_len = len;
        }
        if let Some(time) = time_ms {
            header.flags |= TIMING;
            header.time_ms = time;
        }
        self.out.seek(SeekFrom::Start(0))?;
        self.out.write_all(&header.to_bytes())?;
        self.out.flush()?;
        info!(
            path = %self.path.display(),
            records = header.record_count,
            record_len = header.record_len,
            "sequence file written"
        );
        Ok(header)
    }
}

/// Contents of a sequence file.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceFile {
    pub header: FileHeader,
    pub custom_header: Vec<u8>,
    pub record_len: usize,
    pub values: Vec<u32>,
}

impl SequenceFile {
    /// Records in file order.
    pub fn records(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.values.chunks(self.record_len.max(1))
    }

    pub fn len(&self) -> usize {
        self.header.record_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.header.record_count == 0
    }
}

fn short_read(path: &Path, expected: usize, actual: usize) -> SearchError {
    warn!(path = %path.display(), expected, actual, "short read from sequence file");
    SearchError::ShortRead { expected, actual }
}

/// Read a sequence file.
///
/// The record length comes from the header when it has one; otherwise
/// `record_len` must supply it.
pub fn read_sequence_file(path: impl AsRef<Path>, record_len: Option<u32>) -> Result<SequenceFile> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;

    let Some(fixed) = bytes.get(..HEADER_LEN) else {
        return Err(short_read(path, HEADER_LEN, bytes.len()));
    };
    let mut raw = [0u8; HEADER_LEN];
    raw.copy_from_slice(fixed);
    let header = FileHeader::from_bytes(&raw);

    let record_len = match (header.is_fixed_len(), record_len) {
        (true, _) => header.record_len as usize,
        (false, Some(len)) => len as usize,
        (false, None) => {
            return Err(SearchError::BadHeader(
                "record length neither in header nor supplied".to_string(),
            ))
        }
    };

    let custom_end = HEADER_LEN + header.custom_header_size as usize;
    let Some(custom_header) = bytes.get(HEADER_LEN..custom_end) else {
        return Err(short_read(
            path,
            header.custom_header_size as usize,
            bytes.len() - HEADER_LEN,
        ));
    };

    let data_len = record_len
        .checked_mul(header.record_count as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| SearchError::BadHeader("record data size overflows".to_string()))?;
    let Some(data) = bytes.get(custom_end..custom_end + data_len) else {
        return Err(short_read(path, data_len, bytes.len() - custom_end));
    };

    let values = data
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    debug!(path = %path.display(), records = header.record_count, record_len, "sequence file read");

    Ok(SequenceFile {
        header,
        custom_header: custom_header.to_vec(),
        record_len,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_header_bytes() {
        let header = FileHeader {
            flags: FIXED_LEN | TIMING,
            custom_header_size: 8,
            record_len: 3,
            record_count: 2,
            time_ms: 1.5,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], &[6, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &[3, 0, 0, 0]);
        assert_eq!(FileHeader::from_bytes(&bytes), header);
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seq.bin");

        let mut writer = SequenceWriter::create(&path).unwrap();
        writer.reserve_custom_header(4).unwrap();
        writer.write_record(&[1, 2, 3]).unwrap();
        writer.write_record(&[4, 5, 6]).unwrap();
        writer.write_custom_header(&[9, 8, 7, 6]).unwrap();
        let header = writer.finish(Some(12.5)).unwrap();
        assert!(header.is_fixed_len());
        assert!(header.has_timing());

        let file = read_sequence_file(&path, None).unwrap();
        assert_eq!(file.header, header);
        assert_eq!(file.custom_header, vec![9, 8, 7, 6]);
        assert_eq!(file.len(), 2);
        let records: Vec<&[u32]> = file.records().collect();
        assert_eq!(records, vec![&[1, 2, 3][..], &[4, 5, 6][..]]);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 4 + 6 * 4);
    }

    #[test]
    fn test_record_length_mismatch() {
        let dir = tempdir().unwrap();
        let mut writer = SequenceWriter::create(dir.path().join("a.bin")).unwrap();
        writer.write_record(&[1, 2]).unwrap();
        let err = writer.write_record(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, SearchError::RecordLength { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_custom_header_after_records() {
        let dir = tempdir().unwrap();
        let mut writer = SequenceWriter::create(dir.path().join("b.bin")).unwrap();
        writer.write_record(&[1]).unwrap();
        assert!(matches!(
            writer.write_custom_header(&[1, 2]),
            Err(SearchError::BadHeader(_))
        ));
        assert!(writer.reserve_custom_header(2).is_err());
    }

    #[test]
    fn test_short_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.bin");
        let header = FileHeader {
            flags: FIXED_LEN,
            custom_header_size: 0,
            record_len: 2,
            record_count: 5,
            time_ms: 0.0,
        };
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 12]);
        std::fs::write(&path, &bytes).unwrap();

        let err = read_sequence_file(&path, None).unwrap_err();
        assert!(matches!(err, SearchError::ShortRead { expected: 40, actual: 12 }));

        std::fs::write(&path, [0u8; 7]).unwrap();
        let err = read_sequence_file(&path, None).unwrap_err();
        assert!(matches!(err, SearchError::ShortRead { expected: 20, actual: 7 }));
    }

    #[test]
    fn test_record_len_supplied_by_reader() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("free.bin");
        let writer = SequenceWriter::create(&path).unwrap();
        writer.finish(None).unwrap();
        // No records, so the header has no length.
        assert!(matches!(
            read_sequence_file(&path, None),
            Err(SearchError::BadHeader(_))
        ));

        let mut bytes = FileHeader {
            record_count: 1,
            ..FileHeader::default()
        }
        .to_bytes()
        .to_vec();
        bytes.extend_from_slice(&7u32.to_le_bytes());
        bytes.extend_from_slice(&8u32.to_le_bytes());
        std::fs::write(&path, &bytes).unwrap();
        let file = read_sequence_file(&path, Some(2)).unwrap();
        assert_eq!(file.values, vec![7, 8]);
    }
}
