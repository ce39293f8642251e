// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Flat result destinations: fixed-length records in memory, on disk or on stdout.

use std::path::PathBuf;

use tracing::warn;

use super::file::SequenceWriter;
use super::StoreOutput;
use crate::error::Result;

/// Where a flat store puts accepted sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatDestination {
    /// Print each sequence to stdout and keep nothing.
    Print,
    /// Keep every sequence in memory.
    Growable,
    /// Keep at most `capacity` sequences; later ones are dropped with a warning.
    Fixed { capacity: usize },
    /// Stream records into a sequence file.
    File(PathBuf),
}

/// Space-separated values, as printed for [`FlatDestination::Print`].
pub fn format_sequence(seq: &[u32]) -> String {
    seq.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug)]
pub(crate) enum FlatSink {
    Print,
    Memory {
        values: Vec<u32>,
        capacity: Option<usize>,
        stored: usize,
        overflowed: bool,
    },
    File(SequenceWriter),
}

impl FlatSink {
    pub(crate) fn open(destination: FlatDestination) -> Result<Self> {
        Ok(match destination {
            FlatDestination::Print => FlatSink::Print,
            FlatDestination::Growable => FlatSink::Memory {
                values: Vec::new(),
                capacity: None,
                stored: 0,
                overflowed: false,
            },
            FlatDestination::Fixed { capacity } => FlatSink::Memory {
                values: Vec::new(),
                capacity: Some(capacity),
                stored: 0,
                overflowed: false,
            },
            FlatDestination::File(path) => FlatSink::File(SequenceWriter::create(path)?),
        })
    }

    pub(crate) fn write(&mut self, record: &[u32]) -> Result<()> {
        match self {
            FlatSink::Print => {
                println!("{}", format_sequence(record));
            }
            FlatSink::Memory {
                values,
                capacity,
                stored,
                overflowed,
            } => {
                if let Some(capacity) = *capacity {
                    if *stored >= capacity {
                        if !*overflowed {
                            warn!(capacity, "adding more sequences than the fixed capacity; dropping the rest");
                            *overflowed = true;
                        }
                        return Ok(());
                    }
                    if values.capacity() == 0 {
                        let len = capacity.saturating_mul(record.len());
                        if values.try_reserve_exact(len).is_err() {
                            warn!(capacity, "fixed sequence buffer allocation failed; growing on demand");
                        }
                    }
                }
                values.extend_from_slice(record);
                *stored += 1;
            }
            FlatSink::File(writer) => writer.write_record(record)?,
        }
        Ok(())
    }

    pub(crate) fn finish(self, record_len: Option<usize>, time_ms: Option<f32>) -> Result<StoreOutput> {
        Ok(match self {
            FlatSink::Print => StoreOutput::Printed,
            FlatSink::Memory { values, .. } => StoreOutput::Sequences {
                record_len: record_len.unwrap_or(0),
                values,
            },
            FlatSink::File(mut writer) => {
                if let Some(len) = record_len {
                    writer.set_record_len(len)?;
                }
                let path = writer.path().to_path_buf();
                let header = writer.finish(time_ms)?;
                StoreOutput::File { path, header }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sequence() {
        assert_eq!(format_sequence(&[3, 10, 42]), "3 10 42");
        assert_eq!(format_sequence(&[]), "");
    }

    #[test]
    fn test_fixed_capacity_drops_overflow() {
        let mut sink = FlatSink::open(FlatDestination::Fixed { capacity: 2 }).unwrap();
        for i in 0..5 {
            sink.write(&[i, i + 1]).unwrap();
        }
        match sink.finish(Some(2), None).unwrap() {
            StoreOutput::Sequences { record_len, values } => {
                assert_eq!(record_len, 2);
                assert_eq!(values, vec![0, 1, 1, 2]);
            }
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_growable_keeps_everything() {
        let mut sink = FlatSink::open(FlatDestination::Growable).unwrap();
        for i in 0..100 {
            sink.write(&[i]).unwrap();
        }
        match sink.finish(Some(1), None).unwrap() {
            StoreOutput::Sequences { values, .. } => assert_eq!(values.len(), 100),
            other => panic!("unexpected output {:?}", other),
        }
    }
}
