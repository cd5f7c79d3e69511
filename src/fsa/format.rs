//! On-disk serialization of the compact automaton.
//!
//! All fixed-width fields are little-endian, regardless of the writing
//! platform.
//!
//! Layout:
//! ```text
//! offset  size  field
//! 0       4     magic (0x62d80ab5)
//! 4       4     slot count L
//! 8       4     start base
//! 12      L     symbol array
//! 12+L    4*L   target array (i32)
//! ```
//!
//! Readers validate the magic, the start base, and every populated slot's
//! target before accepting a file, so a partial write or a foreign file is
//! reported as [`Error::InvalidFile`] rather than observed as a broken
//! automaton.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use super::compact::Fsa;
use super::error::{Error, Result};
use super::state::{EMPTY_SLOT, FINAL_SYMBOL};

/// Magic number identifying an FSA file.
const MAGIC: u32 = 0x62d8_0ab5;

/// Buffer size for chunked reads and writes.
const CHUNK: usize = 1 << 20;

impl Fsa {
    /// Writes the automaton to `path`. The conventional suffix is `.fsa`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying file operation fails.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::with_capacity(CHUNK, File::create(path)?);
        writer.write_all(&MAGIC.to_le_bytes())?;
        writer.write_all(&(self.symbols.len() as u32).to_le_bytes())?;
        writer.write_all(&self.start.to_le_bytes())?;
        writer.write_all(&self.symbols)?;

        let mut buf = Vec::with_capacity(CHUNK);
        for chunk in self.targets.chunks(CHUNK / 4) {
            buf.clear();
            for &target in chunk {
                buf.extend_from_slice(&target.to_le_bytes());
            }
            writer.write_all(&buf)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads an automaton previously written by [`write`](Self::write).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFile`] if the magic does not match, the file
    /// is truncated, or any base falls outside the arrays, and [`Error::Io`]
    /// for other I/O failures.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Fsa> {
        let mut reader = BufReader::with_capacity(CHUNK, File::open(path)?);

        let mut word = [0u8; 4];
        read_exact(&mut reader, &mut word)?;
        if u32::from_le_bytes(word) != MAGIC {
            return Err(Error::InvalidFile("bad magic"));
        }
        read_exact(&mut reader, &mut word)?;
        let len = u32::from_le_bytes(word) as usize;
        read_exact(&mut reader, &mut word)?;
        let start = i32::from_le_bytes(word);

        let max_base = len as i64 - 256;
        if (start as i64) < 0 || start as i64 > max_base {
            return Err(Error::InvalidFile("start base out of range"));
        }

        let mut symbols = vec![0u8; len];
        read_exact(&mut reader, &mut symbols)?;

        let mut targets = Vec::with_capacity(len);
        let mut buf = vec![0u8; CHUNK];
        let mut remaining = len * 4;
        while remaining > 0 {
            let take = remaining.min(CHUNK);
            read_exact(&mut reader, &mut buf[..take])?;
            for bytes in buf[..take].chunks_exact(4) {
                targets.push(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
            }
            remaining -= take;
        }

        // Every populated non-reserved slot must point back into the arrays;
        // stepping is then in-bounds on any accepted file.
        for (slot, &symbol) in symbols.iter().enumerate() {
            if symbol != EMPTY_SLOT && symbol != FINAL_SYMBOL {
                let target = targets[slot] as i64;
                if target < 0 || target > max_base {
                    return Err(Error::InvalidFile("transition target out of range"));
                }
            }
        }

        Ok(Fsa::new(symbols, targets, start))
    }
}

fn read_exact(reader: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::InvalidFile("truncated file")
        } else {
            Error::Io(e)
        }
    })
}
