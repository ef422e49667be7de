//! Byte-exact file content comparison
//!
//! Convergence decisions are made on content, never on timestamps: the
//! template files are rewritten on every system image, so mtimes carry no
//! signal. Comparison short-circuits on length, then reads both files in
//! fixed-size chunks.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const CHUNK: usize = 8192;

/// Compare two files byte for byte.
///
/// # Errors
///
/// Returns an error if either file cannot be opened or read.
pub fn files_identical(a: &Path, b: &Path) -> std::io::Result<bool> {
    let meta_a = std::fs::metadata(a)?;
    let meta_b = std::fs::metadata(b)?;
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::new(File::open(a)?);
    let mut reader_b = BufReader::new(File::open(b)?);
    let mut buf_a = [0u8; CHUNK];
    let mut buf_b = [0u8; CHUNK];

    loop {
        let n = fill(&mut reader_a, &mut buf_a)?;
        let m = fill(&mut reader_b, &mut buf_b)?;
        if n != m || buf_a[..n] != buf_b[..m] {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Read until the buffer is full or the reader is exhausted.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = reader.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}
