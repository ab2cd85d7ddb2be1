//! Reading and writing permutation databases and heuristic evaluations.
//!
//! A database stores one [`Record`] per permutation, either in a flat binary form or as text.
//! Binary files carry no header, every record consists of two unsigned integers in native byte
//! order whose width is given by [`Codec::width`]. Text files hold one line per record containing
//! the comma separated permutation followed by a space and the value.
//!
//! Evaluation files hold one [`EvaluationRow`] per permutation as `1 + HEURISTICS` native endian
//! `i16` values, with `-1` marking a heuristic that failed.
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};

use crate::{
    error::{Error, Result},
    heuristics::Heuristic,
    perm::{Codec, Permutation},
    word::RecordWidth,
};

/// Number of heuristic results stored per evaluation row.
pub const HEURISTICS: usize = Heuristic::ALL.len();

/// A permutation code together with an associated value, usually its exact distance.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Record {
    /// Code of the permutation.
    pub code: u64,
    /// Associated value.
    pub value: u32,
}

fn finish_writer<W: Write>(writer: BufWriter<W>) -> Result<W> {
    writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))
}

/// Fills `buf` completely, returns `false` if the input ended before the first byte.
fn read_record_bytes(reader: &mut impl Read, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    match filled {
        0 => Ok(false),
        _ if filled == buf.len() => Ok(true),
        _ => Err(Error::MalformedRecord(format!(
            "truncated record, {filled} of {} bytes present",
            buf.len()
        ))),
    }
}

/// Writes records as pairs of fixed-width integers.
pub struct BinaryRecordWriter<W: Write> {
    inner: BufWriter<W>,
    width: RecordWidth,
}

impl<W: Write> BinaryRecordWriter<W> {
    /// Creates a writer for permutations of the given codec.
    pub fn new(inner: W, codec: Codec) -> Self {
        BinaryRecordWriter {
            inner: BufWriter::new(inner),
            width: codec.width(),
        }
    }

    /// Appends a record.
    ///
    /// Fails when the value does not fit the record width.
    pub fn write(&mut self, record: Record) -> Result<()> {
        self.width.write(&mut self.inner, record.code)?;
        self.width.write(&mut self.inner, u64::from(record.value))?;
        Ok(())
    }

    /// Flushes all buffered records and returns the underlying writer.
    pub fn finish(self) -> Result<W> {
        finish_writer(self.inner)
    }
}

/// Iterator over the records of a binary database.
pub struct BinaryRecordReader<R: Read> {
    inner: BufReader<R>,
    width: RecordWidth,
    codec: Codec,
}

impl<R: Read> BinaryRecordReader<R> {
    /// Creates a reader for permutations of the given codec.
    pub fn new(inner: R, codec: Codec) -> Self {
        BinaryRecordReader {
            inner: BufReader::new(inner),
            width: codec.width(),
            codec,
        }
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        let bytes = self.width.bytes();
        let mut buf = [0; 16];
        if !read_record_bytes(&mut self.inner, &mut buf[..2 * bytes])? {
            return Ok(None);
        }
        let code = self.width.read(&buf[..bytes]);
        let value = self.width.read(&buf[bytes..]);

        Permutation::from_codec(code, self.codec)
            .map_err(|err| Error::MalformedRecord(format!("code {code:#x}: {err}")))?;
        let value = u32::try_from(value)
            .map_err(|_| Error::MalformedRecord(format!("value {value} out of range")))?;
        Ok(Some(Record { code, value }))
    }
}

impl<R: Read> Iterator for BinaryRecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// Writes records as lines of text.
pub struct TextRecordWriter<W: Write> {
    inner: BufWriter<W>,
    codec: Codec,
}

impl<W: Write> TextRecordWriter<W> {
    /// Creates a writer for permutations of the given codec.
    pub fn new(inner: W, codec: Codec) -> Self {
        TextRecordWriter {
            inner: BufWriter::new(inner),
            codec,
        }
    }

    /// Appends a record.
    pub fn write(&mut self, record: Record) -> Result<()> {
        let pi = Permutation::from_codec(record.code, self.codec)?;
        writeln!(self.inner, "{pi} {}", record.value)?;
        Ok(())
    }

    /// Flushes all buffered records and returns the underlying writer.
    pub fn finish(self) -> Result<W> {
        finish_writer(self.inner)
    }
}

/// Iterator over the records of a text database.
///
/// Empty lines are skipped.
pub struct TextRecordReader<R: BufRead> {
    lines: io::Lines<R>,
    codec: Codec,
    line_number: usize,
}

impl<R: BufRead> TextRecordReader<R> {
    /// Creates a reader for permutations of the given codec.
    pub fn new(inner: R, codec: Codec) -> Self {
        TextRecordReader {
            lines: inner.lines(),
            codec,
            line_number: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<Record> {
        let malformed = |reason: String| {
            Error::MalformedRecord(format!("line {}: {reason}", self.line_number))
        };

        let mut fields = line.split_ascii_whitespace();
        let (Some(perm), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(malformed("expected a permutation and a value".to_owned()));
        };

        let pi = Permutation::parse(perm, self.codec.is_signed())
            .map_err(|err| malformed(err.to_string()))?;
        if pi.len() != self.codec.len() {
            return Err(malformed(format!(
                "expected {} entries, found {}",
                self.codec.len(),
                pi.len()
            )));
        }
        let value = value
            .parse()
            .map_err(|err| malformed(format!("invalid value {value:?}: {err}")))?;

        Ok(Record {
            code: pi.encode(),
            value,
        })
    }
}

impl<R: BufRead> Iterator for TextRecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(self.parse_line(&line));
        }
    }
}

/// Exact distance of a permutation together with the weights found by every heuristic.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EvaluationRow {
    /// Exact distance.
    pub optimum: u32,
    /// Result of each heuristic, indexed by [`Heuristic::index`], `None` for failures.
    pub results: [Option<u32>; HEURISTICS],
}

impl EvaluationRow {
    /// Result of a single heuristic.
    pub fn result(&self, heuristic: Heuristic) -> Option<u32> {
        self.results[heuristic.index()]
    }
}

const ROW_BYTES: usize = (1 + HEURISTICS) * 2;

fn to_field(value: Option<u32>) -> Result<i16> {
    match value {
        None => Ok(-1),
        Some(value) => i16::try_from(value).map_err(|_| {
            Error::MalformedRecord(format!("value {value} does not fit an evaluation field"))
        }),
    }
}

fn from_field(field: i16) -> Option<u32> {
    u32::try_from(field).ok()
}

/// Writes evaluation rows.
pub struct EvaluationWriter<W: Write> {
    inner: BufWriter<W>,
}

impl<W: Write> EvaluationWriter<W> {
    /// Creates an evaluation writer.
    pub fn new(inner: W) -> Self {
        EvaluationWriter {
            inner: BufWriter::new(inner),
        }
    }

    /// Appends a row.
    pub fn write(&mut self, row: &EvaluationRow) -> Result<()> {
        let mut buf = [0; ROW_BYTES];
        let fields = std::iter::once(Some(row.optimum)).chain(row.results);
        for (chunk, value) in buf.chunks_exact_mut(2).zip(fields) {
            chunk.copy_from_slice(&to_field(value)?.to_ne_bytes());
        }
        self.inner.write_all(&buf)?;
        Ok(())
    }

    /// Flushes all buffered rows and returns the underlying writer.
    pub fn finish(self) -> Result<W> {
        finish_writer(self.inner)
    }
}

/// Iterator over the rows of an evaluation file.
pub struct EvaluationReader<R: Read> {
    inner: BufReader<R>,
}

impl<R: Read> EvaluationReader<R> {
    /// Creates an evaluation reader.
    pub fn new(inner: R) -> Self {
        EvaluationReader {
            inner: BufReader::new(inner),
        }
    }

    fn read_row(&mut self) -> Result<Option<EvaluationRow>> {
        let mut buf = [0; ROW_BYTES];
        if !read_record_bytes(&mut self.inner, &mut buf)? {
            return Ok(None);
        }
        let mut fields = buf
            .chunks_exact(2)
            .map(|chunk| i16::from_ne_bytes([chunk[0], chunk[1]]));

        let optimum = fields.next().and_then(from_field).ok_or_else(|| {
            Error::MalformedRecord("evaluation row without a valid optimum".to_owned())
        })?;
        let mut row = EvaluationRow {
            optimum,
            ..EvaluationRow::default()
        };
        for (result, field) in row.results.iter_mut().zip(fields) {
            *result = from_field(field);
        }
        Ok(Some(row))
    }
}

impl<R: Read> Iterator for EvaluationReader<R> {
    type Item = Result<EvaluationRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_row().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(codec: Codec) -> Vec<Record> {
        ["1,2,3,4", "4,3,2,1", "2,1,4,3"]
            .into_iter()
            .zip([0, 1, 4])
            .map(|(perm, value)| Record {
                code: Permutation::parse(perm, codec.is_signed()).unwrap().encode(),
                value,
            })
            .collect()
    }

    #[test]
    fn binary_database() {
        let codec = Codec::new(4, false).unwrap();
        let mut writer = BinaryRecordWriter::new(vec![], codec);
        for record in records(codec) {
            writer.write(record).unwrap();
        }
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 3 * 2 * 2);
        assert_eq!(&bytes[..2], &0x0123u16.to_ne_bytes());

        let read: Vec<Record> = BinaryRecordReader::new(bytes.as_slice(), codec)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(read, records(codec));

        let truncated = BinaryRecordReader::new(&bytes[..5], codec).collect::<Result<Vec<_>>>();
        assert!(matches!(truncated, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn text_database() {
        let codec = Codec::new(4, true).unwrap();
        let mut writer = TextRecordWriter::new(vec![], codec);
        for record in records(codec) {
            writer.write(record).unwrap();
        }
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(text, "1,2,3,4 0\n4,3,2,1 1\n2,1,4,3 4\n");

        let read: Vec<Record> = TextRecordReader::new(text.as_bytes(), codec)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(read, records(codec));

        let signed = TextRecordReader::new("-2,1,3,4 7\n\n".as_bytes(), codec)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(signed.len(), 1);
        assert_eq!(signed[0].value, 7);

        for bad in ["1,2,3 0", "1,2,3,4", "1,2,3,4 x", "1,1,3,4 0"] {
            let result = TextRecordReader::new(bad.as_bytes(), codec).collect::<Result<Vec<_>>>();
            assert!(matches!(result, Err(Error::MalformedRecord(_))), "{bad}");
        }
    }

    #[test]
    fn evaluation_rows() {
        let rows = [
            EvaluationRow {
                optimum: 3,
                results: [Some(3), Some(4), None, Some(3), Some(5), Some(3), Some(6)],
            },
            EvaluationRow::default(),
        ];
        let mut writer = EvaluationWriter::new(vec![]);
        for row in &rows {
            writer.write(row).unwrap();
        }
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes.len(), 2 * ROW_BYTES);
        assert_eq!(&bytes[6..8], &(-1i16).to_ne_bytes());

        let read: Vec<EvaluationRow> = EvaluationReader::new(bytes.as_slice())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(read, rows);
        assert_eq!(read[0].result(Heuristic::NbLr), None);
    }
}
