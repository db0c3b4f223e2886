//! JSON export of analysis reports

use crate::IoResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialize `value` as pretty-printed JSON into `writer`.
pub fn write_json<W: Write, T: Serialize + ?Sized>(value: &T, writer: W) -> IoResult<()> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write a report as pretty-printed JSON to `path`, replacing any file there.
pub fn write_report_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, report: &T) -> IoResult<()> {
    let file = File::create(path)?;
    write_json(report, file)
}
