//! JSON page output

use crate::dashboard::Page;
use std::io::{self, Write};

/// Pretty-printed page model: sections, selectors and chart data, no SVG.
pub fn write<W: Write>(writer: &mut W, page: &Page) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, page)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    writeln!(writer)
}
