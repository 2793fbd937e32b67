// src/cli/display.rs

use crate::domain::bookmark::Bookmark;
use chrono::TimeZone;
use std::fmt;
use std::io::{self, Write};

/// Spaces added after the widest cell of every column but the last
const PADDING: usize = 1;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HEADER: [&str; 3] = ["Title", "Content", "Created At"];

/// Print bookmarks as an aligned table, creation times rendered in `tz`.
///
/// Nothing is written for an empty slice, not even the header.
pub fn write_table<W, Tz>(out: &mut W, bookmarks: &[Bookmark], tz: &Tz) -> io::Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if bookmarks.is_empty() {
        return Ok(());
    }

    let rows: Vec<[String; 3]> = bookmarks
        .iter()
        .map(|b| {
            [
                b.title.clone(),
                b.content.clone(),
                b.created_at
                    .with_timezone(tz)
                    .format(TIME_FORMAT)
                    .to_string(),
            ]
        })
        .collect();

    let width = |col: usize| {
        rows.iter()
            .map(|row| row[col].chars().count())
            .chain(std::iter::once(HEADER[col].chars().count()))
            .max()
            .unwrap_or(0)
            + PADDING
    };
    let (title_width, content_width) = (width(0), width(1));

    writeln!(
        out,
        "{:<tw$}{:<cw$}{}",
        HEADER[0],
        HEADER[1],
        HEADER[2],
        tw = title_width,
        cw = content_width
    )?;
    for [title, content, created_at] in &rows {
        writeln!(
            out,
            "{:<tw$}{:<cw$}{}",
            title,
            content,
            created_at,
            tw = title_width,
            cw = content_width
        )?;
    }
    out.flush()
}
