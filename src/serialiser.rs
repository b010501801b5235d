use crate::caption::{CaptionDocument, CaptionEntry, Metadata};
use crate::error::Result;

use std::io::{BufWriter, Write};

/// Writes `doc` back out as normalised caption text: headers first, then
/// one `[mm:ss.cc]text` line per entry.
pub fn serialise<W: Write>(doc: &CaptionDocument, dst: W) -> Result<()> {
    let mut writer = BufWriter::new(dst);
    write_metadata(&mut writer, &doc.metadata)?;
    for entry in &doc.entries {
        write_entry(&mut writer, entry)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_metadata<W: Write>(buf: &mut W, meta: &Metadata) -> Result<()> {
    let tags = [
        ("ti", &meta.title),
        ("ar", &meta.artist),
        ("al", &meta.album),
        ("by", &meta.author),
        ("length", &meta.length),
    ];
    for (key, value) in tags {
        if let Some(value) = value {
            writeln!(buf, "[{}:{}]", key, value)?;
        }
    }
    if let Some(offset) = meta.offset_ms {
        writeln!(buf, "[offset:{:+}]", offset)?;
    }
    Ok(())
}

fn write_entry<W: Write>(buf: &mut W, entry: &CaptionEntry) -> Result<()> {
    write_ts(buf, entry.timestamp)?;
    writeln!(buf, "{}", entry.text)?;
    Ok(())
}

/// Writes `[mm:ss.cc]`, or `[mm:ss.mmm]` when the timestamp has
/// sub-centisecond precision. Anything finer than a millisecond is rounded.
pub(crate) fn write_ts<W: Write>(buf: &mut W, timestamp: f64) -> Result<()> {
    let millis = (timestamp.max(0.0) * 1000.0).round() as u64;
    let minutes = millis / 60_000;
    let seconds = (millis / 1000) % 60;
    let millis = millis % 1000;
    if millis % 10 == 0 {
        write!(buf, "[{:02}:{:02}.{:02}]", minutes, seconds, millis / 10)?;
    } else {
        write!(buf, "[{:02}:{:02}.{:03}]", minutes, seconds, millis)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, Parser};
    use std::io::Cursor;

    macro_rules! test_write_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let mut buf = Cursor::new(vec![]);

                write_ts(&mut buf, input).expect("Failed to write to buffer");

                assert_eq!(String::from_utf8(buf.into_inner()).unwrap(), expected);
            }
        )*
        }
    }

    test_write_ts! {
        test_write_ts_0: (0.0, "[00:00.00]"),
        test_write_ts_1: (5.0, "[00:05.00]"),
        test_write_ts_2: (62.25, "[01:02.25]"),
        test_write_ts_3: (83.5, "[01:23.50]"),
        test_write_ts_4: (59.999, "[00:59.999]"),
        test_write_ts_5: (7500.0, "[125:00.00]"),
        test_write_ts_6: (-3.0, "[00:00.00]"),
        test_write_ts_7: (5.125, "[00:05.125]"),
        test_write_ts_8: (59.9996, "[01:00.00]"),
    }

    #[test]
    fn writes_sorted_document() {
        let doc = Parser::new().parse_document(
            "[ar:Someone]\n[offset:250]\njunk\n[00:10]  b \n[00:02.5]a\n[00:12]",
        );
        let mut buf = Vec::new();

        serialise(&doc, &mut buf).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "[ar:Someone]\n[offset:+250]\n[00:02.50]a\n[00:10.00]b\n[00:12.00]\n"
        );
    }

    #[test]
    fn offset_survives_round_trip() {
        let parser = Parser::with_options(ParseOptions {
            apply_offset: true,
            ..Default::default()
        });
        let doc = parser.parse_document("[offset:1000]\n[00:05]a");
        let mut buf = Vec::new();

        serialise(&doc, &mut buf).unwrap();
        let written = String::from_utf8(buf).unwrap();
        assert_eq!(written, "[00:04.00]a\n");

        let reparsed = parser.parse(&written);
        assert_eq!(reparsed, doc.entries);
        assert_eq!(reparsed[0].timestamp, 4.0);
    }

    #[test]
    fn millisecond_precision_survives_round_trip() {
        let parser = Parser::new();
        let doc = parser.parse_document("[00:05.125]a\n[01:02.5]b");
        let mut buf = Vec::new();

        serialise(&doc, &mut buf).unwrap();

        assert_eq!(parser.parse(&String::from_utf8(buf).unwrap()), doc.entries);
    }
}
