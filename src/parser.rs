use crate::caption::{CaptionDocument, CaptionEntry, Metadata};

use clap::ValueEnum;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{digit1, space0};
use nom::combinator::{map_res, opt, recognize};
use nom::multi::many0;
use nom::sequence::{delimited, pair, separated_pair};
use nom::{branch::alt, IResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do with lines that carry more than one leading time tag,
/// e.g. `[00:12.00][01:40.50]chorus`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MultiTag {
    /// Skip the line entirely.
    #[default]
    Drop,
    /// Strip the first tag only; the rest stays in the text as written.
    Verbatim,
    /// Emit one entry per leading tag.
    Expand,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub multi_tag: MultiTag,
    /// Shift all timestamps by the `[offset:]` header, if present.
    pub apply_offset: bool,
}

/// Lenient parser for timestamped caption text.
///
/// Parsing never fails. Lines that do not start with a time tag are dropped,
/// and the result is stably sorted by timestamp.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse(&self, input: &str) -> Vec<CaptionEntry> {
        self.parse_document(input).entries
    }

    pub fn parse_document(&self, input: &str) -> CaptionDocument {
        let input = match optional_bom(input) {
            Ok((rest, _)) => rest,
            Err(_) => input,
        };

        let mut doc = CaptionDocument::default();
        let mut dropped = 0usize;

        for raw_line in input.split(|c: char| c == '\n' || c == '\r') {
            match caption_line(raw_line) {
                Ok((_, Line::Timed(timed))) => {
                    if !self.push_timed(&mut doc.entries, timed) {
                        dropped += 1;
                    }
                }
                Ok((_, Line::Header { key, value })) => {
                    if !doc.metadata.set(key, value) {
                        debug!(key, "ignoring unknown header tag");
                    }
                }
                Err(_) => {
                    if !raw_line.trim().is_empty() {
                        dropped += 1;
                    }
                }
            }
        }

        if self.options.apply_offset {
            apply_offset(&mut doc.entries, &doc.metadata);
            // Already folded into the timestamps.
            doc.metadata.offset_ms = None;
        }

        // `sort_by` is stable, so equal timestamps keep file order.
        doc.entries.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        debug!(
            entries = doc.entries.len(),
            dropped,
            has_metadata = !doc.metadata.is_empty(),
            "parsed captions"
        );
        doc
    }

    fn push_timed(&self, entries: &mut Vec<CaptionEntry>, timed: Timed<'_>) -> bool {
        if timed.extra.is_empty() {
            entries.push(CaptionEntry::new(timed.first, timed.after_first.trim()));
            return true;
        }
        match self.options.multi_tag {
            MultiTag::Verbatim => {
                entries.push(CaptionEntry::new(timed.first, timed.after_first.trim()));
                true
            }
            MultiTag::Drop => false,
            MultiTag::Expand => {
                let text = timed.after_all.trim();
                entries.push(CaptionEntry::new(timed.first, text));
                entries.extend(
                    timed
                        .extra
                        .into_iter()
                        .map(|timestamp| CaptionEntry::new(timestamp, text)),
                );
                true
            }
        }
    }
}

/// Parses `input` with default options.
pub fn parse_captions(input: &str) -> Vec<CaptionEntry> {
    Parser::new().parse(input)
}

fn apply_offset(entries: &mut [CaptionEntry], metadata: &Metadata) {
    let Some(offset_ms) = metadata.offset_ms else {
        return;
    };
    let shift = offset_ms as f64 / 1000.0;
    for entry in entries.iter_mut() {
        entry.timestamp = (entry.timestamp - shift).max(0.0);
    }
}

struct Timed<'a> {
    first: f64,
    after_first: &'a str,
    extra: Vec<f64>,
    after_all: &'a str,
}

enum Line<'a> {
    Timed(Timed<'a>),
    Header { key: &'a str, value: &'a str },
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

fn caption_line(input: &str) -> IResult<&str, Line<'_>> {
    let (input, _) = space0(input)?;
    alt((timed_line, header_line))(input)
}

fn timed_line(input: &str) -> IResult<&str, Line<'_>> {
    let (after_first, first) = time_tag(input)?;
    let (after_all, extra) = many0(time_tag)(after_first)?;

    Ok((
        "",
        Line::Timed(Timed {
            first,
            after_first,
            extra,
            after_all,
        }),
    ))
}

fn header_line(input: &str) -> IResult<&str, Line<'_>> {
    let (input, (key, value)) = delimited(
        tag("["),
        separated_pair(
            take_while1(|c: char| c.is_ascii_alphabetic()),
            tag(":"),
            take_while(|c: char| c != ']'),
        ),
        tag("]"),
    )(input)?;

    Ok((input, Line::Header { key, value }))
}

/// `[MM:SS]` or `[MM:SS.fraction]`, in seconds.
fn time_tag(input: &str) -> IResult<&str, f64> {
    let seconds = recognize(pair(digit1, opt(pair(tag("."), digit1))));

    let (input, (minutes, seconds)) = delimited(
        tag("["),
        separated_pair(
            map_res(digit1, |s: &str| s.parse::<f64>()),
            tag(":"),
            map_res(seconds, |s: &str| s.parse::<f64>()),
        ),
        tag("]"),
    )(input)?;

    Ok((input, minutes * 60.0 + seconds))
}
