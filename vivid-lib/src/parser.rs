//! Turns layout source into line records.
//!
//! The parser never gives up on a defective line. It attaches the problems to the record and
//! continues, so that tooling can show a whole file with inline annotations. It's the compilers
//! job to reject records with problems.

use pest::Parser;
use pest_derive::Parser;

use crate::core::LineRecord;
use crate::utils;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct LayoutParser;

pub use pest::error::{Error as PestError, ErrorVariant as PestErrVariant};

pub type ParseResult<T> = Result<T, PestError<Rule>>;

pub type Pair<'a> = pest::iterators::Pair<'a, Rule>;
pub type Pairs<'a> = pest::iterators::Pairs<'a, Rule>;

/// Parses a whole layout. The result has one entry per source line, in order, blank lines
/// and comments (`#` after trimming) are None. So the record for line n is at index n - 1.
pub fn parse(src: &str) -> ParseResult<Vec<Option<LineRecord>>> {
    lines(src)?
        .into_iter()
        .enumerate()
        .map(|(i, raw)| parse_line(i + 1, raw))
        .collect()
}

/// splits the source at `\n`, `\r\n` and `\r`
pub fn lines(src: &str) -> ParseResult<Vec<&str>> {
    let file = utils::single_pair(LayoutParser::parse(Rule::file, src)?);
    Ok(file
        .into_inner()
        .filter(|p| p.as_rule() == Rule::line)
        .map(|p| p.as_str())
        .collect())
}

/// parses a single line, without the line break
pub fn parse_line(line_nr: usize, raw: &str) -> ParseResult<Option<LineRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let record = utils::single_pair(LayoutParser::parse(Rule::record, trimmed)?);
    let fields = record
        .into_inner()
        .filter(|p| p.as_rule() == Rule::field)
        .map(|p| p.as_str().to_string());
    Ok(Some(LineRecord::new(line_nr, raw, fields)))
}

/// all records that have at least one problem
pub fn invalid_records<'a>(
    records: &'a [Option<LineRecord>],
) -> impl Iterator<Item = &'a LineRecord> + 'a {
    records.iter().flatten().filter(|r| !r.is_ok())
}
