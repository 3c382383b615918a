//! Line records are what the parser produces for each line that carries a directive

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::Directive;

/// A defect found on a single line. These don't stop the parser, they are attached to the
/// record so tooling can show all of them at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Problem {
    #[display(fmt = "unsupported directive")]
    UnsupportedDirective,
    #[display(fmt = "no arguments or incorrect delimiter")]
    NoArguments,
    /// a field between two tabs was blank. It would encode as a double null, which ends an
    /// instruction in the bytecode
    #[display(fmt = "empty argument")]
    EmptyArgument,
}

/// One non blank, non comment line of a layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// 1 based
    pub line_nr: usize,
    /// the line as it appears in the source
    pub raw: String,
    pub call: String,
    pub args: Vec<String>,
    /// in the order they were detected, empty if the line is fine
    pub problems: Vec<Problem>,
}

impl LineRecord {
    /// creates a record from the tab separated fields of a line and runs the checks on it.
    /// The first field is the call, the rest are the arguments. All of them are trimmed.
    pub fn new(line_nr: usize, raw: &str, fields: impl IntoIterator<Item = String>) -> Self {
        let mut fields = fields.into_iter().map(|f| f.trim().to_string());
        let call = fields.next().unwrap_or_default();
        let args: Vec<String> = fields.collect();

        let mut problems = vec![];
        if Directive::from_token(&call).is_none() {
            problems.push(Problem::UnsupportedDirective);
        }
        if args.is_empty() {
            problems.push(Problem::NoArguments);
        } else if args.iter().any(String::is_empty) {
            problems.push(Problem::EmptyArgument);
        }

        LineRecord {
            line_nr,
            raw: raw.into(),
            call,
            args,
            problems,
        }
    }

    /// the first problem of the line, if there is one
    pub fn problem(&self) -> Option<Problem> {
        self.problems.first().copied()
    }

    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn directive(&self) -> Option<Directive> {
        Directive::from_token(&self.call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> LineRecord {
        LineRecord::new(1, &fields.join("\t"), fields.iter().map(|f| f.to_string()))
    }

    #[test]
    fn test_valid_record() {
        let rec = record(&["replace", " \\s+ ", "<space>"]);
        assert!(rec.is_ok());
        assert_eq!(rec.directive(), Some(Directive::Replace));
        assert_eq!(rec.args, ["\\s+", "<space>"]);
    }

    #[test]
    fn test_both_checks_fire() {
        let rec = record(&["fetch //h1"]);
        assert_eq!(
            rec.problems,
            [Problem::UnsupportedDirective, Problem::NoArguments]
        );
        assert_eq!(rec.problem(), Some(Problem::UnsupportedDirective));
        assert_eq!(
            Problem::NoArguments.to_string(),
            "no arguments or incorrect delimiter"
        );
    }

    #[test]
    fn test_blank_argument() {
        let rec = record(&["insert", "{}", "  "]);
        assert_eq!(rec.problems, [Problem::EmptyArgument]);
    }
}
