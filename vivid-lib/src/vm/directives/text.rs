//! directives that transform or filter the strings of the top frame

use regex::Regex;

use crate::document::Document;
use crate::vm::{arg, Env, Error, Result, Stack};

/// A layout can't hold a bare space as an argument, the trimming removes it. So this is
/// written instead, in the replacement text of `replace`.
pub const SPACE_KEYWORD: &str = "<space>";

fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidRegex {
        pattern: pattern.into(),
        source,
    })
}

/// the first capture group of the first match, empty if there is no match
pub fn exec_extract<D: Document>(
    _: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let re = regex(arg(args, 0)?)?;
    Ok(stack.map_top(|s| {
        re.captures(s)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }))
}

/// Replaces all matches. `$1` and `${name}` in the replacement refer to capture groups.
pub fn exec_replace<D: Document>(
    _: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let re = regex(arg(args, 0)?)?;
    let replacement = args
        .get(1)
        .map_or("", String::as_str)
        .replace(SPACE_KEYWORD, " ");
    Ok(stack.map_top(|s| re.replace_all(s, replacement.as_str()).into_owned()))
}

/// Removes the first occurrence of a literal. Unlike `replace`, only the first one.
pub fn exec_remove<D: Document>(
    _: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let text = arg(args, 0)?;
    Ok(stack.map_top(|s| s.replacen(text, "", 1)))
}

/// each string takes the place of the first placeholder in the template
pub fn exec_insert<D: Document>(
    _: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let placeholder = arg(args, 0)?;
    let template = args.get(1).map_or("", String::as_str);
    Ok(stack.map_top(|s| template.replacen(placeholder, s, 1)))
}

pub fn exec_glue<D: Document>(
    _: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let prefix = arg(args, 0)?;
    Ok(stack.map_top(|s| format!("{}{}", prefix, s)))
}

pub fn exec_keep<D: Document>(
    _: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let re = regex(arg(args, 0)?)?;
    Ok(stack.filter_top(|s| re.is_match(s)))
}

pub fn exec_drop<D: Document>(
    _: &mut Env<'_, D>,
    stack: Stack,
    args: &[String],
) -> Result<Stack> {
    let re = regex(arg(args, 0)?)?;
    Ok(stack.filter_top(|s| !re.is_match(s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::document::StaticDocument;
    use crate::vm::directives::testing::*;

    type Exec = fn(&mut Env<'_, StaticDocument>, Stack, &[String]) -> Result<Stack>;

    fn apply(exec: Exec, input: &[&str], args: &[&str]) -> Result<Vec<String>> {
        let doc = StaticDocument::new();
        let mut ctx = Context::new();
        let mut env = Env::new(&doc, &mut ctx);
        let stack = exec(&mut env, stack_of(input), &strings(args))?;
        assert_eq!(stack.len(), 2);
        Ok(stack.top().to_vec())
    }

    #[test]
    fn test_extract() {
        let res = apply(exec_extract, &["id-12", "id-7x", "none"], &["id-(\\d+)"]).unwrap();
        assert_eq!(res, ["12", "7", ""]);
        let res = apply(exec_extract, &["abc"], &["b"]).unwrap();
        assert_eq!(res, [""]);
    }

    #[test]
    fn test_replace() {
        let res = apply(exec_replace, &["a--b-c", "x"], &["-+", "<space>"]).unwrap();
        assert_eq!(res, ["a b c", "x"]);
        let date = "(\\d+)-(\\d+)-(\\d+)";
        let res = apply(exec_replace, &["2024-01-31"], &[date, "$3.$2.$1"]).unwrap();
        assert_eq!(res, ["31.01.2024"]);
        let res = apply(exec_replace, &["a1b2"], &["\\d"]).unwrap();
        assert_eq!(res, ["ab"]);
    }

    #[test]
    fn test_remove_is_not_global() {
        let res = apply(exec_remove, &["a-b-c", "abc"], &["-"]).unwrap();
        assert_eq!(res, ["ab-c", "abc"]);
    }

    #[test]
    fn test_insert() {
        let res = apply(exec_insert, &["x", "y"], &["{}", "<{}>{}"]).unwrap();
        assert_eq!(res, ["<x>{}", "<y>{}"]);
        let res = apply(exec_insert, &["x"], &["%", "no placeholder"]).unwrap();
        assert_eq!(res, ["no placeholder"]);
    }

    #[test]
    fn test_glue() {
        let res = apply(exec_glue, &["/a", "/b"], &["https://x.org"]).unwrap();
        assert_eq!(res, ["https://x.org/a", "https://x.org/b"]);
    }

    #[test]
    fn test_keep_and_drop_partition() {
        let input = ["#image-1", "#video-2", "#image-3"];
        let kept = apply(exec_keep, &input, &["video"]).unwrap();
        let dropped = apply(exec_drop, &input, &["video"]).unwrap();
        assert_eq!(kept, ["#video-2"]);
        assert_eq!(dropped, ["#image-1", "#image-3"]);

        assert!(kept.iter().all(|k| !dropped.contains(k)));
        let rebuilt: Vec<&str> = input
            .iter()
            .copied()
            .filter(|s| kept.iter().chain(&dropped).any(|k| k == s))
            .collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_invalid_regex() {
        let execs: [Exec; 4] = [exec_extract, exec_replace, exec_keep, exec_drop];
        for exec in execs {
            let err = apply(exec, &["a"], &["[a-"]).unwrap_err();
            assert!(matches!(err, Error::InvalidRegex { pattern, .. } if pattern == "[a-"));
        }
    }

    #[test]
    fn test_missing_argument() {
        let doc = StaticDocument::new();
        let mut ctx = Context::new();
        let mut env = Env::new(&doc, &mut ctx);
        let err = exec_glue(&mut env, Stack::new(), &[]).unwrap_err();
        assert!(matches!(err, Error::MissingArgument(0)));
    }
}
