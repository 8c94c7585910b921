//! Bug injection: the Saboteur's canned source rewrites.
//!
//! Each [`BugPattern`] is a handful of regex rewrites over the program text. They are textual on purpose:
//! the result is what a player would type, comments and strings included.

use std::fmt;
use std::str::FromStr;

use regex::{Captures, Regex};

use crate::challenges::Difficulty;

/// One canned bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum BugPattern {
    #[value(name = "off-by-one")]
    OffByOne,
    #[value(name = "null-check")]
    NullCheck,
    #[value(name = "type-coercion")]
    TypeCoercion,
    #[value(name = "array-bounds")]
    ArrayBounds,
    #[value(name = "logical-operator")]
    LogicalOperator,
    #[value(name = "return-value")]
    ReturnValue,
}

impl BugPattern {
    pub const ALL: &'static [BugPattern] = &[
        BugPattern::OffByOne,
        BugPattern::NullCheck,
        BugPattern::TypeCoercion,
        BugPattern::ArrayBounds,
        BugPattern::LogicalOperator,
        BugPattern::ReturnValue,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BugPattern::OffByOne => "off-by-one",
            BugPattern::NullCheck => "null-check",
            BugPattern::TypeCoercion => "type-coercion",
            BugPattern::ArrayBounds => "array-bounds",
            BugPattern::LogicalOperator => "logical-operator",
            BugPattern::ReturnValue => "return-value",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BugPattern::OffByOne => "Off-by-One Error",
            BugPattern::NullCheck => "Missing Null Check",
            BugPattern::TypeCoercion => "Type Coercion Issue",
            BugPattern::ArrayBounds => "Array Bounds Error",
            BugPattern::LogicalOperator => "Logical Operator Mix-up",
            BugPattern::ReturnValue => "Incorrect Return Value",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BugPattern::OffByOne => "Change < to <= in loops and conditions",
            BugPattern::NullCheck => "Remove null/undefined guards",
            BugPattern::TypeCoercion => "Change === to == for subtle type comparison issues",
            BugPattern::ArrayBounds => "Shift array indices and length bounds",
            BugPattern::LogicalOperator => "Swap && and ||",
            BugPattern::ReturnValue => "Swap returned true and false",
        }
    }

    /// How hard the injected bug is to catch.
    pub fn difficulty(self) -> Difficulty {
        match self {
            BugPattern::OffByOne | BugPattern::LogicalOperator => Difficulty::Easy,
            BugPattern::NullCheck | BugPattern::ArrayBounds => Difficulty::Medium,
            BugPattern::TypeCoercion | BugPattern::ReturnValue => Difficulty::Hard,
        }
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            BugPattern::OffByOne => &[
                Rule::Template(r"for\s*\(([^;]*);\s*(\w+)\s*<\s*([^;=]+);", "for ($1; $2 <= $3;"),
                Rule::Template(r"if\s*\(([^)<]*?)\s*<\s*([^)=]+)\)", "if ($1 <= $2)"),
                Rule::Template(r"while\s*\(([^)<]*?)\s*<\s*([^)=]+)\)", "while ($1 <= $2)"),
            ],
            BugPattern::NullCheck => &[
                Rule::Template(r"if\s*\([^)]*[!=]==?\s*(?:null|undefined)[^)]*\)\s*\{[^}]*\}", ""),
                Rule::Template(r"&&\s*\w+\s*!==?\s*null", ""),
            ],
            BugPattern::TypeCoercion => &[Rule::Swap(r"===|!==", &[("===", "=="), ("!==", "!=")])],
            BugPattern::ArrayBounds => &[
                Rule::Template(r"\[0\]", "[1]"),
                Rule::Template(r"\.length\s*-\s*1\b", ".length"),
                Rule::Template(r"\[i\]", "[i + 1]"),
            ],
            BugPattern::LogicalOperator => &[Rule::Swap(r"&&|\|\|", &[("&&", "||"), ("||", "&&")])],
            // Boolean literals only; `return value` keeps its type.
            BugPattern::ReturnValue => &[Rule::Swap(
                r"return\s+(?:true|false)\b",
                &[("true", "false"), ("false", "true")],
            )],
        }
    }
}

impl fmt::Display for BugPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BugPattern {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BugPattern::ALL
            .iter()
            .copied()
            .find(|p| p.id() == s)
            .ok_or_else(|| MutationError::UnknownPattern(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error("unknown bug pattern '{0}'")]
    UnknownPattern(String),
    #[error("invalid rewrite rule: {0}")]
    Rule(#[from] regex::Error),
}

/// The rewritten program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub pattern: BugPattern,
    pub source: String,
    /// At least one rule matched.
    pub changed: bool,
}

enum Rule {
    /// Replace every match with a `$n` template.
    Template(&'static str, &'static str),
    /// Replace every match in one pass, rewriting the first listed fragment found in it.
    Swap(&'static str, &'static [(&'static str, &'static str)]),
}

/// Apply `pattern` to `source`.
pub fn inject(source: &str, pattern: BugPattern) -> Result<Mutation, MutationError> {
    let mut text = source.to_string();
    for rule in pattern.rules() {
        text = match rule {
            Rule::Template(re, template) => {
                let re = Regex::new(re)?;
                re.replace_all(&text, |caps: &Captures| expand(template, caps)).into_owned()
            }
            Rule::Swap(re, pairs) => {
                let re = Regex::new(re)?;
                re.replace_all(&text, |caps: &Captures| swap(&caps[0], pairs)).into_owned()
            }
        };
    }
    let changed = text != source;
    tracing::debug!(pattern = pattern.id(), changed, "bug injected");
    Ok(Mutation {
        pattern,
        source: text,
        changed,
    })
}

fn swap(matched: &str, pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .find(|(from, _)| matched.contains(from))
        .map_or_else(|| matched.to_string(), |(from, to)| matched.replacen(from, to, 1))
}

/// Expand `$n`, `$&` and `$$` the way JavaScript replacement strings do: a `$n` naming a group the
/// regex does not have stays literal.
fn expand(template: &str, caps: &Captures) -> String {
    let mut out = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push('$');
            }
            Some('&') => {
                chars.next();
                out.push_str(&caps[0]);
            }
            Some(d) if d.is_ascii_digit() => {
                chars.next();
                let group = d.to_digit(10).unwrap_or_default() as usize;
                if group > 0 && group < caps.len() {
                    out.push_str(caps.get(group).map_or("", |m| m.as_str()));
                } else {
                    out.push('$');
                    out.push(d);
                }
            }
            _ => out.push('$'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(source: &str, pattern: BugPattern) -> String {
        inject(source, pattern).unwrap().source
    }

    #[test]
    fn test_every_rule_compiles() {
        for pattern in BugPattern::ALL {
            inject("", *pattern).unwrap();
        }
    }

    #[test]
    fn test_off_by_one() {
        assert_eq!(
            apply("for (let i = 0; i < arr.length; i++) {}", BugPattern::OffByOne),
            "for (let i = 0; i <= arr.length; i++) {}"
        );
        assert_eq!(apply("if (a < b) {}", BugPattern::OffByOne), "if (a <= b) {}");
        assert_eq!(apply("while (lo < hi) {}", BugPattern::OffByOne), "while (lo <= hi) {}");
        assert_eq!(apply("if (a <= b) {}", BugPattern::OffByOne), "if (a <= b) {}");
    }

    #[test]
    fn test_null_check_removes_guards() {
        let source = "function f(x) {\n  if (x === null) { return 0; }\n  return x.v;\n}";
        assert_eq!(apply(source, BugPattern::NullCheck), "function f(x) {\n  \n  return x.v;\n}");
        assert_eq!(apply("ok(a && b != null)", BugPattern::NullCheck), "ok(a )");
    }

    #[test]
    fn test_type_coercion() {
        assert_eq!(apply("a === b && c !== d", BugPattern::TypeCoercion), "a == b && c != d");
    }

    #[test]
    fn test_array_bounds() {
        assert_eq!(
            apply("arr[0] + arr[arr.length - 1] + arr[i]", BugPattern::ArrayBounds),
            "arr[1] + arr[arr.length] + arr[i + 1]"
        );
    }

    #[test]
    fn test_logical_operators_swap_in_one_pass() {
        assert_eq!(apply("a && b || c", BugPattern::LogicalOperator), "a || b && c");
    }

    #[test]
    fn test_return_values_swap_in_one_pass() {
        let source = "if (x) return true;\nreturn false;\nreturn value;";
        assert_eq!(apply(source, BugPattern::ReturnValue), "if (x) return false;\nreturn true;\nreturn value;");
    }

    #[test]
    fn test_unchanged_source_is_reported() {
        let mutation = inject("const x = 1;", BugPattern::LogicalOperator).unwrap();
        assert!(!mutation.changed);
        assert_eq!(mutation.source, "const x = 1;");
    }

    #[test]
    fn test_missing_groups_stay_literal() {
        let re = Regex::new(r"(a)").unwrap();
        let caps = re.captures("a").unwrap();
        assert_eq!(expand("$1-$2-$$-$&", &caps), "a-$2-$-a");
    }

    #[test]
    fn test_parse_by_id() {
        assert_eq!("array-bounds".parse::<BugPattern>().unwrap(), BugPattern::ArrayBounds);
        assert!("nope".parse::<BugPattern>().is_err());
    }
}
