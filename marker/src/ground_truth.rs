//! # Ground Truth
//!
//! Infers whether a corpus program is expected to contain the defect, from
//! its file name and embedded source markers.
//!
//! The inference is an ordered decision table. Rules are tried top to bottom
//! and the first one that yields a verdict wins; rules 1 and 3 can disagree
//! on the same file, and the order is what settles it.
//!
//! | # | Rule                 | Condition                                           | Expected             |
//! |---|----------------------|-----------------------------------------------------|----------------------|
//! | 1 | `SafeNamed`          | name has the token `safe_`                          | source has `UNSAFE_LOAD` |
//! | 2 | `UnsafeNamed`        | name contains `unsafe`                              | true                 |
//! | 3 | `UnsafeMarker`       | source contains `UNSAFE_LOAD`                       | true                 |
//! | 4 | `SafeMarker`         | source contains `SAFE_LOAD`, not `UNSAFE_LOAD`      | false                |
//! | 5 | `ExtApiNullPtr`      | name contains `extapi`/`eexapi` and `null_ptr`      | true                 |
//! | 6 | `ConservativeDefault`| anything else                                       | true                 |
//!
//! Name checks are case-insensitive; marker checks are case-sensitive.

use std::fmt;

pub const UNSAFE_MARKER: &str = "UNSAFE_LOAD";
pub const SAFE_MARKER: &str = "SAFE_LOAD";

/// Which row of the decision table produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    SafeNamed,
    UnsafeNamed,
    UnsafeMarker,
    SafeMarker,
    ExtApiNullPtr,
    ConservativeDefault,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::SafeNamed => "safe-named",
            Rule::UnsafeNamed => "unsafe-named",
            Rule::UnsafeMarker => "unsafe-marker",
            Rule::SafeMarker => "safe-marker",
            Rule::ExtApiNullPtr => "extapi-null-ptr",
            Rule::ConservativeDefault => "conservative-default",
        };
        f.write_str(name)
    }
}

/// Ground-truth verdict together with the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    pub expected_bug: bool,
    pub rule: Rule,
}

struct Probe<'a> {
    name: String,
    source: &'a str,
}

impl Probe<'_> {
    fn has_unsafe_marker(&self) -> bool {
        self.source.contains(UNSAFE_MARKER)
    }
}

type RuleFn = fn(&Probe<'_>) -> Option<bool>;

fn safe_named(p: &Probe<'_>) -> Option<bool> {
    has_token(&p.name, "safe_").then(|| p.has_unsafe_marker())
}

fn unsafe_named(p: &Probe<'_>) -> Option<bool> {
    p.name.contains("unsafe").then_some(true)
}

fn unsafe_marker(p: &Probe<'_>) -> Option<bool> {
    p.has_unsafe_marker().then_some(true)
}

fn safe_marker(p: &Probe<'_>) -> Option<bool> {
    (p.source.contains(SAFE_MARKER) && !p.has_unsafe_marker()).then_some(false)
}

fn extapi_null_ptr(p: &Probe<'_>) -> Option<bool> {
    let extapi = p.name.contains("extapi") || p.name.contains("eexapi");
    (extapi && p.name.contains("null_ptr")).then_some(true)
}

fn conservative_default(_: &Probe<'_>) -> Option<bool> {
    Some(true)
}

const RULES: [(Rule, RuleFn); 6] = [
    (Rule::SafeNamed, safe_named),
    (Rule::UnsafeNamed, unsafe_named),
    (Rule::UnsafeMarker, unsafe_marker),
    (Rule::SafeMarker, safe_marker),
    (Rule::ExtApiNullPtr, extapi_null_ptr),
    (Rule::ConservativeDefault, conservative_default),
];

/// `needle` occurs in `haystack` without an ASCII alphanumeric character
/// directly in front of it, so `safe_` matches `safe_x.c` and `npd_safe_x.c`
/// but not `unsafe_x.c`.
fn has_token(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(at, _)| {
        haystack[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_ascii_alphanumeric())
    })
}

/// Runs the decision table and reports which rule fired.
pub fn infer_expectation(filename: &str, source: &str) -> Expectation {
    let probe = Probe {
        name: filename.to_lowercase(),
        source,
    };
    RULES
        .iter()
        .find_map(|(rule, decide)| {
            decide(&probe).map(|expected_bug| Expectation {
                expected_bug,
                rule: *rule,
            })
        })
        .unwrap_or(Expectation {
            expected_bug: true,
            rule: Rule::ConservativeDefault,
        })
}

/// Whether the program is expected to contain the defect.
pub fn classify_expectation(filename: &str, source: &str) -> bool {
    infer_expectation(filename, source).expected_bug
}
