//! # Jolt Template Placeholders
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Command arguments and config values may contain placeholders of the form
//! `{type:name}`, e.g. `{conf:imageName}`, `{tf:cluster_arn}`, `{git:sha}`.
//! This module is the purely textual half of interpolation:
//!
//! 1. `find_placeholders` scans a string and returns every recognised
//!    placeholder with its byte range, in order.
//! 2. The resolver looks all of them up concurrently (see
//!    `ConfigResolver::parse_arg`).
//! 3. `splice` rebuilds the string by walking the placeholders in order and
//!    substituting each resolved value, or the original text when a lookup
//!    produced nothing.
//!
//! Because splicing walks the match list and not the completion order, two
//! lookups finishing in a different order can never swap places in the output.
//!
//! ## Placeholder types
//!
//! | type | resolved by |
//! |------|-------------|
//! | `arg`, `param` | caller supplied parameters |
//! | `cmd` | `ConfigResolver::command` |
//! | `db` | database container info sub-keys |
//! | `tf`, `tofu`, `terraform` | `ConfigResolver::tf_var` |
//! | `conf`, `config` | `ConfigResolver::get` |
//! | `git` | HEAD commit hash |
//!
//! Type names match case-insensitively. Unknown types are not returned by
//! `find_placeholders` and therefore stay in the text verbatim.
//!
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z0-9_-]+):([A-Za-z0-9_-]+)\}").expect("placeholder pattern is valid")
});

/// The lookup backend a placeholder is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Arg,
    Cmd,
    Db,
    Tf,
    Conf,
    Git,
}

impl PlaceholderKind {
    /// Parses a placeholder type, case-insensitively.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.to_ascii_lowercase().as_str() {
            "arg" | "param" => Some(Self::Arg),
            "cmd" => Some(Self::Cmd),
            "db" => Some(Self::Db),
            "tf" | "tofu" | "terraform" => Some(Self::Tf),
            "conf" | "config" => Some(Self::Conf),
            "git" => Some(Self::Git),
            _ => None,
        }
    }
}

/// A placeholder occurrence inside a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub name: String,
    /// Byte range of the full `{type:name}` text.
    pub range: Range<usize>,
}

/// Returns every recognised placeholder in `text`, left to right, non-overlapping.
pub fn find_placeholders(text: &str) -> Vec<Placeholder> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let kind = PlaceholderKind::parse(caps.get(1)?.as_str())?;
            let name = caps.get(2)?.as_str().to_string();
            Some(Placeholder {
                kind,
                name,
                range: full.range(),
            })
        })
        .collect()
}

/// Rebuilds `text`, replacing `placeholders[i]` with `resolved[i]` when it is `Some`.
///
/// `placeholders` must come from `find_placeholders(text)`; `resolved` is
/// positionally aligned with it.
pub fn splice(text: &str, placeholders: &[Placeholder], resolved: &[Option<String>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (placeholder, value) in placeholders.iter().zip(resolved) {
        let Range { start, end } = placeholder.range.clone();
        out.push_str(&text[cursor..start]);
        match value {
            Some(v) => out.push_str(v),
            None => out.push_str(&text[start..end]),
        }
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_placeholders_in_order() {
        let text = "{tf:slow} then {CONF:fast} and {git:sha}";
        let found = find_placeholders(text);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].kind, PlaceholderKind::Tf);
        assert_eq!(found[0].name, "slow");
        assert_eq!(&text[found[0].range.clone()], "{tf:slow}");
        assert_eq!(found[1].kind, PlaceholderKind::Conf);
        assert_eq!(found[1].name, "fast");
        assert_eq!(found[2].kind, PlaceholderKind::Git);
    }

    #[test]
    fn test_unknown_types_and_bad_names_are_skipped() {
        assert!(find_placeholders("{env:HOME}").is_empty());
        assert!(find_placeholders("{conf:has space}").is_empty());
        assert!(find_placeholders("{conf:}").is_empty());
        assert!(find_placeholders("plain text").is_empty());
        let found = find_placeholders("{nope:x}{cmd:docker}");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PlaceholderKind::Cmd);
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(PlaceholderKind::parse("param"), Some(PlaceholderKind::Arg));
        assert_eq!(PlaceholderKind::parse("Tofu"), Some(PlaceholderKind::Tf));
        assert_eq!(PlaceholderKind::parse("terraform"), Some(PlaceholderKind::Tf));
        assert_eq!(PlaceholderKind::parse("config"), Some(PlaceholderKind::Conf));
        assert_eq!(PlaceholderKind::parse("shell"), None);
    }

    #[test]
    fn test_splice_keeps_unresolved_text() {
        let text = "a {conf:x} b {conf:y} c";
        let found = find_placeholders(text);
        let out = splice(text, &found, &[Some("1".into()), None]);
        assert_eq!(out, "a 1 b {conf:y} c");
    }

    #[test]
    fn test_splice_without_placeholders() {
        assert_eq!(splice("unchanged", &[], &[]), "unchanged");
    }
}
