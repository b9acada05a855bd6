//! Pattern specificity ordering.
//!
//! Orders two patterns that both matched a given request path so that the
//! more specific one sorts first. Criteria, in order:
//! 1. a pattern equal to the request path beats everything
//! 2. the `/**` catch-all loses to everything
//! 3. fewer wildcards plus variables wins
//! 4. longer pattern wins (a `{var}` counts as one character)
//! 5. fewer `*` wins, then fewer `{` wins

use std::cmp::Ordering;

/// Compares two patterns by specificity against the path being looked up.
/// `Less` means `pattern1` is the better match.
pub fn compare_specificity(pattern1: &str, pattern2: &str, lookup_path: &str) -> Ordering {
    let direct1 = pattern1 == lookup_path;
    let direct2 = pattern2 == lookup_path;
    if direct1 && direct2 {
        return Ordering::Equal;
    }
    if direct1 {
        return Ordering::Less;
    }
    if direct2 {
        return Ordering::Greater;
    }

    if pattern1 == "/**" {
        if pattern2 == "/**" {
            return Ordering::Equal;
        }
        return Ordering::Greater;
    }
    if pattern2 == "/**" {
        return Ordering::Less;
    }

    let wild1 = wildcard_count(pattern1);
    let wild2 = wildcard_count(pattern2);
    let vars1 = var_count(pattern1);
    let vars2 = var_count(pattern2);

    let total1 = wild1 + vars1;
    let total2 = wild2 + vars2;
    if total1 != total2 {
        return total1.cmp(&total2);
    }

    let len1 = pattern_length(pattern1);
    let len2 = pattern_length(pattern2);
    if len1 != len2 {
        return len2.cmp(&len1);
    }

    if wild1 != wild2 {
        return wild1.cmp(&wild2);
    }
    vars1.cmp(&vars2)
}

/// Number of `*` characters. A trailing `.*` produced by implicit suffix
/// matching does not count against the pattern.
fn wildcard_count(pattern: &str) -> usize {
    let pattern = pattern.strip_suffix(".*").unwrap_or(pattern);
    pattern.chars().filter(|c| *c == '*').count()
}

fn var_count(pattern: &str) -> usize {
    pattern.chars().filter(|c| *c == '{').count()
}

/// Pattern length with each `{var}` collapsed to a single character, so
/// variable names do not influence the ordering.
fn pattern_length(pattern: &str) -> usize {
    let mut len = 0;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '{' {
            for c2 in chars.by_ref() {
                if c2 == '}' {
                    break;
                }
            }
        }
        len += 1;
    }
    len
}
