//! Path pattern matcher.
//!
//! # Responsibilities
//! - Match request paths against Ant-style patterns
//! - Extract `{var}` template variables from a matched path
//! - Combine a component-level pattern with a method-level pattern
//!
//! # Data Flow
//! ```text
//! pattern ──tokenize──> segments ──match──> bool / captured vars
//!                          │
//!                "**" split: head segs, tail segs, middle scan
//! ```

use std::collections::HashMap;

/// Returns true if the path contains pattern syntax (`*`, `?` or `{var}`).
pub fn is_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('{')
}

/// Matches a full request path against a pattern.
pub fn matches(pattern: &str, path: &str) -> bool {
    let mut caps = Vec::new();
    do_match(pattern, path, &mut caps)
}

/// Matches and returns the captured `{var}` values, or `None` on mismatch.
pub fn extract_vars(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let mut caps = Vec::new();
    if do_match(pattern, path, &mut caps) {
        Some(caps.into_iter().collect())
    } else {
        None
    }
}

/// Combines two patterns into one, method-level appended to component-level.
///
/// An empty side yields the other side unchanged. When the first pattern
/// already matches the second as a path (`/users/**` + `/users/new`), the
/// second wins. A `/*` suffix merges with the second pattern's first segment;
/// a `/**` suffix is kept and the second pattern appended after it.
pub fn combine(pattern1: &str, pattern2: &str) -> String {
    if pattern1.is_empty() && pattern2.is_empty() {
        return String::new();
    }
    if pattern1.is_empty() {
        return pattern2.to_string();
    }
    if pattern2.is_empty() {
        return pattern1.to_string();
    }
    // A template first side keeps its variables instead of collapsing into
    // the second side it happens to match.
    if !pattern1.contains('{') && matches(pattern1, pattern2) {
        return pattern2.to_string();
    }
    if let Some(stem) = pattern1.strip_suffix("/*") {
        return format!("{}/{}", stem, pattern2.trim_start_matches('/'));
    }
    if pattern1.ends_with("/**") {
        return format!("{}/{}", pattern1, pattern2.trim_start_matches('/'));
    }
    if pattern1.ends_with('/') && pattern2.starts_with('/') {
        return format!("{}{}", pattern1, pattern2.trim_start_matches('/'));
    }
    if pattern1.ends_with('/') || pattern2.starts_with('/') {
        return format!("{}{}", pattern1, pattern2);
    }
    format!("{}/{}", pattern1, pattern2)
}

fn tokenize(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Segment-wise match over the whole path, honoring `**` spans.
///
/// Captured variables are pushed onto `caps`; on mismatch the vector may hold
/// partial captures and the caller must discard it.
fn do_match(pattern: &str, path: &str, caps: &mut Vec<(String, String)>) -> bool {
    if pattern.starts_with('/') != path.starts_with('/') {
        return false;
    }
    let patt_dirs = tokenize(pattern);
    let path_dirs = tokenize(path);

    // Exclusive index windows into both segment lists.
    let mut patt_lo = 0usize;
    let mut patt_hi = patt_dirs.len();
    let mut path_lo = 0usize;
    let mut path_hi = path_dirs.len();

    // Leading segments, up to the first `**`.
    while patt_lo < patt_hi && path_lo < path_hi {
        let seg = patt_dirs[patt_lo];
        if seg == "**" {
            break;
        }
        if !match_segment(seg, path_dirs[path_lo], caps) {
            return false;
        }
        patt_lo += 1;
        path_lo += 1;
    }

    if path_lo == path_hi {
        // Path exhausted; the rest of the pattern must be optional.
        if patt_lo == patt_hi {
            return pattern.ends_with('/') == path.ends_with('/');
        }
        if patt_lo + 1 == patt_hi && patt_dirs[patt_lo] == "*" && path.ends_with('/') {
            return true;
        }
        return patt_dirs[patt_lo..patt_hi].iter().all(|seg| *seg == "**");
    }
    if patt_lo == patt_hi {
        // Pattern exhausted but path segments remain.
        return false;
    }

    // Trailing segments, back to the last `**`.
    while patt_lo < patt_hi && path_lo < path_hi {
        let seg = patt_dirs[patt_hi - 1];
        if seg == "**" {
            break;
        }
        if !match_segment(seg, path_dirs[path_hi - 1], caps) {
            return false;
        }
        patt_hi -= 1;
        path_hi -= 1;
    }
    if path_lo == path_hi {
        return patt_dirs[patt_lo..patt_hi].iter().all(|seg| *seg == "**");
    }

    // Middle section: scan the path for each pattern run between `**`s.
    while patt_lo + 1 < patt_hi && path_lo < path_hi {
        let mut next_double = None;
        for i in (patt_lo + 1)..patt_hi {
            if patt_dirs[i] == "**" {
                next_double = Some(i);
                break;
            }
        }
        let Some(next_double) = next_double else {
            break;
        };
        if next_double == patt_lo + 1 {
            // Consecutive `**`s collapse.
            patt_lo += 1;
            continue;
        }
        let run_len = next_double - patt_lo - 1;
        let path_len = path_hi - path_lo;
        let mut found = None;
        if path_len >= run_len {
            'scan: for offset in 0..=(path_len - run_len) {
                let mark = caps.len();
                for j in 0..run_len {
                    let seg = patt_dirs[patt_lo + 1 + j];
                    if !match_segment(seg, path_dirs[path_lo + offset + j], caps) {
                        caps.truncate(mark);
                        continue 'scan;
                    }
                }
                found = Some(path_lo + offset);
                break;
            }
        }
        let Some(found) = found else {
            return false;
        };
        patt_lo = next_double;
        path_lo = found + run_len;
    }
    patt_dirs[patt_lo..patt_hi].iter().all(|seg| *seg == "**")
}

/// One token of a single-segment pattern.
enum SegTok {
    Lit(char),
    AnyChar,
    AnyRun,
    Var(String),
}

fn parse_segment(seg: &str) -> Vec<SegTok> {
    let mut toks = Vec::new();
    let mut chars = seg.chars();
    while let Some(c) = chars.next() {
        match c {
            '?' => toks.push(SegTok::AnyChar),
            '*' => toks.push(SegTok::AnyRun),
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c2 in chars.by_ref() {
                    if c2 == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c2);
                }
                if closed {
                    toks.push(SegTok::Var(name));
                } else {
                    // Unbalanced brace, treat it literally.
                    toks.push(SegTok::Lit('{'));
                    toks.extend(name.chars().map(SegTok::Lit));
                }
            }
            _ => toks.push(SegTok::Lit(c)),
        }
    }
    toks
}

fn match_segment(pattern: &str, value: &str, caps: &mut Vec<(String, String)>) -> bool {
    if !is_pattern(pattern) {
        return pattern == value;
    }
    let toks = parse_segment(pattern);
    let value: Vec<char> = value.chars().collect();
    match_tokens(&toks, &value, caps)
}

/// Recursive matcher over one segment with greedy backtracking for `*` and
/// `{var}`. Captures are rolled back to the mark on each failed attempt.
fn match_tokens(toks: &[SegTok], value: &[char], caps: &mut Vec<(String, String)>) -> bool {
    let Some((head, rest)) = toks.split_first() else {
        return value.is_empty();
    };
    match head {
        SegTok::Lit(c) => value.first() == Some(c) && match_tokens(rest, &value[1..], caps),
        SegTok::AnyChar => !value.is_empty() && match_tokens(rest, &value[1..], caps),
        SegTok::AnyRun => {
            for take in (0..=value.len()).rev() {
                if match_tokens(rest, &value[take..], caps) {
                    return true;
                }
            }
            false
        }
        SegTok::Var(name) => {
            for take in (0..=value.len()).rev() {
                let mark = caps.len();
                caps.push((name.clone(), value[..take].iter().collect()));
                if match_tokens(rest, &value[take..], caps) {
                    return true;
                }
                caps.truncate(mark);
            }
            false
        }
    }
}
