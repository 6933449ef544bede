// Author: Dustin Pilgrim
// License: MIT

use crate::schema::LabelNormalizer;

/// Find the line of the innermost key of `path` in the raw document.
///
/// Returns `(0, "<key not found>")` when no line mentions the first key. Each
/// key is searched only inside the object opened by its parent's line, and a
/// key also matches through its label spelling, so `jane_doe.date` finds the
/// `"date"` under `"Jane Doe"`. When a key is missing the deepest parent found
/// is reported.
pub(super) fn find_config_line(path: &str, raw_content: &str) -> (usize, String) {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let lines: Vec<&str> = raw_content.lines().collect();
    let mut range = 0..lines.len();
    let mut found = None;

    for seg in &segments {
        let variants = segment_variants(seg);
        let hit = range
            .clone()
            .find(|&idx| keys_on(lines[idx]).any(|key| variants.iter().any(|v| key_matches(key, v))));
        match hit {
            Some(idx) => {
                found = Some(idx);
                range = idx + 1..scope_end(&lines, idx);
            }
            None => break,
        }
    }

    match found {
        Some(idx) => (idx + 1, lines[idx].trim().to_string()),
        None => (0, "<key not found>".into()),
    }
}

/// Quoted strings on `line` that are followed by `:`, i.e. object keys.
fn keys_on(line: &str) -> impl Iterator<Item = &str> {
    let mut keys = Vec::new();
    let mut open = None;
    let mut escaped = false;

    for (pos, ch) in line.char_indices() {
        match (open, ch) {
            (Some(_), _) if escaped => escaped = false,
            (Some(_), '\\') => escaped = true,
            (Some(start), '"') => {
                if line[pos + 1..].trim_start().starts_with(':') {
                    keys.push(&line[start..pos]);
                }
                open = None;
            }
            (None, '"') => open = Some(pos + 1),
            _ => {}
        }
    }
    keys.into_iter()
}

fn key_matches(key: &str, seg: &str) -> bool {
    key == seg || LabelNormalizer::SnakeCase.apply(key) == seg
}

/// Index one past the last line of the object or array opened on `start`.
fn scope_end(lines: &[&str], start: usize) -> usize {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' | '[' => depth += 1,
                '}' | ']' => depth -= 1,
                _ => {}
            }
        }
        if depth <= 0 {
            return idx + 1;
        }
    }
    lines.len()
}

/// Variants of one path segment in the order they are tried.
pub(super) fn segment_variants(seg: &str) -> Vec<String> {
    let mut out = vec![seg.to_string()];

    let snake = seg.replace('-', "_");
    if snake != seg {
        out.push(snake);
    }

    let kebab = seg.replace('_', "-");
    if kebab != seg && !out.contains(&kebab) {
        out.push(kebab);
    }

    out
}
