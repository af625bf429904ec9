//! Top-level comma splitting that respects `[]`/`()` nesting.

/// Split `content` on commas at nesting depth 0.
///
/// Segments are trimmed and empty ones dropped. Unbalanced brackets never
/// fail: whatever follows the imbalance stays in the last segment.
///
/// # Example
///
/// ```
/// use mwp_dsl::split_top_level_entities;
///
/// let parts = split_top_level_entities("a[x: 1, y: 2], sub(b[z: 3], c[w: 4]) ,");
/// assert_eq!(parts, vec!["a[x: 1, y: 2]", "sub(b[z: 3], c[w: 4])"]);
/// ```
pub fn split_top_level_entities(content: &str) -> Vec<&str> {
    split_top_level_spans(content)
        .into_iter()
        .map(|(_, segment)| segment)
        .collect()
}

/// Like [`split_top_level_entities`], also returning each trimmed segment's
/// byte offset within `content`.
pub fn split_top_level_spans(content: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut depth: i32 = 0;
    let mut segment_start = 0;

    for (i, b) in content.bytes().enumerate() {
        match b {
            b'[' | b'(' => depth += 1,
            b']' | b')' => depth -= 1,
            b',' if depth == 0 => {
                push_trimmed(&mut out, content, segment_start, i);
                segment_start = i + 1;
            }
            _ => {}
        }
    }
    push_trimmed(&mut out, content, segment_start, content.len());
    out
}

fn push_trimmed<'a>(out: &mut Vec<(usize, &'a str)>, content: &'a str, start: usize, end: usize) {
    let raw = &content[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    out.push((start + lead, trimmed));
}

/// True when every `[`/`(` in `s` is closed in order.
pub(crate) fn is_balanced(s: &str) -> bool {
    let mut stack = Vec::new();
    for b in s.bytes() {
        match b {
            b'[' | b'(' => stack.push(b),
            b']' => {
                if stack.pop() != Some(b'[') {
                    return false;
                }
            }
            b')' => {
                if stack.pop() != Some(b'(') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}
