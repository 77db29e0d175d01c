// Speaker name helpers

/// Collapse internal whitespace and trim.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for part in name.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

/// The same name in the other common order.
///
/// `"Last, First"` becomes `"First Last"` and `"First Middle Last"` becomes
/// `"Last, First Middle"`. Single-token names have no alternate form.
pub fn swapped_form(name: &str) -> Option<String> {
    let name = normalize_name(name);
    if let Some((last, first)) = name.split_once(',') {
        let (last, first) = (last.trim(), first.trim());
        if last.is_empty() || first.is_empty() {
            return None;
        }
        return Some(format!("{first} {last}"));
    }
    let (first, last) = name.rsplit_once(' ')?;
    Some(format!("{last}, {first}"))
}

/// Length of the shared string when one name contains the other
/// (case-insensitive), counted in characters.
pub fn containment(a: &str, b: &str) -> Option<usize> {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if a.contains(&b) {
        Some(b.chars().count())
    } else if b.contains(&a) {
        Some(a.chars().count())
    } else {
        None
    }
}

/// Best fuzzy candidate for `name` among `keys`.
///
/// Only `name` is guarded: it must be longer than `min_len` characters.
/// A candidate qualifies when one name contains the other, however short
/// the candidate itself is. The longest shared string
/// wins; ties go to the lexicographically smallest key, so the result does
/// not depend on iteration order.
pub fn best_match<'k, I>(name: &str, keys: I, min_len: usize) -> Option<&'k str>
where
    I: IntoIterator<Item = &'k str>,
{
    if name.chars().count() <= min_len {
        return None;
    }
    let mut best: Option<(usize, &'k str)> = None;
    for key in keys {
        let Some(shared) = containment(name, key) else { continue };
        best = match best {
            Some((len, k)) if len > shared || (len == shared && k <= key) => Some((len, k)),
            _ => Some((shared, key)),
        };
    }
    best.map(|(_, key)| key)
}
