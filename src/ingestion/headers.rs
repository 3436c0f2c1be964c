//! Header naming shared by the CSV and spreadsheet readers.

/// Makes header names unique: later duplicates get `.1`, `.2`, ... appended.
///
/// A generated name that would itself collide with an existing header is skipped in favour of
/// the next suffix.
pub(crate) fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        if !out.contains(name) {
            out.push(name.clone());
            continue;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{name}.{n}");
            let clashes_later = headers[idx + 1..].contains(&candidate);
            if !out.contains(&candidate) && !clashes_later {
                out.push(candidate);
                break;
            }
            n += 1;
        }
    }
    out
}

/// Placeholder name for a blank header cell that no mapping covers.
pub(crate) fn unnamed(position: usize) -> String {
    format!("Unnamed: {position}")
}
