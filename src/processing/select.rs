//! Category selection by 1-based index.

use crate::error::{RegistryError, RegistryResult};

/// Parse operator input such as `"1, 3,,4"` into indices.
///
/// Tokens are comma-separated and trimmed; empty tokens are ignored. Any other token that is not
/// an integer fails the whole parse.
pub fn parse_indices(input: &str) -> RegistryResult<Vec<i64>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<i64>().map_err(|_| RegistryError::SelectionParse {
                token: t.to_owned(),
            })
        })
        .collect()
}

/// Resolve 1-based `indices` into names from `categorical`, in the order given.
///
/// Duplicate indices yield duplicate names.
///
/// # Errors
///
/// [`RegistryError::Selection`] listing every index outside `1..=categorical.len()`, in input
/// order. No partial result is produced.
pub fn select(indices: &[i64], categorical: &[String]) -> RegistryResult<Vec<String>> {
    let available = categorical.len();
    let in_range = |idx: i64| idx >= 1 && usize::try_from(idx).is_ok_and(|i| i <= available);

    let invalid: Vec<i64> = indices.iter().copied().filter(|&i| !in_range(i)).collect();
    if !invalid.is_empty() {
        return Err(RegistryError::Selection { invalid, available });
    }

    Ok(indices
        .iter()
        .map(|&i| categorical[(i - 1) as usize].clone())
        .collect())
}

/// Display lines `"{n}. {name}"` for the categorical columns, numbered from 1.
pub fn enumerate(categorical: &[String]) -> Vec<String> {
    categorical
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {name}", i + 1))
        .collect()
}
