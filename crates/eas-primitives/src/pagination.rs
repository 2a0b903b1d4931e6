use crate::{EasError, Result};

/// Positions to read from a list of `len` UIDs for a page request.
///
/// An empty list yields an empty page. Otherwise `start >= len` is an
/// `InvalidOffset`, and a page running past the end is trimmed. With
/// `reverse_order` the list is reversed first and then sliced, so page item `i`
/// maps to position `len - (start + i + 1)`.
pub fn page_positions(len: u64, start: u64, length: u64, reverse_order: bool) -> Result<Vec<u64>> {
    if len == 0 {
        return Ok(Vec::new());
    }
    if start >= len {
        return Err(EasError::InvalidOffset);
    }

    let count = length.min(len - start);
    let positions = (0..count)
        .map(|i| {
            if reverse_order {
                len - (start + i + 1)
            } else {
                start + i
            }
        })
        .collect();
    Ok(positions)
}

/// Apply [`page_positions`] to an in-memory slice.
pub fn paginate<T: Clone>(
    items: &[T],
    start: u64,
    length: u64,
    reverse_order: bool,
) -> Result<Vec<T>> {
    let positions = page_positions(items.len() as u64, start, length, reverse_order)?;
    Ok(positions
        .into_iter()
        .map(|position| items[position as usize].clone())
        .collect())
}
