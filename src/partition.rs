/// Split `rules` into contiguous chunks of at most `max_size`.
///
/// A `max_size` of `0`, or a slice that already fits, yields a single chunk
/// holding everything (even when `rules` is empty). Otherwise every chunk has
/// exactly `max_size` items except the last, which holds the remainder.
/// Order is preserved and nothing is dropped.
#[must_use]
pub fn partition<T>(rules: &[T], max_size: usize) -> Vec<&[T]> {
    if max_size == 0 || rules.len() <= max_size {
        return vec![rules];
    }
    rules.chunks(max_size).collect()
}
