/// Splits `items` into ordered chunks of at most `size` elements. The last
/// chunk may be shorter; concatenating the chunks reproduces the input.
///
/// Panics on a zero chunk size. No caller passes one.
pub fn chunked<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    assert!(size > 0, "chunk size must be positive");

    items.chunks(size).map(|chunk| chunk.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenation_reproduces_input() {
        let items: Vec<u32> = (0..23).collect();
        let chunks = chunked(&items, 5);

        let rejoined: Vec<u32> = chunks.iter().flatten().copied().collect();
        assert_eq!(rejoined, items);
    }

    #[test]
    fn all_chunks_full_except_possibly_last() {
        let items: Vec<u32> = (0..23).collect();
        let chunks = chunked(&items, 5);

        assert_eq!(chunks.len(), 5);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.len(), 5);
        }
        assert_eq!(chunks.last().unwrap().len(), 3);
    }

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let chunks = chunked(&[1, 2, 3, 4], 2);
        assert_eq!(chunks, vec![vec![1, 2], vec![3, 4]]);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunks = chunked::<u32>(&[], 10);
        assert!(chunks.is_empty());
    }

    #[test]
    #[should_panic(expected = "chunk size must be positive")]
    fn zero_size_is_rejected() {
        chunked(&[1], 0);
    }
}
