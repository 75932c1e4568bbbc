use std::iter::Fuse;

use crate::{Error, Result};

/// Lazy iterator over consecutive, non-overlapping groups of a source iterator.
/// Every group holds `size` items except possibly the last one.
#[derive(Debug, Clone)]
pub struct Batches<I: Iterator> {
    iter: Fuse<I>,
    size: usize,
}

/// Splits `source` into batches of `size` items.
///
/// Only `size` items are pulled from the source per batch, so unbounded sources work too.
/// ```
/// let batches: Vec<Vec<char>> = jokescrap::batch::batches("ABCDE".chars(), 3)?.collect();
/// assert_eq!(batches, vec![vec!['A', 'B', 'C'], vec!['D', 'E']]);
/// # Ok::<(), jokescrap::Error>(())
/// ```
pub fn batches<I>(source: I, size: usize) -> Result<Batches<I::IntoIter>>
where
    I: IntoIterator,
{
    if size == 0 {
        return Err(Error::InvalidBatchSize(size));
    }
    Ok(Batches {
        iter: source.into_iter().fuse(),
        size,
    })
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<_> = self.iter.by_ref().take(self.size).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_cover_source_in_order() {
        let source: Vec<u32> = (1..=23).collect();
        for size in 1..=25 {
            let groups: Vec<Vec<u32>> = batches(source.clone(), size).unwrap().collect();

            let (last, full) = groups.split_last().unwrap();
            assert!(full.iter().all(|g| g.len() == size));
            assert!(!last.is_empty() && last.len() <= size);
            assert_eq!(groups.concat(), source);
        }
    }

    #[test]
    fn empty_source_yields_nothing() {
        let mut groups = batches(Vec::<u32>::new(), 4).unwrap();
        assert!(groups.next().is_none());
    }

    #[test]
    fn unbounded_source_is_pulled_lazily() {
        let mut groups = batches(1u64.., 100).unwrap();
        assert_eq!(groups.next().unwrap(), (1..=100).collect::<Vec<_>>());
        assert_eq!(groups.next().unwrap()[0], 101);
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = batches([1, 2, 3], 0).unwrap_err();
        assert!(matches!(err, Error::InvalidBatchSize(0)));
    }
}
