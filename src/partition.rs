//! Splitting an index space across workers, and a worker's range into batches.

use std::ops::Range;

/// Half-open span of indices `[start, end)` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkRange {
    pub start: usize,
    pub end: usize,
}

impl WorkRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Consecutive sub-ranges of `size` indices; the last one may be shorter.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn batches(&self, size: usize) -> Batches {
        assert!(size > 0, "batch size must be non-zero");
        Batches {
            next: self.start,
            end: self.end,
            size,
        }
    }
}

/// Iterator returned by [`WorkRange::batches`].
#[derive(Debug, Clone)]
pub struct Batches {
    next: usize,
    end: usize,
    size: usize,
}

impl Iterator for Batches {
    type Item = WorkRange;

    fn next(&mut self) -> Option<WorkRange> {
        if self.next >= self.end {
            return None;
        }
        let start = self.next;
        let end = start.saturating_add(self.size).min(self.end);
        self.next = end;
        Some(WorkRange::new(start, end))
    }
}

/// Splits `[0, total)` into `workers` contiguous ranges of `total / workers`
/// indices each.
///
/// When `total` is not a multiple of `workers` the trailing
/// `total % workers` indices belong to no range; see [`dropped`].
pub fn partition(total: usize, workers: usize) -> Vec<WorkRange> {
    if workers == 0 {
        return Vec::new();
    }
    let per_worker = total / workers;
    (0..workers)
        .map(|w| WorkRange::new(w * per_worker, (w + 1) * per_worker))
        .collect()
}

/// Number of indices [`partition`] leaves unassigned.
pub fn dropped(total: usize, workers: usize) -> usize {
    if workers == 0 {
        total
    } else {
        total % workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_way_split_of_one_hundred_thousand() {
        assert_eq!(
            partition(100_000, 4),
            vec![
                WorkRange::new(0, 25_000),
                WorkRange::new(25_000, 50_000),
                WorkRange::new(50_000, 75_000),
                WorkRange::new(75_000, 100_000),
            ]
        );
        assert_eq!(dropped(100_000, 4), 0);
    }

    #[test]
    fn ranges_are_contiguous_and_equal() {
        let ranges = partition(1_200_000, 12);
        assert_eq!(ranges.len(), 12);
        assert_eq!(ranges[0].start, 0);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(pair[0].len(), pair[1].len());
        }
        assert_eq!(ranges[11].end, 1_200_000);
    }

    #[test]
    fn uneven_split_drops_the_tail() {
        let ranges = partition(100_000, 12);
        assert!(ranges.iter().all(|r| r.len() == 8_333));
        assert_eq!(ranges.last().unwrap().end, 99_996);
        assert_eq!(dropped(100_000, 12), 4);
    }

    #[test]
    fn zero_workers_yields_nothing() {
        assert!(partition(10, 0).is_empty());
        assert_eq!(dropped(10, 0), 10);
    }

    #[test]
    fn batches_cover_the_range_with_a_short_tail() {
        let range = partition(100_000, 12)[3];
        let batches: Vec<_> = range.batches(80).collect();

        assert_eq!(batches.len(), 105);
        assert!(batches[..104].iter().all(|b| b.len() == 80));
        assert_eq!(batches[104].len(), 8_333 % 80);
        assert_eq!(batches.iter().map(WorkRange::len).sum::<usize>(), range.len());
        assert_eq!(batches[0].start, range.start);
        assert_eq!(batches[104].end, range.end);
    }

    #[test]
    fn empty_range_has_no_batches() {
        assert_eq!(WorkRange::new(5, 5).batches(80).count(), 0);
    }

    #[test]
    #[should_panic(expected = "batch size")]
    fn zero_batch_size_panics() {
        let _ = WorkRange::new(0, 10).batches(0);
    }
}
