use crate::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open range of columns `[start, end)` assigned to one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub start: u32,
    pub end: u32,
}

impl Partition {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "partition start must not exceed end");
        Self { start, end }
    }

    /// Number of columns in the partition.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, column: u32) -> bool {
        column >= self.start && column < self.end
    }

    /// Columns in ascending order.
    pub fn columns(&self) -> Range<u32> {
        self.start..self.end
    }
}

/// Split the column range `[0, width / 2)` into `count` contiguous partitions.
///
/// Partitions are ascending by start, pairwise disjoint and cover the range
/// exactly. Sizes differ by at most one column; when there are fewer columns
/// than partitions the trailing partitions are empty.
pub fn partition_columns(width: u32, count: usize) -> Result<Vec<Partition>> {
    if count == 0 {
        return Err(GraphError::InvalidConfiguration(
            "partition count must be at least 1".to_string(),
        ));
    }

    let columns = (width / 2) as usize;
    let base = columns / count;
    let remainder = columns % count;

    let mut partitions = Vec::with_capacity(count);
    let mut start = 0usize;
    for index in 0..count {
        let len = base + usize::from(index < remainder);
        partitions.push(Partition::new(start as u32, (start + len) as u32));
        start += len;
    }

    debug_assert_eq!(start, columns);
    Ok(partitions)
}
