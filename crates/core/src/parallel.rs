//! Parallel batch utilities.

use anyhow::{Result, bail};
use log::warn;
use rayon::prelude::*;

/// Result of a parallel batch operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn ok_or_bail(&self, operation: &str) -> Result<()> {
        if self.failed > 0 {
            bail!("{operation} failed: {} succeeded, {} failed", self.succeeded, self.failed);
        }
        Ok(())
    }
}

/// Process items in parallel with consistent error reporting.
pub fn process_parallel_iter<T, R, F>(label: &str, items: impl IntoIterator<Item = T>, op: F) -> BatchResult
where
    T: Send,
    R: Send,
    F: Fn(T) -> Result<R> + Sync,
{
    let items: Vec<T> = items.into_iter().collect();
    let results: Vec<_> = items.into_par_iter().map(&op).collect();

    let mut result = BatchResult::default();
    for r in &results {
        if let Err(e) = r {
            warn!("{label}: {e:#}");
            eprintln!("{e:?}");
            result.failed += 1;
        } else {
            result.succeeded += 1;
        }
    }

    println!("  {label}: {} succeeded, {} failed", result.succeeded, result.failed);
    result
}

/// Map items in parallel, keeping every result in input order.
pub fn collect_parallel<T, R, E, F>(items: &[T], op: F) -> Vec<std::result::Result<R, E>>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> std::result::Result<R, E> + Sync + Send,
{
    items.par_iter().map(op).collect()
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_batch_result() {
        let result = BatchResult { succeeded: 3, failed: 0 };
        assert_eq!(result.total(), 3);
        assert!(result.all_succeeded());
        assert!(result.ok_or_bail("export").is_ok());

        let result = BatchResult { succeeded: 2, failed: 1 };
        let err = result.ok_or_bail("export").unwrap_err();
        assert_eq!(err.to_string(), "export failed: 2 succeeded, 1 failed");
    }

    #[test]
    fn test_process_parallel_iter_counts() {
        let result = process_parallel_iter("square", 0..10, |n: i32| {
            if n % 5 == 4 { Err(anyhow!("{n} rejected")) } else { Ok(n * n) }
        });
        assert_eq!(result, BatchResult { succeeded: 8, failed: 2 });
    }

    #[test]
    fn test_collect_parallel_preserves_order() {
        let items: Vec<u32> = (0..100).collect();
        let results = collect_parallel(&items, |&n| if n == 50 { Err(n) } else { Ok(n + 1) });
        assert_eq!(results[0], Ok(1));
        assert_eq!(results[50], Err(50));
        assert_eq!(results[99], Ok(100));
    }
}
