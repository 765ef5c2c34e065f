//! Per-core CPU usage model
//!
//! Operating systems report process CPU time as a single percentage that
//! can exceed 100 on multi-core machines. To speak something per core, the
//! total is laid over the logical cores in order: full cores first, then
//! whatever remains on the next one.

/// Upper bound for a single core
const CORE_MAX: f32 = 100.0;

/// Spread a process-wide CPU percentage over `cores` logical cores
///
/// Always returns exactly `cores` entries (at least one).
pub fn distribute(total_percent: f32, cores: usize) -> Vec<f32> {
    let cores = cores.max(1);
    let mut usage = vec![0.0; cores];
    let mut remaining = if total_percent.is_finite() {
        total_percent.max(0.0)
    } else {
        0.0
    };

    for slot in usage.iter_mut() {
        if remaining <= 0.0 {
            break;
        }
        let share = remaining.min(CORE_MAX);
        *slot = share;
        remaining -= share;
    }

    usage
}

/// Add one process's per-core usage into an accumulated total
///
/// Entries are clamped to 100%. `acc` grows if `per_core` is longer.
pub fn accumulate(acc: &mut Vec<f32>, per_core: &[f32]) {
    if acc.len() < per_core.len() {
        acc.resize(per_core.len(), 0.0);
    }
    for (slot, usage) in acc.iter_mut().zip(per_core) {
        *slot = (*slot + usage).min(CORE_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_idle() {
        assert_eq!(distribute(0.0, 4), vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_distribute_partial_core() {
        assert_eq!(distribute(42.0, 4), vec![42.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_distribute_multiple_cores() {
        assert_eq!(distribute(250.0, 4), vec![100.0, 100.0, 50.0, 0.0]);
    }

    #[test]
    fn test_distribute_saturates() {
        // More usage than cores available is capped at all cores full
        assert_eq!(distribute(900.0, 2), vec![100.0, 100.0]);
    }

    #[test]
    fn test_distribute_zero_cores_treated_as_one() {
        assert_eq!(distribute(30.0, 0), vec![30.0]);
    }

    #[test]
    fn test_distribute_rejects_garbage() {
        assert_eq!(distribute(-5.0, 2), vec![0.0, 0.0]);
        assert_eq!(distribute(f32::NAN, 2), vec![0.0, 0.0]);
    }

    #[test]
    fn test_accumulate_into_empty() {
        let mut acc = Vec::new();
        accumulate(&mut acc, &[10.0, 20.0]);
        assert_eq!(acc, vec![10.0, 20.0]);
    }

    #[test]
    fn test_accumulate_clamps() {
        let mut acc = vec![80.0, 10.0];
        accumulate(&mut acc, &[50.0, 5.0]);
        assert_eq!(acc, vec![100.0, 15.0]);
    }

    #[test]
    fn test_accumulate_grows() {
        let mut acc = vec![10.0];
        accumulate(&mut acc, &[5.0, 7.0, 1.0]);
        assert_eq!(acc, vec![15.0, 7.0, 1.0]);
    }
}
