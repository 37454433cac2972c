//! Group-scoped sum reduction.
//!
//! A work group combines one value per item into a single value that the
//! group leader stores. [`group_sum`] performs the combination with the
//! same pairwise tree a device kernel walks in shared memory:
//!
//! ```text
//! stride 4:  v0+v4  v1+v5  v2+v6  v3+v7
//! stride 2:  (0)+(2)       (1)+(3)
//! stride 1:  (0)+(1)
//! ```
//!
//! The combination order depends only on the group size, so results are
//! reproducible; integer sums are exact regardless of order.

/// Integer types that can take part in a group sum.
pub trait ReductionScalar: Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Additive identity.
    const ZERO: Self;

    /// Sum of two values.
    fn add(self, other: Self) -> Self;
}

macro_rules! impl_reduction_int {
    ($($t:ty),*) => {
        $(
            impl ReductionScalar for $t {
                const ZERO: Self = 0;

                #[inline]
                fn add(self, other: Self) -> Self {
                    self.wrapping_add(other)
                }
            }
        )*
    };
}

impl_reduction_int!(u32, u64);

/// Sum one group's item values with a pairwise tree.
///
/// Returns zero for an empty group.
pub fn group_sum<T: ReductionScalar>(values: &[T]) -> T {
    if values.is_empty() {
        return T::ZERO;
    }

    let mut scratch = values.to_vec();
    let mut active = scratch.len();
    while active > 1 {
        let half = active.div_ceil(2);
        for i in 0..active / 2 {
            scratch[i] = scratch[i].add(scratch[i + half]);
        }
        active = half;
    }
    scratch[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_matches_fold_for_all_sizes() {
        for len in 0..70u64 {
            let values: Vec<u64> = (0..len).map(|i| i * 7 + 3).collect();
            let expected: u64 = values.iter().sum();
            assert_eq!(group_sum(&values), expected, "len {}", len);
        }
    }

    #[test]
    fn test_empty_group_yields_zero() {
        let empty: [u32; 0] = [];
        assert_eq!(group_sum(&empty), 0);
    }

    #[test]
    fn test_u32_group_sum() {
        let values = [3u32, 1, 4, 1, 5, 9, 2];
        assert_eq!(group_sum(&values), 25);
    }
}
