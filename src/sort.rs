//! Sort Engine
//!
//! Orders a kernel-owned buffer from largest to smallest, in place. Equal
//! values are interchangeable, so an unstable sort is sufficient.

/// Sort `values` into non-increasing order.
pub fn sort_descending(values: &mut [i32]) {
    values.sort_unstable_by(|a, b| b.cmp(a));
}

/// Check that every value is `>=` its successor.
pub fn is_descending(values: &[i32]) -> bool {
    values.windows(2).all(|pair| pair[0] >= pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_mixed_signs_and_duplicates() {
        let mut values = [3, -1, 5, 5, 0];
        sort_descending(&mut values);
        assert_eq!(values, [5, 5, 3, 0, -1]);
    }

    #[test]
    fn test_extremes() {
        let mut values = [0, i32::MIN, i32::MAX, -1, 1];
        sort_descending(&mut values);
        assert_eq!(values, [i32::MAX, 1, 0, -1, i32::MIN]);
    }

    #[test]
    fn test_already_descending_unchanged() {
        let mut values = [9, 9, 4, 0, -3];
        sort_descending(&mut values);
        assert_eq!(values, [9, 9, 4, 0, -3]);
    }

    #[test]
    fn test_permutation_of_input() {
        let mut seed: u32 = 42;
        let input: Vec<i32> = (0..257)
            .map(|_| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (seed >> 8) as i32 - (1 << 22)
            })
            .collect();

        let mut values = input.clone();
        sort_descending(&mut values);
        assert!(is_descending(&values));

        let mut expected = input;
        expected.sort();
        values.reverse();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_is_descending() {
        assert!(is_descending(&[]));
        assert!(is_descending(&[1]));
        assert!(is_descending(&[2, 2, 1]));
        assert!(!is_descending(&[1, 2]));
    }
}
