//! Utility functions and helpers

pub mod formats;

/// Computes an exclusive prefix sum (scan) for a vector
///
/// The result has one more element than the input; its last element is the
/// total.
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0);

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}
