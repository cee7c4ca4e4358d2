//! Display ordering of species.
//!
//! Components keep their natural order, dependent species are listed by
//! decreasing amount and species below the mole floor follow in natural
//! order. The ordering is presentation only; the state is never permuted.

/// Returns a permutation of `0..amounts.len()` with the dependent block
/// `n_components..n_reduced` sorted by decreasing amount.
///
/// Ties may come out in either order.
///
/// # Example
///
/// ```
/// use equilib::sort::mole_order;
///
/// let order = mole_order(&[5.0, 0.1, 0.3, 0.2, 1e-40], 1, 4);
/// assert_eq!(order, vec![0, 2, 3, 1, 4]);
/// ```
pub fn mole_order(amounts: &[f64], n_components: usize, n_reduced: usize) -> Vec<usize> {
    let n = amounts.len();
    let lo = n_components.min(n);
    let hi = n_reduced.clamp(lo, n);

    let mut dependent: Vec<(usize, f64)> = (lo..hi).map(|k| (k, amounts[k])).collect();
    dependent.sort_by(|a, b| b.1.total_cmp(&a.1));

    (0..lo).chain(dependent.into_iter().map(|(k, _)| k)).chain(hi..n).collect()
}
