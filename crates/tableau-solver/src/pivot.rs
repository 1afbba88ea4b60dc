//! Entering/leaving selection and the Gauss-Jordan pivot kernel.
//!
//! These operate on a bare matrix whose last row is the objective row and
//! whose last column is the RHS. They know nothing about which builder
//! produced the matrix.

/// Rule used to pick the entering column and break ratio-test ties
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotRule {
    /// Most negative objective entry, ties to the lowest index
    #[default]
    Dantzig,
    /// Lowest-index negative objective entry, ratio ties to the lowest basic index.
    /// Never cycles.
    Bland,
}

/// Pick the entering column among the first `candidates` columns.
///
/// Returns `None` when no objective-row entry is below `-tolerance`, i.e. the
/// tableau is optimal.
pub fn entering_column(
    data: &[Vec<f64>],
    candidates: usize,
    tolerance: f64,
    rule: PivotRule,
) -> Option<usize> {
    let obj = data.last()?;
    let candidates = candidates.min(obj.len());

    match rule {
        PivotRule::Dantzig => {
            let mut min_val = -tolerance;
            let mut min_col = None;
            for (j, &v) in obj[..candidates].iter().enumerate() {
                if v < min_val {
                    min_val = v;
                    min_col = Some(j);
                }
            }
            min_col
        }
        PivotRule::Bland => obj[..candidates].iter().position(|&v| v < -tolerance),
    }
}

/// Minimum ratio test on column `col`.
///
/// Only rows with an entry above `tolerance` take part. Returns `None` when
/// there is no such row, which means the objective is unbounded along `col`.
/// `basis` is consulted only by [`PivotRule::Bland`].
pub fn leaving_row(
    data: &[Vec<f64>],
    col: usize,
    tolerance: f64,
    rule: PivotRule,
    basis: &[usize],
) -> Option<usize> {
    let n_rows = data.len().checked_sub(1)?;
    let rhs_col = data.first()?.len() - 1;

    let mut min_ratio = f64::INFINITY;
    let mut min_row: Option<usize> = None;

    for (i, row) in data[..n_rows].iter().enumerate() {
        let val = row[col];
        if val <= tolerance {
            continue;
        }
        let ratio = row[rhs_col] / val;
        match (rule, min_row) {
            (_, None) => {
                min_ratio = ratio;
                min_row = Some(i);
            }
            (PivotRule::Dantzig, Some(_)) => {
                if ratio < min_ratio {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
            (PivotRule::Bland, Some(current)) => {
                let tie = (ratio - min_ratio).abs() <= tolerance;
                let lower_basic = basis.get(i) < basis.get(current);
                if (!tie && ratio < min_ratio) || (tie && lower_basic) {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }
    }

    min_row
}

/// Gauss-Jordan elimination around `data[row][col]`.
///
/// The pivot row is divided by the pivot value, then a multiple of it is
/// subtracted from every other row (objective row included) so the pivot
/// column becomes a unit vector.
pub fn pivot(data: &mut [Vec<f64>], row: usize, col: usize) {
    let pivot_val = data[row][col];
    for v in data[row].iter_mut() {
        *v /= pivot_val;
    }
    // exact unit entry, no rounding residue
    data[row][col] = 1.0;

    let pivot_row = data[row].clone();
    for (i, other) in data.iter_mut().enumerate() {
        if i == row {
            continue;
        }
        let factor = other[col];
        if factor == 0.0 {
            continue;
        }
        for (v, p) in other.iter_mut().zip(&pivot_row) {
            *v -= factor * p;
        }
        other[col] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-8;

    fn textbook() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 4.0],
            vec![0.0, 2.0, 0.0, 1.0, 0.0, 0.0, 12.0],
            vec![3.0, 2.0, 0.0, 0.0, 1.0, 0.0, 18.0],
            vec![-3.0, -5.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        ]
    }

    #[test]
    fn test_entering_most_negative() {
        let data = textbook();
        assert_eq!(entering_column(&data, 5, TOL, PivotRule::Dantzig), Some(1));
        assert_eq!(entering_column(&data, 5, TOL, PivotRule::Bland), Some(0));
    }

    #[test]
    fn test_entering_tie_goes_to_lowest_index() {
        let data = vec![vec![1.0, 1.0, 1.0, 0.0, 5.0], vec![-2.0, -2.0, 0.0, 1.0, 0.0]];
        assert_eq!(entering_column(&data, 3, TOL, PivotRule::Dantzig), Some(0));
    }

    #[test]
    fn test_entering_none_when_optimal() {
        let data = vec![vec![1.0, 1.0, 0.0, 5.0], vec![0.0, 2.0, 1.0, 10.0]];
        assert_eq!(entering_column(&data, 2, TOL, PivotRule::Dantzig), None);
    }

    #[test]
    fn test_bookkeeping_column_is_not_a_candidate() {
        let data = vec![vec![1.0, 1.0, 0.0, 5.0], vec![0.0, 0.0, -1.0, 0.0]];
        assert_eq!(entering_column(&data, 2, TOL, PivotRule::Dantzig), None);
    }

    #[test]
    fn test_leaving_minimum_ratio() {
        let data = textbook();
        assert_eq!(leaving_row(&data, 1, TOL, PivotRule::Dantzig, &[2, 3, 4]), Some(1));
        assert_eq!(leaving_row(&data, 0, TOL, PivotRule::Dantzig, &[2, 3, 4]), Some(0));
    }

    #[test]
    fn test_leaving_ratio_tie() {
        let data = vec![
            vec![1.0, 1.0, 0.0, 0.0, 4.0],
            vec![2.0, 0.0, 1.0, 0.0, 8.0],
            vec![-1.0, 0.0, 0.0, 1.0, 0.0],
        ];
        assert_eq!(leaving_row(&data, 0, TOL, PivotRule::Dantzig, &[2, 1]), Some(0));
        assert_eq!(leaving_row(&data, 0, TOL, PivotRule::Bland, &[2, 1]), Some(1));
    }

    #[test]
    fn test_leaving_none_when_unbounded() {
        let data = vec![
            vec![1.0, -1.0, 1.0, 0.0, 1.0],
            vec![-1.0, 0.0, 0.0, 1.0, 0.0],
        ];
        assert_eq!(leaving_row(&data, 1, TOL, PivotRule::Dantzig, &[2]), None);
    }

    #[test]
    fn test_pivot_makes_unit_column() {
        let mut data = textbook();
        pivot(&mut data, 1, 1);
        for (i, row) in data.iter().enumerate() {
            let expected = if i == 1 { 1.0 } else { 0.0 };
            assert!((row[1] - expected).abs() < TOL, "row {} col 1 = {}", i, row[1]);
        }
        assert_eq!(data[1], vec![0.0, 1.0, 0.0, 0.5, 0.0, 0.0, 6.0]);
        assert_eq!(data[3], vec![-3.0, 0.0, 0.0, 2.5, 0.0, 1.0, 30.0]);
    }
}
