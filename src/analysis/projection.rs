// 2-D principal component projection of the feature matrix.
//
// One fit over the whole dataset: center every column, find the two
// directions of largest variance, and express each vector by its
// coordinates along them. Eigenvectors come from a cyclic Jacobi
// decomposition of a symmetric matrix:
//
//   - rows >= dims: the d x d covariance matrix, whose eigenvectors are the axes
//   - rows <  dims: the n x n Gram matrix; each eigenvector u maps to the
//     axis X^T u / |X^T u|, which keeps the work proportional to the
//     smaller side
//
// The matrix is divided by its largest absolute entry before centering, so
// neither the differences nor their squares overflow or underflow. The scale
// cancels out of the axes; coordinates and variances are multiplied back.
//
// Axis signs are fixed so that each axis's largest-magnitude component is
// positive. With that convention the projection is a deterministic function
// of the input matrix.

/// Upper bound on Jacobi sweeps; real inputs converge in well under 20.
const MAX_SWEEPS: usize = 64;

/// Eigenvalues at or below this fraction of the trace count as zero variance.
const RELATIVE_EIGEN_FLOOR: f64 = 1e-12;

/// A fitted projection: column means and up to two unit-length axes in
/// decreasing order of variance.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Column means, in units of `scale`.
    mean: Vec<f64>,
    /// Largest absolute entry of the fitted matrix.
    scale: f64,
    axes: Vec<Vec<f64>>,
    variances: Vec<f64>,
}

impl Projection {
    /// Fit the projection to a dense matrix (all rows of equal length).
    ///
    /// Fewer than two directions with non-zero variance (one row, one
    /// column, constant data) is not an error: the missing axes project to
    /// 0.0.
    pub fn fit(matrix: &[Vec<f64>]) -> Self {
        let n = matrix.len();
        let d = matrix.first().map_or(0, Vec::len);
        if n == 0 || d == 0 {
            return Self {
                mean: vec![0.0; d],
                scale: 1.0,
                axes: Vec::new(),
                variances: Vec::new(),
            };
        }

        let scale = matrix
            .iter()
            .flatten()
            .fold(0.0_f64, |m, x| m.max(x.abs()));
        if scale == 0.0 {
            return Self {
                mean: vec![0.0; d],
                scale: 1.0,
                axes: Vec::new(),
                variances: Vec::new(),
            };
        }
        let scaled: Vec<Vec<f64>> = matrix
            .iter()
            .map(|row| row.iter().map(|x| x / scale).collect())
            .collect();

        let mean = column_mean(&scaled, d);
        let centered = center(&scaled, &mean);
        let denom = n.saturating_sub(1).max(1) as f64;

        let (axes, variances) = if d <= n {
            let cov = scatter_cols(&centered, d, denom);
            let (values, vectors) = symmetric_eigen(cov);
            leading_axes(&values, |k| column(&vectors, k))
        } else {
            let gram = scatter_rows(&centered, denom);
            let (values, vectors) = symmetric_eigen(gram);
            leading_axes(&values, |k| {
                // X^T u, renormalized to absorb rounding
                let u = column(&vectors, k);
                let mut axis = vec![0.0_f64; d];
                for (row, &weight) in centered.iter().zip(u.iter()) {
                    for (a, x) in axis.iter_mut().zip(row.iter()) {
                        *a += weight * x;
                    }
                }
                axis
            })
        };

        Self {
            mean,
            scale,
            axes,
            variances: variances.into_iter().map(|v| v * scale * scale).collect(),
        }
    }

    /// Project one vector onto the fitted axes.
    pub fn transform_one(&self, v: &[f64]) -> [f64; 2] {
        let mut out = [0.0_f64; 2];
        for (slot, axis) in out.iter_mut().zip(self.axes.iter()) {
            *slot = v
                .iter()
                .zip(self.mean.iter())
                .zip(axis.iter())
                .map(|((x, m), a)| (x / self.scale - m) * a)
                .sum::<f64>()
                * self.scale;
        }
        out
    }

    /// Project every row of a matrix.
    pub fn transform(&self, matrix: &[Vec<f64>]) -> Vec<[f64; 2]> {
        matrix.iter().map(|v| self.transform_one(v)).collect()
    }

    /// The unit-length principal axes, largest variance first (at most two).
    pub fn axes(&self) -> &[Vec<f64>] {
        &self.axes
    }

    /// Variance captured along each axis, in the same order as `axes()`.
    /// Saturates to infinity for inputs whose variance exceeds `f64::MAX`.
    pub fn explained_variance(&self) -> &[f64] {
        &self.variances
    }
}

/// Fit a projection over `matrix` and return each row's two coordinates.
pub fn project_2d(matrix: &[Vec<f64>]) -> Vec<[f64; 2]> {
    Projection::fit(matrix).transform(matrix)
}

fn column_mean(matrix: &[Vec<f64>], d: usize) -> Vec<f64> {
    let mut mean = vec![0.0_f64; d];
    for row in matrix {
        for (m, x) in mean.iter_mut().zip(row.iter()) {
            *m += x;
        }
    }
    let n = matrix.len() as f64;
    for m in &mut mean {
        *m /= n;
    }
    mean
}

fn center(matrix: &[Vec<f64>], mean: &[f64]) -> Vec<Vec<f64>> {
    matrix
        .iter()
        .map(|row| row.iter().zip(mean.iter()).map(|(x, m)| x - m).collect())
        .collect()
}

/// X^T X / denom (d x d).
fn scatter_cols(centered: &[Vec<f64>], d: usize, denom: f64) -> Vec<Vec<f64>> {
    let mut out = vec![vec![0.0_f64; d]; d];
    for row in centered {
        for i in 0..d {
            let xi = row[i];
            if xi == 0.0 {
                continue;
            }
            for j in i..d {
                out[i][j] += xi * row[j];
            }
        }
    }
    for i in 0..d {
        for j in i..d {
            out[i][j] /= denom;
            out[j][i] = out[i][j];
        }
    }
    out
}

/// X X^T / denom (n x n).
fn scatter_rows(centered: &[Vec<f64>], denom: f64) -> Vec<Vec<f64>> {
    let n = centered.len();
    let mut out = vec![vec![0.0_f64; n]; n];
    for i in 0..n {
        for j in i..n {
            let v: f64 = centered[i]
                .iter()
                .zip(centered[j].iter())
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / denom;
            out[i][j] = v;
            out[j][i] = v;
        }
    }
    out
}

fn column(vectors: &[Vec<f64>], k: usize) -> Vec<f64> {
    vectors.iter().map(|row| row[k]).collect()
}

/// Pick the two largest eigenvalues above the variance floor, build their
/// axes with `axis_for`, normalize and sign-fix them.
fn leading_axes<F>(values: &[f64], axis_for: F) -> (Vec<Vec<f64>>, Vec<f64>)
where
    F: Fn(usize) -> Vec<f64>,
{
    let trace: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let floor = trace * RELATIVE_EIGEN_FLOOR;

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut axes = Vec::with_capacity(2);
    let mut variances = Vec::with_capacity(2);
    for k in order {
        if axes.len() == 2 || values[k] <= floor || values[k] <= 0.0 {
            break;
        }
        let mut axis = axis_for(k);
        let norm = axis.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }
        for a in &mut axis {
            *a /= norm;
        }
        fix_sign(&mut axis);
        axes.push(axis);
        variances.push(values[k]);
    }
    (axes, variances)
}

/// Flip `axis` so its largest-magnitude component (first on ties) is positive.
fn fix_sign(axis: &mut [f64]) {
    let mut pivot = 0.0_f64;
    for &a in axis.iter() {
        if a.abs() > pivot.abs() {
            pivot = a;
        }
    }
    if pivot < 0.0 {
        for a in axis.iter_mut() {
            *a = -*a;
        }
    }
}

/// Cyclic Jacobi eigen-decomposition of a symmetric matrix.
///
/// Returns the eigenvalues and a matrix whose column k is the unit
/// eigenvector for eigenvalue k.
fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v = vec![vec![0.0_f64; n]; n];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    let total: f64 = a.iter().flatten().map(|x| x * x).sum();
    let tolerance = total * f64::EPSILON * f64::EPSILON;

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0_f64;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[p][q] * a[p][q];
            }
        }
        if off <= tolerance {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p][q];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
                for k in 0..n {
                    let (pk, qk) = (a[p][k], a[q][k]);
                    a[p][k] = c * pk - s * qk;
                    a[q][k] = s * pk + c * qk;
                }
                a[p][q] = 0.0;
                a[q][p] = 0.0;

                for row in v.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
            }
        }
    }

    let values = (0..n).map(|i| a[i][i]).collect();
    (values, v)
}
