//! Eigen-decomposition of 3×3 symmetric matrices (classical Jacobi).

const MAX_ROTATIONS: usize = 64;
const REL_TOLERANCE: f64 = 1e-14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricEigen {
    /// Eigenvalues in non-increasing order.
    pub values: [f64; 3],
    /// `vectors[i]` is the unit eigenvector paired with `values[i]`.
    pub vectors: [[f64; 3]; 3],
}

/// Decompose a symmetric matrix. Only the upper triangle is trusted to be
/// consistent with the lower one; callers pass covariance matrices.
///
/// Eigenvalue ties keep the original axis order, so a matrix that is
/// already diagonal comes back with the identity basis.
pub fn symmetric_eigen3(m: &[[f64; 3]; 3]) -> SymmetricEigen {
    let mut a = *m;
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    let norm = a.iter().flatten().map(|x| x * x).sum::<f64>().sqrt();

    for _ in 0..MAX_ROTATIONS {
        let (p, q, off) = largest_off_diagonal(&a);
        if off == 0.0 || off <= REL_TOLERANCE * norm {
            break;
        }
        let r = 3 - p - q;

        let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
        let t = if theta.is_finite() {
            let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
            sign / (theta.abs() + (theta * theta + 1.0).sqrt())
        } else {
            0.0
        };
        let c = 1.0 / (t * t + 1.0).sqrt();
        let s = t * c;

        let apq = a[p][q];
        a[p][p] -= t * apq;
        a[q][q] += t * apq;
        a[p][q] = 0.0;
        a[q][p] = 0.0;

        let arp = a[r][p];
        let arq = a[r][q];
        a[r][p] = c * arp - s * arq;
        a[p][r] = a[r][p];
        a[r][q] = s * arp + c * arq;
        a[q][r] = a[r][q];

        for row in v.iter_mut() {
            let vp = row[p];
            let vq = row[q];
            row[p] = c * vp - s * vq;
            row[q] = s * vp + c * vq;
        }
    }

    let diag = [a[0][0], a[1][1], a[2][2]];
    let mut order = [0usize, 1, 2];
    // Stable: equal eigenvalues stay in axis order.
    order.sort_by(|&i, &j| diag[j].total_cmp(&diag[i]));

    let mut values = [0.0; 3];
    let mut vectors = [[0.0; 3]; 3];
    for (rank, &col) in order.iter().enumerate() {
        values[rank] = diag[col];
        vectors[rank] = normalize([v[0][col], v[1][col], v[2][col]]);
    }
    SymmetricEigen { values, vectors }
}

fn largest_off_diagonal(a: &[[f64; 3]; 3]) -> (usize, usize, f64) {
    let mut best = (0, 1, a[0][1].abs());
    for &(i, j) in &[(0usize, 2usize), (1, 2)] {
        if a[i][j].abs() > best.2 {
            best = (i, j, a[i][j].abs());
        }
    }
    best
}

pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = dot(&v, &v).sqrt();
    if len == 0.0 {
        return v;
    }
    [v[0] / len, v[1] / len, v[2] / len]
}
