//! Two-dimensional Gaussian kernel density estimation on a regular grid.

use std::f64::consts::PI;

use crate::analyzers::utility::{iqr, sample_variance};

/// Normal-reference bandwidth for one axis:
/// `1.06 * min(sd, IQR / 1.34) * n^(-1/5)`.
///
/// Falls back to `sd` alone when the IQR is zero. Returns `None` when the
/// bandwidth would still be zero or non-finite (e.g. a constant sample).
pub fn bandwidth(values: &[f64]) -> Option<f64> {
    let sd = sample_variance(values).sqrt();
    let spread = iqr(values) / 1.34;
    let scale = if spread > 0.0 { sd.min(spread) } else { sd };
    let h = 1.06 * scale * (values.len() as f64).powf(-0.2);
    (h.is_finite() && h > 0.0).then_some(h)
}

/// `n` evenly spaced points from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![lo];
    }
    let step = (hi - lo) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
        .collect()
}

fn std_normal(u: f64) -> f64 {
    (-0.5 * u * u).exp() / (2.0 * PI).sqrt()
}

/// Density values on an `xs.len() × ys.len()` grid.
///
/// `values` is stored with `x` as the outer index: cell `(i, j)` lives at
/// `i * ys.len() + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub values: Vec<f64>,
}

impl DensityGrid {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.ys.len() + j]
    }

    /// Iterates `(x, y, value)` in storage order.
    pub fn cells(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.xs.iter().enumerate().flat_map(move |(i, &x)| {
            self.ys.iter().enumerate().map(move |(j, &y)| (x, y, self.get(i, j)))
        })
    }

    /// Index `(i, j)` of the maximum cell.
    ///
    /// Scans in storage order and keeps the first strict maximum, so ties
    /// resolve to the lowest `x`, then the lowest `y`.
    pub fn argmax(&self) -> Option<(usize, usize)> {
        let ny = self.ys.len();
        let mut best: Option<(usize, f64)> = None;
        for (k, &v) in self.values.iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            if best.is_none_or(|(_, b)| v > b) {
                best = Some((k, v));
            }
        }
        best.map(|(k, _)| (k / ny, k % ny))
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NAN, f64::max)
    }

    /// Divides every cell by the grid maximum. The maximum cell becomes exactly 1.0.
    ///
    /// Returns `false` (leaving the grid untouched) when the maximum is not positive.
    pub fn normalize(&mut self) -> bool {
        let max = self.max();
        if !(max.is_finite() && max > 0.0) {
            return false;
        }
        for v in &mut self.values {
            *v /= max;
        }
        true
    }
}

/// Product-Gaussian kernel density estimate of `points`, evaluated on a
/// `n × n` grid spanning `x_bounds` × `y_bounds`.
///
/// Points outside the bounds still contribute their kernel mass to cells
/// inside the grid.
pub fn kde2d(
    points: &[(f64, f64)],
    bandwidth: (f64, f64),
    n: usize,
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
) -> DensityGrid {
    let (hx, hy) = bandwidth;
    let xs = linspace(x_bounds.0, x_bounds.1, n);
    let ys = linspace(y_bounds.0, y_bounds.1, n);

    // kernel weight of every sample at every grid coordinate, per axis
    let kx: Vec<Vec<f64>> = xs
        .iter()
        .map(|&gx| points.iter().map(|&(x, _)| std_normal((gx - x) / hx)).collect())
        .collect();
    let ky: Vec<Vec<f64>> = ys
        .iter()
        .map(|&gy| points.iter().map(|&(_, y)| std_normal((gy - y) / hy)).collect())
        .collect();

    let norm = points.len() as f64 * hx * hy;
    let mut values = Vec::with_capacity(xs.len() * ys.len());
    for wx in &kx {
        for wy in &ky {
            let sum: f64 = wx.iter().zip(wy).map(|(a, b)| a * b).sum();
            values.push(sum / norm);
        }
    }

    DensityGrid { xs, ys, values }
}
