// Natural cubic spline interpolation.
//
// Knot x values must be strictly increasing; the trajectory generator
// guarantees this by fitting in a rotated local frame.

use nalgebra as na;

use crate::common::{PlannerError, PlannerResult};

#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
}

impl CubicSpline {
    pub fn new(x: &[f64], y: &[f64]) -> PlannerResult<CubicSpline> {
        let nx = x.len();
        if nx != y.len() {
            return Err(PlannerError::InvalidParameter(
                "spline knot vectors differ in length".to_string(),
            ));
        }
        if nx < 3 {
            return Err(PlannerError::InvalidParameter(
                "spline needs at least three knots".to_string(),
            ));
        }
        let mut h: Vec<f64> = Vec::with_capacity(nx - 1);
        for i in 0..nx - 1 {
            let hi = x[i + 1] - x[i];
            if hi <= 0.0 {
                return Err(PlannerError::InvalidParameter(
                    "spline knots must be strictly increasing".to_string(),
                ));
            }
            h.push(hi);
        }

        let a = y.to_vec();
        let a_mat = Self::coefficient_matrix(&h);
        let b_vec = Self::rhs_vector(&h, &a);

        let a_inv = a_mat.try_inverse().ok_or_else(|| {
            PlannerError::NumericalError("spline coefficient matrix is singular".to_string())
        })?;
        let c_na = a_inv * b_vec;
        let c: Vec<f64> = c_na.iter().copied().collect();

        let mut b: Vec<f64> = Vec::with_capacity(nx - 1);
        let mut d: Vec<f64> = Vec::with_capacity(nx - 1);
        for i in 0..nx - 1 {
            d.push((c[i + 1] - c[i]) / (3.0 * h[i]));
            b.push((a[i + 1] - a[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0);
        }

        Ok(CubicSpline { x: x.to_vec(), a, b, c, d })
    }

    /// Evaluate the interpolant at `t`. Outside the knot range the end
    /// segments extrapolate.
    pub fn evaluate(&self, t: f64) -> f64 {
        let i = self.segment_index(t);
        let dx = t - self.x[i];
        self.a[i] + self.b[i] * dx + self.c[i] * dx.powi(2) + self.d[i] * dx.powi(3)
    }

    fn segment_index(&self, t: f64) -> usize {
        for i in 0..self.x.len() - 1 {
            if self.x[i] <= t && t < self.x[i + 1] {
                return i;
            }
        }
        if t < self.x[0] {
            0
        } else {
            self.x.len() - 2
        }
    }

    fn coefficient_matrix(h: &[f64]) -> na::DMatrix<f64> {
        let nx = h.len() + 1;
        let mut a = na::DMatrix::from_diagonal_element(nx, nx, 0.0);
        a[(0, 0)] = 1.0;
        for i in 0..nx - 1 {
            if i != nx - 2 {
                a[(i + 1, i + 1)] = 2.0 * (h[i] + h[i + 1]);
            }
            a[(i + 1, i)] = h[i];
            a[(i, i + 1)] = h[i];
        }
        a[(0, 1)] = 0.0;
        a[(nx - 1, nx - 2)] = 0.0;
        a[(nx - 1, nx - 1)] = 1.0;
        a
    }

    fn rhs_vector(h: &[f64], a: &[f64]) -> na::DVector<f64> {
        let nx = h.len() + 1;
        let mut b = na::DVector::zeros(nx);
        for i in 0..nx - 2 {
            b[i + 1] = 3.0 * (a[i + 2] - a[i + 1]) / h[i + 1] - 3.0 * (a[i + 1] - a[i]) / h[i];
        }
        b
    }
}
