use super::Kernel;
use nalgebra::{DMatrix, DVector};

/// Kernel backed by a plain function of two point sets.
///
/// The function must return a `x1.len() × x2.len()` covariance matrix. The
/// regressor rejects any other shape with
/// [`GpError::DimensionMismatch`](crate::process::gaussian::GpError).
///
/// # Example
///
/// ```
/// use gpr::process::gaussian::kernel::{FnKernel, Kernel};
/// use nalgebra::{DMatrix, DVector};
///
/// // Brownian motion covariance, min(x, x')
/// let kernel = FnKernel::new(|a: &DVector<f64>, b: &DVector<f64>| {
///     DMatrix::from_fn(a.len(), b.len(), |i, j| a[i].min(b[j]))
/// });
///
/// let x = DVector::from_column_slice(&[1.0, 2.0, 3.0]);
/// let cov = kernel.covariance(&x, &x);
/// assert_eq!(cov[(2, 1)], 2.0);
/// assert_eq!(cov.diagonal(), x);
/// ```
#[derive(Clone)]
pub struct FnKernel<F> {
    f: F,
}

impl<F> FnKernel<F>
where
    F: Fn(&DVector<f64>, &DVector<f64>) -> DMatrix<f64> + Clone,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> std::fmt::Debug for FnKernel<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FnKernel({})", std::any::type_name::<F>())
    }
}

impl<F> Kernel for FnKernel<F>
where
    F: Fn(&DVector<f64>, &DVector<f64>) -> DMatrix<f64> + Clone,
{
    fn covariance(&self, x1: &DVector<f64>, x2: &DVector<f64>) -> DMatrix<f64> {
        (self.f)(x1, x2)
    }
}
