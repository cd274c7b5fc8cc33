use super::{pairwise, Kernel, KernelError};
use nalgebra::{DMatrix, DVector};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Linear (dot-product) kernel
///
/// ```math
///     K(x, x') = \sigma_0^2 + x x'
/// ```
///
/// A GP with this kernel is Bayesian linear regression. Not stationary.
///
/// # Parameters
/// * `sigma_0` - Inhomogeneity; `0` makes the kernel homogeneous.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct LinearKernel {
    sigma_0: f64,
}

impl LinearKernel {
    /// Create a new linear kernel with the given inhomogeneity
    pub fn new(sigma_0: f64) -> Result<Self, KernelError> {
        let sigma_0 = KernelError::check_lower("sigma_0", sigma_0, 0.0, true)?;
        Ok(Self { sigma_0 })
    }

    /// Create a new `LinearKernel` without checking parameters
    #[must_use]
    pub fn new_unchecked(sigma_0: f64) -> Self {
        Self { sigma_0 }
    }

    /// The inhomogeneity σ₀
    pub fn sigma_0(&self) -> f64 {
        self.sigma_0
    }
}

impl Default for LinearKernel {
    fn default() -> Self {
        Self { sigma_0: 1.0 }
    }
}

impl Kernel for LinearKernel {
    fn covariance(&self, x1: &DVector<f64>, x2: &DVector<f64>) -> DMatrix<f64> {
        let s2 = self.sigma_0 * self.sigma_0;
        pairwise(x1, x2, |a, b| a.mul_add(b, s2))
    }
}
