use super::{pairwise, Kernel, KernelError};
use nalgebra::{DMatrix, DVector};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Radial-basis function (RBF) kernel, aka squared exponential.
///
/// ```math
///     K(x, x') = \exp\left(-\frac{(x - x')^2}{2l^2}\right)
/// ```
///
/// # Parameters
/// * `l` - Length scale.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct RBFKernel {
    length_scale: f64,
}

impl RBFKernel {
    /// Create a new rbf kernel with the given length scale
    pub fn new(length_scale: f64) -> Result<Self, KernelError> {
        let length_scale =
            KernelError::check_lower("length_scale", length_scale, 0.0, false)?;
        Ok(Self { length_scale })
    }

    /// Create a new `RBFKernel` without checking parameters
    #[must_use]
    pub fn new_unchecked(length_scale: f64) -> Self {
        Self { length_scale }
    }

    /// The length scale
    pub fn length_scale(&self) -> f64 {
        self.length_scale
    }
}

impl Default for RBFKernel {
    fn default() -> Self {
        Self { length_scale: 1.0 }
    }
}

impl Kernel for RBFKernel {
    fn covariance(&self, x1: &DVector<f64>, x2: &DVector<f64>) -> DMatrix<f64> {
        let inv_l = self.length_scale.recip();
        pairwise(x1, x2, |a, b| {
            let d = (a - b) * inv_l;
            (-0.5 * d * d).exp()
        })
    }
}
