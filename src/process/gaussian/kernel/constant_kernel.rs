use super::{Kernel, KernelError};
use nalgebra::{DMatrix, DVector};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Constant kernel, K(x, x') = c for every pair of points.
///
/// Mostly useful as a signal-variance scale in a product with another
/// kernel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ConstantKernel {
    value: f64,
}

impl ConstantKernel {
    /// Create a new constant kernel; `value` must be positive
    pub fn new(value: f64) -> Result<Self, KernelError> {
        KernelError::check_lower("value", value, 0.0, false).map(|value| Self { value })
    }

    /// Create a new `ConstantKernel` without checking the parameters
    #[must_use]
    pub fn new_unchecked(value: f64) -> Self {
        Self { value }
    }

    /// The constant covariance c
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl TryFrom<f64> for ConstantKernel {
    type Error = KernelError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        ConstantKernel::new(value)
    }
}

impl Default for ConstantKernel {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

impl Kernel for ConstantKernel {
    fn covariance(&self, x1: &DVector<f64>, x2: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::from_element(x1.len(), x2.len(), self.value)
    }
}
