use super::Kernel;
use nalgebra::{DMatrix, DVector};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// K(x, x') = K_a(x, x') + K_b(x, x'). Usually built with `a + b`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct SumKernel<A, B> {
    a: A,
    b: B,
}

impl<A, B> SumKernel<A, B> {
    /// Sum of `a` and `b`
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    /// The two summands
    pub fn parts(&self) -> (&A, &B) {
        (&self.a, &self.b)
    }
}

impl<A: Kernel, B: Kernel> Kernel for SumKernel<A, B> {
    fn covariance(&self, x1: &DVector<f64>, x2: &DVector<f64>) -> DMatrix<f64> {
        let mut cov = self.a.covariance(x1, x2);
        cov += self.b.covariance(x1, x2);
        cov
    }
}

/// Elementwise product K(x, x') = K_a(x, x') · K_b(x, x'). Usually built
/// with `a * b`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub struct ProductKernel<A, B> {
    a: A,
    b: B,
}

impl<A, B> ProductKernel<A, B> {
    /// Product of `a` and `b`
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    /// The two factors
    pub fn parts(&self) -> (&A, &B) {
        (&self.a, &self.b)
    }
}

impl<A: Kernel, B: Kernel> Kernel for ProductKernel<A, B> {
    fn covariance(&self, x1: &DVector<f64>, x2: &DVector<f64>) -> DMatrix<f64> {
        let mut cov = self.a.covariance(x1, x2);
        cov.component_mul_assign(&self.b.covariance(x1, x2));
        cov
    }
}
