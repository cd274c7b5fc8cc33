//! Covariance kernels over scalar inputs
//!
//! A kernel maps two sets of points to the matrix of their pairwise
//! covariances. Kernels compose with `+` and `*`:
//!
//! ```
//! use gpr::process::gaussian::kernel::{
//!     ConstantKernel, Kernel, LinearKernel, RBFKernel,
//! };
//! use nalgebra::DVector;
//!
//! let kernel = ConstantKernel::new(2.0).unwrap() * RBFKernel::default()
//!     + LinearKernel::new(0.0).unwrap();
//!
//! let x = DVector::from_column_slice(&[0.0, 1.0]);
//! let cov = kernel.covariance(&x, &x);
//! assert_eq!(cov.shape(), (2, 2));
//! assert!((cov[(1, 1)] - 3.0).abs() < 1E-12);
//! ```

use nalgebra::{DMatrix, DVector};

mod constant_kernel;
pub use self::constant_kernel::*;

mod fn_kernel;
pub use self::fn_kernel::*;

mod linear;
pub use self::linear::*;

mod ops;
pub use self::ops::*;

mod rbf;
pub use self::rbf::*;

/// Covariance function of a Gaussian Process
pub trait Kernel: std::fmt::Debug + Clone {
    /// Covariance between each point of `x1` (rows) and each point of `x2`
    /// (columns). The result must be `x1.len() × x2.len()`.
    fn covariance(&self, x1: &DVector<f64>, x2: &DVector<f64>) -> DMatrix<f64>;
}

/// Build the `x1.len() × x2.len()` matrix of `f(x1[i], x2[j])`
#[inline]
pub(crate) fn pairwise<F>(x1: &DVector<f64>, x2: &DVector<f64>, f: F) -> DMatrix<f64>
where
    F: Fn(f64, f64) -> f64,
{
    DMatrix::from_fn(x1.len(), x2.len(), |i, j| f(x1[i], x2[j]))
}

/// Errors from Kernel construction
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A hyperparameter is outside its domain
    ParameterOutOfBounds {
        /// Name of parameter
        name: &'static str,
        /// Value given
        given: f64,
        /// Lower and upper bounds on value
        bounds: (f64, f64),
    },
}

impl KernelError {
    /// Accept `value` if it is finite and above `lower` (or equal to it when
    /// `inclusive`).
    pub(crate) fn check_lower(
        name: &'static str,
        value: f64,
        lower: f64,
        inclusive: bool,
    ) -> Result<f64, Self> {
        let above = if inclusive { value >= lower } else { value > lower };
        if above && value.is_finite() {
            Ok(value)
        } else {
            Err(Self::ParameterOutOfBounds {
                name,
                given: value,
                bounds: (lower, f64::INFINITY),
            })
        }
    }
}

impl std::error::Error for KernelError {}

impl std::fmt::Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParameterOutOfBounds {
                name,
                given,
                bounds,
            } => write!(
                f,
                "Kernel parameter {} must lie in ({}, {}), given: {}",
                name, bounds.0, bounds.1, given
            ),
        }
    }
}

/// `+` and `*` for a kernel type, producing [`SumKernel`] and
/// [`ProductKernel`].
macro_rules! impl_kernel_ops {
    ($name:ident $(<$($gen:ident),+>)?) => {
        impl<$($($gen,)+)? Rhs: Kernel> std::ops::Add<Rhs> for $name$(<$($gen),+>)? {
            type Output = SumKernel<Self, Rhs>;

            fn add(self, rhs: Rhs) -> Self::Output {
                SumKernel::new(self, rhs)
            }
        }

        impl<$($($gen,)+)? Rhs: Kernel> std::ops::Mul<Rhs> for $name$(<$($gen),+>)? {
            type Output = ProductKernel<Self, Rhs>;

            fn mul(self, rhs: Rhs) -> Self::Output {
                ProductKernel::new(self, rhs)
            }
        }
    };
}

impl_kernel_ops!(ConstantKernel);
impl_kernel_ops!(RBFKernel);
impl_kernel_ops!(LinearKernel);
impl_kernel_ops!(FnKernel<F>);
impl_kernel_ops!(SumKernel<A, B>);
impl_kernel_ops!(ProductKernel<A, B>);
