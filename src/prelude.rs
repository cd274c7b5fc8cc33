//! Re-imports for convenience
#[doc(no_inline)]
pub use crate::dist::{MvGaussian, MvGaussianError};
#[doc(no_inline)]
pub use crate::process::gaussian::kernel::*;
#[doc(no_inline)]
pub use crate::process::gaussian::{
    FittedModel, GaussianProcessRegressor, GpError, GpState, NoiseModel,
};
