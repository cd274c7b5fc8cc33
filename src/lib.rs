//! One-dimensional Gaussian Process regression.
//!
//! A [`GaussianProcessRegressor`](process::gaussian::GaussianProcessRegressor)
//! combines a covariance [`Kernel`](process::gaussian::kernel::Kernel) with a
//! seedable random source. It draws from the zero-mean prior, conditions on
//! noisy observations, and reports or samples the resulting posterior.
#[cfg(doctest)]
doc_comment::doctest!("../README.md");

pub mod consts;
pub mod dist;
pub mod prelude;
pub mod process;
