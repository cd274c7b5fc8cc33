//! Probability distributions used by the Gaussian Process
mod mvg;

pub use mvg::{MvGaussian, MvGaussianError};
