use nalgebra::{DMatrix, DVector};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use super::GpError;

/// Model of observation noise to use in a Gaussian Process
///
/// Values are standard deviations; their squares are added to the diagonal
/// of the training covariance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
pub enum NoiseModel {
    /// The same noise is applied to all values
    Uniform(f64),
    /// Different noise values are applied to each y-value
    PerPoint(DVector<f64>),
}

impl Default for NoiseModel {
    fn default() -> Self {
        NoiseModel::Uniform(0.0)
    }
}

impl From<f64> for NoiseModel {
    fn from(sigma: f64) -> Self {
        NoiseModel::Uniform(sigma)
    }
}

impl From<DVector<f64>> for NoiseModel {
    fn from(sigma: DVector<f64>) -> Self {
        NoiseModel::PerPoint(sigma)
    }
}

impl From<Vec<f64>> for NoiseModel {
    fn from(sigma: Vec<f64>) -> Self {
        NoiseModel::PerPoint(DVector::from_vec(sigma))
    }
}

impl NoiseModel {
    /// Check that every noise level is finite and non-negative
    pub fn validate(&self) -> Result<(), GpError> {
        let valid = |s: &f64| s.is_finite() && *s >= 0.0;
        match self {
            NoiseModel::Uniform(sigma) if !valid(sigma) => {
                Err(GpError::InvalidParameter(format!(
                    "noise level must be finite and non-negative, given: {}",
                    sigma
                )))
            }
            NoiseModel::PerPoint(sigma) => match sigma.iter().position(|s| !valid(s)) {
                Some(ix) => Err(GpError::InvalidParameter(format!(
                    "noise level at index {} must be finite and non-negative, given: {}",
                    ix, sigma[ix]
                ))),
                None => Ok(()),
            },
            NoiseModel::Uniform(_) => Ok(()),
        }
    }

    /// Enact the given noise model onto the given covariance matrix
    pub fn add_noise_to_kernel(
        &self,
        cov: &DMatrix<f64>,
    ) -> Result<DMatrix<f64>, GpError> {
        match self {
            NoiseModel::Uniform(noise) => {
                let diag = DVector::from_element(cov.nrows(), noise.powi(2));
                Ok(cov + &DMatrix::from_diagonal(&diag))
            }
            NoiseModel::PerPoint(sigma) => {
                if cov.nrows() == sigma.nrows() {
                    let s = sigma.map(|e| e * e);
                    Ok(cov + &DMatrix::from_diagonal(&s))
                } else {
                    Err(GpError::DimensionMismatch {
                        name: "noise level",
                        expected: cov.nrows(),
                        given: sigma.nrows(),
                    })
                }
            }
        }
    }
}
