use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::consts::PSD_TOL;

/// [Multivariate Gaussian/Normal Distribution](https://en.wikipedia.org/wiki/Multivariate_normal_distribution),
/// 𝒩(μ, Σ).
///
/// Σ is only required to be square and match μ. A covariance that is not
/// symmetric positive semi-definite logs a warning and is sampled through
/// its nearest positive semi-definite factorization instead of failing.
///
/// # Example
///
/// ```
/// use gpr::dist::MvGaussian;
/// use nalgebra::{DMatrix, DVector};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(0);
///
/// let mu = DVector::from_column_slice(&[1.0, -1.0]);
/// let cov = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 1.0]);
/// let mvg = MvGaussian::new(mu, cov).unwrap();
///
/// // one column per draw
/// let xs = mvg.sample_matrix(10, &mut rng);
/// assert_eq!(xs.shape(), (2, 10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MvGaussian {
    /// Mean vector
    mu: DVector<f64>,
    /// Covariance matrix
    cov: DMatrix<f64>,
    /// A such that A·Aᵀ ≈ Σ
    factor: DMatrix<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MvGaussianError {
    /// The number of dimensions in μ does not match the number of rows in Σ
    MuCovDimensionMismatch {
        /// Number of dimensions in the mean vector
        n_mu: usize,
        /// Number of rows in the covariance matrix
        n_cov: usize,
    },
    /// The covariance matrix is not square
    CovNotSquare {
        /// Number of rows in the covariance matrix
        nrows: usize,
        /// Number of columns in the covariance matrix
        ncols: usize,
    },
    /// Requested a distribution over zero dimensions
    ZeroDimension,
}

impl std::error::Error for MvGaussianError {}

impl std::fmt::Display for MvGaussianError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MuCovDimensionMismatch { n_mu, n_cov } => write!(
                f,
                "Number of dimensions in μ ({}) and Σ ({}) must match",
                n_mu, n_cov
            ),
            Self::CovNotSquare { nrows, ncols } => write!(
                f,
                "Σ must be square but has {} rows and {} columns",
                nrows, ncols
            ),
            Self::ZeroDimension => write!(f, "dims must be >= 1"),
        }
    }
}

impl MvGaussian {
    /// Create a new multivariate Gaussian distribution
    ///
    /// # Arguments
    /// * `mu` - Mean vector of length n
    /// * `cov` - n×n covariance matrix
    pub fn new(
        mu: DVector<f64>,
        cov: DMatrix<f64>,
    ) -> Result<Self, MvGaussianError> {
        if cov.nrows() != cov.ncols() {
            return Err(MvGaussianError::CovNotSquare {
                nrows: cov.nrows(),
                ncols: cov.ncols(),
            });
        }

        if mu.len() != cov.nrows() {
            return Err(MvGaussianError::MuCovDimensionMismatch {
                n_mu: mu.len(),
                n_cov: cov.nrows(),
            });
        }

        if mu.is_empty() {
            return Err(MvGaussianError::ZeroDimension);
        }

        let factor = factorize(&cov);
        Ok(MvGaussian { mu, cov, factor })
    }

    /// Get the number of dimensions
    #[inline]
    pub fn ndims(&self) -> usize {
        self.mu.len()
    }

    /// Get a reference to the mean
    #[inline]
    pub fn mu(&self) -> &DVector<f64> {
        &self.mu
    }

    /// Get a reference to the covariance
    #[inline]
    pub fn cov(&self) -> &DMatrix<f64> {
        &self.cov
    }

    /// Single draw
    pub fn draw<R: Rng>(&self, rng: &mut R) -> DVector<f64> {
        let z: DVector<f64> =
            DVector::from_fn(self.ndims(), |_, _| rng.sample(StandardNormal));
        &self.mu + &self.factor * z
    }

    /// Multiple draws
    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<DVector<f64>> {
        (0..n).map(|_| self.draw(rng)).collect()
    }

    /// `n` draws stacked as the columns of an `ndims × n` matrix.
    pub fn sample_matrix<R: Rng>(&self, n: usize, rng: &mut R) -> DMatrix<f64> {
        let z: DMatrix<f64> =
            DMatrix::from_fn(self.ndims(), n, |_, _| rng.sample(StandardNormal));
        let mut xs = &self.factor * z;
        for mut col in xs.column_iter_mut() {
            col += &self.mu;
        }
        xs
    }
}

/// Compute A with A·Aᵀ = Σ.
///
/// Cholesky of the symmetrized covariance when it exists, otherwise the
/// eigendecomposition with negative eigenvalues clamped to zero.
fn factorize(cov: &DMatrix<f64>) -> DMatrix<f64> {
    let scale = cov.amax().max(1.0);
    let asymmetry = (cov - cov.transpose()).amax();
    let symmetric = asymmetry <= PSD_TOL * scale;
    let sym = (cov + cov.transpose()) * 0.5;

    if let Some(chol) = sym.clone().cholesky() {
        if !symmetric {
            warn!(
                "covariance is not symmetric (max asymmetry = {:e}); \
                 sampling from its symmetric part",
                asymmetry
            );
        }
        return chol.unpack();
    }

    let eig = sym.symmetric_eigen();
    let min_eigenvalue = eig
        .eigenvalues
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);

    if !symmetric || min_eigenvalue < -PSD_TOL * scale {
        warn!(
            "covariance is not symmetric positive-semidefinite \
             (max asymmetry = {:e}, min eigenvalue = {:e}); \
             negative eigenvalues are clamped to zero",
            asymmetry, min_eigenvalue
        );
    } else {
        debug!(
            "Cholesky failed on a singular covariance of size {}; \
             falling back to eigendecomposition",
            cov.nrows()
        );
    }

    let sqrt_eigenvalues = eig.eigenvalues.map(|v| v.max(0.0).sqrt());
    eig.eigenvectors * DMatrix::from_diagonal(&sqrt_eigenvalues)
}
