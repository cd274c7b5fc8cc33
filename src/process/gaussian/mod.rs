//! Gaussian Process regression over one-dimensional inputs
//!
//! The prior mean is fixed at zero. The regressor is either unfit or holds a
//! [`FittedModel`]; posterior queries on an unfit regressor fail with
//! [`GpError::Unfit`].

use log::debug;
use nalgebra::{DMatrix, DVector};
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256Plus;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_REG, DEFAULT_SEED, HALF_LN_2PI};
use crate::dist::{MvGaussian, MvGaussianError};

pub mod kernel;
use kernel::Kernel;

mod noise_model;
pub use noise_model::NoiseModel;

/// Errors from Gaussian Process fitting and queries
#[derive(Debug, Clone, PartialEq)]
pub enum GpError {
    /// A posterior query was made before the process was fit
    Unfit,
    /// The regularized training covariance could not be inverted
    Singular,
    /// Two inputs that must have the same length do not
    DimensionMismatch {
        /// What was mis-sized
        name: &'static str,
        /// Expected length
        expected: usize,
        /// Given length
        given: usize,
    },
    /// An argument is outside its valid domain
    InvalidParameter(String),
    /// The sampling distribution could not be built
    Sampler(MvGaussianError),
}

impl std::error::Error for GpError {}

impl std::fmt::Display for GpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unfit => write!(
                f,
                "Need to fit the process to some training data first"
            ),
            Self::Singular => write!(
                f,
                "The training covariance is singular. Try adding a small, \
                 constant noise level"
            ),
            Self::DimensionMismatch {
                name,
                expected,
                given,
            } => write!(
                f,
                "Length of {} must be {}, given: {}",
                name, expected, given
            ),
            Self::InvalidParameter(msg) => write!(f, "{}", msg),
            Self::Sampler(e) => write!(f, "Sampling failed: {}", e),
        }
    }
}

impl From<MvGaussianError> for GpError {
    fn from(e: MvGaussianError) -> Self {
        Self::Sampler(e)
    }
}

pub type Result<T> = std::result::Result<T, GpError>;

/// Coerce a flat sequence of points into a column
#[inline]
fn column(xs: &[f64]) -> DVector<f64> {
    DVector::from_column_slice(xs)
}

fn check_query(x: &[f64], size: usize) -> Result<()> {
    if x.is_empty() {
        Err(GpError::InvalidParameter(
            "at least one evaluation point is required".to_string(),
        ))
    } else if size == 0 {
        Err(GpError::InvalidParameter(
            "number of samples must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Reject kernel output that is not `nrows × ncols`
fn check_kernel_output(cov: &DMatrix<f64>, nrows: usize, ncols: usize) -> Result<()> {
    if cov.nrows() != nrows {
        Err(GpError::DimensionMismatch {
            name: "kernel output rows",
            expected: nrows,
            given: cov.nrows(),
        })
    } else if cov.ncols() != ncols {
        Err(GpError::DimensionMismatch {
            name: "kernel output columns",
            expected: ncols,
            given: cov.ncols(),
        })
    } else {
        Ok(())
    }
}

/// Per-point standard deviation from a covariance diagonal. Round-off can
/// leave tiny negative variances; those are treated as zero.
fn std_from_cov(cov: &DMatrix<f64>) -> DVector<f64> {
    cov.diagonal().map(|v| v.max(0.0).sqrt())
}

/// Training data and the cached inverse of its regularized covariance
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct FittedModel {
    /// x values used in training
    train_x: DVector<f64>,
    /// y values used in training
    train_y: DVector<f64>,
    /// Observation noise
    noise_model: NoiseModel,
    /// Kernel(x, x) plus noise
    k: DMatrix<f64>,
    /// Inverse of `k`
    k_inv: DMatrix<f64>,
    /// ln|k|
    ln_det_k: f64,
}

impl FittedModel {
    /// Condition the zero-mean prior given by `kernel` on the observations
    /// (`train_x`, `train_y`) with the given observation noise.
    ///
    /// # Arguments
    /// * `kernel` - Kernel to use to determine covariance
    /// * `train_x` - Values to use for input into `f`
    /// * `train_y` - Known values for `f(x)`
    /// * `noise_model` - Standard deviation of the noise on `train_y`
    pub fn new<K: Kernel>(
        kernel: &K,
        train_x: DVector<f64>,
        train_y: DVector<f64>,
        noise_model: NoiseModel,
    ) -> Result<Self> {
        if train_x.is_empty() {
            return Err(GpError::InvalidParameter(
                "at least one training point is required".to_string(),
            ));
        }

        if train_y.len() != train_x.len() {
            return Err(GpError::DimensionMismatch {
                name: "y",
                expected: train_x.len(),
                given: train_y.len(),
            });
        }

        noise_model.validate()?;

        let n = train_x.len();
        let k = kernel.covariance(&train_x, &train_x);
        check_kernel_output(&k, n, n)?;
        let k = noise_model.add_noise_to_kernel(&k)?;

        let lu = k.clone().lu();
        let k_inv = lu.try_inverse().ok_or(GpError::Singular)?;
        if k_inv.iter().any(|v| !v.is_finite()) {
            return Err(GpError::Singular);
        }
        let ln_det_k: f64 = lu.u().diagonal().iter().map(|d| d.abs().ln()).sum();

        debug!(
            "fit GP on {} points with {:?} noise (ln|K| = {})",
            train_x.len(),
            noise_model,
            ln_det_k
        );

        Ok(Self {
            train_x,
            train_y,
            noise_model,
            k,
            k_inv,
            ln_det_k,
        })
    }

    /// x values used in training
    pub fn train_x(&self) -> &DVector<f64> {
        &self.train_x
    }

    /// y values used in training
    pub fn train_y(&self) -> &DVector<f64> {
        &self.train_y
    }

    /// Observation noise used in training
    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    /// The regularized training covariance, K
    pub fn k(&self) -> &DMatrix<f64> {
        &self.k
    }

    /// The inverse of K
    pub fn k_inv(&self) -> &DMatrix<f64> {
        &self.k_inv
    }

    /// Posterior mean and covariance of the process at `x`
    ///
    /// ```math
    ///     \mu = K_* K^{-1} y, \quad \Sigma = K_{**} - K_* K^{-1} K_*^T
    /// ```
    ///
    /// `kernel` must be the kernel the model was fit with.
    pub fn posterior_moments<K: Kernel>(
        &self,
        kernel: &K,
        x: &DVector<f64>,
    ) -> Result<(DVector<f64>, DMatrix<f64>)> {
        let (m, n) = (x.len(), self.train_x.len());
        let k_star = kernel.covariance(x, &self.train_x);
        check_kernel_output(&k_star, m, n)?;
        let k_star_star = kernel.covariance(x, x);
        check_kernel_output(&k_star_star, m, m)?;

        let mean = (&k_star * &self.k_inv) * &self.train_y;
        let cov = k_star_star - &k_star * (&self.k_inv * k_star.transpose());
        Ok((mean, cov))
    }

    /// Log marginal likelihood of the training data
    pub fn ln_m(&self) -> f64 {
        let n = self.train_y.len() as f64;
        let alpha = &self.k_inv * &self.train_y;
        -0.5 * self.train_y.dot(&alpha) - 0.5 * self.ln_det_k - n * HALF_LN_2PI
    }
}

/// Fit state of a [`GaussianProcessRegressor`]
#[derive(Clone, Debug, PartialEq, Default)]
pub enum GpState {
    #[default]
    Unfit,
    /// Conditioned on training data
    Fitted(FittedModel),
}

impl GpState {
    /// The fitted model, or [`GpError::Unfit`]
    pub fn fitted(&self) -> Result<&FittedModel> {
        match self {
            GpState::Fitted(model) => Ok(model),
            GpState::Unfit => Err(GpError::Unfit),
        }
    }

    /// Whether a model has been fit
    pub fn is_fit(&self) -> bool {
        matches!(self, GpState::Fitted(_))
    }
}

/// Draw `size` samples of the zero-mean prior at `x`, plus the prior std.
fn draw_prior<K, R>(
    kernel: &K,
    x: &[f64],
    size: usize,
    rng: &mut R,
) -> Result<(DMatrix<f64>, DVector<f64>)>
where
    K: Kernel,
    R: Rng,
{
    check_query(x, size)?;
    let x = column(x);
    let cov = kernel.covariance(&x, &x);
    check_kernel_output(&cov, x.len(), x.len())?;
    let std = std_from_cov(&cov);
    let mvg = MvGaussian::new(DVector::zeros(x.len()), cov)?;
    Ok((mvg.sample_matrix(size, rng), std))
}

/// Draw `size` samples of the posterior at `x`, plus the std of the jittered
/// posterior covariance.
fn draw_posterior<K, R>(
    kernel: &K,
    model: &FittedModel,
    x: &[f64],
    size: usize,
    reg: f64,
    rng: &mut R,
) -> Result<(DMatrix<f64>, DVector<f64>)>
where
    K: Kernel,
    R: Rng,
{
    check_query(x, size)?;
    if !reg.is_finite() || reg < 0.0 {
        return Err(GpError::InvalidParameter(format!(
            "reg must be finite and non-negative, given: {}",
            reg
        )));
    }

    let (mean, cov) = model.posterior_moments(kernel, &column(x))?;
    let jitter: DVector<f64> =
        DVector::from_fn(cov.nrows(), |_, _| reg * rng.sample::<f64, _>(StandardNormal));
    let cov = cov + DMatrix::from_diagonal(&jitter);
    let std = std_from_cov(&cov);
    let mvg = MvGaussian::new(mean, cov)?;
    Ok((mvg.sample_matrix(size, rng), std))
}

/// Gaussian Process regressor for one-dimensional inputs with a zero prior
/// mean.
///
/// # Example
///
/// ```
/// use gpr::process::gaussian::kernel::RBFKernel;
/// use gpr::process::gaussian::{GaussianProcessRegressor, NoiseModel};
///
/// let mut gp = GaussianProcessRegressor::new(RBFKernel::default());
///
/// let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];
/// let ys = [4.0, 1.0, 0.0, 1.0, 4.0];
/// gp.fit(&xs, &ys, NoiseModel::Uniform(0.01)).unwrap();
///
/// let (mean, std) = gp.predict_with_std(&[0.0, 10.0]).unwrap();
/// assert!(mean[0].abs() < 0.1);
///
/// // far from the data the posterior reverts to the prior
/// assert!((std[1] - 1.0).abs() < 1E-6);
///
/// let samples = gp.sample_posterior(&[0.5, 1.5], 3).unwrap();
/// assert_eq!(samples.shape(), (2, 3));
/// ```
#[derive(Clone, Debug)]
pub struct GaussianProcessRegressor<K, R = Xoshiro256Plus>
where
    K: Kernel,
    R: Rng,
{
    /// Covariance Kernel
    kernel: K,
    /// Random source for prior and posterior samples
    rng: R,
    state: GpState,
}

impl<K: Kernel> GaussianProcessRegressor<K, Xoshiro256Plus> {
    /// Create an unfit regressor whose random source is seeded with
    /// [`DEFAULT_SEED`].
    pub fn new(kernel: K) -> Self {
        Self::with_seed(kernel, DEFAULT_SEED)
    }

    /// Create an unfit regressor with a seeded random source
    pub fn with_seed(kernel: K, seed: u64) -> Self {
        Self::with_rng(kernel, Xoshiro256Plus::seed_from_u64(seed))
    }
}

impl<K, R> GaussianProcessRegressor<K, R>
where
    K: Kernel,
    R: Rng,
{
    /// Create an unfit regressor that draws from `rng`
    pub fn with_rng(kernel: K, rng: R) -> Self {
        Self {
            kernel,
            rng,
            state: GpState::Unfit,
        }
    }

    /// Return the kernel being used in this GP
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Current fit state
    pub fn state(&self) -> &GpState {
        &self.state
    }

    /// Whether [`fit`](Self::fit) has succeeded at least once
    pub fn is_fit(&self) -> bool {
        self.state.is_fit()
    }

    /// The fitted model, or [`GpError::Unfit`]
    pub fn fitted(&self) -> Result<&FittedModel> {
        self.state.fitted()
    }

    /// x values used in training, if fit
    pub fn train_x(&self) -> Option<&DVector<f64>> {
        self.fitted().ok().map(FittedModel::train_x)
    }

    /// y values used in training, if fit
    pub fn train_y(&self) -> Option<&DVector<f64>> {
        self.fitted().ok().map(FittedModel::train_y)
    }

    /// Observation noise used in training, if fit
    pub fn noise_model(&self) -> Option<&NoiseModel> {
        self.fitted().ok().map(FittedModel::noise_model)
    }

    /// Draw `size` samples of the prior at `x`, one sample per column.
    ///
    /// Does not require the process to be fit.
    pub fn sample_prior(&mut self, x: &[f64], size: usize) -> Result<DMatrix<f64>> {
        self.sample_prior_with_std(x, size).map(|(samples, _)| samples)
    }

    /// Like [`sample_prior`](Self::sample_prior), also returning the prior
    /// standard deviation at each point.
    pub fn sample_prior_with_std(
        &mut self,
        x: &[f64],
        size: usize,
    ) -> Result<(DMatrix<f64>, DVector<f64>)> {
        draw_prior(&self.kernel, x, size, &mut self.rng)
    }

    /// Like [`sample_prior_with_std`](Self::sample_prior_with_std), drawing
    /// from a caller-owned random source.
    pub fn sample_prior_with_rng<G: Rng>(
        &self,
        x: &[f64],
        size: usize,
        rng: &mut G,
    ) -> Result<(DMatrix<f64>, DVector<f64>)> {
        draw_prior(&self.kernel, x, size, rng)
    }

    /// Fit the process to the training examples (`x`, `y`).
    ///
    /// The model is y = f(x) + e with e ~ N(0, σ²), σ given by `noise`.
    /// Replaces any previous fit. On error the previous state is kept.
    pub fn fit(
        &mut self,
        x: &[f64],
        y: &[f64],
        noise: impl Into<NoiseModel>,
    ) -> Result<()> {
        let model = FittedModel::new(&self.kernel, column(x), column(y), noise.into())?;
        self.state = GpState::Fitted(model);
        Ok(())
    }

    /// Posterior mean and covariance of the process evaluated at `x`
    pub fn posterior_moments(&self, x: &[f64]) -> Result<(DVector<f64>, DMatrix<f64>)> {
        self.fitted()?.posterior_moments(&self.kernel, &column(x))
    }

    /// Draw `size` samples of the posterior at `x`, one sample per column.
    pub fn sample_posterior(&mut self, x: &[f64], size: usize) -> Result<DMatrix<f64>> {
        self.sample_posterior_with_reg(x, size, DEFAULT_REG)
            .map(|(samples, _)| samples)
    }

    /// Like [`sample_posterior`](Self::sample_posterior), also returning the
    /// standard deviation at each point.
    pub fn sample_posterior_with_std(
        &mut self,
        x: &[f64],
        size: usize,
    ) -> Result<(DMatrix<f64>, DVector<f64>)> {
        self.sample_posterior_with_reg(x, size, DEFAULT_REG)
    }

    /// Draw posterior samples after adding `reg` times a diagonal of
    /// standard normal draws to the posterior covariance.
    pub fn sample_posterior_with_reg(
        &mut self,
        x: &[f64],
        size: usize,
        reg: f64,
    ) -> Result<(DMatrix<f64>, DVector<f64>)> {
        let model = self.state.fitted()?;
        draw_posterior(&self.kernel, model, x, size, reg, &mut self.rng)
    }

    /// Like [`sample_posterior_with_reg`](Self::sample_posterior_with_reg),
    /// drawing from a caller-owned random source.
    pub fn sample_posterior_with_rng<G: Rng>(
        &self,
        x: &[f64],
        size: usize,
        reg: f64,
        rng: &mut G,
    ) -> Result<(DMatrix<f64>, DVector<f64>)> {
        draw_posterior(&self.kernel, self.fitted()?, x, size, reg, rng)
    }

    /// Posterior mean at `x`
    pub fn predict(&self, x: &[f64]) -> Result<DVector<f64>> {
        self.posterior_moments(x).map(|(mean, _)| mean)
    }

    /// Posterior mean and standard deviation at `x`
    pub fn predict_with_std(&self, x: &[f64]) -> Result<(DVector<f64>, DVector<f64>)> {
        let (mean, cov) = self.posterior_moments(x)?;
        Ok((mean, std_from_cov(&cov)))
    }

    /// Log marginal likelihood of the training data under the kernel
    pub fn ln_m(&self) -> Result<f64> {
        self.fitted().map(FittedModel::ln_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::gaussian::kernel::{FnKernel, LinearKernel, RBFKernel};
    use approx::assert_relative_eq;

    const TRAIN_X: [f64; 5] = [-4.0, -3.0, -2.0, -1.0, 1.0];

    fn arange(start: f64, stop: f64, step_size: f64) -> Vec<f64> {
        let size = ((stop - start) / step_size).floor() as usize;
        (0..size).map(|i| start + (i as f64) * step_size).collect()
    }

    fn sin_gp() -> GaussianProcessRegressor<RBFKernel> {
        let ys: Vec<f64> = TRAIN_X.iter().map(|x| x.sin()).collect();
        let mut gp = GaussianProcessRegressor::new(RBFKernel::default());
        // noise variance of 1E-10
        gp.fit(&TRAIN_X, &ys, NoiseModel::Uniform(1E-5)).unwrap();
        gp
    }

    #[test]
    fn simple() {
        let gp = sin_gp();
        let xs = arange(-5.0, 5.0, 1.0);
        let (mean, cov) = gp.posterior_moments(&xs).unwrap();

        let expected_mean = DVector::from_column_slice(&[
            0.61409752,
            0.7568025,
            -0.14112001,
            -0.90929743,
            -0.84147098,
            0.08533365,
            0.84147098,
            0.5639856,
            0.12742202,
            0.01047683,
        ]);
        assert_relative_eq!(mean, expected_mean, epsilon = 1E-6);

        assert_eq!(cov.shape(), (10, 10));
        assert::close(cov[(0, 0)], 5.09625632e-01, 1E-6);
        assert::close(cov[(0, 5)], 3.44967276e-02, 1E-6);
        assert::close(cov[(5, 5)], 2.66312702e-01, 1E-6);
        assert::close(cov[(5, 7)], -1.77597042e-01, 1E-6);
        assert::close(cov[(7, 8)], 5.22272453e-01, 1E-6);
        assert::close(cov[(9, 9)], 9.99872740e-01, 1E-6);
    }

    #[test]
    fn unfit_queries_fail() {
        let mut gp = GaussianProcessRegressor::new(LinearKernel::default());
        assert_eq!(gp.predict(&[1.0]), Err(GpError::Unfit));
        assert_eq!(gp.predict_with_std(&[1.0]), Err(GpError::Unfit));
        assert_eq!(gp.posterior_moments(&[1.0]), Err(GpError::Unfit));
        assert_eq!(gp.sample_posterior(&[1.0], 2), Err(GpError::Unfit));
        assert_eq!(gp.ln_m(), Err(GpError::Unfit));
        assert!(!gp.is_fit());
        assert!(gp.train_x().is_none());
    }

    #[test]
    fn prior_is_available_before_fit() {
        let mut gp = GaussianProcessRegressor::new(RBFKernel::default());
        let (samples, std) = gp.sample_prior_with_std(&[0.0, 0.5, 1.0], 4).unwrap();
        assert_eq!(samples.shape(), (3, 4));
        assert_eq!(std, DVector::from_element(3, 1.0));
    }

    #[test]
    fn fit_stores_training_data() {
        let gp = sin_gp();
        assert!(gp.is_fit());
        assert_eq!(gp.train_x().unwrap().as_slice(), &TRAIN_X);
        assert_eq!(gp.noise_model(), Some(&NoiseModel::Uniform(1E-5)));
        let model = gp.fitted().unwrap();
        assert_eq!(model.k().shape(), (5, 5));
        let eye = model.k() * model.k_inv();
        assert_relative_eq!(eye, DMatrix::identity(5, 5), epsilon = 1E-8);
    }

    #[test]
    fn fit_rejects_mismatched_lengths() {
        let mut gp = GaussianProcessRegressor::new(RBFKernel::default());
        assert_eq!(
            gp.fit(&[0.0, 1.0], &[0.0], 0.1_f64),
            Err(GpError::DimensionMismatch {
                name: "y",
                expected: 2,
                given: 1
            })
        );
        assert!(!gp.is_fit());
    }

    #[test]
    fn fit_rejects_bad_noise() {
        let mut gp = GaussianProcessRegressor::new(RBFKernel::default());
        assert!(matches!(
            gp.fit(&[0.0, 1.0], &[0.0, 1.0], -0.1_f64),
            Err(GpError::InvalidParameter(_))
        ));
        assert!(matches!(
            gp.fit(&[0.0, 1.0], &[0.0, 1.0], vec![0.1, 0.2, 0.3]),
            Err(GpError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn fit_rejects_misshapen_kernel_output() {
        let column_only = FnKernel::new(|a: &DVector<f64>, _: &DVector<f64>| {
            DMatrix::zeros(a.len(), 1)
        });
        let mut gp = GaussianProcessRegressor::new(column_only);
        assert_eq!(
            gp.fit(&[0.0, 1.0], &[0.0, 1.0], 0.1_f64),
            Err(GpError::DimensionMismatch {
                name: "kernel output columns",
                expected: 2,
                given: 1
            })
        );
        assert!(!gp.is_fit());
        assert!(matches!(
            gp.sample_prior(&[0.0, 1.0], 2),
            Err(GpError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn posterior_rejects_misshapen_cross_covariance() {
        // square for any single point set, wrong between two different sets
        let self_only = FnKernel::new(|a: &DVector<f64>, _: &DVector<f64>| {
            DMatrix::identity(a.len(), a.len())
        });
        let mut gp = GaussianProcessRegressor::new(self_only);
        gp.fit(&[0.0, 1.0], &[0.0, 1.0], 0.1_f64).unwrap();

        let expected = Err(GpError::DimensionMismatch {
            name: "kernel output columns",
            expected: 2,
            given: 3,
        });
        assert_eq!(gp.predict(&[0.0, 0.5, 1.0]).map(|_| ()), expected);
        assert_eq!(
            gp.sample_posterior(&[0.0, 0.5, 1.0], 1).map(|_| ()),
            expected
        );
    }

    #[test]
    fn failed_fit_keeps_previous_state() {
        let mut gp = sin_gp();
        let before = gp.fitted().unwrap().clone();

        // duplicated points without noise make K singular
        let res = gp.fit(&[1.0, 1.0], &[0.0, 2.0], NoiseModel::Uniform(0.0));
        assert_eq!(res, Err(GpError::Singular));
        assert_eq!(gp.fitted().unwrap(), &before);
    }

    #[test]
    fn refit_replaces_training_data() {
        let mut gp = sin_gp();
        gp.fit(&[0.0, 2.0], &[1.0, -1.0], NoiseModel::Uniform(0.1))
            .unwrap();
        assert_eq!(gp.train_x().unwrap().len(), 2);
        assert_eq!(gp.train_y().unwrap().as_slice(), &[1.0, -1.0]);
    }

    #[test]
    fn per_point_noise() {
        let mut gp = GaussianProcessRegressor::new(RBFKernel::default());
        gp.fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], vec![0.1, 1.0, 0.1])
            .unwrap();
        let (_, std) = gp.predict_with_std(&[0.0, 1.0, 2.0]).unwrap();
        // the noisy middle observation is less certain
        assert!(std[1] > std[0]);
        assert!(std[1] > std[2]);
    }

    #[test]
    fn ln_m() {
        let mut gp = GaussianProcessRegressor::new(RBFKernel::default());
        gp.fit(&[0.0], &[1.0], NoiseModel::Uniform(0.0)).unwrap();
        // single point, K = [1]: -0.5 y² - 0 - 0.5 ln(2π)
        assert::close(gp.ln_m().unwrap(), -0.5 - HALF_LN_2PI, 1E-12);

        let gp = sin_gp();
        let model = gp.fitted().unwrap();
        let y = model.train_y();
        let k = model.k();
        let expected = -0.5 * (y.transpose() * model.k_inv() * y)[0]
            - 0.5 * k.determinant().ln()
            - 2.5 * (2.0 * std::f64::consts::PI).ln();
        assert::close(gp.ln_m().unwrap(), expected, 1E-6);
    }

    #[test]
    fn posterior_samples_with_explicit_rng() {
        let gp = sin_gp();
        let mut rng_a = Xoshiro256Plus::seed_from_u64(3);
        let mut rng_b = Xoshiro256Plus::seed_from_u64(3);
        let xs = [-0.5, 0.0, 0.5];

        let (a, std_a) = gp
            .sample_posterior_with_rng(&xs, 2, DEFAULT_REG, &mut rng_a)
            .unwrap();
        let (b, std_b) = gp
            .sample_posterior_with_rng(&xs, 2, DEFAULT_REG, &mut rng_b)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(std_a, std_b);
        assert_eq!(a.shape(), (3, 2));
    }

    #[test]
    fn sample_posterior_rejects_bad_arguments() {
        let mut gp = sin_gp();
        assert!(matches!(
            gp.sample_posterior(&[0.0], 0),
            Err(GpError::InvalidParameter(_))
        ));
        assert!(matches!(
            gp.sample_posterior(&[], 1),
            Err(GpError::InvalidParameter(_))
        ));
        assert!(matches!(
            gp.sample_posterior_with_reg(&[0.0], 1, -1.0),
            Err(GpError::InvalidParameter(_))
        ));
    }

    #[test]
    fn posterior_std_matches_jittered_diagonal() {
        let mut gp = sin_gp();
        let xs = [-4.5, 0.0, 3.0];
        let (_, cov) = gp.posterior_moments(&xs).unwrap();
        let (_, std) = gp.sample_posterior_with_std(&xs, 1).unwrap();
        let expected = std_from_cov(&cov);
        // jitter is ~1E-12 in variance
        assert_relative_eq!(std, expected, epsilon = 1E-6);
    }

    #[test]
    fn error_messages() {
        assert!(GpError::Unfit.to_string().contains("fit"));
        let e = GpError::DimensionMismatch {
            name: "y",
            expected: 3,
            given: 2,
        };
        assert_eq!(e.to_string(), "Length of y must be 3, given: 2");
        let e: GpError = MvGaussianError::ZeroDimension.into();
        assert!(e.to_string().contains("dims"));
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn fitted_model_serde_roundtrip() {
        let gp = sin_gp();
        let model = gp.fitted().unwrap();
        let s = serde_json::to_string(model).unwrap();
        let back: FittedModel = serde_json::from_str(&s).unwrap();
        assert_relative_eq!(*back.k_inv(), *model.k_inv(), epsilon = 1E-12);
        assert_eq!(back.train_x(), model.train_x());
    }
}
