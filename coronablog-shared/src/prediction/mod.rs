/// Case and death forecasting
///
/// [`Predictor::generate`] loads the historical dataset, fits a degree-5
/// polynomial to cases and to deaths over the time axis, and evaluates both
/// curves for the requested number of days after the last observation.
///
/// Forecasting never fails. If the dataset is missing or unusable, or the
/// fit breaks down, a randomized mock forecast is returned instead and
/// [`Forecast::source`] says so.
///
/// # Example
///
/// ```no_run
/// use coronablog_shared::prediction::{PredictionConfig, Predictor};
///
/// let predictor = Predictor::new(PredictionConfig::default());
/// let forecast = predictor.generate(7);
/// assert_eq!(forecast.cases.len(), 7);
/// ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub mod dataset;
pub mod regression;

pub use dataset::Dataset;
pub use regression::{PolynomialModel, DEFAULT_DEGREE};

/// Forecast length used when none is requested
pub const DEFAULT_HORIZON: usize = 7;

pub const DEFAULT_DATASET_PATH: &str = "static/dataset/turkey.csv";

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("dataset not found at {0}")]
    MissingDataset(PathBuf),

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("required column '{0}' not found in dataset")]
    MissingColumn(&'static str),

    #[error("row {row}: column '{column}' is not a number: {value:?}")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: time column is empty")]
    MissingTime { row: usize },

    #[error("dataset has no rows")]
    Empty,

    #[error("regression system is singular")]
    Singular,
}

#[derive(Debug, Clone)]
pub struct PredictionConfig {
    pub dataset_path: PathBuf,

    /// First time index to forecast. `None` means the day after the last
    /// observation in the dataset.
    pub base_offset: Option<u32>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            base_offset: None,
        }
    }
}

/// Where a forecast came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastSource {
    /// Fitted to the historical dataset
    Model,

    /// Synthetic fallback data
    Mock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub cases: Vec<u64>,
    pub deaths: Vec<u64>,
    pub source: ForecastSource,
}

/// Case and death curves fitted to one dataset
#[derive(Debug, Clone)]
pub struct FittedModels {
    cases: PolynomialModel,
    deaths: PolynomialModel,
    base: f64,
}

impl FittedModels {
    /// Evaluates both curves at `base + i` for `i in 0..days`
    pub fn predict(&self, days: usize) -> (Vec<u64>, Vec<u64>) {
        (0..days)
            .map(|i| {
                let x = self.base + i as f64;
                (
                    to_count(self.cases.predict(x)),
                    to_count(self.deaths.predict(x)),
                )
            })
            .unzip()
    }

    /// First forecast time index
    pub fn base(&self) -> f64 {
        self.base
    }
}

#[derive(Debug, Clone)]
pub struct Predictor {
    config: PredictionConfig,
}

impl Predictor {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Reads the dataset, or `None` if it is missing or unusable
    pub fn load(&self) -> Option<Dataset> {
        match Dataset::from_path(&self.config.dataset_path) {
            Ok(dataset) => {
                debug!(rows = dataset.len(), "Loaded prediction dataset");
                Some(dataset)
            }
            Err(e) => {
                warn!(
                    path = %self.config.dataset_path.display(),
                    error = %e,
                    "Prediction dataset unavailable"
                );
                None
            }
        }
    }

    /// Fits case and death curves to `dataset`
    ///
    /// The degree is 5, lowered to `distinct time points - 1` for short
    /// datasets so the system stays determined.
    pub fn fit(&self, dataset: &Dataset) -> Result<FittedModels, PredictionError> {
        if dataset.is_empty() {
            return Err(PredictionError::Empty);
        }

        let degree = DEFAULT_DEGREE.min(dataset.distinct_times().saturating_sub(1));
        let cases = PolynomialModel::fit(&dataset.time, &dataset.cases, degree)?;
        let deaths = PolynomialModel::fit(&dataset.time, &dataset.deaths, degree)?;

        let base = match self.config.base_offset {
            Some(offset) => f64::from(offset),
            None => dataset.last_time() + 1.0,
        };

        Ok(FittedModels { cases, deaths, base })
    }

    /// Forecasts `days` days, falling back to mock data on any failure
    pub fn generate(&self, days: usize) -> Forecast {
        let fitted = self
            .load()
            .ok_or(PredictionError::Empty)
            .and_then(|dataset| self.fit(&dataset));

        match fitted {
            Ok(models) => {
                let (cases, deaths) = models.predict(days);
                Forecast {
                    cases,
                    deaths,
                    source: ForecastSource::Model,
                }
            }
            Err(e) => {
                warn!(error = %e, days, "Using mock data for predictions");
                mock_forecast(days, &mut rand::thread_rng())
            }
        }
    }
}

/// Synthetic forecast around a gentle upward trend
///
/// Day `i` gets `1000 + 50·i ± 100` cases and `50 + 2·i ± 10` deaths.
pub fn mock_forecast<R: Rng + ?Sized>(days: usize, rng: &mut R) -> Forecast {
    info!(days, "Generating mock predictions");

    let (cases, deaths) = (0..days)
        .map(|i| {
            let i = i as i64;
            let cases = 1000 + 50 * i + rng.gen_range(-100..=100);
            let deaths = 50 + 2 * i + rng.gen_range(-10..=10);
            (cases.max(0) as u64, deaths.max(0) as u64)
        })
        .unzip();

    Forecast {
        cases,
        deaths,
        source: ForecastSource::Mock,
    }
}

/// Truncates toward zero and clamps at zero; NaN counts as zero
fn to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}
