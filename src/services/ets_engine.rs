//! Automatic exponential smoothing (ETS) engine
//!
//! Fits a small family of additive-error state space models and keeps the
//! one with the lowest AIC:
//!
//! - `ETS(A,N,N)`: level only (simple exponential smoothing)
//! - `ETS(A,A,N)`: level + linear trend (Holt)
//! - `ETS(A,Ad,N)`: level + damped trend
//! - `ETS(A,N,A)`, `ETS(A,A,A)`: additive seasonality, only when two full
//!   seasons of data are available
//!
//! Smoothing parameters are picked by grid search on the one-step-ahead SSE.
//! Everything runs on the calling thread and is deterministic.

use std::sync::Arc;

use crate::errors::EngineError;
use crate::models::Series;
use crate::services::forecast_engine::{FitOptions, ForecastEngine, TrainedModel};

const MIN_OBSERVATIONS: usize = 3;
const DAMPING: f64 = 0.98;

const ALPHA_GRID: &[f64] = &[0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.99];
const BETA_GRID: &[f64] = &[0.01, 0.05, 0.1, 0.2, 0.3];
const GAMMA_GRID: &[f64] = &[0.01, 0.05, 0.1, 0.2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendComponent {
    None,
    Additive,
    Damped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonalComponent {
    None,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EtsSpec {
    trend: TrendComponent,
    seasonal: SeasonalComponent,
}

impl EtsSpec {
    fn label(&self) -> String {
        let trend = match self.trend {
            TrendComponent::None => "N",
            TrendComponent::Additive => "A",
            TrendComponent::Damped => "Ad",
        };
        let seasonal = match self.seasonal {
            SeasonalComponent::None => "N",
            SeasonalComponent::Additive => "A",
        };
        format!("ETS(A,{},{})", trend, seasonal)
    }

    fn phi(&self) -> f64 {
        match self.trend {
            TrendComponent::Damped => DAMPING,
            _ => 1.0,
        }
    }

    /// Number of estimated quantities, smoothing parameters plus initial states.
    fn parameter_count(&self, period: usize) -> usize {
        let mut k = 2; // alpha, initial level
        match self.trend {
            TrendComponent::None => {}
            TrendComponent::Additive => k += 2,
            TrendComponent::Damped => k += 3,
        }
        if self.seasonal == SeasonalComponent::Additive {
            k += 1 + period;
        }
        k
    }
}

/// Fitted ETS model holding its final state
#[derive(Debug, Clone)]
pub struct EtsModel {
    spec: EtsSpec,
    alpha: f64,
    beta: f64,
    gamma: f64,
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    /// Number of observations the model was fit on
    observations: usize,
    aic: f64,
}

impl EtsModel {
    pub fn trend_component(&self) -> TrendComponent {
        self.spec.trend
    }

    pub fn seasonal_component(&self) -> SeasonalComponent {
        self.spec.seasonal
    }
}

impl TrainedModel for EtsModel {
    fn predict(&self, horizon: usize) -> Result<Vec<f64>, EngineError> {
        if horizon == 0 {
            return Err(EngineError::InvalidHorizon(horizon));
        }

        let phi = self.spec.phi();
        let mut forecasts = Vec::with_capacity(horizon);
        let mut damped_sum = 0.0;
        let mut phi_pow = 1.0;

        for h in 1..=horizon {
            phi_pow *= phi;
            damped_sum += phi_pow;

            let mut value = self.level + damped_sum * self.trend;
            if !self.seasonal.is_empty() {
                value += self.seasonal[(self.observations + h - 1) % self.seasonal.len()];
            }
            if !value.is_finite() {
                return Err(EngineError::NonFinite);
            }
            forecasts.push(value);
        }

        Ok(forecasts)
    }

    fn describe(&self) -> String {
        format!(
            "{} alpha={:.2} beta={:.2} gamma={:.2}",
            self.spec.label(),
            self.alpha,
            self.beta,
            self.gamma
        )
    }
}

/// Default engine: automatic ETS model selection
#[derive(Debug, Clone, Default)]
pub struct AutoEtsEngine;

impl AutoEtsEngine {
    pub fn new() -> Self {
        Self
    }

    fn candidates(n: usize, period: usize) -> Vec<EtsSpec> {
        let mut specs = vec![
            EtsSpec { trend: TrendComponent::None, seasonal: SeasonalComponent::None },
            EtsSpec { trend: TrendComponent::Additive, seasonal: SeasonalComponent::None },
            EtsSpec { trend: TrendComponent::Damped, seasonal: SeasonalComponent::None },
        ];
        if period >= 2 && n >= 2 * period {
            specs.push(EtsSpec { trend: TrendComponent::None, seasonal: SeasonalComponent::Additive });
            specs.push(EtsSpec { trend: TrendComponent::Additive, seasonal: SeasonalComponent::Additive });
        }
        specs
    }

    /// First observation scored by every candidate. Seasonal models need one
    /// full season to initialise, so when any are in the set all candidates
    /// are scored from there and their AICs share a sample.
    fn score_from(candidates: &[EtsSpec], period: usize) -> usize {
        if candidates.iter().any(|c| c.seasonal == SeasonalComponent::Additive) {
            period
        } else {
            1
        }
    }

    /// Grid search the smoothing parameters of one specification.
    fn fit_spec(spec: EtsSpec, data: &[f64], period: usize, score_from: usize) -> Option<EtsModel> {
        let betas: &[f64] = if spec.trend == TrendComponent::None { &[0.0] } else { BETA_GRID };
        let gammas: &[f64] = if spec.seasonal == SeasonalComponent::None { &[0.0] } else { GAMMA_GRID };

        let mut best: Option<(f64, EtsModel)> = None;
        for &alpha in ALPHA_GRID {
            for &beta in betas {
                if beta > alpha {
                    continue;
                }
                for &gamma in gammas {
                    let Some((sse, residuals, model)) = run_filter(spec, data, period, score_from, alpha, beta, gamma) else {
                        continue;
                    };
                    if best.as_ref().map_or(true, |(best_sse, _)| sse < *best_sse) {
                        let mse = (sse / residuals as f64).max(1e-12);
                        let aic = residuals as f64 * mse.ln() + 2.0 * spec.parameter_count(period) as f64;
                        best = Some((sse, EtsModel { aic, ..model }));
                    }
                }
            }
        }

        best.map(|(_, model)| model)
    }
}

/// Run the additive-error state recursions. Returns the SSE, the number of
/// residuals it was computed over, and the model at the final state.
/// Only errors at `t >= score_from` count towards the SSE.
fn run_filter(
    spec: EtsSpec,
    data: &[f64],
    period: usize,
    score_from: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> Option<(f64, usize, EtsModel)> {
    let n = data.len();
    let seasonal_model = spec.seasonal == SeasonalComponent::Additive;
    let phi = spec.phi();

    let (mut level, mut trend, mut seasonal, start) = if seasonal_model {
        let first = mean(&data[..period]);
        let trend = if spec.trend == TrendComponent::None {
            0.0
        } else {
            (mean(&data[period..2 * period]) - first) / period as f64
        };
        let seasonal: Vec<f64> = data[..period].iter().map(|y| y - first).collect();
        (first, trend, seasonal, period)
    } else {
        let trend = if spec.trend == TrendComponent::None { 0.0 } else { data[1] - data[0] };
        (data[0], trend, Vec::new(), 1)
    };

    let mut sse = 0.0;
    for (t, &y) in data.iter().enumerate().skip(start) {
        let season = if seasonal_model { seasonal[t % period] } else { 0.0 };
        let forecast = level + phi * trend + season;
        let error = y - forecast;
        if t >= score_from {
            sse += error * error;
        }

        let prev_level = level;
        level = alpha * (y - season) + (1.0 - alpha) * (prev_level + phi * trend);
        if spec.trend != TrendComponent::None {
            trend = beta * (level - prev_level) + (1.0 - beta) * phi * trend;
        }
        if seasonal_model {
            seasonal[t % period] = gamma * (y - level) + (1.0 - gamma) * season;
        }

        if !(level.is_finite() && trend.is_finite() && sse.is_finite()) {
            return None;
        }
    }

    Some((
        sse,
        n - score_from.max(start),
        EtsModel {
            spec,
            alpha,
            beta,
            gamma,
            level,
            trend,
            seasonal,
            observations: n,
            aic: f64::INFINITY,
        },
    ))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

impl ForecastEngine for AutoEtsEngine {
    fn name(&self) -> &'static str {
        "auto-ets"
    }

    fn fit(&self, series: &Series, options: &FitOptions) -> Result<Arc<dyn TrainedModel>, EngineError> {
        let data = series.values();
        if data.len() < MIN_OBSERVATIONS {
            return Err(EngineError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: data.len(),
            });
        }

        let candidates = Self::candidates(data.len(), options.season_length);
        let score_from = Self::score_from(&candidates, options.season_length);
        let best = candidates
            .into_iter()
            .filter_map(|spec| Self::fit_spec(spec, &data, options.season_length, score_from))
            .fold(None::<EtsModel>, |best, model| match best {
                Some(current) if current.aic <= model.aic => Some(current),
                _ => Some(model),
            })
            .ok_or_else(|| EngineError::Fit("no candidate model could be fit".to_string()))?;

        Ok(Arc::new(best))
    }
}
