use crate::error::SimulationError;
use clmm_vault_domain::value_objects::Price;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

pub trait PricePathGenerator {
    /// Returns `steps + 1` prices, the first being the starting price.
    fn generate(&mut self, steps: usize) -> Result<Vec<Price>, SimulationError>;
}

pub struct GeometricBrownianMotion {
    pub initial_price: Decimal,
    pub drift: f64,      // annualized drift (mu)
    pub volatility: f64, // annualized volatility (sigma)
    pub time_step: f64,  // time step in years (dt) e.g. 1/365 for daily
    rng: StdRng,
}

impl GeometricBrownianMotion {
    /// A generator seeded from the OS.
    pub fn new(initial_price: Decimal, drift: f64, volatility: f64, time_step: f64) -> Self {
        Self {
            initial_price,
            drift,
            volatility,
            time_step,
            rng: StdRng::from_os_rng(),
        }
    }

    /// A reproducible generator.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl PricePathGenerator for GeometricBrownianMotion {
    fn generate(&mut self, steps: usize) -> Result<Vec<Price>, SimulationError> {
        if self.initial_price <= Decimal::ZERO {
            return Err(SimulationError::InvalidParameter(format!(
                "initial price must be positive, got {}",
                self.initial_price
            )));
        }
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| SimulationError::InvalidParameter(e.to_string()))?;

        let mut prices = Vec::with_capacity(steps + 1);
        prices.push(Price::new(self.initial_price));

        let dt = self.time_step;
        let drift_term = (self.drift - 0.5 * self.volatility.powi(2)) * dt;
        let vol_term = self.volatility * dt.sqrt();

        let mut current_price = self.initial_price.to_f64().unwrap_or(0.0);

        for _ in 0..steps {
            let z = normal.sample(&mut self.rng);
            current_price *= (drift_term + vol_term * z).exp();

            // f64 keeps the walk fast; Decimal only at the boundary
            let p = Decimal::from_f64(current_price).unwrap_or(Decimal::ZERO);
            prices.push(Price::new(p));
        }

        Ok(prices)
    }
}

/// Replays a fixed sequence, truncated to `steps + 1` prices.
pub struct DeterministicPricePath {
    pub prices: Vec<Price>,
}

impl DeterministicPricePath {
    pub fn new(prices: Vec<Price>) -> Self {
        Self { prices }
    }

    /// A path visiting the given ticks in order.
    pub fn from_ticks(ticks: &[i32]) -> Result<Self, SimulationError> {
        let prices = ticks
            .iter()
            .map(|tick| Price::from_tick(*tick))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { prices })
    }
}

impl PricePathGenerator for DeterministicPricePath {
    fn generate(&mut self, steps: usize) -> Result<Vec<Price>, SimulationError> {
        Ok(self.prices.iter().take(steps + 1).copied().collect())
    }
}
