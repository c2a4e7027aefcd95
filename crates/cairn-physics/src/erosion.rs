//! Accelerated-time weathering of the rock's render scale.

use cairn_config::ErosionConfig;

/// Simulated age and resulting scale of the rock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErosionState {
    pub simulated_years: f64,
    pub years_per_second: f64,
    /// Uniform render scale in `[0, 1]`, never increasing between resets.
    pub scale_factor: f64,
}

/// Shrinks the rock's render transform as simulated years pass.
///
/// Each tick multiplies the scale by `1 - base_rate * multiplier * dy` where
/// `dy` is the simulated years elapsed that tick. Mesh geometry is never
/// touched; the host applies [`scale_factor`](Self::scale_factor) to the
/// rock transform.
#[derive(Clone, Debug)]
pub struct ErosionSimulator {
    state: ErosionState,
    base_rate: f64,
}

impl ErosionSimulator {
    pub fn new(years_per_second: f64, base_rate: f64) -> Self {
        Self {
            state: ErosionState {
                simulated_years: 0.0,
                years_per_second,
                scale_factor: 1.0,
            },
            base_rate,
        }
    }

    pub fn from_config(config: &ErosionConfig) -> Self {
        Self::new(config.years_per_second, config.base_rate)
    }

    pub fn state(&self) -> &ErosionState {
        &self.state
    }

    pub fn scale_factor(&self) -> f64 {
        self.state.scale_factor
    }

    pub fn simulated_years(&self) -> f64 {
        self.state.simulated_years
    }

    pub fn base_rate(&self) -> f64 {
        self.base_rate
    }

    /// Advance by `dt_seconds` of real time under `weather_multiplier`.
    ///
    /// Negative `dt_seconds` or multipliers are treated as zero so the scale
    /// can only shrink.
    pub fn tick(&mut self, dt_seconds: f64, weather_multiplier: f64) {
        let delta_years = self.state.years_per_second * dt_seconds.max(0.0);
        self.state.simulated_years += delta_years;
        let loss = (self.base_rate * weather_multiplier.max(0.0) * delta_years).clamp(0.0, 1.0);
        self.state.scale_factor *= 1.0 - loss;
    }

    /// Restore a pristine rock.
    pub fn reset(&mut self) {
        self.state.simulated_years = 0.0;
        self.state.scale_factor = 1.0;
        tracing::debug!("Erosion reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_matches_closed_form() {
        let mut sim = ErosionSimulator::new(100.0, 1.0e-4);
        let (m, d) = (8.0, 1.0 / 60.0);
        let mut expected = 1.0;
        for _ in 0..600 {
            sim.tick(d, m);
            expected *= 1.0 - 1.0e-4 * m * (100.0 * d);
        }
        assert!((sim.scale_factor() - expected).abs() < 1e-12);
        assert!((sim.simulated_years() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_never_increases() {
        let mut sim = ErosionSimulator::new(50.0, 1.0e-3);
        let mut previous = sim.scale_factor();
        for (i, m) in [1.0, 8.0, 4.0, 1.5, 0.0, -3.0].iter().cycle().take(300).enumerate() {
            let dt = if i % 7 == 0 { -0.1 } else { 0.016 };
            sim.tick(dt, *m);
            assert!(sim.scale_factor() <= previous);
            previous = sim.scale_factor();
        }
        assert!(sim.scale_factor() >= 0.0);
    }

    #[test]
    fn test_heavier_weather_erodes_faster() {
        let mut clear = ErosionSimulator::new(10.0, 1.0e-3);
        let mut storm = ErosionSimulator::new(10.0, 1.0e-3);
        for _ in 0..100 {
            clear.tick(0.1, 1.0);
            storm.tick(0.1, 8.0);
        }
        assert!(storm.scale_factor() < clear.scale_factor());
    }

    #[test]
    fn test_huge_step_clamps_at_zero() {
        let mut sim = ErosionSimulator::new(1.0e6, 1.0);
        sim.tick(10.0, 8.0);
        assert_eq!(sim.scale_factor(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut sim = ErosionSimulator::from_config(&ErosionConfig::default());
        sim.tick(5.0, 4.0);
        assert!(sim.scale_factor() < 1.0);
        sim.reset();
        assert_eq!(sim.scale_factor(), 1.0);
        assert_eq!(sim.simulated_years(), 0.0);
    }
}
