//! Synthetic sample markers for trying out the map.

use aquamap_schemas::{
    geo::Coordinates,
    marker::{MarkerColor, MarkerFields},
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive-exclusive value range for one generated parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn is_usable(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && (self.max - self.min).is_finite()
    }

    /// Empty or non-finite ranges yield `min`.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if !self.is_usable() || self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }

    fn check(&self, name: &str) -> Result<(), String> {
        if !self.is_usable() {
            return Err(format!("{} range [{}, {}) is not finite", name, self.min, self.max));
        }
        if self.max < self.min {
            return Err(format!("{} range has max {} below min {}", name, self.max, self.min));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub count: usize,
    pub center: Coordinates,
    /// Half-width of the latitude/longitude box around `center`, in degrees.
    pub spread_deg: f64,
    /// Fixed seed for reproducible batches.
    pub seed: Option<u64>,
    pub turbidity: ValueRange,
    pub ph: ValueRange,
    pub temperature: ValueRange,
    pub bod: ValueRange,
}

impl SampleConfig {
    /// Rejects bounds that cannot be drawn from.
    pub fn check(&self) -> Result<(), String> {
        if !self.spread_deg.is_finite() || self.spread_deg.abs() > 180.0 {
            return Err(format!("spread_deg {} must be finite and at most 180", self.spread_deg));
        }
        if !self.center.is_in_range() {
            return Err(format!(
                "center ({}, {}) is out of range",
                self.center.latitude, self.center.longitude
            ));
        }
        self.turbidity.check("turbidity")?;
        self.ph.check("ph")?;
        self.temperature.check("temperature")?;
        self.bod.check("bod")
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 50,
            center: Coordinates::new(28.614, 77.209),
            spread_deg: 0.4,
            seed: None,
            turbidity: ValueRange::new(1.0, 25.0),
            ph: ValueRange::new(6.0, 8.5),
            temperature: ValueRange::new(15.0, 32.0),
            bod: ValueRange::new(1.0, 12.0),
        }
    }
}

/// Draws `count` random samples uniformly within the configured box, each with
/// a random palette color and no optional parameters. Points are clamped to
/// valid coordinate ranges.
pub fn generate<R: Rng + ?Sized>(config: &SampleConfig, count: usize, rng: &mut R) -> Vec<MarkerFields> {
    let spread = ValueRange::new(-config.spread_deg.abs(), config.spread_deg.abs());
    (0..count)
        .map(|_| {
            let latitude = (config.center.latitude + spread.sample(rng)).clamp(-90.0, 90.0);
            let longitude = (config.center.longitude + spread.sample(rng)).clamp(-180.0, 180.0);
            let color = MarkerColor::ALL[rng.gen_range(0..MarkerColor::ALL.len())];
            MarkerFields {
                latitude,
                longitude,
                color: Some(color),
                turbidity: config.turbidity.sample(rng),
                ph: config.ph.sample(rng),
                temperature: config.temperature.sample(rng),
                bod: config.bod.sample(rng),
                conductivity: None,
                aod: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn samples_stay_inside_the_box_and_ranges() {
        let config = SampleConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let samples = generate(&config, 200, &mut rng);
        assert_eq!(samples.len(), 200);
        for s in &samples {
            assert!((s.latitude - 28.614).abs() <= 0.4);
            assert!((s.longitude - 77.209).abs() <= 0.4);
            assert!((6.0..8.5).contains(&s.ph));
            assert!(s.color.is_some());
            assert!(s.conductivity.is_none() && s.aod.is_none());
            assert!(validation::check_fields(s).is_ok());
        }
    }

    #[test]
    fn same_seed_same_batch() {
        let config = SampleConfig::default();
        let a = generate(&config, 5, &mut StdRng::seed_from_u64(1));
        let b = generate(&config, 5, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn boxes_near_the_pole_are_clamped() {
        let config = SampleConfig {
            center: Coordinates::new(89.9, 179.9),
            spread_deg: 1.0,
            ..SampleConfig::default()
        };
        let samples = generate(&config, 50, &mut StdRng::seed_from_u64(3));
        assert!(samples.iter().all(|s| s.coordinates().is_in_range()));
    }

    #[test]
    fn non_finite_bounds_fall_back_to_min() {
        let config = SampleConfig {
            spread_deg: f64::NAN,
            ph: ValueRange::new(5.0, f64::INFINITY),
            bod: ValueRange::new(f64::MIN, f64::MAX),
            ..SampleConfig::default()
        };
        let samples = generate(&config, 3, &mut StdRng::seed_from_u64(5));
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.ph == 5.0 && s.bod == f64::MIN));
    }

    #[test]
    fn check_rejects_unusable_bounds() {
        assert!(SampleConfig::default().check().is_ok());

        let nan_spread = SampleConfig {
            spread_deg: f64::NAN,
            ..SampleConfig::default()
        };
        assert!(nan_spread.check().unwrap_err().contains("spread_deg"));

        let open_ph = SampleConfig {
            ph: ValueRange::new(5.0, f64::INFINITY),
            ..SampleConfig::default()
        };
        assert!(open_ph.check().unwrap_err().contains("ph"));

        let inverted = SampleConfig {
            temperature: ValueRange::new(30.0, 10.0),
            ..SampleConfig::default()
        };
        assert!(inverted.check().unwrap_err().contains("temperature"));

        let degenerate = SampleConfig {
            bod: ValueRange::new(4.0, 4.0),
            ..SampleConfig::default()
        };
        assert!(degenerate.check().is_ok());
    }
}
