use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_WEIGHT_ATTRIBUTE, DEFAULT_WEIGHT_LOCATION, DEFAULT_WEIGHT_TIME, DEFAULT_WEIGHT_VISUAL,
    WEIGHT_SUM_TOLERANCE,
};

/// Caller-supplied component weights. Any subset may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

impl FeatureWeights {
    pub fn visual(mut self, w: f64) -> Self {
        self.visual = Some(w);
        self
    }

    pub fn attribute(mut self, w: f64) -> Self {
        self.attribute = Some(w);
        self
    }

    pub fn location(mut self, w: f64) -> Self {
        self.location = Some(w);
        self
    }

    pub fn time(mut self, w: f64) -> Self {
        self.time = Some(w);
        self
    }

    /// Fills unset components from `defaults` and rescales so the four values sum to 1.
    ///
    /// Negative or non-finite weights count as zero. If everything ends up zero the
    /// normalized `defaults` are used instead.
    pub fn normalize(&self, defaults: &WeightVector) -> WeightVector {
        let filled = WeightVector {
            visual: sanitize(self.visual.unwrap_or(defaults.visual)),
            attribute: sanitize(self.attribute.unwrap_or(defaults.attribute)),
            location: sanitize(self.location.unwrap_or(defaults.location)),
            time: sanitize(self.time.unwrap_or(defaults.time)),
        };

        match filled.rescaled() {
            Some(weights) => weights,
            None => defaults.rescaled().unwrap_or_else(WeightVector::uniform),
        }
    }
}

fn sanitize(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}

/// Concrete weights for the four components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub visual: f64,
    pub attribute: f64,
    pub location: f64,
    pub time: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self {
            visual: DEFAULT_WEIGHT_VISUAL,
            attribute: DEFAULT_WEIGHT_ATTRIBUTE,
            location: DEFAULT_WEIGHT_LOCATION,
            time: DEFAULT_WEIGHT_TIME,
        }
    }
}

impl WeightVector {
    pub fn uniform() -> Self {
        Self {
            visual: 0.25,
            attribute: 0.25,
            location: 0.25,
            time: 0.25,
        }
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.visual + self.attribute + self.location + self.time
    }

    /// Returns `true` if the weights sum to one within [`WEIGHT_SUM_TOLERANCE`].
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    fn rescaled(&self) -> Option<Self> {
        let total = self.sum();
        if !total.is_finite() || total <= 0.0 {
            return None;
        }

        let mut scaled = Self {
            visual: self.visual / total,
            attribute: self.attribute / total,
            location: self.location / total,
            time: self.time / total,
        };
        // Push the rounding residue into the largest component so the sum is exact.
        let residue = 1.0 - scaled.sum();
        *scaled.largest_mut() += residue;
        Some(scaled)
    }

    fn largest_mut(&mut self) -> &mut f64 {
        let mut largest = &mut self.visual;
        for w in [&mut self.attribute, &mut self.location, &mut self.time] {
            if *w > *largest {
                largest = w;
            }
        }
        largest
    }
}

/// Why a pair could not be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusableReason {
    DimensionMismatch { source_dim: usize, candidate_dim: usize },
}

/// Per-component and overall similarity of one pair, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub visual: f64,
    pub attribute: f64,
    pub location: f64,
    pub time: f64,
    pub overall: f64,
    #[serde(skip)]
    pub unusable: Option<UnusableReason>,
}

impl ComparisonResult {
    /// All-zero result flagged as unusable.
    pub fn unusable(reason: UnusableReason) -> Self {
        Self {
            visual: 0.0,
            attribute: 0.0,
            location: 0.0,
            time: 0.0,
            overall: 0.0,
            unusable: Some(reason),
        }
    }

    /// Returns `true` unless the pair was flagged as unusable.
    pub fn is_usable(&self) -> bool {
        self.unusable.is_none()
    }

    /// Returns `true` if every score is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.visual, self.attribute, self.location, self.time, self.overall]
            .iter()
            .all(|s| s.is_finite())
    }
}
