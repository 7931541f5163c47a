use serde::{Deserialize, Serialize};

/// Breed guess produced by the feature extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedGuess {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

/// One detected coat color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorGuess {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    Young,
    Adult,
    Senior,
}

impl AgeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBucket::Young => "young",
            AgeBucket::Adult => "adult",
            AgeBucket::Senior => "senior",
        }
    }
}

impl std::fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBucket {
    Small,
    Medium,
    Large,
}

impl SizeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeBucket::Small => "small",
            SizeBucket::Medium => "medium",
            SizeBucket::Large => "large",
        }
    }
}

impl std::fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured attributes estimated from a pet photo. Every field may be absent.
///
/// `colors` is ordered by the extractor's confidence. A present-but-empty list still counts
/// as "present" for attribute scoring (and then never matches).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<BreedGuess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<ColorGuess>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_age: Option<AgeBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_size: Option<SizeBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Attributes {
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn with_breed(mut self, name: impl Into<String>, confidence: f64) -> Self {
        self.breed = Some(BreedGuess {
            name: name.into(),
            confidence,
        });
        self
    }

    pub fn with_colors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = Some(
            names
                .into_iter()
                .map(|name| ColorGuess {
                    name: name.into(),
                    confidence: 1.0,
                })
                .collect(),
        );
        self
    }

    pub fn with_age(mut self, age: AgeBucket) -> Self {
        self.estimated_age = Some(age);
        self
    }

    pub fn with_size(mut self, size: SizeBucket) -> Self {
        self.estimated_size = Some(size);
        self
    }

    /// Returns `true` if none of the scored facets (breed, colors, age, size) are set.
    pub fn has_no_scored_facets(&self) -> bool {
        self.breed.is_none()
            && self.colors.is_none()
            && self.estimated_age.is_none()
            && self.estimated_size.is_none()
    }
}
