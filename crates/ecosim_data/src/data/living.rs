use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trophic rank of an organism.
///
/// Variants are declared bottom-up along the food chain, so the derived
/// ordering is `Grass < Lemming < Fox` (producer < prey < predator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Grass,
    Lemming,
    Fox,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Grass, Species::Lemming, Species::Fox];

    pub fn trophic_rank(self) -> u8 {
        match self {
            Species::Grass => 0,
            Species::Lemming => 1,
            Species::Fox => 2,
        }
    }

    pub fn is_producer(self) -> bool {
        self == Species::Grass
    }

    /// The species directly below this one in the food chain.
    pub fn prey(self) -> Option<Species> {
        match self {
            Species::Grass => None,
            Species::Lemming => Some(Species::Grass),
            Species::Fox => Some(Species::Lemming),
        }
    }

    pub fn can_eat(self, other: Species) -> bool {
        self.prey() == Some(other)
    }

    pub fn can_breed_with(self, other: Species) -> bool {
        self == other
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Grass => "grass",
            Species::Lemming => "lemming",
            Species::Fox => "fox",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Invalid energy {0}: must be finite and non-negative")]
    InvalidEnergy(f32),
}

/// Life state of an organism.
///
/// Deserialization goes through [`Living::new`], so stored energy is validated too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LivingRecord")]
pub struct Living {
    species: Species,
    pub energy: f32,
}

#[derive(Deserialize)]
struct LivingRecord {
    species: Species,
    energy: f32,
}

impl TryFrom<LivingRecord> for Living {
    type Error = ComponentError;

    fn try_from(record: LivingRecord) -> Result<Self, Self::Error> {
        Living::new(record.species, record.energy)
    }
}

impl Living {
    pub fn new(species: Species, energy: f32) -> Result<Self, ComponentError> {
        if !energy.is_finite() || energy < 0.0 {
            return Err(ComponentError::InvalidEnergy(energy));
        }
        Ok(Self { species, energy })
    }

    pub fn species(&self) -> Species {
        self.species
    }
}
