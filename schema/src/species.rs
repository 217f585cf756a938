use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Every monster species that has an entry in the species table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
pub enum Species {
    Sproutle,
    Bloomtail,
    Emberpup,
    Blazehound,
    Puddlefin,
    Tidecrest,
    Sparkit,
    Voltfang,
    Pebblor,
    Gustwing,
    Shadewisp,
    Toxilarva,
    Frostbun,
    Mindmoth,
}

impl Species {
    /// Human-readable species name.
    pub fn name(&self) -> &'static str {
        match self {
            Species::Sproutle => "Sproutle",
            Species::Bloomtail => "Bloomtail",
            Species::Emberpup => "Emberpup",
            Species::Blazehound => "Blazehound",
            Species::Puddlefin => "Puddlefin",
            Species::Tidecrest => "Tidecrest",
            Species::Sparkit => "Sparkit",
            Species::Voltfang => "Voltfang",
            Species::Pebblor => "Pebblor",
            Species::Gustwing => "Gustwing",
            Species::Shadewisp => "Shadewisp",
            Species::Toxilarva => "Toxilarva",
            Species::Frostbun => "Frostbun",
            Species::Mindmoth => "Mindmoth",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
