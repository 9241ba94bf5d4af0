//! Shared domain types

use crate::error::AgroError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! state_codes {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Brazilian federative unit (26 states plus the Federal District)
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum StateCode {
            $($variant),+
        }

        impl StateCode {
            /// Every federative unit, in alphabetical order of code
            pub const ALL: &'static [StateCode] = &[$(StateCode::$variant),+];

            /// Two-letter code, e.g. `"SC"`
            pub fn as_str(self) -> &'static str {
                match self {
                    $(StateCode::$variant => $name),+
                }
            }
        }

        impl FromStr for StateCode {
            type Err = AgroError;

            /// Codes are matched exactly: `"sc"` is not `"SC"`.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(StateCode::$variant),)+
                    other => Err(AgroError::InvalidStateCode(other.to_string())),
                }
            }
        }
    };
}

state_codes! {
    Ac => "AC",
    Al => "AL",
    Am => "AM",
    Ap => "AP",
    Ba => "BA",
    Ce => "CE",
    Df => "DF",
    Es => "ES",
    Go => "GO",
    Ma => "MA",
    Mg => "MG",
    Ms => "MS",
    Mt => "MT",
    Pa => "PA",
    Pb => "PB",
    Pe => "PE",
    Pi => "PI",
    Pr => "PR",
    Rj => "RJ",
    Rn => "RN",
    Ro => "RO",
    Rr => "RR",
    Rs => "RS",
    Sc => "SC",
    Se => "SE",
    Sp => "SP",
    To => "TO",
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StateCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StateCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
