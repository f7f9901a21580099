// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server flavors, smallest to largest.

use std::fmt::Display;
use std::str::FromStr;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::encode::EncodeError;

/// The CPU/RAM tier of a server.
///
/// On the wire a flavor is its bare numeric code (`"flavorRef": 101`). Only
/// the codes listed here are accepted by the provider, so conversion from an
/// integer or string fails for anything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flavor {
    XSmall,
    Small,
    Medium,
    Large,
    XLarge,
    DblXLarge,
}

impl Flavor {
    /// Every flavor, smallest to largest.
    pub const ALL: [Flavor; 6] = [
        Flavor::XSmall,
        Flavor::Small,
        Flavor::Medium,
        Flavor::Large,
        Flavor::XLarge,
        Flavor::DblXLarge,
    ];

    /// The numeric code the provider uses for this flavor.
    pub const fn code(self) -> u32 {
        match self {
            Flavor::XSmall => 100,
            Flavor::Small => 101,
            Flavor::Medium => 102,
            Flavor::Large => 103,
            Flavor::XLarge => 104,
            Flavor::DblXLarge => 105,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Flavor::XSmall => "x-small",
            Flavor::Small => "small",
            Flavor::Medium => "medium",
            Flavor::Large => "large",
            Flavor::XLarge => "x-large",
            Flavor::DblXLarge => "double-x-large",
        }
    }
}

impl TryFrom<u32> for Flavor {
    type Error = EncodeError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|f| f.code() == code)
            .ok_or(EncodeError::InvalidFlavor(code))
    }
}

impl FromStr for Flavor {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u32>() {
            return Self::try_from(code);
        }

        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            // A name that is not a tier has no code; report it as 0, which
            // no tier uses.
            .ok_or(EncodeError::InvalidFlavor(0))
    }
}

impl Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Flavor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.code())
    }
}

impl<'d> Deserialize<'d> for Flavor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'d>,
    {
        let code = u32::deserialize(deserializer)?;
        Flavor::try_from(code).map_err(de::Error::custom)
    }
}

impl JsonSchema for Flavor {
    fn is_referenceable() -> bool {
        false
    }

    fn schema_name() -> String {
        "Flavor".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <u32>::json_schema(gen)
    }
}
