// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebootType {
    Hard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Reboot {
    #[serde(rename = "type")]
    pub kind: RebootType,
}

/// Body of a server reboot action.
///
/// The provider performs a hard reboot whatever type is requested, so a hard
/// reboot is the only kind offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct RebootRequest {
    pub reboot: Reboot,
}

impl RebootRequest {
    pub fn hard() -> Self {
        Self { reboot: Reboot { kind: RebootType::Hard } }
    }
}
