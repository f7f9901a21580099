// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flavor::Flavor;

/// Opaque numeric identifier of a boot image.
///
/// The catalog of valid identifiers lives with the provider. Zero is never a
/// valid image and is rejected when the request is encoded.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct ImageId(pub u64);

impl Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ImageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A security group, referenced by name.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema,
)]
pub struct SecurityGroup {
    pub name: String,
}

impl SecurityGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The server an operator wants the provider to create.
///
/// Only `flavor`, `image` and `name` are required by the provider. Every
/// other field left unset (or empty) is omitted from the request so that the
/// provider applies its own default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ProvisionRequest {
    pub flavor: Flavor,
    pub image: ImageId,
    /// Display name of the server.
    pub name: String,

    /// Name of the SSH key pair to inject.
    #[serde(default)]
    pub key_name: Option<String>,

    /// Inline file-injection payload, at most 255 bytes.
    #[serde(default)]
    pub personality: Option<String>,

    #[serde(default)]
    pub use_config_drive: bool,

    /// Minimum number of servers to create. Zero is the same as unset.
    #[serde(default)]
    pub min_count: Option<u32>,

    /// Maximum number of servers to create. Zero is the same as unset.
    #[serde(default)]
    pub max_count: Option<u32>,

    /// Free-form user data, sent base64-encoded.
    #[serde(default)]
    pub user_data: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
}

impl ProvisionRequest {
    /// Creates a request for a single server with every optional field unset.
    pub fn new(
        flavor: Flavor,
        image: ImageId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            flavor,
            image,
            name: name.into(),
            key_name: None,
            personality: None,
            use_config_drive: false,
            min_count: None,
            max_count: None,
            user_data: None,
            metadata: BTreeMap::new(),
            security_groups: Vec::new(),
        }
    }
}
