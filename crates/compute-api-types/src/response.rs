// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Records returned by the provider.
//!
//! The provider leaves out fields freely, so every record tolerates missing
//! fields by falling back to their defaults.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default)]
pub struct Link {
    pub href: String,
    pub rel: String,
}

/// A reference to another resource: its name, identifier and links.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default)]
pub struct IdLink {
    pub name: String,
    pub id: String,
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct ServerDetail {
    pub status: String,
    #[serde(alias = "update")]
    pub updated: String,
    #[serde(rename = "hostId")]
    pub host_id: String,
    pub user_id: String,
    pub name: String,
    pub links: Vec<Link>,
    /// Addresses, keyed by network. The shape varies between providers.
    pub addresses: serde_json::Value,
    pub tenant_id: String,
    pub image: IdLink,
    pub created: String,
    pub uuid: String,
    #[serde(rename = "accessIPv4")]
    pub access_ipv4: String,
    #[serde(rename = "accessIPv6")]
    pub access_ipv6: String,
    pub key_name: String,
    /// Generated root password. Only returned when the server is created.
    #[serde(rename = "adminPass")]
    pub admin_pass: String,
    pub flavor: IdLink,
    pub config_drive: String,
    pub id: i64,
    pub security_groups: Vec<IdLink>,
    pub metadata: BTreeMap<String, String>,
}

/// Response to a successful create-server request.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ServerResponse {
    pub server: ServerDetail,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default)]
pub struct ImageDetail {
    pub name: String,
    pub id: String,
    pub links: Vec<Link>,
    pub progress: i64,
    pub metadata: BTreeMap<String, String>,
    pub status: String,
    pub updated: String,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
pub struct Image {
    pub image: ImageDetail,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
pub struct Images {
    pub images: Vec<IdLink>,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
pub struct Flavors {
    pub flavors: Vec<IdLink>,
}
