// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Encoding of a [`ProvisionRequest`] into a create-server request body.
//!
//! The provider treats an absent optional field as "use the default", so a
//! field is only transmitted when it carries a meaningful value: empty
//! strings, zero counts, a false config-drive flag and empty collections are
//! all left out. Required fields always come first, in the order `flavorRef`,
//! `imageRef`, `name`, followed by whichever optional fields are present:
//!
//! ```text
//! {"server":{"flavorRef":101,"imageRef":8419,"name":"web1",
//!            "personality":..,"key_name":..,"config_drive":true,
//!            "min_count":..,"max_count":..,"user_data":"<base64>",
//!            "metadata":{..},"security_groups":[{"name":..},..]}}
//! ```

use std::collections::BTreeMap;

use base64::Engine;
use serde::Serialize;
use thiserror::Error;

use crate::flavor::Flavor;
use crate::request::ProvisionRequest;

/// Maximum size of a personality payload, in bytes.
pub const PERSONALITY_MAX_BYTES: usize = 255;

/// Errors which may be returned when encoding a provisioning request.
///
/// Each validation error names exactly one violated requirement; the caller
/// is expected to correct its input and try again.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Flavor reference {0} does not refer to an existing flavor")]
    InvalidFlavor(u32),

    #[error("An image reference is required")]
    MissingImage,

    #[error("A server name is required")]
    MissingName,

    #[error(
        "Personality is {0} bytes, cannot exceed {PERSONALITY_MAX_BYTES} bytes"
    )]
    PersonalityTooLarge(usize),

    #[error("Failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A serialized create-server request body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

impl AsRef<[u8]> for EncodedPayload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<EncodedPayload> for Vec<u8> {
    fn from(payload: EncodedPayload) -> Self {
        payload.into_bytes()
    }
}

#[derive(Serialize)]
struct CreateServerBody<'a> {
    server: ServerBody<'a>,
}

// Field order here is the order on the wire.
#[derive(Serialize)]
struct ServerBody<'a> {
    #[serde(rename = "flavorRef")]
    flavor_ref: Flavor,
    #[serde(rename = "imageRef")]
    image_ref: u64,
    name: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    personality: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_drive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    security_groups: Option<Vec<GroupRef<'a>>>,
}

#[derive(Serialize)]
struct GroupRef<'a> {
    name: &'a str,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

fn positive(n: Option<u32>) -> Option<u32> {
    n.filter(|n| *n > 0)
}

/// Checks the requirements the provider places on a request. The flavor
/// needs no check here: a [`Flavor`] can only hold a valid tier.
fn validate(req: &ProvisionRequest) -> Result<(), EncodeError> {
    if req.image.0 == 0 {
        return Err(EncodeError::MissingImage);
    }
    if req.name.is_empty() {
        return Err(EncodeError::MissingName);
    }
    if let Some(personality) = &req.personality {
        if personality.len() > PERSONALITY_MAX_BYTES {
            return Err(EncodeError::PersonalityTooLarge(personality.len()));
        }
    }
    Ok(())
}

impl<'a> ServerBody<'a> {
    fn from_request(req: &'a ProvisionRequest) -> Self {
        let user_data = non_empty(&req.user_data).map(|data| {
            base64::engine::general_purpose::STANDARD.encode(data.as_bytes())
        });
        let security_groups = (!req.security_groups.is_empty()).then(|| {
            req.security_groups
                .iter()
                .map(|group| GroupRef { name: &group.name })
                .collect()
        });

        Self {
            flavor_ref: req.flavor,
            image_ref: req.image.0,
            name: &req.name,
            personality: non_empty(&req.personality),
            key_name: non_empty(&req.key_name),
            config_drive: req.use_config_drive.then_some(true),
            min_count: positive(req.min_count),
            max_count: positive(req.max_count),
            user_data,
            metadata: (!req.metadata.is_empty()).then_some(&req.metadata),
            security_groups,
        }
    }
}

/// Validates `req` and serializes it into a create-server request body.
///
/// Validation stops at the first violated requirement, checked in the order
/// image, name, personality size. On failure no payload is produced.
pub fn encode(req: &ProvisionRequest) -> Result<EncodedPayload, EncodeError> {
    validate(req)?;
    let body = CreateServerBody { server: ServerBody::from_request(req) };
    Ok(EncodedPayload(serde_json::to_string(&body)?))
}
