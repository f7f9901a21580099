// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Types exchanged with the compute provisioning API.
//!
//! The request side is a typed model of a desired server
//! ([`ProvisionRequest`]) and the encoder that turns it into the provider's
//! create-server body ([`encode`]). The response side holds the records the
//! provider sends back. Nothing in this crate performs I/O; issuing requests
//! is the job of the client crate.

pub mod action;
pub mod encode;
pub mod flavor;
pub mod request;
pub mod response;

pub use action::RebootRequest;
pub use encode::{encode, EncodeError, EncodedPayload, PERSONALITY_MAX_BYTES};
pub use flavor::Flavor;
pub use request::{ImageId, ProvisionRequest, SecurityGroup};
pub use response::{
    Flavors, IdLink, Image, ImageDetail, Images, Link, ServerDetail,
    ServerResponse,
};
