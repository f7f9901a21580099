// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A client for the compute provisioning API.

use reqwest::Method;
use serde::de::DeserializeOwned;
use slog::{info, o, Logger};
use thiserror::Error;

use compute_api_types::{
    encode, EncodeError, Flavors, Image, Images, ProvisionRequest,
    RebootRequest, ServerResponse,
};

pub mod transport;

pub use compute_api_types as types;
pub use transport::{HttpTransport, Transport};

/// Errors which may be returned from the compute client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid provisioning request: {0}")]
    Encode(#[from] EncodeError),

    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Bad Status: {0}")]
    Status(u16),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client-side connection to a tenant's compute endpoint.
pub struct Client<T = HttpTransport> {
    transport: T,
    log: Logger,
}

impl Client<HttpTransport> {
    /// Creates a client speaking HTTP to `compute_url` on behalf of
    /// `tenant_id`.
    pub fn new_http(compute_url: &str, tenant_id: &str, log: Logger) -> Self {
        let transport = HttpTransport::new(compute_url, tenant_id, log.clone());
        Self::new(transport, log)
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, log: Logger) -> Self {
        Self { transport, log: log.new(o!("component" => "compute-client")) }
    }

    // Sends a request and parses the response body into a deserializable
    // type.
    async fn send_and_parse<R: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<R, Error> {
        let bytes = self.transport.send(path, method, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Creates a server as described by `request`.
    ///
    /// The request is encoded before anything is sent; if it is invalid the
    /// encoding error is returned and the provider is never contacted.
    pub async fn create_server(
        &self,
        request: &ProvisionRequest,
    ) -> Result<ServerResponse, Error> {
        let body = encode(request)?;
        info!(self.log, "creating server";
            "name" => &request.name,
            "flavor" => %request.flavor,
            "image" => %request.image);
        self.send_and_parse("servers", Method::POST, Some(body.into_bytes()))
            .await
    }

    /// Deletes the server with `server_id`.
    pub async fn delete_server(&self, server_id: &str) -> Result<(), Error> {
        info!(self.log, "deleting server"; "server_id" => server_id);
        self.transport
            .send(&format!("servers/{}", server_id), Method::DELETE, None)
            .await?;
        Ok(())
    }

    /// Reboots the server with `server_id`. The provider always performs a
    /// hard reboot.
    pub async fn reboot_server(&self, server_id: &str) -> Result<(), Error> {
        info!(self.log, "rebooting server"; "server_id" => server_id);
        let body = serde_json::to_vec(&RebootRequest::hard())?;
        self.transport
            .send(
                &format!("servers/{}/action", server_id),
                Method::POST,
                Some(body),
            )
            .await?;
        Ok(())
    }

    /// Lists the flavors the provider offers.
    pub async fn list_flavors(&self) -> Result<Flavors, Error> {
        self.send_and_parse("flavors", Method::GET, None).await
    }

    /// Lists the images available to the tenant.
    pub async fn list_images(&self) -> Result<Images, Error> {
        self.send_and_parse("images", Method::GET, None).await
    }

    /// Returns the details of the image with `image_id`.
    pub async fn get_image(&self, image_id: &str) -> Result<Image, Error> {
        self.send_and_parse(&format!("images/{}", image_id), Method::GET, None)
            .await
    }

    /// Deletes the image with `image_id`.
    pub async fn delete_image(&self, image_id: &str) -> Result<(), Error> {
        info!(self.log, "deleting image"; "image_id" => image_id);
        self.transport
            .send(&format!("images/{}", image_id), Method::DELETE, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transport::MockTransport;
    use compute_api_types::{Flavor, ImageId, SecurityGroup};
    use slog::Discard;

    fn log() -> Logger {
        Logger::root(Discard, o!())
    }

    fn request() -> ProvisionRequest {
        let mut req =
            ProvisionRequest::new(Flavor::Small, ImageId(8419), "web1");
        req.metadata.insert("role".to_string(), "web".to_string());
        req.security_groups = vec![SecurityGroup::new("default")];
        req
    }

    #[tokio::test]
    async fn create_server_posts_encoded_request() {
        let expected = encode(&request()).unwrap().into_bytes();

        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(move |path, method, body| {
                path == "servers"
                    && *method == Method::POST
                    && body.as_deref() == Some(expected.as_slice())
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(br#"{"server": {"id": 95873, "name": "web1",
                    "adminPass": "s3cr3t"}}"#
                    .to_vec())
            });

        let client = Client::new(transport, log());
        let resp = client.create_server(&request()).await.unwrap();
        assert_eq!(resp.server.id, 95873);
        assert_eq!(resp.server.admin_pass, "s3cr3t");
    }

    #[tokio::test]
    async fn invalid_request_is_never_sent() {
        let mut transport = MockTransport::new();
        transport.expect_send().never();

        let client = Client::new(transport, log());
        let mut req = request();
        req.image = ImageId(0);
        let err = client.create_server(&req).await.unwrap_err();
        assert!(matches!(err, Error::Encode(EncodeError::MissingImage)));

        let mut req = request();
        req.name.clear();
        let err = client.create_server(&req).await.unwrap_err();
        assert!(matches!(err, Error::Encode(EncodeError::MissingName)));
    }

    #[tokio::test]
    async fn transport_status_is_propagated() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_, _, _| Err(Error::Status(413)));

        let client = Client::new(transport, log());
        let err = client.create_server(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Status(413)));
    }

    #[tokio::test]
    async fn malformed_response_is_a_json_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_, _, _| Ok(b"<html>gateway timeout</html>".to_vec()));

        let client = Client::new(transport, log());
        let err = client.list_images().await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn reboot_sends_hard_reboot_action() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|path, method, body| {
                path == "servers/95873/action"
                    && *method == Method::POST
                    && body.as_deref()
                        == Some(br#"{"reboot":{"type":"HARD"}}"#.as_slice())
            })
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let client = Client::new(transport, log());
        client.reboot_server("95873").await.unwrap();
    }

    #[tokio::test]
    async fn deletes_have_no_body() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|path, method, body| {
                path == "servers/95873"
                    && *method == Method::DELETE
                    && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));
        transport
            .expect_send()
            .withf(|path, method, body| {
                path == "images/99"
                    && *method == Method::DELETE
                    && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(Vec::new()));

        let client = Client::new(transport, log());
        client.delete_server("95873").await.unwrap();
        client.delete_image("99").await.unwrap();
    }

    #[tokio::test]
    async fn listings_are_parsed() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|path, method, _| {
                path == "flavors" && *method == Method::GET
            })
            .returning(|_, _, _| {
                Ok(br#"{"flavors": [{"name": "standard.small", "id": "101"}]}"#
                    .to_vec())
            });
        transport
            .expect_send()
            .withf(|path, method, _| {
                path == "images/8419" && *method == Method::GET
            })
            .returning(|_, _, _| {
                Ok(br#"{"image": {"name": "Ubuntu Precise", "id": "8419",
                    "status": "ACTIVE", "progress": 100}}"#
                    .to_vec())
            });

        let client = Client::new(transport, log());
        let flavors = client.list_flavors().await.unwrap();
        assert_eq!(flavors.flavors[0].id, "101");
        let image = client.get_image("8419").await.unwrap();
        assert_eq!(image.image.status, "ACTIVE");
    }
}
