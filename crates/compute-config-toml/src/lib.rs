// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TOML configuration for the compute client: where the compute endpoint
//! lives and a set of named server definitions.
//!
//! ```toml
//! [endpoint]
//! compute_url = "https://compute.example/v1.1/"
//! tenant_id = "1234"
//!
//! [server.web1]
//! flavor = "small"
//! image = 8419
//! key_name = "deploy"
//! security_groups = ["default", "web"]
//!
//! [server.web1.metadata]
//! role = "web"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use compute_api_types::{
    EncodeError, Flavor, ImageId, ProvisionRequest, SecurityGroup,
};

/// Configuration for the compute client.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Option<Endpoint>,

    #[serde(default, rename = "server")]
    pub servers: BTreeMap<String, ServerConfig>,
}

/// The tenant's compute endpoint.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub compute_url: String,
    pub tenant_id: String,
}

/// A flavor, given either as its numeric code or by tier name.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum FlavorRef {
    Code(u32),
    Name(String),
}

impl FlavorRef {
    pub fn resolve(&self) -> Result<Flavor, EncodeError> {
        match self {
            FlavorRef::Code(code) => Flavor::try_from(*code),
            FlavorRef::Name(name) => name.parse(),
        }
    }
}

/// A server definition, keyed by a name in the `[server]` table.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ServerConfig {
    /// Display name of the server. Defaults to the definition's key.
    pub name: Option<String>,

    pub flavor: FlavorRef,
    pub image: u64,

    pub key_name: Option<String>,
    pub personality: Option<String>,

    #[serde(default)]
    pub config_drive: bool,

    pub min_count: Option<u32>,
    pub max_count: Option<u32>,

    /// Inline user data. Mutually exclusive with `user_data_file`.
    pub user_data: Option<String>,

    /// File holding the user data. A relative path is resolved against the
    /// directory of the configuration file.
    pub user_data_file: Option<PathBuf>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,

    #[serde(default)]
    pub security_groups: Vec<String>,
}

impl ServerConfig {
    /// Builds the provisioning request for this definition. `key` is the
    /// definition's name in the `[server]` table.
    pub fn to_request(
        &self,
        key: &str,
    ) -> Result<ProvisionRequest, ParseError> {
        let flavor = self.flavor.resolve().map_err(|e| ParseError::Flavor {
            server: key.to_string(),
            source: e,
        })?;

        let user_data = match (&self.user_data, &self.user_data_file) {
            (Some(_), Some(_)) => {
                return Err(ParseError::ConflictingUserData(key.to_string()))
            }
            (Some(data), None) => Some(data.clone()),
            (None, Some(path)) => {
                let data = std::fs::read_to_string(path).map_err(|e| {
                    ParseError::UserDataFile {
                        server: key.to_string(),
                        path: path.clone(),
                        source: e,
                    }
                })?;
                Some(data)
            }
            (None, None) => None,
        };

        let mut req = ProvisionRequest::new(
            flavor,
            ImageId(self.image),
            self.name.as_deref().unwrap_or(key),
        );
        req.key_name = self.key_name.clone();
        req.personality = self.personality.clone();
        req.use_config_drive = self.config_drive;
        req.min_count = self.min_count;
        req.max_count = self.max_count;
        req.user_data = user_data;
        req.metadata = self.metadata.clone();
        req.security_groups =
            self.security_groups.iter().map(SecurityGroup::new).collect();
        Ok(req)
    }
}

impl Config {
    /// Builds the provisioning request for the server definition `key`.
    pub fn server_request(
        &self,
        key: &str,
    ) -> Result<ProvisionRequest, ParseError> {
        self.servers
            .get(key)
            .ok_or_else(|| ParseError::ServerNotFound(key.to_string()))?
            .to_request(key)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for server in self.servers.values_mut() {
            if let Some(path) = server.user_data_file.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}

/// Errors which may be returned when parsing the client configuration.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Cannot parse toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server {0} not found in configuration")]
    ServerNotFound(String),

    #[error("Invalid flavor for server {server}: {source}")]
    Flavor { server: String, source: EncodeError },

    #[error("Server {0} sets both user_data and user_data_file")]
    ConflictingUserData(String),

    #[error("Cannot read user data for server {server} from {path:?}: {source}")]
    UserDataFile { server: String, path: PathBuf, source: std::io::Error },
}

/// Parses a TOML file into a configuration object.
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Config, ParseError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let mut cfg = toml::from_str::<Config>(&contents)?;
    if let Some(dir) = path.parent() {
        cfg.resolve_paths(dir);
    }
    Ok(cfg)
}
