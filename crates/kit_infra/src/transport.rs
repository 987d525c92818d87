use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chain::ChainDefinition;
use crate::error::InfraError;
use crate::rpc_url::validate_rpc_url;

/// Discriminator written next to a persisted transport.
pub const TRANSPORT_TYPE_TAG: &str = "__type";
pub const TRANSPORT_TYPE: &str = "Transport";

/// How to reach Alchemy's node and bundler endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlchemyTransportConfig {
    /// Route every request through a fixed URL (usually a backend proxy).
    RpcUrl {
        #[serde(rename = "rpcUrl")]
        rpc_url: String,
    },
    /// Append the API key to the chain's Alchemy endpoint.
    ApiKey {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
    /// Call the chain's Alchemy endpoint with a bearer token.
    Jwt { jwt: String },
}

impl AlchemyTransportConfig {
    pub fn rpc_url(url: impl Into<String>) -> Self {
        Self::RpcUrl {
            rpc_url: url.into(),
        }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey {
            api_key: key.into(),
        }
    }

    pub fn jwt(token: impl Into<String>) -> Self {
        Self::Jwt { jwt: token.into() }
    }

    /// The single JSON key/value pair this config serializes to.
    fn entry(&self) -> (&'static str, &str) {
        match self {
            Self::RpcUrl { rpc_url } => ("rpcUrl", rpc_url),
            Self::ApiKey { api_key } => ("apiKey", api_key),
            Self::Jwt { jwt } => ("jwt", jwt),
        }
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        match self {
            Self::RpcUrl { rpc_url } if !validate_rpc_url(rpc_url) => {
                Err(InfraError::InvalidRpcUrl(rpc_url.clone()))
            }
            Self::ApiKey { api_key } if api_key.trim().is_empty() => {
                Err(InfraError::EmptyCredential("apiKey"))
            }
            Self::Jwt { jwt } if jwt.trim().is_empty() => Err(InfraError::EmptyCredential("jwt")),
            _ => Ok(()),
        }
    }
}

/// A configured channel to a chain's Alchemy RPC endpoint.
///
/// This is a description, not a live connection: it resolves the endpoint
/// for a chain and the headers to send, and whoever performs the HTTP call
/// uses those. Extra headers are runtime-only and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlchemyTransport {
    config: AlchemyTransportConfig,
    headers: IndexMap<String, String>,
}

/// Build an Alchemy transport from its connection config.
pub fn alchemy(config: AlchemyTransportConfig) -> AlchemyTransport {
    AlchemyTransport {
        config,
        headers: IndexMap::new(),
    }
}

impl AlchemyTransport {
    pub fn config(&self) -> &AlchemyTransportConfig {
        &self.config
    }

    /// Merge extra headers into every subsequent request. Later values win.
    pub fn update_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in headers {
            self.headers.insert(key.into(), value.into());
        }
    }

    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// The endpoint requests for `chain` should be sent to.
    pub fn resolve_url(&self, chain: &ChainDefinition) -> Result<String, InfraError> {
        match &self.config {
            AlchemyTransportConfig::RpcUrl { rpc_url } => Ok(rpc_url.clone()),
            AlchemyTransportConfig::ApiKey { api_key } => {
                let base = alchemy_base(chain)?;
                Ok(format!("{}/{api_key}", base.trim_end_matches('/')))
            }
            AlchemyTransportConfig::Jwt { .. } => Ok(alchemy_base(chain)?.to_string()),
        }
    }

    /// Headers to attach to each request, including auth for JWT configs.
    pub fn request_headers(&self) -> IndexMap<String, String> {
        let mut headers = IndexMap::new();
        if let AlchemyTransportConfig::Jwt { jwt } = &self.config {
            headers.insert("Authorization".to_string(), format!("Bearer {jwt}"));
        }
        for (key, value) in &self.headers {
            headers.insert(key.clone(), value.clone());
        }
        headers
    }
}

fn alchemy_base(chain: &ChainDefinition) -> Result<&str, InfraError> {
    chain
        .alchemy_http_url()
        .ok_or(InfraError::NoAlchemyEndpoint { chain_id: chain.id })
}

impl Serialize for AlchemyTransport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (key, value) = self.config.entry();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(TRANSPORT_TYPE_TAG, TRANSPORT_TYPE)?;
        map.serialize_entry(key, value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for AlchemyTransport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Tagged {
            #[serde(rename = "__type")]
            kind: String,
            #[serde(flatten)]
            config: AlchemyTransportConfig,
        }

        let tagged = Tagged::deserialize(deserializer)?;
        if tagged.kind != TRANSPORT_TYPE {
            return Err(D::Error::custom(format!(
                "expected {TRANSPORT_TYPE}, found {}",
                tagged.kind
            )));
        }
        Ok(alchemy(tagged.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::{arbitrum_sepolia, sepolia};

    #[test]
    fn rpc_url_resolves_verbatim() {
        let transport = alchemy(AlchemyTransportConfig::rpc_url("/api/sepolia"));
        assert_eq!(transport.resolve_url(&sepolia()).unwrap(), "/api/sepolia");
        assert!(transport.request_headers().is_empty());
    }

    #[test]
    fn api_key_appends_to_alchemy_endpoint() {
        let transport = alchemy(AlchemyTransportConfig::api_key("abc123"));
        assert_eq!(
            transport.resolve_url(&arbitrum_sepolia()).unwrap(),
            "https://arb-sepolia.g.alchemy.com/v2/abc123"
        );
    }

    #[test]
    fn jwt_sets_bearer_header() {
        let transport = alchemy(AlchemyTransportConfig::jwt("token"));
        assert_eq!(
            transport.resolve_url(&sepolia()).unwrap(),
            "https://eth-sepolia.g.alchemy.com/v2"
        );
        assert_eq!(
            transport.request_headers().get("Authorization").map(String::as_str),
            Some("Bearer token")
        );
    }

    #[test]
    fn api_key_without_alchemy_endpoint_fails() {
        let mut chain = sepolia();
        chain.rpc_urls.shift_remove("alchemy");
        let transport = alchemy(AlchemyTransportConfig::api_key("abc"));
        assert_eq!(
            transport.resolve_url(&chain),
            Err(InfraError::NoAlchemyEndpoint { chain_id: 11155111 })
        );
    }

    #[test]
    fn update_headers_merges() {
        let mut transport = alchemy(AlchemyTransportConfig::rpc_url("/api/sepolia"));
        transport.update_headers([("X-Trace", "1")]);
        transport.update_headers([("X-Trace", "2"), ("X-Session", "s")]);
        assert_eq!(transport.headers().len(), 2);
        assert_eq!(transport.request_headers()["X-Trace"], "2");
    }

    #[test]
    fn validate_rejects_bad_configs() {
        assert!(AlchemyTransportConfig::rpc_url("/api/sepolia").validate().is_ok());
        assert_eq!(
            AlchemyTransportConfig::rpc_url("nope").validate(),
            Err(InfraError::InvalidRpcUrl("nope".into()))
        );
        assert_eq!(
            AlchemyTransportConfig::api_key(" ").validate(),
            Err(InfraError::EmptyCredential("apiKey"))
        );
        assert_eq!(
            AlchemyTransportConfig::jwt("").validate(),
            Err(InfraError::EmptyCredential("jwt"))
        );
    }

    #[test]
    fn persisted_form_is_tagged() {
        let transport = alchemy(AlchemyTransportConfig::rpc_url("/api/sepolia"));
        let json = serde_json::to_value(&transport).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "__type": "Transport", "rpcUrl": "/api/sepolia" })
        );

        let restored: AlchemyTransport = serde_json::from_value(json).unwrap();
        assert_eq!(restored, transport);
    }

    #[test]
    fn headers_are_not_persisted() {
        let mut transport = alchemy(AlchemyTransportConfig::api_key("k"));
        transport.update_headers([("X-Trace", "1")]);
        let json = serde_json::to_value(&transport).unwrap();
        assert_eq!(json, serde_json::json!({ "__type": "Transport", "apiKey": "k" }));
    }

    #[test]
    fn wrong_type_tag_is_rejected() {
        let result: Result<AlchemyTransport, _> =
            serde_json::from_value(serde_json::json!({ "__type": "Map", "rpcUrl": "/x" }));
        assert!(result.is_err());
    }

    #[test]
    fn config_deserializes_each_variant() {
        let rpc: AlchemyTransportConfig =
            serde_json::from_str(r#"{ "rpcUrl": "/api/signer" }"#).unwrap();
        assert_eq!(rpc, AlchemyTransportConfig::rpc_url("/api/signer"));

        let key: AlchemyTransportConfig = serde_json::from_str(r#"{ "apiKey": "k" }"#).unwrap();
        assert_eq!(key, AlchemyTransportConfig::api_key("k"));

        let jwt: AlchemyTransportConfig = serde_json::from_str(r#"{ "jwt": "t" }"#).unwrap();
        assert_eq!(jwt, AlchemyTransportConfig::jwt("t"));
    }
}
