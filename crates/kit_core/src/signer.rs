use serde::{Deserialize, Serialize};

/// Lifecycle of the signer backing the smart accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlchemySignerStatus {
    #[default]
    Initializing,
    Connected,
    Disconnected,
    Authenticating,
}

impl AlchemySignerStatus {
    pub const ALL: [Self; 4] = [
        Self::Initializing,
        Self::Connected,
        Self::Disconnected,
        Self::Authenticating,
    ];
}

/// Signer status plus one boolean per status.
///
/// The flags are derived from `status` and exactly one of them is set.
/// Fields are private so the flags cannot drift; deserialization reads only
/// `status` and recomputes the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSignerStatus")]
pub struct SignerStatus {
    status: AlchemySignerStatus,
    is_initializing: bool,
    is_authenticating: bool,
    is_connected: bool,
    is_disconnected: bool,
}

impl Default for SignerStatus {
    fn default() -> Self {
        AlchemySignerStatus::default().into()
    }
}

#[derive(Deserialize)]
struct StoredSignerStatus {
    status: AlchemySignerStatus,
}

impl From<StoredSignerStatus> for SignerStatus {
    fn from(stored: StoredSignerStatus) -> Self {
        stored.status.into()
    }
}

impl From<AlchemySignerStatus> for SignerStatus {
    fn from(status: AlchemySignerStatus) -> Self {
        Self {
            status,
            is_initializing: status == AlchemySignerStatus::Initializing,
            is_authenticating: status == AlchemySignerStatus::Authenticating,
            is_connected: status == AlchemySignerStatus::Connected,
            is_disconnected: status == AlchemySignerStatus::Disconnected,
        }
    }
}

impl SignerStatus {
    pub fn status(&self) -> AlchemySignerStatus {
        self.status
    }

    pub fn is_initializing(&self) -> bool {
        self.is_initializing
    }

    pub fn is_authenticating(&self) -> bool {
        self.is_authenticating
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn is_disconnected(&self) -> bool {
        self.is_disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(s: &SignerStatus) -> [bool; 4] {
        [
            s.is_initializing(),
            s.is_connected(),
            s.is_disconnected(),
            s.is_authenticating(),
        ]
    }

    #[test]
    fn exactly_one_flag_matches_status() {
        for (i, status) in AlchemySignerStatus::ALL.into_iter().enumerate() {
            let state = SignerStatus::from(status);
            let set = flags(&state);
            assert_eq!(set.iter().filter(|f| **f).count(), 1, "{status:?}");
            assert!(set[i], "{status:?} flag not set");
            assert_eq!(state.status(), status);
        }
    }

    #[test]
    fn default_is_initializing() {
        let state = SignerStatus::default();
        assert_eq!(state.status(), AlchemySignerStatus::Initializing);
        assert!(state.is_initializing());
        assert!(!state.is_connected());
    }

    #[test]
    fn serializes_with_flags() {
        let json = serde_json::to_value(SignerStatus::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "INITIALIZING",
                "isInitializing": true,
                "isAuthenticating": false,
                "isConnected": false,
                "isDisconnected": false,
            })
        );
    }

    #[test]
    fn inconsistent_stored_flags_are_recomputed() {
        let state: SignerStatus = serde_json::from_str(
            r#"{
                "status": "CONNECTED",
                "isInitializing": true,
                "isAuthenticating": true,
                "isConnected": false,
                "isDisconnected": false
            }"#,
        )
        .unwrap();

        assert_eq!(state, SignerStatus::from(AlchemySignerStatus::Connected));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<SignerStatus, _> =
            serde_json::from_str(r#"{ "status": "AWAITING_EMAIL_AUTH" }"#);
        assert!(result.is_err());
    }
}
