// OS keyring token backend
//
// Stores the session token as the `token` entry of the `odyssey` service.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use odyssey_api::{Error, TOKEN_KEY, TokenStore};

use crate::ConfigError;

pub const KEYRING_SERVICE: &str = "odyssey";

pub struct KeyringTokenStore {
    entry: keyring::Entry,
}

impl std::fmt::Debug for KeyringTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyringTokenStore")
            .field("service", &KEYRING_SERVICE)
            .field("user", &TOKEN_KEY)
            .finish()
    }
}

impl KeyringTokenStore {
    pub fn new() -> Result<Self, ConfigError> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, TOKEN_KEY)
            .map_err(|e| ConfigError::TokenStore(e.to_string()))?;
        Ok(Self { entry })
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SecretString>, Error> {
        match self.entry.get_password() {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Error::TokenStore(format!("keyring read failed: {e}"))),
        }
    }

    fn store(&self, token: &SecretString) -> Result<(), Error> {
        self.entry
            .set_password(token.expose_secret())
            .map_err(|e| Error::TokenStore(format!("keyring write failed: {e}")))?;
        debug!("token saved to keyring");
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::TokenStore(format!("keyring delete failed: {e}"))),
        }
    }
}
