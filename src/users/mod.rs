use crate::error::RegistryError;
use log::info;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Login {
    Registered,
    LoggedIn,
}

/// Username to password-digest table. First use of a name registers it.
#[derive(Default)]
pub struct UserRegistry {
    users: Mutex<HashMap<String, String>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_or_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Login, RegistryError> {
        let digest = sha256::digest(password);
        let mut users = self.users.lock().await;

        match users.get(username) {
            None => {
                users.insert(username.to_string(), digest);
                info!("Registered {} user!", username);
                Ok(Login::Registered)
            }
            Some(stored) if *stored == digest => {
                info!("User {} logging in!", username);
                Ok(Login::LoggedIn)
            }
            Some(_) => Err(RegistryError::CredentialMismatch(username.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registers_then_logs_in() {
        let registry = UserRegistry::new();

        assert_eq!(registry.register_or_login("fagd", "12345").await, Ok(Login::Registered));
        assert_eq!(registry.register_or_login("fagd", "12345").await, Ok(Login::LoggedIn));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let registry = UserRegistry::new();
        registry.register_or_login("fagd", "12345").await.unwrap();

        assert_eq!(
            registry.register_or_login("fagd", "54321").await,
            Err(RegistryError::CredentialMismatch("fagd".into()))
        );
        // The first password still works.
        assert_eq!(registry.register_or_login("fagd", "12345").await, Ok(Login::LoggedIn));
    }

    #[tokio::test]
    async fn passwords_are_not_stored_in_plaintext() {
        let registry = UserRegistry::new();
        registry.register_or_login("fagd", "12345").await.unwrap();

        let users = registry.users.lock().await;
        assert_ne!(users["fagd"], "12345");
    }
}
