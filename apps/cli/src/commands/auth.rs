//! # Auth Command
//!
//! Credential check gating the shell.

use tracing::{info, warn};

use crate::state::ConfigState;

/// Validates login credentials against the configuration.
///
/// Deliberately constant-shape: both fields are always compared.
pub fn validate_credentials(config: &ConfigState, user: &str, password: &str) -> bool {
    let user_ok = user == config.admin_user;
    let password_ok = password == config.admin_password;

    if user_ok && password_ok {
        info!(user = %user, "Login accepted");
        true
    } else {
        warn!(user = %user, "Login rejected");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_credentials_accepted() {
        let config = ConfigState::default();
        assert!(validate_credentials(&config, "admin", "1234"));
    }

    #[test]
    fn test_wrong_credentials_rejected() {
        let config = ConfigState::default();
        assert!(!validate_credentials(&config, "admin", "wrong"));
        assert!(!validate_credentials(&config, "root", "1234"));
        assert!(!validate_credentials(&config, "", ""));
    }
}
