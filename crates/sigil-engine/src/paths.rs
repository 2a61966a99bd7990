//! Storage layout.
//!
//! ```text
//! salt
//! role/<role name>
//! key/<key name>
//! secret/<role id>/<secret id>
//! ```

pub(crate) const SALT: &str = "salt";
pub(crate) const ROLE_PREFIX: &str = "role/";
pub(crate) const KEY_PREFIX: &str = "key/";

pub(crate) fn role(name: &str) -> String {
    format!("{}{}", ROLE_PREFIX, name)
}

pub(crate) fn key(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, name)
}

pub(crate) fn secret(role_id: &str, secret_id: &str) -> String {
    format!("secret/{}/{}", role_id, secret_id)
}

/// Role and key names become single path segments.
pub(crate) fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name must not be empty".to_string());
    }
    if name.len() > 128 {
        return Err("name must be at most 128 characters".to_string());
    }
    if name.starts_with('.') {
        return Err("name must not start with '.'".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err("name may only contain ASCII letters, digits, '-', '_' and '.'".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name() {
        assert!(check_name("billing").is_ok());
        assert!(check_name("billing-v2.prod_eu").is_ok());
        for bad in ["", ".hidden", "a/b", "../x", "spaced name", "ünï"] {
            assert!(check_name(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_layout() {
        assert_eq!(role("billing"), "role/billing");
        assert_eq!(key("primary"), "key/primary");
        assert_eq!(secret("r1", "s1"), "secret/r1/s1");
    }
}
