//! Secret material generation.

use rand::RngCore;

/// Generate `len` bytes of random key material.
pub fn generate_key_material(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_material_length() {
        assert_eq!(generate_key_material(32).len(), 32);
        assert_eq!(generate_key_material(64).len(), 64);
    }

    #[test]
    fn test_key_material_is_random() {
        assert_ne!(generate_key_material(32), generate_key_material(32));
    }
}
