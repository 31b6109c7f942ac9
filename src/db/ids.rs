// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document identifier generation and checks.

use ring::rand::SecureRandom;

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
/// Largest multiple of the alphabet size that fits in a byte.
const UNBIASED_LIMIT: u8 = 248;
const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Length of generated document IDs (same shape as Firestore auto IDs).
pub const GENERATED_ID_LEN: usize = 20;

/// Generate a random 20-character alphanumeric document ID.
pub fn generate_document_id(rng: &dyn SecureRandom) -> Result<String, ring::error::Unspecified> {
    let mut id = String::with_capacity(GENERATED_ID_LEN);
    let mut buf = [0u8; 32];

    while id.len() < GENERATED_ID_LEN {
        rng.fill(&mut buf)?;
        for &byte in buf.iter().filter(|&&b| b < UNBIASED_LIMIT) {
            if id.len() == GENERATED_ID_LEN {
                break;
            }
            id.push(ALPHABET[(byte % 62) as usize] as char);
        }
    }

    Ok(id)
}

/// Check that `id` can be used as a single document ID segment.
pub fn validate_document_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("document ID must not be empty".to_string());
    }
    if id.len() > MAX_DOCUMENT_ID_BYTES {
        return Err(format!(
            "document ID exceeds {} bytes",
            MAX_DOCUMENT_ID_BYTES
        ));
    }
    if id.contains('/') {
        return Err(format!("document ID '{}' must not contain '/'", id));
    }
    if id == "." || id == ".." {
        return Err(format!("document ID '{}' is reserved", id));
    }
    if id.len() >= 4 && id.starts_with("__") && id.ends_with("__") {
        return Err(format!("document ID '{}' is reserved", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::rand::SystemRandom;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_have_expected_shape() {
        let rng = SystemRandom::new();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let id = generate_document_id(&rng).unwrap();
            assert_eq!(id.len(), GENERATED_ID_LEN);
            assert!(id.bytes().all(|b| b.is_ascii_alphanumeric()));
            assert!(validate_document_id(&id).is_ok());
            seen.insert(id);
        }
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_validate_document_id() {
        assert!(validate_document_id("abc123").is_ok());
        assert!(validate_document_id("").is_err());
        assert!(validate_document_id("users/abc").is_err());
        assert!(validate_document_id(".").is_err());
        assert!(validate_document_id("..").is_err());
        assert!(validate_document_id("__id__").is_err());
        assert!(validate_document_id("__").is_ok());
        assert!(validate_document_id(&"x".repeat(MAX_DOCUMENT_ID_BYTES + 1)).is_err());
    }
}
