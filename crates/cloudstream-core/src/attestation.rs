//! Cloud-check attestation helpers.
//!
//! The validated cloud check works challenge/response: the caller generates
//! a nonce, passes it to [`crate::runtime::StreamRuntime::cloud_check`], and
//! verifies that the attestation blob the runtime returns covers that exact
//! nonce. The blob itself is vendor-opaque apart from the verifiable part:
//! a version prefix followed by the standard-base64 nonce payload.
//!
//! ```text
//! blob := "att-v1." || base64(nonce)
//! ```

/// Minimum nonce length accepted by the cloud check, in bytes.
pub const MIN_NONCE_SIZE: usize = 16;

/// Version prefix of attestation blobs this bridge can verify.
const ATTESTATION_PREFIX: &str = "att-v1.";

// ── Nonce generation ──────────────────────────────────────────────────────────

/// Generates a fresh 16-byte challenge nonce.
///
/// UUID v4 bytes provide exactly [`MIN_NONCE_SIZE`] bytes of randomness
/// without pulling in a dedicated RNG crate.
pub fn generate_nonce() -> [u8; MIN_NONCE_SIZE] {
    *uuid::Uuid::new_v4().as_bytes()
}

// ── Attestation blobs ─────────────────────────────────────────────────────────

/// Builds the attestation blob covering `nonce`.
///
/// Used by in-tree runtime implementations; a vendor-backed runtime returns
/// its own blob in the same format.
pub fn attestation_data_for(nonce: &[u8]) -> String {
    format!("{ATTESTATION_PREFIX}{}", base64_encode(nonce))
}

/// Verifies that `data` is a well-formed attestation blob covering `nonce`.
///
/// Returns `false` for an unknown prefix, malformed base64, or a payload
/// that does not match the challenge nonce byte-for-byte.
pub fn verify_attestation_data(data: &str, nonce: &[u8]) -> bool {
    let Some(payload) = data.strip_prefix(ATTESTATION_PREFIX) else {
        return false;
    };
    match base64_decode(payload) {
        Some(decoded) => decoded == nonce,
        None => false,
    }
}

// ── Base64 (RFC 4648, standard alphabet) ──────────────────────────────────────

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encodes `data` as standard base64 with `=` padding.
pub fn base64_encode(data: &[u8]) -> String {
    let mut result = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let b0 = chunk[0];
        let b1 = if chunk.len() > 1 { chunk[1] } else { 0 };
        let b2 = if chunk.len() > 2 { chunk[2] } else { 0 };

        // Four 6-bit groups out of the 24-bit concatenation b0:b1:b2.
        let i0 = (b0 >> 2) as usize;
        let i1 = (((b0 & 0x03) << 4) | (b1 >> 4)) as usize;
        let i2 = (((b1 & 0x0F) << 2) | (b2 >> 6)) as usize;
        let i3 = (b2 & 0x3F) as usize;

        result.push(ALPHABET[i0] as char);
        result.push(ALPHABET[i1] as char);
        result.push(if chunk.len() > 1 { ALPHABET[i2] as char } else { '=' });
        result.push(if chunk.len() > 2 { ALPHABET[i3] as char } else { '=' });
    }

    result
}

/// Decodes standard base64. Returns `None` on any malformed input: length
/// not a multiple of 4, characters outside the alphabet, or misplaced
/// padding.
pub fn base64_decode(input: &str) -> Option<Vec<u8>> {
    if input.len() % 4 != 0 {
        return None;
    }

    let mut result = Vec::with_capacity(input.len() / 4 * 3);
    let bytes = input.as_bytes();

    for (chunk_idx, chunk) in bytes.chunks(4).enumerate() {
        let is_last_chunk = (chunk_idx + 1) * 4 == bytes.len();
        let mut vals = [0u8; 4];
        let mut pad = 0usize;

        for (i, &c) in chunk.iter().enumerate() {
            if c == b'=' {
                // Padding may only appear in the last one or two positions
                // of the final chunk.
                if !is_last_chunk || i < 2 {
                    return None;
                }
                pad += 1;
                continue;
            }
            if pad > 0 {
                // A data character after padding is malformed.
                return None;
            }
            vals[i] = match c {
                b'A'..=b'Z' => c - b'A',
                b'a'..=b'z' => c - b'a' + 26,
                b'0'..=b'9' => c - b'0' + 52,
                b'+' => 62,
                b'/' => 63,
                _ => return None,
            };
        }

        result.push((vals[0] << 2) | (vals[1] >> 4));
        if pad < 2 {
            result.push((vals[1] << 4) | (vals[2] >> 2));
        }
        if pad < 1 {
            result.push((vals[2] << 6) | vals[3]);
        }
    }

    Some(result)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_nonce_has_min_size() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), MIN_NONCE_SIZE);
    }

    #[test]
    fn test_generated_nonces_differ() {
        // Two fresh challenges must not collide.
        assert_ne!(generate_nonce(), generate_nonce());
    }

    #[test]
    fn test_attestation_round_trip_verifies() {
        // Arrange
        let nonce = generate_nonce();
        // Act
        let blob = attestation_data_for(&nonce);
        // Assert
        assert!(verify_attestation_data(&blob, &nonce));
    }

    #[test]
    fn test_attestation_fails_for_wrong_nonce() {
        let blob = attestation_data_for(&generate_nonce());
        let other = generate_nonce();
        assert!(!verify_attestation_data(&blob, &other));
    }

    #[test]
    fn test_attestation_fails_for_unknown_prefix() {
        let nonce = generate_nonce();
        let blob = format!("att-v9.{}", base64_encode(&nonce));
        assert!(!verify_attestation_data(&blob, &nonce));
    }

    #[test]
    fn test_attestation_fails_for_malformed_payload() {
        assert!(!verify_attestation_data("att-v1.@@@@", &generate_nonce()));
    }

    #[test]
    fn test_base64_hello_matches_rfc_vector() {
        // RFC 4648 test vector: "Hello" → "SGVsbG8="
        assert_eq!(base64_encode(b"Hello"), "SGVsbG8=");
    }

    #[test]
    fn test_base64_empty_input_produces_empty_string() {
        assert_eq!(base64_encode(&[]), "");
        assert_eq!(base64_decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_base64_padding_variants() {
        assert_eq!(base64_encode(b"M"), "TQ==");
        assert_eq!(base64_encode(b"Ma"), "TWE=");
        assert_eq!(base64_encode(b"Man"), "TWFu");
    }

    #[test]
    fn test_base64_decode_matches_encode() {
        for input in [&b""[..], b"M", b"Ma", b"Man", b"Hello, cloud!", &[0xFF, 0x00, 0x7F]] {
            let encoded = base64_encode(input);
            assert_eq!(base64_decode(&encoded).unwrap(), input, "input {input:?}");
        }
    }

    #[test]
    fn test_base64_decode_rejects_bad_length() {
        assert!(base64_decode("SGVsbG8").is_none());
    }

    #[test]
    fn test_base64_decode_rejects_bad_characters() {
        assert!(base64_decode("SGV@").is_none());
    }

    #[test]
    fn test_base64_decode_rejects_interior_padding() {
        assert!(base64_decode("TQ==TWFu").is_none());
    }
}
