use anyhow::{bail, Context};

/// Convert a 32 byte hex string, with or without the `0x` prefix, to a byte array
pub fn hex_to_bytes32(hex: &str) -> anyhow::Result<[u8; 32]> {
    let stripped = hex.strip_prefix("0x").unwrap_or(hex);

    if stripped.len() != 64 {
        bail!(
            "Expected 32 bytes of hex, got {} characters: {}",
            stripped.len(),
            hex
        );
    }

    let mut out = [0u8; 32];
    ::hex::decode_to_slice(stripped, &mut out)
        .with_context(|| format!("Invalid hex string: {}", hex))?;

    Ok(out)
}

/// Lowercase `0x` prefixed hex of a 32 byte array
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", ::hex::encode(bytes))
}
