use alloy::primitives::Address;

/// Parses a `0x`-prefixed, 40 hex digit address.
///
/// All-lowercase inputs are accepted as-is. Any input with an uppercase hex
/// letter must match its EIP-55 checksum exactly.
pub fn parse_address(s: &str) -> Option<Address> {
    let digits = s.strip_prefix("0x")?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let address: Address = s.parse().ok()?;

    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_upper && address.to_checksum(None) != s {
        return None;
    }

    Some(address)
}

pub fn is_address(s: &str) -> bool {
    parse_address(s).is_some()
}
