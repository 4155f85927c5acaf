//! Best-effort extraction of revert reasons from provider error strings.

/// Pull a human-readable revert reason out of an RPC error message.
///
/// Providers vary wildly in how they surface reverts. The common shapes are
/// `"execution reverted: REASON"`, `"execution reverted"` with no reason, and
/// raw error data (`0x...`) for custom errors. Anything else yields `None` so
/// callers never mistake a transport failure for a decoded reason.
pub fn reason_from_message(message: &str) -> Option<String> {
    let start = message.find("execution reverted")?;
    let after = &message[start + "execution reverted".len()..];

    if let Some(rest) = after.strip_prefix(':') {
        let reason: String = rest
            .trim()
            .trim_matches('"')
            .trim_matches('\'')
            .chars()
            .take(200)
            .collect();
        if reason.is_empty() {
            return Some("execution reverted".to_string());
        }
        return Some(reason);
    }

    // Custom errors come back as undecorated hex data.
    if let Some(hex_start) = after.find("0x") {
        let hex_part = &after[hex_start..];
        let hex_end = hex_part
            .find(|c: char| !c.is_ascii_hexdigit() && c != 'x')
            .unwrap_or(hex_part.len().min(66));
        return Some(format!("reverted with data {}", &hex_part[..hex_end]));
    }

    Some("execution reverted".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_with_message() {
        let msg = "JSON-RPC error: execution reverted: UniswapV2Router: EXPIRED";
        assert_eq!(
            reason_from_message(msg).as_deref(),
            Some("UniswapV2Router: EXPIRED")
        );
    }

    #[test]
    fn test_reason_without_message() {
        assert_eq!(
            reason_from_message("execution reverted").as_deref(),
            Some("execution reverted")
        );
    }

    #[test]
    fn test_custom_error_data() {
        let msg = "execution reverted, data 0xdeadbeef";
        assert_eq!(
            reason_from_message(msg).as_deref(),
            Some("reverted with data 0xdeadbeef")
        );
    }

    #[test]
    fn test_transport_error_yields_none() {
        assert_eq!(reason_from_message("connection refused"), None);
    }
}
