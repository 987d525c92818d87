/// Validate an RPC endpoint.
///
/// Accepts absolute HTTP(S) URLs with a host, and same-origin proxy paths
/// such as `/api/sepolia` that a backend forwards to the real node.
pub fn validate_rpc_url(url: &str) -> bool {
    if url.starts_with('/') && !url.starts_with("//") {
        return !url.chars().any(char::is_whitespace);
    }
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https() {
        assert!(validate_rpc_url("https://eth-sepolia.g.alchemy.com/v2"));
    }

    #[test]
    fn accepts_http_localhost() {
        assert!(validate_rpc_url("http://localhost:8545"));
    }

    #[test]
    fn accepts_proxy_paths() {
        assert!(validate_rpc_url("/api/sepolia"));
        assert!(validate_rpc_url("/api/arbitrumSepolia"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(!validate_rpc_url(""));
        assert!(!validate_rpc_url("not a url"));
        assert!(!validate_rpc_url("ftp://server.com"));
        assert!(!validate_rpc_url("file:///etc/passwd"));
        assert!(!validate_rpc_url("//evil.example.com/rpc"));
        assert!(!validate_rpc_url("/api/with space"));
    }
}
