/// Refresh endpoint path used when the config does not override it.
pub const DEFAULT_REFRESH_PATH: &str = "/api/auth/refresh";

/// Normalize a base URL by stripping trailing slashes.
pub fn normalize_base_url(input: &str) -> String {
    input.trim().trim_end_matches('/').to_string()
}

/// Join a request path onto a normalized base URL.
pub fn join_url(base: &str, path: &str) -> String {
    let base = normalize_base_url(base);
    let path = path.trim();
    if path.is_empty() {
        return base;
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Compare two request paths ignoring trailing slashes.
pub fn same_path(left: &str, right: &str) -> bool {
    left.trim().trim_end_matches('/') == right.trim().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::{join_url, normalize_base_url, same_path};

    #[test]
    fn join_handles_slash_variants() {
        assert_eq!(join_url("http://x/", "/api/users"), "http://x/api/users");
        assert_eq!(join_url("http://x", "api/users"), "http://x/api/users");
        assert_eq!(join_url("http://x/", ""), "http://x");
    }

    #[test]
    fn base_url_normalization_strips_trailing_slashes() {
        assert_eq!(normalize_base_url(" http://x// "), "http://x");
    }

    #[test]
    fn path_comparison_ignores_trailing_slash() {
        assert!(same_path("/api/auth/refresh/", "/api/auth/refresh"));
        assert!(!same_path("/api/auth/refresh", "/api/auth"));
    }
}
