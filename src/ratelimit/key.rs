//! Rate limit key composition.

/// Delimiter between key parts.
///
/// Callers must not pass raw colons inside identity parts; escape them first
/// if an identity source can contain one.
pub const KEY_DELIMITER: char = ':';

/// A key that uniquely identifies one caller's window for one call site.
///
/// The key is the join of the non-empty parts supplied by the caller, in
/// order. Two part lists whose non-empty parts match produce the same key;
/// any difference in a non-empty part produces a different key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    /// Compose a key from an ordered list of optional parts.
    ///
    /// `None` and empty-string parts are dropped; the remaining parts keep
    /// their order. A list that reduces to zero parts yields the empty key,
    /// deterministically. Callers should always supply at least one stable
    /// part (typically a call-site literal) so that distinct call sites
    /// never collide.
    pub fn compose<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let joined = parts
            .into_iter()
            .flatten()
            .filter(|p| !p.as_ref().is_empty())
            .map(|p| p.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(&KEY_DELIMITER.to_string());

        Self(joined)
    }

    /// The string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_joins_parts_in_order() {
        let key = RateLimitKey::compose([Some("login"), Some("1.2.3.4")]);
        assert_eq!(key.as_str(), "login:1.2.3.4");
    }

    #[test]
    fn test_compose_drops_missing_parts() {
        let key = RateLimitKey::compose([Some("pwdreq"), None, Some("a@x.com")]);
        assert_eq!(key.as_str(), "pwdreq:a@x.com");
    }

    #[test]
    fn test_compose_drops_empty_parts() {
        let key = RateLimitKey::compose([Some("register"), Some(""), Some("1.2.3.4")]);
        assert_eq!(key.as_str(), "register:1.2.3.4");
    }

    #[test]
    fn test_equal_part_lists_produce_equal_keys() {
        let a = RateLimitKey::compose([Some("login"), Some("1.2.3.4")]);
        let b = RateLimitKey::compose([Some("login"), None, Some(""), Some("1.2.3.4")]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_differing_parts_produce_differing_keys() {
        let a = RateLimitKey::compose([Some("pwdreq"), Some("9.9.9.9"), Some("a@x.com")]);
        let b = RateLimitKey::compose([Some("pwdreq"), Some("9.9.9.9"), Some("b@x.com")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_part_order_matters() {
        let a = RateLimitKey::compose([Some("a"), Some("b")]);
        let b = RateLimitKey::compose([Some("b"), Some("a")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_parts_yield_deterministic_empty_key() {
        let a = RateLimitKey::compose::<_, &str>([None, None]);
        let b = RateLimitKey::compose::<_, &str>([Some(""), None]);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "");
    }
}
