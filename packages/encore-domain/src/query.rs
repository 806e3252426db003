/// Canonicalizes a raw query string into a cache key: lowercase, trimmed,
/// internal whitespace runs collapsed to a single space. Idempotent; every
/// cache read and write site must go through this.
pub fn normalize(raw: &str) -> String {
	raw.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}
