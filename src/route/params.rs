use smallvec::SmallVec;
use std::fmt;

/// Maximum number of distinct parameter keys before heap allocation.
/// Most MVC requests carry a handful of query/form keys.
pub const MAX_INLINE_PARAMS: usize = 8;

type ParamEntries = SmallVec<[(String, Vec<String>); MAX_INLINE_PARAMS]>;

/// Ordered multimap of request parameters.
///
/// Keys keep the order of their first appearance and every key holds all of
/// its values, so repeated query or form keys (`?a=1&a=2`) are never lost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: ParamEntries,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` string (a query
    /// component or a form body). A leading `?` is ignored.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::new();
        params.extend_from_query(query);
        params
    }

    /// Append all pairs of a form-urlencoded string to this multimap.
    pub fn extend_from_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            self.add(k.into_owned(), v.into_owned());
        }
    }

    /// Append a value under `key`, keeping earlier values.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// First value for `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// All values for `key` in arrival order; empty if the key is absent.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `k=v&k=v2&other=x`, percent-encoding keys and values.
    ///
    /// Repeated keys are repeated in order. Returns an empty string when
    /// there are no parameters; callers add the `?` themselves.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        for (key, values) in &self.entries {
            for value in values {
                if !out.is_empty() {
                    out.push('&');
                }
                out.push_str(&urlencoding::encode(key));
                out.push('=');
                out.push_str(&urlencoding::encode(value));
            }
        }
        out
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_keep_order() {
        let params = Params::from_query("a=1&b=x&a=2");
        assert_eq!(params.get_all("a"), ["1", "2"]);
        assert_eq!(params.get("b"), Some("x"));
        assert_eq!(params.len(), 2);
        assert_eq!(params.to_query_string(), "a=1&a=2&b=x");
    }

    #[test]
    fn decodes_and_encodes() {
        let params = Params::from_query("?name=John+Doe&tag=a%26b");
        assert_eq!(params.get("name"), Some("John Doe"));
        assert_eq!(params.get("tag"), Some("a&b"));
        assert_eq!(params.to_query_string(), "name=John%20Doe&tag=a%26b");
    }

    #[test]
    fn empty_query() {
        let params = Params::from_query("");
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
        assert!(params.get_all("missing").is_empty());
    }
}
