//! Signature reference resolution
//!
//! Staff records store a signature image reference that is either already an
//! absolute URL or a path relative to the storage public base. The renderer
//! only accepts absolute URLs, so references are absolutized before they go
//! into a report document.

use url::Url;

/// Resolves stored signature references to absolute URLs
#[derive(Debug, Clone)]
pub struct SignatureResolver {
    public_base_url: String,
}

impl SignatureResolver {
    /// Create a resolver over the storage public base URL
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a stored reference to an absolute URL
    ///
    /// Absolute http/https references pass through untouched; anything else
    /// is joined onto the public base.
    ///
    /// # Examples
    ///
    /// ```
    /// use mendel::reporting::signature::SignatureResolver;
    ///
    /// let resolver = SignatureResolver::new("https://cdn.example.com");
    /// assert_eq!(
    ///     resolver.resolve("signatures/alice.png"),
    ///     "https://cdn.example.com/signatures/alice.png"
    /// );
    /// assert_eq!(
    ///     resolver.resolve("https://elsewhere.example.com/sig.png"),
    ///     "https://elsewhere.example.com/sig.png"
    /// );
    /// ```
    pub fn resolve(&self, reference: &str) -> String {
        let reference = reference.trim();

        if let Ok(url) = Url::parse(reference) {
            if matches!(url.scheme(), "http" | "https") {
                return reference.to_string();
            }
        }

        format!("{}/{}", self.public_base_url, reference.trim_start_matches('/'))
    }
}
