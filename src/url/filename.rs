use sha2::{Digest, Sha256};

const HTML_SUFFIX: &str = ".html";
const HASH_HEX_LEN: usize = 8;

/// Options controlling how a URL is turned into a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingOptions {
    /// Drop everything from the first `?` onward
    pub strip_query: bool,

    /// Insert `-<first 8 hex chars of SHA-256(url)>` before the suffix
    pub hash_suffix: bool,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            strip_query: true,
            hash_suffix: false,
        }
    }
}

/// Derives the output file name for a URL with the default options
///
/// # Examples
///
/// ```
/// use harvest::url::derive_filename;
///
/// assert_eq!(derive_filename("https://example.com/a/b?x=1"), "example.com_a_b.html");
/// assert_eq!(derive_filename("http://example.com/a"), "example.com_a.html");
/// ```
pub fn derive_filename(url: &str) -> String {
    derive_filename_with(url, NamingOptions::default())
}

/// Derives the output file name for a URL
///
/// # Naming Rules
///
/// 1. Strip one leading `https://` or `http://` (case-sensitive)
/// 2. Replace every `/` with `_`
/// 3. If `strip_query`, drop everything from the first `?`
/// 4. If `hash_suffix`, append `-` and 8 hex chars of the URL's SHA-256
/// 5. Append `.html`
///
/// The function is total. Input without a scheme is used as is, a trailing
/// slash becomes a trailing `_`, empty path segments become `__`, and an
/// empty URL yields `.html`. Distinct URLs can map to the same name
/// (`a.com/x?1` and `a.com/x?2`); hash suffixes remove that overlap.
pub fn derive_filename_with(url: &str, options: NamingOptions) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let mut name = without_scheme.replace('/', "_");

    if options.strip_query {
        if let Some(idx) = name.find('?') {
            name.truncate(idx);
        }
    }

    if options.hash_suffix {
        let digest = Sha256::digest(url.as_bytes());
        let hex = hex::encode(digest);
        name.push('-');
        name.push_str(&hex[..HASH_HEX_LEN]);
    }

    name.push_str(HTML_SUFFIX);
    name
}
