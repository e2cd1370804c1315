//! Extension allow-list check.
//!
//! The check is purely syntactic: the extension is taken from the last path
//! segment of the target URL, ignoring query and fragment, and compared
//! case-insensitively. Content bytes are never inspected.

use url::Url;

/// Allow-list of image extensions, stored lower-case without the dot.
#[derive(Debug, Clone)]
pub struct ExtensionPolicy {
    allowed: Vec<String>,
}

impl ExtensionPolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns true if the URL's extension is on the allow-list.
    pub fn permits(&self, url: &str) -> bool {
        match extension_of(url) {
            Some(ext) => self.allowed.iter().any(|allowed| *allowed == ext),
            None => false,
        }
    }
}

impl Default for ExtensionPolicy {
    fn default() -> Self {
        Self::new(["png", "jpg", "gif"])
    }
}

/// Lower-cased extension of the URL's last path segment, without the dot.
pub fn extension_of(url: &str) -> Option<String> {
    let path = path_portion(url);
    let segment = path.rsplit('/').next().unwrap_or(path.as_str());
    // Leading dots name hidden files, not extensions.
    let stem = segment.trim_start_matches('.');
    let dot = stem.rfind('.')?;

    Some(stem[dot + 1..].to_ascii_lowercase())
}

fn path_portion(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => {
            // Relative or unparseable: strip query and fragment by hand.
            let end = url.find(['?', '#']).unwrap_or(url.len());
            url[..end].to_string()
        }
    }
}
