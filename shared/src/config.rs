/// Where the machine API lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub prefix: String,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const API_PREFIX: &str = "/machine/api";

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: API_PREFIX.to_string(),
        }
    }

    /// Falls back to the default host when the build-time value is missing or blank.
    pub fn from_build_env(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Self::default(),
        }
    }

    /// `endpoint("detect/")` → `<base>/machine/api/detect/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, self.prefix, path.trim_start_matches('/'))
    }

    /// Media paths from the backend are server-relative; absolute URLs pass through.
    pub fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_prefix() {
        let config = ApiConfig::new("https://vision.example.com/");
        assert_eq!(config.endpoint("detect/"), "https://vision.example.com/machine/api/detect/");
        assert_eq!(config.endpoint("/chat/"), "https://vision.example.com/machine/api/chat/");
    }

    #[test]
    fn media_urls_resolve_against_base() {
        let config = ApiConfig::default();
        assert_eq!(
            config.media_url("/media/annotated/a.jpg"),
            "http://localhost:8000/media/annotated/a.jpg"
        );
        assert_eq!(config.media_url("https://cdn.example.com/a.jpg"), "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn blank_build_value_uses_default() {
        assert_eq!(ApiConfig::from_build_env(Some("  ")), ApiConfig::default());
        assert_eq!(ApiConfig::from_build_env(None).base_url, DEFAULT_BASE_URL);
    }
}
