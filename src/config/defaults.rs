//! Default configuration values

/// Default base URL (empty: paths must then be absolute URLs)
pub fn default_base_url() -> String {
    String::new()
}

/// Content types decoded as structured JSON
pub fn default_json_content_types() -> Vec<String> {
    vec!["application/json".to_string()]
}

/// Exact content types read as raw bytes
pub fn default_binary_content_types() -> Vec<String> {
    vec![
        "application/octet-stream".to_string(),
        "application/pdf".to_string(),
    ]
}

/// Main types (before the `/`) read as raw bytes
///
/// `text` is included on purpose: `text/html` and `text/plain` come back as
/// bytes unless the caller removes it.
pub fn default_binary_main_types() -> Vec<String> {
    vec!["image".to_string(), "text".to_string()]
}

/// Name of the directory holding the config file
pub const CONFIG_DIR_NAME: &str = "negotiate-http";

/// Name of the config file
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable that overrides the base URL
pub const BASE_URL_ENV: &str = "NEGOTIATE_HTTP_BASE_URL";
