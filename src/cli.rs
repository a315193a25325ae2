//! Command-line interface argument parsing
//!
//! Defines the single request command and its arguments using Clap, plus the
//! conversion from parsed arguments into [`RequestOptions`].

use clap::Parser;
use std::path::PathBuf;

use negotiate_http::{ClientError, HttpMethod, RequestOptions, Result};

/// negotiate-http - issue one content-negotiated HTTP request
#[derive(Parser, Debug)]
#[command(name = "negotiate-http")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Issue an HTTP request and print the content-negotiated response")]
#[command(long_about = concat!(
    "negotiate-http (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Sends one request relative to a base URL and decodes the response body\n",
    "as JSON, raw bytes or text depending on its declared Content-Type."
))]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL prepended to PATH (overrides config file and environment)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Config file (default: ~/.config/negotiate-http/config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS)
    #[arg(value_parser = parse_method)]
    pub method: HttpMethod,

    /// Path relative to the base URL
    pub path: String,

    /// JSON request body
    #[arg(long, conflicts_with_all = ["form", "data_raw"])]
    pub json: Option<String>,

    /// Urlencoded form field, repeatable (key=value)
    #[arg(long, value_name = "KEY=VALUE")]
    pub form: Vec<String>,

    /// Raw request body
    #[arg(long, conflicts_with = "form")]
    pub data_raw: Option<String>,

    /// File to upload as a multipart field, repeatable (name=path)
    #[arg(long, value_name = "NAME=PATH")]
    pub file: Vec<String>,

    /// Request header, repeatable (Name: value)
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Query parameter, repeatable (key=value)
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// # Returns
    ///
    /// Parsed CLI arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Build request options from the parsed arguments
    ///
    /// Files are read from disk here.
    pub fn request_options(&self) -> Result<RequestOptions> {
        let mut options = RequestOptions::new();

        if let Some(json) = &self.json {
            let value = serde_json::from_str(json)
                .map_err(|e| ClientError::InvalidRequest(format!("--json is not valid JSON: {e}")))?;
            options = options.json(value);
        }

        if !self.form.is_empty() {
            let fields = self
                .form
                .iter()
                .map(|field| split_pair(field, '=', "--form"))
                .collect::<Result<Vec<_>>>()?;
            options = options.form(fields);
        }

        if let Some(raw) = &self.data_raw {
            options = options.text(raw.clone());
        }

        for file in &self.file {
            let (name, path) = split_pair(file, '=', "--file")?;
            let content = std::fs::read(&path).map_err(|e| {
                ClientError::InvalidRequest(format!("Cannot read upload file {path}: {e}"))
            })?;
            options = options.file(name, content);
        }

        for header in &self.headers {
            let (name, value) = split_pair(header, ':', "--header")?;
            options = options.header(name, value);
        }

        for param in &self.query {
            let (key, value) = split_pair(param, '=', "--query")?;
            options = options.query(key, value);
        }

        Ok(options)
    }
}

fn parse_method(value: &str) -> std::result::Result<HttpMethod, String> {
    value.parse().map_err(|e: ClientError| e.to_string())
}

fn split_pair(raw: &str, separator: char, flag: &str) -> Result<(String, String)> {
    let (key, value) = raw.split_once(separator).ok_or_else(|| {
        ClientError::InvalidRequest(format!("{flag} expects KEY{separator}VALUE, got '{raw}'"))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ClientError::InvalidRequest(format!(
            "{flag} has an empty key in '{raw}'"
        )));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use negotiate_http::client::Data;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("negotiate-http").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_method_and_path() {
        let cli = parse(&["--base-url", "http://localhost", "patch", "/posts/1"]);
        assert_eq!(cli.method, HttpMethod::Patch);
        assert_eq!(cli.path, "/posts/1");
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost"));
    }

    #[test]
    fn test_rejects_unknown_method() {
        let args = ["negotiate-http", "TRACE", "/"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_request_options_from_flags() {
        let cli = parse(&[
            "post",
            "/posts",
            "--json",
            r#"{"title":"foo"}"#,
            "-H",
            "Content-Type: application/json; charset=UTF-8",
            "-q",
            "page=2",
        ]);
        let options = cli.request_options().unwrap();
        assert_eq!(
            options.json_body(),
            Some(&serde_json::json!({"title": "foo"}))
        );
        assert_eq!(
            options.header_map().unwrap().get("content-type").unwrap(),
            "application/json; charset=UTF-8"
        );
        assert_eq!(options.params(), &[("page".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_form_fields() {
        let cli = parse(&["post", "/login", "--form", "user=me", "--form", "pass=a=b"]);
        let options = cli.request_options().unwrap();
        assert_eq!(
            options.data(),
            Some(&Data::Form(vec![
                ("user".to_string(), "me".to_string()),
                ("pass".to_string(), "a=b".to_string()),
            ]))
        );
    }

    #[test]
    fn test_file_upload_reads_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"binary-content").unwrap();
        let upload = format!("report={}", file.path().display());
        let cli = parse(&["post", "/upload", "--file", &upload]);
        let options = cli.request_options().unwrap();
        assert_eq!(&options.files()["report"][..], b"binary-content");
    }

    #[test]
    fn test_malformed_pairs() {
        let cli = parse(&["get", "/", "-q", "novalue"]);
        assert!(matches!(
            cli.request_options().unwrap_err(),
            ClientError::InvalidRequest(_)
        ));

        let cli = parse(&["post", "/", "--json", "{"]);
        assert!(cli.request_options().is_err());

        let cli = parse(&["post", "/", "--file", "report=/nonexistent/file"]);
        assert!(cli.request_options().is_err());
    }
}
