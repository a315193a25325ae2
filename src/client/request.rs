//! Request descriptor and body encoding
//!
//! A [`RequestOptions`] carries everything except the method and path. Body
//! sources are applied in a fixed order: JSON, then `data`; when any file is
//! present a multipart form replaces both.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ClientError, Result};

/// Non-JSON request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
    /// Raw body bytes sent as-is
    Bytes(Bytes),
}

/// Optional parts of a request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    json: Option<serde_json::Value>,
    data: Option<Data>,
    files: BTreeMap<String, Bytes>,
    headers: Vec<(String, String)>,
    params: Vec<(String, String)>,
}

impl RequestOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `value` as a JSON body
    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.json = Some(value);
        self
    }

    /// Serialize `value` and send it as a JSON body
    pub fn json_from<T: Serialize>(self, value: &T) -> Result<Self> {
        Ok(self.json(serde_json::to_value(value)?))
    }

    /// Send urlencoded form fields
    #[must_use]
    pub fn form<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.data = Some(Data::Form(fields));
        self
    }

    /// Send raw bytes as the body
    #[must_use]
    pub fn body(mut self, bytes: impl Into<Bytes>) -> Self {
        self.data = Some(Data::Bytes(bytes.into()));
        self
    }

    /// Send a string as the raw body
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.body(text.into())
    }

    /// Attach a file; `name` is used as both field name and filename
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let _previous = self.files.insert(name.into(), content.into());
        self
    }

    /// Add a request header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// JSON payload, if any
    #[must_use]
    pub const fn json_body(&self) -> Option<&serde_json::Value> {
        self.json.as_ref()
    }

    /// Form/binary payload, if any
    #[must_use]
    pub const fn data(&self) -> Option<&Data> {
        self.data.as_ref()
    }

    /// Files to upload, keyed by field name
    #[must_use]
    pub const fn files(&self) -> &BTreeMap<String, Bytes> {
        &self.files
    }

    /// Query parameters in insertion order
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Validate and convert the headers
    pub fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::InvalidRequest(format!("Invalid header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ClientError::InvalidRequest(format!("Invalid header value for '{name}': {e}"))
            })?;
            let _ = map.append(name, value);
        }
        Ok(map)
    }

    /// Multipart form built from the attached files, `None` when there are none
    #[must_use]
    pub fn multipart(&self) -> Option<Form> {
        if self.files.is_empty() {
            return None;
        }

        let form = self.files.iter().fold(Form::new(), |form, (name, content)| {
            let part = Part::bytes(content.to_vec()).file_name(name.clone());
            form.part(name.clone(), part)
        });
        Some(form)
    }

    /// Apply body, headers and query parameters to an engine request
    ///
    /// With files attached the multipart form is the only body and its
    /// boundary-carrying `Content-Type` replaces any caller-supplied one.
    pub(crate) fn apply(
        &self,
        mut builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder> {
        let multipart = self.multipart();
        let mut headers = self.header_map()?;
        if multipart.is_some() {
            let _dropped = headers.remove(CONTENT_TYPE);
        }
        builder = builder.headers(headers);

        if !self.params.is_empty() {
            builder = builder.query(&self.params);
        }

        if let Some(form) = multipart {
            return Ok(builder.multipart(form));
        }

        if let Some(json) = &self.json {
            builder = builder.json(json);
        }
        if let Some(data) = &self.data {
            builder = match data {
                Data::Form(fields) => builder.form(fields),
                Data::Bytes(bytes) => builder.body(bytes.clone()),
            };
        }

        Ok(builder)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_map_accepts_valid_headers() {
        let options = RequestOptions::new()
            .header("Content-Type", "application/json; charset=UTF-8")
            .header("X-Trace", "a")
            .header("x-trace", "b");
        let map = options.header_map().unwrap();
        assert_eq!(
            map.get("content-type").unwrap(),
            "application/json; charset=UTF-8"
        );
        assert_eq!(map.get_all("X-TRACE").iter().count(), 2);
    }

    #[test]
    fn test_header_map_rejects_bad_name() {
        let err = RequestOptions::new()
            .header("bad header", "x")
            .header_map()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_header_map_rejects_bad_value() {
        let err = RequestOptions::new()
            .header("X-Bad", "line\nbreak")
            .header_map()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[test]
    fn test_multipart_only_with_files() {
        assert!(RequestOptions::new().multipart().is_none());
        let options = RequestOptions::new().file("report", b"binary-content".to_vec());
        assert!(options.multipart().is_some());
        assert_eq!(
            options.files()["report"],
            Bytes::from_static(b"binary-content")
        );
    }

    #[test]
    fn test_later_data_replaces_earlier() {
        let options = RequestOptions::new().form([("a", "1")]).text("raw");
        assert_eq!(options.data(), Some(&Data::Bytes(Bytes::from("raw"))));
    }

    #[test]
    fn test_json_from_serializable() {
        #[derive(Serialize)]
        struct Post<'a> {
            title: &'a str,
            #[serde(rename = "userId")]
            user_id: u32,
        }

        let options = RequestOptions::new()
            .json_from(&Post {
                title: "foo",
                user_id: 1,
            })
            .unwrap();
        assert_eq!(
            options.json_body(),
            Some(&json!({"title": "foo", "userId": 1}))
        );
    }

    #[test]
    fn test_query_preserves_order() {
        let options = RequestOptions::new().query("b", "2").query("a", "1");
        assert_eq!(
            options.params(),
            &[
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string())
            ]
        );
    }

    fn built(options: &RequestOptions) -> reqwest::Request {
        let builder = reqwest::Client::new().post("http://localhost/upload");
        options.apply(builder).unwrap().build().unwrap()
    }

    fn content_types(request: &reqwest::Request) -> Vec<String> {
        request
            .headers()
            .get_all(CONTENT_TYPE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_files_replace_json_body() {
        let options = RequestOptions::new()
            .json(json!({"a": 1}))
            .file("report", b"binary-content".to_vec());
        let request = built(&options);

        let types = content_types(&request);
        assert_eq!(types.len(), 1);
        assert!(types[0].starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn test_files_replace_caller_content_type() {
        let options = RequestOptions::new()
            .header("Content-Type", "application/json")
            .header("X-Trace", "kept")
            .file("report", b"binary-content".to_vec());
        let request = built(&options);

        let types = content_types(&request);
        assert_eq!(types.len(), 1);
        assert!(types[0].starts_with("multipart/form-data"));
        assert_eq!(request.headers().get("x-trace").unwrap(), "kept");
    }

    #[test]
    fn test_caller_content_type_kept_without_files() {
        let options = RequestOptions::new()
            .header("Content-Type", "application/vnd.api+json")
            .json(json!({"a": 1}));
        let request = built(&options);
        assert_eq!(content_types(&request), vec!["application/vnd.api+json"]);
    }
}
