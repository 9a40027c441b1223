use serde::Serialize;
use serde_json::Value;

use crate::domain::image::ImageUpload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Multipart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(ImageUpload),
}

/// A request to the advisory API, relative to the configured base URL.
///
/// Built once by a facade and never mutated afterwards. Path segments are kept
/// unencoded; the transport encodes each one and appends the trailing slash the
/// backend routes expect.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl OutboundRequest {
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Get, segments, RequestBody::Empty)
    }

    pub fn post_json<I, S, B>(segments: I, body: &B) -> Result<Self, serde_json::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body)?;
        Ok(Self::new(Method::Post, segments, RequestBody::Json(value)))
    }

    pub fn post_multipart<I, S>(segments: I, upload: ImageUpload) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Post, segments, RequestBody::Multipart(upload))
    }

    fn new<I, S>(method: Method, segments: I, body: RequestBody) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body,
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn encoding(&self) -> Encoding {
        match self.body {
            RequestBody::Multipart(_) => Encoding::Multipart,
            RequestBody::Empty | RequestBody::Json(_) => Encoding::Json,
        }
    }

    /// Route as the backend names it, e.g. `/market/history/Tomato/`.
    pub fn path(&self) -> String {
        let mut path = String::from("/");
        for segment in &self.segments {
            path.push_str(segment);
            path.push('/');
        }
        path
    }
}
