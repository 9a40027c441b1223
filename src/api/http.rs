use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::AUTHORIZATION,
    multipart::{Form, Part},
    Url,
};

use crate::{
    api::transport::{HttpTransport, TransportError, TransportResponse},
    domain::{
        image::IMAGE_FIELD,
        request::{Method, OutboundRequest, RequestBody},
    },
    infra::{
        config::{ApiConfig, HttpConfig},
        error::AppError,
    },
};

/// `reqwest`-backed transport rooted at the configured API base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(api: &ApiConfig, http: &HttpConfig) -> Result<Self, AppError> {
        let base_url = Url::parse(&api.base_url).map_err(|error| AppError::InvalidBaseUrl {
            url: api.base_url.clone(),
            details: error.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidBaseUrl {
                url: api.base_url.clone(),
                details: "url cannot carry a path".to_owned(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(http.timeout_ms))
            .user_agent(http.user_agent.clone())
            .build()
            .map_err(AppError::HttpClientBuild)?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, request: &OutboundRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| TransportError::Build("base url cannot carry a path".to_owned()))?
            .pop_if_empty()
            .extend(request.segments())
            .push("");

        if !request.query().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query());
        }

        Ok(url)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &OutboundRequest,
        authorization: Option<&str>,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(request)?;

        let mut builder = match request.method() {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };

        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(upload) => {
                let part = Part::bytes(upload.bytes().to_vec())
                    .file_name(upload.file_name().to_owned())
                    .mime_str(upload.format().mime())
                    .map_err(|error| TransportError::Build(error.to_string()))?;
                builder.multipart(Form::new().part(IMAGE_FIELD, part))
            }
        };

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_builder() {
        TransportError::Build(error.to_string())
    } else {
        TransportError::Connect(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, header_exists, method, path, query_param},
        Mock, MockServer, Request, ResponseTemplate,
    };

    use super::*;
    use crate::domain::image::ImageUpload;

    fn transport_for(server: &MockServer, timeout_ms: u64) -> ReqwestTransport {
        let api = ApiConfig {
            base_url: format!("{}/api", server.uri()),
        };
        let http = HttpConfig {
            timeout_ms,
            ..HttpConfig::default()
        };
        ReqwestTransport::new(&api, &http).expect("transport should build")
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let api = ApiConfig {
            base_url: "not a url".to_owned(),
        };

        let err = ReqwestTransport::new(&api, &HttpConfig::default())
            .expect_err("invalid base url must fail");

        assert!(matches!(err, AppError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn builds_trailing_slash_urls_with_encoded_segments() {
        let api = ApiConfig {
            base_url: "http://localhost:8000/api/".to_owned(),
        };
        let transport =
            ReqwestTransport::new(&api, &HttpConfig::default()).expect("transport should build");
        let request = OutboundRequest::get(["weather", "New York"]);

        let url = transport.url_for(&request).expect("url should build");

        assert_eq!(url.as_str(), "http://localhost:8000/api/weather/New%20York/");
    }

    #[tokio::test]
    async fn sends_bearer_header_and_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/advisory/chat/"))
            .and(header("authorization", "Bearer tok-1"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "hi", "location": "Nairobi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server, 5_000);
        let request = OutboundRequest::post_json(
            ["advisory", "chat"],
            &json!({"message": "hi", "location": "Nairobi"}),
        )
        .expect("body should serialize");

        let response = transport
            .execute(&request, Some("Bearer tok-1"))
            .await
            .expect("request should complete");

        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"ok":true}"#.to_vec());
    }

    #[tokio::test]
    async fn omits_authorization_when_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/market/history/Tomato/"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let transport = transport_for(&server, 5_000);
        let request = OutboundRequest::get(["market", "history", "Tomato"]).with_query("days", 7);

        let response = transport
            .execute(&request, None)
            .await
            .expect("request should complete");

        assert_eq!(response.status, 401);
        let received: Vec<Request> = server
            .received_requests()
            .await
            .expect("request recording is enabled");
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn uploads_image_under_fixed_multipart_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/disease/detect/"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = transport_for(&server, 5_000);
        let upload = ImageUpload::from_bytes("leaf.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0], 1024)
            .expect("jpeg should be accepted");
        let request = OutboundRequest::post_multipart(["disease", "detect"], upload);

        transport
            .execute(&request, Some("Bearer tok-2"))
            .await
            .expect("upload should complete");

        let received = server
            .received_requests()
            .await
            .expect("request recording is enabled");
        let content_type = received[0]
            .headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = String::from_utf8_lossy(&received[0].body);

        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert!(body.contains("name=\"image\""));
        assert!(body.contains("filename=\"leaf.jpg\""));
        assert!(body.contains("image/jpeg"));
    }

    #[tokio::test]
    async fn slow_response_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport = transport_for(&server, 50);
        let err = transport
            .execute(&OutboundRequest::get(["rag", "initialize"]), None)
            .await
            .expect_err("request should time out");

        assert!(err.is_timeout());
    }
}
