use serde::Deserialize;

use crate::{
    api::{
        client::ApiClient,
        error::ApiError,
        response::{ensure_probability, Validate},
    },
    domain::{image::ImageUpload, request::OutboundRequest},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassConfidence {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
}

/// Treatment guidance comes either as one sentence or as a structured plan.
/// Plan entries are free-form on the backend, so any of them may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Treatment {
    Plan {
        #[serde(default)]
        general: String,
        #[serde(default)]
        prevention: String,
        #[serde(default)]
        organic: Option<String>,
    },
    Summary(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiseaseDetection {
    pub predicted_class: String,
    pub confidence: f64,
    #[serde(default)]
    pub treatment: Option<Treatment>,
    #[serde(default)]
    pub top_3: Vec<ClassConfidence>,
}

impl DiseaseDetection {
    /// `Tomato___Late_blight` style labels, split into crop and condition.
    pub fn crop_and_condition(&self) -> (&str, &str) {
        match self.predicted_class.split_once("___") {
            Some((crop, condition)) => (crop, condition),
            None => ("", self.predicted_class.as_str()),
        }
    }
}

impl Validate for DiseaseDetection {
    fn validate(&self) -> Result<(), String> {
        if self.predicted_class.trim().is_empty() {
            return Err("predicted_class is empty".to_owned());
        }
        ensure_probability("confidence", self.confidence)?;
        for candidate in &self.top_3 {
            ensure_probability("top_3 confidence", candidate.confidence)?;
        }
        if self
            .top_3
            .windows(2)
            .any(|pair| pair[0].confidence < pair[1].confidence)
        {
            return Err("top_3 is not ordered by descending confidence".to_owned());
        }
        Ok(())
    }
}

pub struct DiseaseApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DiseaseApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Checks the bytes against the upload rules before anything is sent.
    pub async fn detect(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<DiseaseDetection, ApiError> {
        let upload = ImageUpload::from_bytes(file_name, bytes, self.client.max_image_bytes())?;
        self.detect_upload(upload).await
    }

    pub async fn detect_upload(&self, upload: ImageUpload) -> Result<DiseaseDetection, ApiError> {
        tracing::debug!(
            file_name = upload.file_name(),
            mime = upload.format().mime(),
            size = upload.bytes().len(),
            "submitting leaf image"
        );
        self.client
            .fetch_valid(OutboundRequest::post_multipart(["disease", "detect"], upload))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        domain::{image::ImageFormat, request::Encoding},
        test_support::{test_client, ScriptedTransport},
    };

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn detection_body() -> serde_json::Value {
        json!({
            "predicted_class": "Tomato___Late_blight",
            "confidence": 0.91,
            "top_3": [
                {"class": "Tomato___Late_blight", "confidence": 0.91},
                {"class": "Tomato___Early_blight", "confidence": 0.06},
                {"class": "Tomato___healthy", "confidence": 0.03}
            ],
            "treatment": {
                "general": "Remove infected leaves.",
                "prevention": "Avoid overhead watering.",
                "organic": "Copper-based spray."
            }
        })
    }

    #[tokio::test]
    async fn detect_uploads_multipart_and_decodes_result() {
        let env = test_client(ScriptedTransport::new().respond_json(200, detection_body()));

        let detection = env
            .client
            .disease()
            .detect("leaf.png", PNG.to_vec())
            .await
            .expect("detection should succeed");

        assert_eq!(detection.crop_and_condition(), ("Tomato", "Late_blight"));
        assert_eq!(detection.top_3.len(), 3);
        assert!(matches!(
            detection.treatment,
            Some(Treatment::Plan { organic: Some(_), .. })
        ));
        let call = &env.transport.captured()[0];
        assert_eq!(call.request.path(), "/disease/detect/");
        assert_eq!(call.request.encoding(), Encoding::Multipart);
    }

    #[tokio::test]
    async fn non_image_bytes_never_reach_the_network() {
        let env = test_client(ScriptedTransport::new());

        let err = env
            .client
            .disease()
            .detect("notes.txt", b"just some text".to_vec())
            .await
            .expect_err("text must be rejected");

        assert!(matches!(err, ApiError::InvalidInput { .. }));
        assert!(env.transport.captured().is_empty());
    }

    #[tokio::test]
    async fn oversized_image_is_rejected_locally() {
        let env = test_client(ScriptedTransport::new());
        let mut bytes = PNG.to_vec();
        bytes.resize(2 * 1024 * 1024, 0);

        let err = env
            .client
            .disease()
            .detect("big.png", bytes)
            .await
            .expect_err("oversized image must be rejected");

        assert!(matches!(err, ApiError::InvalidInput { .. }));
        assert!(env.transport.captured().is_empty());
    }

    #[tokio::test]
    async fn accepts_plain_text_treatment_and_missing_top_3() {
        let env = test_client(ScriptedTransport::new().respond_json(
            200,
            json!({"predicted_class": "Potato___healthy", "confidence": 0.99, "treatment": "No action needed."}),
        ));
        let upload = ImageUpload::from_bytes("", PNG.to_vec(), 1024).expect("png is valid");
        assert_eq!(upload.format(), ImageFormat::Png);

        let detection = env
            .client
            .disease()
            .detect_upload(upload)
            .await
            .expect("detection should succeed");

        assert_eq!(
            detection.treatment,
            Some(Treatment::Summary("No action needed.".to_owned()))
        );
        assert!(detection.top_3.is_empty());
    }

    #[tokio::test]
    async fn partial_or_empty_treatment_plan_still_decodes() {
        for (treatment, general) in [
            (json!({"general": "No treatment needed."}), "No treatment needed."),
            (json!({}), ""),
        ] {
            let mut body = detection_body();
            body["treatment"] = treatment;
            let env = test_client(ScriptedTransport::new().respond_json(200, body));

            let detection = env
                .client
                .disease()
                .detect("leaf.png", PNG.to_vec())
                .await
                .expect("detection should succeed");

            assert_eq!(
                detection.treatment,
                Some(Treatment::Plan {
                    general: general.to_owned(),
                    prevention: String::new(),
                    organic: None,
                })
            );
        }
    }

    #[tokio::test]
    async fn out_of_range_confidence_is_malformed() {
        let env = test_client(ScriptedTransport::new().respond_json(
            200,
            json!({"predicted_class": "Tomato___healthy", "confidence": 97.5}),
        ));

        let err = env
            .client
            .disease()
            .detect("leaf.png", PNG.to_vec())
            .await
            .expect_err("percent confidence must be rejected");

        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn unordered_top_3_is_malformed() {
        let mut body = detection_body();
        body["top_3"] = json!([
            {"class": "a", "confidence": 0.1},
            {"class": "b", "confidence": 0.8}
        ]);
        let env = test_client(ScriptedTransport::new().respond_json(200, body));

        let err = env
            .client
            .disease()
            .detect("leaf.png", PNG.to_vec())
            .await
            .expect_err("ascending top_3 must be rejected");

        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }
}
