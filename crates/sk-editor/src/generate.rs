//! Photorealistic rendering requests.
//!
//! The HTTP transport belongs to the host; this module builds the request
//! payload from the exported sketch (and optional material swatch) and
//! turns the raw response into an image URL or a human-readable error.
//! Failures never touch annotation state, so the user can simply retry.

use serde_json::{Value, json};
use sk_core::SketchError;
use std::future::Future;

pub const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const MODEL: &str = "gpt-4o";

const NO_IMAGE: &str = "No image found in GPT response";

const PROMPT_SKETCH: &str = "Turn this flat sketch into a realistic garment rendering. \
Create a high-quality, realistic image that shows the garment with proper textures, \
shading, and professional appearance.";

const PROMPT_MATERIAL: &str = "Use the material reference to turn the flat sketch into a \
realistic garment. Create a high-quality, realistic rendering that shows the garment with \
the texture and appearance of the reference material.";

/// Inputs to one generation call. Images are `data:` URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub sketch: String,
    pub material: Option<String>,
    pub api_key: String,
}

impl GenerationRequest {
    /// Refuse to send a request without a credential.
    pub fn validate(&self) -> Result<(), SketchError> {
        if self.api_key.trim().is_empty() {
            return Err(SketchError::MissingCredential);
        }
        if self.sketch.is_empty() {
            return Err(SketchError::InvalidInput("no sketch to render".to_string()));
        }
        Ok(())
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key.trim())
    }

    /// JSON body for the chat-completions endpoint.
    pub fn to_body(&self) -> Value {
        let prompt = if self.material.is_some() {
            PROMPT_MATERIAL
        } else {
            PROMPT_SKETCH
        };
        let mut content = vec![
            json!({ "type": "text", "text": prompt }),
            json!({
                "type": "image_url",
                "image_url": { "url": self.sketch, "detail": "high" }
            }),
        ];
        if let Some(material) = &self.material {
            content.push(json!({
                "type": "image_url",
                "image_url": { "url": material, "detail": "high" }
            }));
        }

        json!({
            "model": MODEL,
            "messages": [{ "role": "user", "content": content }],
            "max_tokens": 4096,
            "temperature": 0.7,
            "tools": [{
                "type": "dalle",
                "dalle": { "size": "1024x1024", "quality": "hd", "style": "natural" }
            }]
        })
    }
}

/// Interpret the service's answer.
///
/// Non-2xx statuses surface the service's own error message when it sent
/// one. On success the image URL is taken from a `dalle` tool call, or
/// failing that from the first image link in the message text.
pub fn parse_generation_response(status: u16, body: &str) -> Result<String, SketchError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let msg = parsed
            .as_ref()
            .and_then(|v| v.pointer("/error/message"))
            .and_then(Value::as_str)
            .unwrap_or("Failed to generate image");
        return Err(SketchError::Upstream(msg.to_string()));
    }

    let data = parsed
        .ok_or_else(|| SketchError::Upstream("response is not valid JSON".to_string()))?;
    let message = data
        .pointer("/choices/0/message")
        .ok_or_else(|| SketchError::Upstream(NO_IMAGE.to_string()))?;

    let from_tool = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|call| call.get("type").and_then(Value::as_str) == Some("dalle"))
        .find_map(|call| call.pointer("/dalle/url").and_then(Value::as_str));
    if let Some(url) = from_tool {
        return Ok(url.to_string());
    }

    message
        .get("content")
        .and_then(Value::as_str)
        .and_then(find_image_link)
        .map(str::to_string)
        .ok_or_else(|| SketchError::Upstream(NO_IMAGE.to_string()))
}

/// Longest `https://…` run inside one whitespace-delimited token that ends
/// in an image extension (case-insensitive). At least one character must
/// sit between the scheme and the extension.
fn find_image_link(text: &str) -> Option<&str> {
    const SCHEME: &str = "https://";
    const EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".gif"];
    text.split_whitespace().find_map(|token| {
        token.match_indices(SCHEME).find_map(|(start, _)| {
            let candidate = &token[start..];
            let lower = candidate.to_ascii_lowercase();
            EXTENSIONS
                .iter()
                .filter_map(|ext| {
                    lower
                        .rfind(ext)
                        .filter(|&i| i > SCHEME.len())
                        .map(|i| i + ext.len())
                })
                .max()
                .map(|end| &candidate[..end])
        })
    })
}

/// The seam to the rendering service. Implemented by the host, which owns
/// the network transport.
pub trait ImageGenerator {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, SketchError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(material: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            sketch: "data:image/png;base64,AAAA".to_string(),
            material: material.map(str::to_string),
            api_key: "sk-test".to_string(),
        }
    }

    #[test]
    fn missing_key_is_rejected() {
        let mut r = request(None);
        r.api_key = "  ".to_string();
        assert_eq!(r.validate(), Err(SketchError::MissingCredential));
        assert!(request(None).validate().is_ok());
    }

    #[test]
    fn body_without_material() {
        let body = request(None).to_body();
        let content = body.pointer("/messages/0/content").unwrap().as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["text"], PROMPT_SKETCH);
        assert_eq!(content[1]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert_eq!(content[1]["image_url"]["detail"], "high");
        assert_eq!(body["model"], MODEL);
    }

    #[test]
    fn body_with_material() {
        let body = request(Some("data:image/jpeg;base64,BBBB")).to_body();
        let content = body.pointer("/messages/0/content").unwrap().as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["text"], PROMPT_MATERIAL);
        assert_eq!(content[2]["image_url"]["url"], "data:image/jpeg;base64,BBBB");
    }

    #[test]
    fn http_error_uses_service_message() {
        let err = parse_generation_response(401, r#"{"error":{"message":"Incorrect API key"}}"#)
            .unwrap_err();
        assert_eq!(err, SketchError::Upstream("Incorrect API key".to_string()));

        let err = parse_generation_response(502, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(
            err,
            SketchError::Upstream("Failed to generate image".to_string())
        );
    }

    #[test]
    fn url_from_tool_call() {
        let body = r#"{"choices":[{"message":{"tool_calls":[
            {"type":"function","function":{}},
            {"type":"dalle","dalle":{"url":"https://img.example/out.png"}}
        ]}}]}"#;
        assert_eq!(
            parse_generation_response(200, body).unwrap(),
            "https://img.example/out.png"
        );
    }

    #[test]
    fn url_from_message_text() {
        let body = r#"{"choices":[{"message":{"content":"Here it is: https://cdn.example/a/B.JPG?sig=1 enjoy"}}]}"#;
        assert_eq!(
            parse_generation_response(200, body).unwrap(),
            "https://cdn.example/a/B.JPG"
        );
    }

    #[test]
    fn extension_inside_host_does_not_cut_the_url() {
        let body = r#"{"choices":[{"message":{"content":"Result: https://cdn.gifts-media.io/renders/out.png"}}]}"#;
        assert_eq!(
            parse_generation_response(200, body).unwrap(),
            "https://cdn.gifts-media.io/renders/out.png"
        );
    }

    #[test]
    fn link_ends_at_the_last_extension() {
        assert_eq!(
            find_image_link("see https://a.png.example/x.JPEG?w=2"),
            Some("https://a.png.example/x.JPEG")
        );
        // Nothing between the scheme and the extension.
        assert_eq!(find_image_link("https://.png"), None);
        assert_eq!(find_image_link("no links here.png"), None);
    }

    #[test]
    fn no_image_in_response() {
        let body = r#"{"choices":[{"message":{"content":"I cannot do that."}}]}"#;
        assert_eq!(
            parse_generation_response(200, body),
            Err(SketchError::Upstream("No image found in GPT response".to_string()))
        );
        assert!(matches!(
            parse_generation_response(200, "not json"),
            Err(SketchError::Upstream(_))
        ));
    }
}
