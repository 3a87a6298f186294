use super::provider::GenerationRequest;
use serde_json::{json, Value};

pub const VIDEO_QUALITIES: [&str; 3] = ["1080p", "720p", "480p"];
pub const AUDIO_QUALITIES: [&str; 2] = ["320kbps", "128kbps"];

pub fn build_prompt(url: &str) -> String {
    format!(
        "Analyze this social media URL and extract potential metadata: {url}.\n\
         Identify if it's YouTube, TikTok, Instagram, or Facebook.\n\
         Provide a realistic title, author, and a wide range of format options including \
         different video resolutions ({}) and audio qualities ({}).",
        VIDEO_QUALITIES.join(", "),
        AUDIO_QUALITIES.join(", "),
    )
}

/// Response schema in the OpenAPI subset accepted by `generationConfig.responseSchema`.
pub fn metadata_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "author": { "type": "STRING" },
            "platform": {
                "type": "STRING",
                "description": "One of: youtube, tiktok, instagram, facebook, unknown"
            },
            "thumbnail": { "type": "STRING" },
            "formats": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "quality": { "type": "STRING" },
                        "type": {
                            "type": "STRING",
                            "description": "Must be 'video', 'audio', or 'image'"
                        },
                        "ext": { "type": "STRING" },
                        "size": { "type": "STRING" }
                    },
                    "required": ["id", "quality", "type", "ext"]
                }
            }
        },
        "required": ["title", "author", "platform", "thumbnail", "formats"]
    })
}

pub fn metadata_request(url: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: build_prompt(url),
        schema: metadata_schema(),
    }
}
