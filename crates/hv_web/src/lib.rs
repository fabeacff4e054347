use hv_core::core_api::{CoreErrorCode, Engine, ExtractOptions};
use hv_render::{JsonStyle, render_json_full, render_text};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

const MAX_QUICKBAR_SLOTS: u32 = 64;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebRenderOptions {
    pub json_output: bool,
    pub compact: bool,
    pub quickbar_slots: Option<u32>,
}

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

#[wasm_bindgen]
pub fn render_capture(capture_bytes: &[u8], options: JsValue) -> Result<String, JsValue> {
    let parsed_options = parse_options(options).map_err(|err| err.to_js_value())?;
    render_capture_impl(capture_bytes, &parsed_options).map_err(|err| err.to_js_value())
}

fn render_capture_impl(
    capture_bytes: &[u8],
    options: &WebRenderOptions,
) -> Result<String, WebError> {
    if capture_bytes.is_empty() {
        return Err(WebError::new(
            "empty_capture",
            "The uploaded file is empty. Please provide a saved battle page.",
        ));
    }

    let engine = Engine::with_options(extract_options(options)?);
    let session = engine.open_bytes(capture_bytes).map_err(|err| match err.code {
        CoreErrorCode::EmptyDocument => WebError::new("empty_capture", err.message),
        _ => WebError::new("parse_failed", err.to_string()),
    })?;

    if options.json_output {
        let value = render_json_full(session.snapshot(), JsonStyle::CanonicalV1);
        let rendered = if options.compact {
            serde_json::to_string(&value)
        } else {
            serde_json::to_string_pretty(&value)
        };
        return rendered.map_err(|err| {
            WebError::new(
                "render_failed",
                format!("failed to serialize rendered JSON output: {err}"),
            )
        });
    }

    Ok(render_text(session.snapshot()))
}

fn parse_options(options: JsValue) -> Result<WebRenderOptions, WebError> {
    if options.is_null() || options.is_undefined() {
        return Ok(WebRenderOptions::default());
    }

    serde_wasm_bindgen::from_value(options).map_err(|err| {
        WebError::new(
            "invalid_options",
            format!("Failed to parse web render options: {err}"),
        )
    })
}

fn extract_options(options: &WebRenderOptions) -> Result<ExtractOptions, WebError> {
    let mut extract = ExtractOptions::default();
    if let Some(slots) = options.quickbar_slots {
        if slots == 0 || slots > MAX_QUICKBAR_SLOTS {
            return Err(WebError::new(
                "invalid_options",
                format!("Invalid quickbar_slots {slots}. Expected 1 to {MAX_QUICKBAR_SLOTS}"),
            ));
        }
        extract.quickbar_slots = slots;
    }
    Ok(extract)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{WebRenderOptions, extract_options, render_capture_impl};

    #[test]
    fn extract_options_validates_quickbar_slots() {
        let defaults = extract_options(&WebRenderOptions::default()).expect("defaults are valid");
        assert_eq!(defaults.quickbar_slots, 16);

        let options = WebRenderOptions {
            quickbar_slots: Some(12),
            ..WebRenderOptions::default()
        };
        assert_eq!(
            extract_options(&options)
                .expect("12 slots should be accepted")
                .quickbar_slots,
            12
        );

        let options = WebRenderOptions {
            quickbar_slots: Some(0),
            ..WebRenderOptions::default()
        };
        let err = extract_options(&options).expect_err("zero slots should fail");
        assert_eq!(err.code, "invalid_options");
        assert!(err.message.contains("quickbar_slots"));
    }

    #[test]
    fn render_capture_impl_renders_battle_sheet() {
        let bytes = fixture_bytes("tests/fixtures/hv/arena_midfight.htm");
        let rendered = render_capture_impl(&bytes, &WebRenderOptions::default())
            .expect("midfight fixture should render");
        assert!(rendered.contains("HENTAIVERSE BATTLE"));
        assert!(rendered.contains("::: Monsters :::"));
        assert!(rendered.contains("Mikuru Asahina [Legendary]"));
    }

    #[test]
    fn render_capture_impl_rejects_empty_payload() {
        let err = render_capture_impl(&[], &WebRenderOptions::default())
            .expect_err("empty payload should fail");
        assert_eq!(err.code, "empty_capture");

        let err = render_capture_impl(b"  \n\t", &WebRenderOptions::default())
            .expect_err("blank payload should fail");
        assert_eq!(err.code, "empty_capture");
    }

    #[test]
    fn render_capture_impl_reports_undecodable_bytes() {
        let err = render_capture_impl(&[0x3c, 0xff, 0xfe, 0x3e], &WebRenderOptions::default())
            .expect_err("invalid utf-8 should fail");
        assert_eq!(err.code, "parse_failed");
    }

    #[test]
    fn render_capture_impl_can_emit_json() {
        let bytes = fixture_bytes("tests/fixtures/hv/arena_start.htm");
        let options = WebRenderOptions {
            json_output: true,
            compact: true,
            ..WebRenderOptions::default()
        };
        let rendered = render_capture_impl(&bytes, &options).expect("json output should render");
        assert_eq!(rendered.lines().count(), 1);

        let parsed: serde_json::Value =
            serde_json::from_str(&rendered).expect("json output should parse");
        assert_eq!(parsed["player"]["hp_value"], 23618);
        assert!(parsed.get("abilities").is_some());
        assert!(parsed.get("warnings").is_some());
    }

    fn fixture_bytes(relative_path: &str) -> Vec<u8> {
        let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(relative_path);
        fs::read(full_path).expect("fixture bytes should be readable")
    }
}
