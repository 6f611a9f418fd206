//! JSON envelopes returned by the analysis backend.

use serde::{Deserialize, Serialize};

use super::BackendError;
use crate::catalog::Scenario;

/// Fallback text when the backend reports failure without a reason.
pub const GENERIC_REJECTION: &str = "后端返回错误";

/// A stored upload, identified by the server-assigned input name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadAccepted {
    pub input: String,
}

/// Scene classification and output artifact for one uploaded input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputMetadata {
    /// Raw scene label as reported; may name no known scenario.
    pub scene: Option<String>,
    /// File name of the annotated output image.
    pub output: Option<String>,
}

impl InputMetadata {
    /// The reported scene, when it names one of the known scenarios.
    pub fn scenario(&self) -> Option<Scenario> {
        self.scene
            .as_deref()
            .and_then(|label| Scenario::parse(label).ok())
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponseWire {
    #[serde(default)]
    ok: bool,
    input: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetaResponseWire {
    #[serde(default)]
    ok: bool,
    scene: Option<String>,
    output: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWire {
    #[serde(default)]
    ok: bool,
    error: Option<String>,
}

pub(crate) fn parse_upload_response(body: &str) -> Result<UploadAccepted, BackendError> {
    let parsed: UploadResponseWire = parse_json(body)?;
    if !parsed.ok {
        return Err(rejection(parsed.error));
    }
    match parsed.input {
        Some(input) if !input.trim().is_empty() => Ok(UploadAccepted { input }),
        _ => Err(BackendError::Decode(
            "Upload succeeded without an input name".to_string(),
        )),
    }
}

pub(crate) fn parse_meta_response(body: &str) -> Result<InputMetadata, BackendError> {
    let parsed: MetaResponseWire = parse_json(body)?;
    if !parsed.ok {
        return Err(rejection(parsed.error));
    }
    Ok(InputMetadata {
        scene: parsed.scene,
        output: parsed.output.filter(|output| !output.trim().is_empty()),
    })
}

/// Map a non-2xx response, preferring the `{ok:false, error}` envelope.
pub(crate) fn map_status_error(code: u16, body: String) -> BackendError {
    match serde_json::from_str::<ErrorWire>(body.trim()) {
        Ok(wire) if !wire.ok && wire.error.is_some() => rejection(wire.error),
        _ => BackendError::Status { code, body },
    }
}

fn rejection(error: Option<String>) -> BackendError {
    BackendError::Rejected(
        error
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REJECTION.to_string()),
    )
}

fn parse_json<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, BackendError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(BackendError::Decode("Empty response body".to_string()));
    }
    serde_json::from_str(trimmed).map_err(|err| BackendError::Decode(format!("{err}: {trimmed}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_success_returns_input_name() {
        let parsed =
            parse_upload_response(r#"{"ok":true,"input":"input3.jpg","output":"output3.jpg"}"#)
                .unwrap();
        assert_eq!(parsed.input, "input3.jpg");
    }

    #[test]
    fn upload_rejection_keeps_server_message() {
        let err = parse_upload_response(r#"{"ok":false,"error":"too large"}"#).unwrap_err();
        assert_eq!(err, BackendError::Rejected("too large".to_string()));
    }

    #[test]
    fn upload_rejection_without_message_uses_generic_text() {
        let err = parse_upload_response(r#"{"ok":false}"#).unwrap_err();
        assert_eq!(err, BackendError::Rejected(GENERIC_REJECTION.to_string()));
    }

    #[test]
    fn upload_ok_without_input_is_malformed() {
        let err = parse_upload_response(r#"{"ok":true}"#).unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn non_json_body_is_decode_error() {
        let err = parse_upload_response("<html>502</html>").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
        assert!(matches!(parse_meta_response("  ").unwrap_err(), BackendError::Decode(_)));
    }

    #[test]
    fn meta_parses_scene_and_output() {
        let meta = parse_meta_response(
            r#"{"ok":true,"input":"input3.jpg","output":"output3.jpg","scene":"光照变化","input_exists":true,"output_exists":true}"#,
        )
        .unwrap();
        assert_eq!(meta.output.as_deref(), Some("output3.jpg"));
        assert_eq!(meta.scenario(), Some(Scenario::Lighting));
    }

    #[test]
    fn unconfigured_scene_has_no_scenario() {
        let meta =
            parse_meta_response(r#"{"ok":true,"scene":"未配置场景","output":"output8.jpg"}"#)
                .unwrap();
        assert_eq!(meta.scene.as_deref(), Some("未配置场景"));
        assert_eq!(meta.scenario(), None);
    }

    #[test]
    fn status_error_prefers_envelope() {
        let err = map_status_error(400, r#"{"ok":false,"error":"文件名为空"}"#.to_string());
        assert_eq!(err, BackendError::Rejected("文件名为空".to_string()));
        let err = map_status_error(502, "Bad Gateway".to_string());
        assert!(matches!(err, BackendError::Status { code: 502, .. }));
    }
}
