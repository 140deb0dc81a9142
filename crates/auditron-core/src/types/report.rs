//! Compliance report documents.
//!
//! Report documents are produced as a side effect of a chat turn: the agent's
//! document-generation tools return a JSON payload describing the generated
//! HTML report, and the relay decodes that payload out of the tool-call
//! stream. Decoding is best-effort; anything that does not match the expected
//! shape is skipped without failing the turn.

use serde::{Deserialize, Serialize};

/// Fallback for payloads that omit the human-readable size.
const UNKNOWN_SIZE: &str = "Unknown size";

/// Kind of compliance report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum ReportKind {
    /// SOC 2 Type II report.
    Soc,
    /// ISO standard assessment (27001, 9001, ...).
    Iso,
    /// Multi-framework comprehensive report.
    Comprehensive,
}

/// A generated compliance report document.
///
/// At most one lives in a conversation session at a time; a newly decoded
/// document replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ReportDocument {
    /// Full HTML content of the report.
    pub content: String,

    /// Suggested download file name.
    pub file_name: String,

    /// Human-readable file size, e.g. `"45 KB"`.
    pub file_size: String,

    /// Report kind.
    pub document_type: ReportKind,
}

/// Wire shape of a document-generation tool result.
///
/// Tool payloads carry more fields (download URL, summary, status message);
/// only the ones the session keeps are decoded here, everything else is
/// ignored for forward compatibility.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolReportPayload {
    #[serde(default)]
    success: bool,
    content: String,
    file_name: String,
    document_type: ReportKind,
    #[serde(default)]
    file_size: Option<String>,
}

impl ReportDocument {
    /// Decodes a report document from a tool result payload.
    ///
    /// Returns `None` for malformed payloads, payloads with `success: false`,
    /// and payloads of other tools; the caller treats all of those as "no
    /// document in this chunk".
    pub fn from_tool_output(payload: &str) -> Option<Self> {
        let payload: ToolReportPayload = serde_json::from_str(payload).ok()?;
        if !payload.success {
            return None;
        }

        Some(Self {
            content: payload.content,
            file_name: payload.file_name,
            file_size: payload.file_size.unwrap_or_else(|| UNKNOWN_SIZE.to_string()),
            document_type: payload.document_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(kind: &str) -> String {
        format!(
            r#"{{
                "success": true,
                "documentType": "{kind}",
                "content": "<html></html>",
                "downloadUrl": "http://localhost:3001/reports/r.html",
                "fileName": "SOC2_Report_Acme_2026-08-07.html",
                "fileSize": "45 KB",
                "message": "SOC 2 compliance document generated successfully"
            }}"#
        )
    }

    #[test]
    fn decodes_successful_payload() {
        let document = ReportDocument::from_tool_output(&payload("SOC")).unwrap();

        assert_eq!(document.document_type, ReportKind::Soc);
        assert_eq!(document.content, "<html></html>");
        assert_eq!(document.file_name, "SOC2_Report_Acme_2026-08-07.html");
        assert_eq!(document.file_size, "45 KB");
    }

    #[test]
    fn decodes_all_report_kinds() {
        for (kind, expected) in [
            ("SOC", ReportKind::Soc),
            ("ISO", ReportKind::Iso),
            ("COMPREHENSIVE", ReportKind::Comprehensive),
        ] {
            let document = ReportDocument::from_tool_output(&payload(kind)).unwrap();
            assert_eq!(document.document_type, expected);
        }
    }

    #[test]
    fn missing_file_size_defaults() {
        let document = ReportDocument::from_tool_output(
            r#"{"success": true, "documentType": "ISO", "content": "x", "fileName": "r.html"}"#,
        )
        .unwrap();

        assert_eq!(document.file_size, "Unknown size");
    }

    #[test]
    fn rejects_failed_payload() {
        let payload = r#"{
            "success": false,
            "error": "Failed to generate SOC document: boom",
            "documentType": "SOC"
        }"#;

        assert!(ReportDocument::from_tool_output(payload).is_none());
    }

    #[test]
    fn rejects_non_document_tool_output() {
        // An audit tool result: valid JSON, but not a document payload.
        let payload = r#"{
            "success": true,
            "provider": "AWS",
            "results": [{"checkId": "AWS-S3-PUBLIC-ACCESS-V1", "status": "FAILURE"}]
        }"#;

        assert!(ReportDocument::from_tool_output(payload).is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ReportDocument::from_tool_output("not json").is_none());
        assert!(ReportDocument::from_tool_output("").is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let document = ReportDocument {
            content: "<html></html>".to_string(),
            file_name: "r.html".to_string(),
            file_size: "1 KB".to_string(),
            document_type: ReportKind::Comprehensive,
        };

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["fileName"], "r.html");
        assert_eq!(json["documentType"], "COMPREHENSIVE");
    }
}
