//! System preamble and agent payload assembly.

use crate::session::Message;

/// Fixed system instructions sent ahead of every turn.
///
/// Static configuration, never user-controllable.
pub(crate) const SYSTEM_PREAMBLE: &str = "\
You are Auditron, an AI-powered compliance and audit assistant with tools for \
running cloud security audits and generating compliance documents.

Available tools:
1. For SOC 2 reports: use the generate_soc_document tool
2. For ISO standards (27001, 9001, ...): use the generate_iso_document tool
3. For comprehensive multi-framework reports: use the generate_compliance_report tool
4. For cloud security audits: use the provider audit tools

Critical instructions:
1. Only use real data from actual tool results; never fabricate findings.
2. Keep responses concise, with download links instead of full document content.
3. When tools return document results, present them as short summaries with \
the file name and size.

Workflow for compliance reports:
1. When the user asks for a SOC 2 or compliance report, first run the matching \
security audit tool to get real findings.
2. Then generate the document from those findings.
3. Present the result as a summary with key findings, the download link, and \
recommended next steps.

Do not include full HTML content or long text in responses.";

/// Builds the payload for one turn: the preamble first, then the transcript
/// snapshot (which already ends with the new user message).
pub(crate) fn with_preamble(preamble: &str, history: &[Message]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(preamble));
    messages.extend_from_slice(history);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageRole;

    #[test]
    fn preamble_leads_and_order_is_kept() {
        let history = vec![
            Message::user("audit my AWS account"),
            Message::assistant("On it."),
            Message::user("now a SOC 2 report"),
        ];

        let payload = with_preamble(SYSTEM_PREAMBLE, &history);

        assert_eq!(payload.len(), 4);
        assert_eq!(payload[0].role(), MessageRole::System);
        assert_eq!(payload[1].content(), "audit my AWS account");
        assert_eq!(payload[3].content(), "now a SOC 2 report");
    }
}
