//! Printable conversation transcripts

use agent_runtime::{MessageRole, ThreadMessage};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Write;

const SEPARATOR_WIDTH: usize = 60;

/// One message of a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    /// Agent that wrote the message, for assistant messages
    pub assistant_id: Option<String>,
    /// Unix timestamp (seconds)
    pub created_at: i64,
    pub text: String,
}

impl TranscriptEntry {
    fn timestamp(&self) -> String {
        timestamp_in(&Local, self.created_at)
    }
}

/// A thread's messages in time order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Build from listed messages; messages without text are skipped
    pub fn from_messages(messages: &[ThreadMessage]) -> Self {
        let mut entries: Vec<TranscriptEntry> = messages
            .iter()
            .filter_map(|message| {
                message.text().map(|text| TranscriptEntry {
                    role: message.role,
                    assistant_id: message.assistant_id.clone(),
                    created_at: message.created_at,
                    text,
                })
            })
            .collect();
        // Stable, so messages created in the same second keep service order
        entries.sort_by_key(|entry| entry.created_at);
        Self { entries }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Speaker, time and text of every message, between separator lines
    pub fn render_detailed(&self) -> String {
        let mut out = format!("🧵 Conversation History:\n{}\n", "-".repeat(SEPARATOR_WIDTH));
        for entry in &self.entries {
            let speaker = match entry.role {
                MessageRole::User => "🧑 User".to_string(),
                MessageRole::Assistant => format!(
                    "🤖 Agent ({})",
                    entry.assistant_id.as_deref().unwrap_or("Unknown")
                ),
            };
            let heading = format!("{speaker} at {}", entry.timestamp());
            let _ = writeln!(out, "{heading}");
            let _ = writeln!(out, "{}", "-".repeat(heading.chars().count()));
            let _ = writeln!(out, "{}", entry.text.trim());
            let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
        }
        out
    }

    /// One line per message, prefixed with the sender
    pub fn render_summary(&self) -> String {
        let mut out = format!("📨 Final Summary:\n{}\n", "=".repeat(SEPARATOR_WIDTH));
        for entry in &self.entries {
            let sender = match entry.role {
                MessageRole::Assistant => "🤖 Assistant",
                MessageRole::User => "🧑 User",
            };
            let _ = writeln!(out, "{sender}: {}", entry.text);
            let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
        }
        out
    }
}

fn timestamp_in<Tz: TimeZone>(tz: &Tz, secs: i64) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp(secs, 0)
        .map(|utc| utc.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_runtime::MessageContent;
    use agent_runtime::types::TextContent;
    use chrono::Utc;

    fn message(id: &str, role: MessageRole, created_at: i64, text: &str) -> ThreadMessage {
        ThreadMessage {
            id: id.to_string(),
            role,
            created_at,
            content: vec![MessageContent::Text {
                text: TextContent {
                    value: text.to_string(),
                },
            }],
            assistant_id: (role == MessageRole::Assistant).then(|| "asst_9".to_string()),
            run_id: None,
        }
    }

    fn transcript() -> Transcript {
        Transcript::from_messages(&[
            message("msg_2", MessageRole::Assistant, 1_700_000_010, "  IBM revenue: ****  "),
            message("msg_1", MessageRole::User, 1_700_000_000, "Summarize the financial data."),
            ThreadMessage {
                content: vec![MessageContent::Unsupported],
                ..message("msg_3", MessageRole::Assistant, 1_700_000_020, "")
            },
        ])
    }

    #[test]
    fn test_entries_are_in_time_order() {
        let transcript = transcript();
        let roles: Vec<_> = transcript.entries().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![MessageRole::User, MessageRole::Assistant]);
    }

    #[test]
    fn test_summary_style() {
        let summary = transcript().render_summary();
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines[0], "📨 Final Summary:");
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2], "🧑 User: Summarize the financial data.");
        assert_eq!(lines[3], "-".repeat(60));
        assert_eq!(lines[4], "🤖 Assistant:   IBM revenue: ****  ");
    }

    #[test]
    fn test_detailed_style() {
        let detailed = transcript().render_detailed();
        assert!(detailed.contains("🤖 Agent (asst_9) at "));
        assert!(detailed.contains("\nIBM revenue: ****\n"));
        assert!(detailed.contains("🧑 User at "));
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(timestamp_in(&Utc, 1_700_000_000), "2023-11-14 22:13:20");
    }
}
