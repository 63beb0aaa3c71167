//! Response interpreter.
//!
//! Backends do not always honor the structured channel format: truncated
//! generations lose their closing markers, and chat servers often strip the
//! markers entirely. The interpreter peels off whatever structure is present
//! and otherwise hands back the raw text. It never fails.

/// Opening marker of the final-answer channel.
pub const FINAL_CHANNEL: &str = "<|channel|>final<|message|>";
/// Opening marker of the reasoning channel.
pub const ANALYSIS_CHANNEL: &str = "<|channel|>analysis<|message|>";
/// End of one channel message.
pub const END_MARKER: &str = "<|end|>";
/// Trailing marker closing the whole response.
pub const RETURN_MARKER: &str = "<|return|>";
/// Chat-template opening of an assistant turn.
pub const ASSISTANT_TURN: &str = "<|im_start|>assistant";
/// Chat-template end of a turn.
pub const TURN_END: &str = "<|im_end|>";

/// Which rule produced the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Taken from the final-answer channel.
    FinalChannel,
    /// Taken from the reasoning channel; usable but degraded.
    AnalysisChannel,
    /// Taken from the last assistant turn of a chat template.
    AssistantTurn,
    /// No marker recognised; raw text returned.
    Raw,
}

/// Extract the assistant's intended output from raw engine text.
pub fn interpret(raw: &str) -> String {
    interpret_with_source(raw).0
}

/// Like [`interpret`], also reporting which rule applied.
pub fn interpret_with_source(raw: &str) -> (String, Extraction) {
    if let Some(answer) = channel_message(raw, FINAL_CHANNEL) {
        return (answer, Extraction::FinalChannel);
    }
    if let Some(answer) = channel_message(raw, ANALYSIS_CHANNEL) {
        return (answer, Extraction::AnalysisChannel);
    }
    if let Some(answer) = segment_between(raw, ASSISTANT_TURN, TURN_END) {
        return (answer.trim().to_string(), Extraction::AssistantTurn);
    }
    (raw.to_string(), Extraction::Raw)
}

fn channel_message(raw: &str, marker: &str) -> Option<String> {
    let message = segment_between(raw, marker, END_MARKER)?.trim();
    let message = message
        .strip_suffix(RETURN_MARKER)
        .map_or(message, str::trim_end);
    Some(message.to_string())
}

/// Text after the last `open` marker, cut at the next `close` marker.
fn segment_between<'a>(raw: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = raw.rfind(open)? + open.len();
    let tail = &raw[start..];
    Some(tail.find(close).map_or(tail, |end| &tail[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_channel_enclosed_text() {
        let raw = "<|start|>assistant<|channel|>analysis<|message|>thinking<|end|>\
                   <|start|>assistant<|channel|>final<|message|>The answer is 4.<|end|>";
        assert_eq!(
            interpret_with_source(raw),
            ("The answer is 4.".to_string(), Extraction::FinalChannel)
        );
    }

    #[test]
    fn test_final_channel_strips_trailing_return() {
        let raw = "<|channel|>final<|message|>Proof complete.<|return|>";
        assert_eq!(interpret(raw), "Proof complete.");
    }

    #[test]
    fn test_final_channel_strips_return_and_whitespace() {
        let raw = "<|channel|>final<|message|>\n  Q.E.D.  \n<|return|>";
        assert_eq!(interpret(raw), "Q.E.D.");
    }

    #[test]
    fn test_last_final_channel_wins() {
        let raw = "<|channel|>final<|message|>first<|end|><|channel|>final<|message|>second<|end|>";
        assert_eq!(interpret(raw), "second");
    }

    #[test]
    fn test_truncated_analysis_channel_is_used() {
        let raw = "<|channel|>analysis<|message|>We consider the case n = 1 and";
        assert_eq!(
            interpret_with_source(raw),
            (
                "We consider the case n = 1 and".to_string(),
                Extraction::AnalysisChannel
            )
        );
    }

    #[test]
    fn test_assistant_turn_fallback() {
        let raw = "<|im_start|>user\nhi<|im_end|>\n<|im_start|>assistant\n yes <|im_end|>";
        assert_eq!(
            interpret_with_source(raw),
            ("yes".to_string(), Extraction::AssistantTurn)
        );
    }

    #[test]
    fn test_unmarked_text_passes_through_unchanged() {
        let raw = "  **Summary**\nNo markers at all.\n";
        assert_eq!(interpret_with_source(raw), (raw.to_string(), Extraction::Raw));
    }
}
