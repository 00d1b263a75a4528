use crate::types::TranscriptResult;

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format transcript segments with timestamps, one `[MM:SS] text` line each.
///
/// Results without timing (VTT probes) fall back to the plain text.
pub fn format_transcript_with_timestamps(transcript: &TranscriptResult) -> String {
    if transcript.segments.is_empty() {
        return transcript.full_text.clone();
    }

    transcript
        .segments
        .iter()
        .map(|seg| format!("[{}] {}", format_timestamp(seg.start), seg.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{provider::Provider, types::Segment};

    #[test]
    fn timestamps_are_minutes_and_seconds() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(61.9), "01:01");
        assert_eq!(format_timestamp(3600.0), "60:00");
    }

    #[test]
    fn prefixes_each_segment() {
        let transcript = TranscriptResult::from_segments(
            "dQw4w9WgXcQ",
            "en",
            None,
            vec![
                Segment {
                    text: "first".to_string(),
                    start: 1.0,
                    duration: 2.0,
                },
                Segment {
                    text: "second".to_string(),
                    start: 75.5,
                    duration: 2.0,
                },
            ],
            Provider::WatchPage,
        );

        assert_eq!(
            format_transcript_with_timestamps(&transcript),
            "[00:01] first\n[01:15] second"
        );
    }

    #[test]
    fn untimed_results_print_plain_text() {
        let transcript =
            TranscriptResult::from_text("dQw4w9WgXcQ", "en", "one\ntwo", Provider::Timedtext);
        assert_eq!(format_transcript_with_timestamps(&transcript), "one\ntwo");
    }
}
