//! Property-based tests for reply stream decoding
//!
//! These tests verify that chunk segmentation never changes the outcome of a
//! turn:
//! - With line carry, any byte-level split (even inside a UTF-8 sequence or a
//!   JSON payload) yields the same reply as the unsplit stream
//! - Without carry, splits that keep every line whole yield the same reply
//! - Lines without the data marker never reach the accumulator
//! - An error frame always aborts the turn and no assistant turn is recorded

use super::accumulator::{Progress, TurnAccumulator};
use super::decoder::LineBuffering;
use super::session::{ChatSession, SubmitOutcome};
use super::testing::{MockReply, MockTransport, RecordingView};
use super::types::ResponseMode;
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

/// Content deltas, including multi-byte characters
fn arb_deltas() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-zA-Z0-9 ,.!?éü世界🙂]{0,12}", 1..8)
}

/// Noise lines that must be ignored
fn arb_noise() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(": keep-alive".to_string()),
        Just("event: message".to_string()),
        "[a-z]{1,10}: [a-z ]{0,10}",
    ]
}

/// Wire text for a reply made of `deltas`, with noise between frames
fn wire(deltas: &[String], noise: &[String], done: bool) -> String {
    let mut out = String::new();
    for (i, delta) in deltas.iter().enumerate() {
        if let Some(n) = noise.get(i) {
            if !n.starts_with("data: ") {
                out.push_str(n);
                out.push('\n');
            }
        }
        let frame = serde_json::json!({ "content": delta });
        out.push_str("data: ");
        out.push_str(&frame.to_string());
        out.push('\n');
    }
    if done {
        out.push_str("data: {\"done\":true}\n");
    }
    out
}

/// Split `bytes` at the given cut points
fn segment(bytes: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for p in points {
        chunks.push(bytes[start..p].to_vec());
        start = p;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

/// Split only at line boundaries, grouping `sizes` lines per chunk
fn segment_lines(text: &str, sizes: &[usize]) -> Vec<Vec<u8>> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut chunks = Vec::new();
    let mut idx = 0;
    let mut sizes = sizes.iter().cycle();
    while idx < lines.len() {
        let take = sizes.next().copied().unwrap_or(1).max(1);
        let end = (idx + take).min(lines.len());
        chunks.push(lines[idx..end].concat().into_bytes());
        idx = end;
    }
    chunks
}

fn replay(chunks: &[Vec<u8>], buffering: LineBuffering) -> Result<String, String> {
    let mut acc = TurnAccumulator::new(buffering);
    let mut sink = |_: &str, _: &str| {};
    for chunk in chunks {
        match acc.feed(chunk, &mut sink) {
            Ok(Progress::Continue) => {}
            Ok(Progress::Done) => return Ok(acc.into_text()),
            Err(e) => return Err(e.message),
        }
    }
    acc.finish(&mut sink).map_err(|e| e.message)?;
    Ok(acc.into_text())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn carry_is_segmentation_independent(
        deltas in arb_deltas(),
        noise in proptest::collection::vec(arb_noise(), 0..8),
        cuts in proptest::collection::vec(any::<usize>(), 0..12),
        done in any::<bool>(),
    ) {
        let text = wire(&deltas, &noise, done);
        let chunks = segment(text.as_bytes(), &cuts);
        prop_assert_eq!(replay(&chunks, LineBuffering::Carry), Ok(deltas.concat()));
    }

    #[test]
    fn per_chunk_handles_whole_lines(
        deltas in arb_deltas(),
        noise in proptest::collection::vec(arb_noise(), 0..8),
        sizes in proptest::collection::vec(1usize..4, 1..5),
    ) {
        let text = wire(&deltas, &noise, true);
        let chunks = segment_lines(&text, &sizes);
        prop_assert_eq!(replay(&chunks, LineBuffering::PerChunk), Ok(deltas.concat()));
    }

    #[test]
    fn error_frame_aborts_turn(
        deltas in arb_deltas(),
        cuts in proptest::collection::vec(any::<usize>(), 0..6),
    ) {
        let mut text = wire(&deltas, &[], false);
        text.push_str("data: {\"error\":\"boom\"}\ndata: {\"content\":\"late\"}\n");
        let chunks = segment(text.as_bytes(), &cuts);

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (outcome, history_len, releases) = runtime.block_on(async {
            let transport = Arc::new(MockTransport::new());
            transport.queue(MockReply::stream_bytes(chunks));
            let mut session = ChatSession::new(transport.clone(), ResponseMode::Streaming, LineBuffering::Carry);
            let mut view = RecordingView::default();
            let outcome = session.submit("question", &mut view).await;
            (outcome, session.history().len(), transport.release_count())
        });

        prop_assert!(matches!(outcome, SubmitOutcome::Failed(ref e) if e.message == "boom"));
        prop_assert_eq!(history_len, 1);
        prop_assert_eq!(releases, 1);
    }
}
