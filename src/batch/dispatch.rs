// src/batch/dispatch.rs
// =============================================================================
// Fans chunks out to a fixed number of concurrent pushes.
//
// How it works:
// 1. The chunk iterator is wrapped in a stream and pulled lazily, so at most
//    `concurrency` chunks are held in memory / in flight at a time
// 2. Each chunk becomes one future calling Submitter::submit exactly once
// 3. buffer_unordered(concurrency) keeps that many futures running and hands
//    back results as they finish (NOT in input order)
// 4. We return only after every chunk has a result
//
// A failure on one chunk never stops the others: it just becomes that
// chunk's Outcome. If the cancellation token fires, chunks that have not
// finished yet resolve to Outcome::Cancelled right away.
//
// Rust concepts:
// - Streams: the async version of iterators
// - tokio::select!: race two futures, take whichever finishes first
// =============================================================================

use futures::future;
use futures::stream::{self, StreamExt};
use std::io;
use tokio_util::sync::CancellationToken;

use super::Chunk;
use crate::push::{SubmissionResult, Submitter};

/// Everything a dispatch produced.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// One entry per chunk, in completion order
    pub results: Vec<SubmissionResult>,
    /// Set if reading the input failed part-way; chunks after it were never built
    pub input_error: Option<io::Error>,
}

pub async fn dispatch<I, S>(
    chunks: I,
    submitter: &S,
    concurrency: usize,
    cancel: &CancellationToken,
) -> DispatchReport
where
    I: Iterator<Item = io::Result<Chunk>>,
    S: Submitter + ?Sized,
{
    let mode = submitter.mode();
    let mut input_error = None;

    let results = stream::iter(chunks)
        .filter_map(|item| {
            future::ready(match item {
                Ok(chunk) => Some(chunk),
                Err(e) => {
                    log::error!("[{}] reading input failed: {}", mode, e);
                    input_error = Some(e);
                    None
                }
            })
        })
        .map(|chunk| async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => SubmissionResult::cancelled(mode, &chunk),
                attempt = submitter.submit(&chunk) => {
                    SubmissionResult::from_attempt(mode, &chunk, attempt)
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    DispatchReport {
        results,
        input_error,
    }
}
