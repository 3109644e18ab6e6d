// src/batch/mod.rs
// =============================================================================
// Splitting input into chunks and pushing them concurrently.
//
// Submodules:
// - chunk: reads a URL file and groups its lines into fixed-size chunks
// - dispatch: runs the pushes with a bounded number in flight
// =============================================================================

mod chunk;
mod dispatch;

pub use chunk::{non_blank, Chunk, Chunker, UrlLines};
pub use dispatch::{dispatch, DispatchReport};
