use std::path::PathBuf;

use kurbo::Point;

use crate::foundation::core::Canvas;
use crate::foundation::error::{GazelineError, GazelineResult};
use crate::session::model::{FixationRecord, GazeSession, SourceFile};
use crate::session::tokens::{LineCol, TokenDescriptor, TokenMap};

/// Parameters of one session load from the extraction collaborator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionRequest {
    /// Reference to the raw gaze-tracking capture (e.g. an XML export path).
    pub capture: String,
    /// Reference to the source-code file the gaze was recorded over.
    pub source: String,
    /// Language identifier handed to the tokenizer (e.g. `python`).
    pub language: String,
}

/// A fully ingested, validated session: source text, token map, fixation
/// sequence. Produced once by a [`SessionSource`]; immutable afterwards.
#[derive(Clone, Debug)]
pub struct LoadedSession {
    /// The viewed source file.
    pub source: SourceFile,
    /// Token descriptors for backdrop rendering and dwell statistics.
    pub tokens: TokenMap,
    /// The validated fixation sequence.
    pub session: GazeSession,
}

/// The ingestion seam: answers one [`SessionRequest`] with a loaded session.
///
/// Loads are single-shot at session start and never retried by the engine.
pub trait SessionSource {
    /// Resolve the request into a validated session.
    fn load(&self, request: &SessionRequest) -> GazelineResult<LoadedSession>;
}

// Wire structs mirroring the extraction service's JSON response. Unknown
// fields (per-token fixation attachments, capture metadata) are ignored.

#[derive(Debug, serde::Deserialize)]
struct SessionDocument {
    file: FileMeta,
    code_str: String,
    #[serde(default)]
    tokens: Vec<TokenWire>,
    #[serde(default)]
    fixations: Vec<FixationWire>,
    #[serde(default)]
    screen_width: Option<u32>,
    #[serde(default)]
    screen_height: Option<u32>,
}

#[derive(Debug, serde::Deserialize)]
struct FileMeta {
    file_id: String,
    path: String,
    language: String,
}

#[derive(Debug, serde::Deserialize)]
struct TokenWire {
    token_id: String,
    #[serde(rename = "type")]
    kind: String,
    text: String,
    start: LineCol,
    end: LineCol,
}

#[derive(Debug, serde::Deserialize)]
struct FixationWire {
    index: u32,
    token_id: String,
    start_time: u64,
    end_time: u64,
    duration_ms: u64,
    centroid_x: f64,
    centroid_y: f64,
    num_samples: u32,
    value: String,
}

/// Parse and validate one session document.
///
/// This is the single validation point for the record invariants: interval
/// consistency, ascending starts, in-bounds centroids, positive surface.
/// Surface dimensions default to 900x700 when the document omits them.
pub fn parse_session_document(json: &str) -> GazelineResult<LoadedSession> {
    let doc: SessionDocument = serde_json::from_str(json)
        .map_err(|e| GazelineError::serde(format!("invalid session document: {e}")))?;

    let canvas = match (doc.screen_width, doc.screen_height) {
        (Some(w), Some(h)) => Canvas::new(w, h)?,
        (None, None) => Canvas::default(),
        _ => {
            return Err(GazelineError::validation(
                "session document declares only one of screen_width/screen_height",
            ));
        }
    };

    let records = doc
        .fixations
        .into_iter()
        .map(|f| FixationRecord {
            index: f.index,
            token_id: f.token_id,
            start_ms: f.start_time,
            end_ms: f.end_time,
            duration_ms: f.duration_ms,
            centroid: Point::new(f.centroid_x, f.centroid_y),
            num_samples: f.num_samples,
            value: f.value,
        })
        .collect();
    let session = GazeSession::new(canvas, records)?;

    let tokens = TokenMap::from_descriptors(doc.tokens.into_iter().map(|t| TokenDescriptor {
        id: t.token_id,
        kind: t.kind,
        text: t.text,
        start: t.start,
        end: t.end,
    }));

    let source = SourceFile {
        file_id: doc.file.file_id,
        path: doc.file.path,
        language: doc.file.language,
        code: doc.code_str,
    };

    tracing::debug!(
        file = %source.path,
        fixations = session.records().len(),
        tokens = tokens.len(),
        "parsed session document"
    );

    Ok(LoadedSession {
        source,
        tokens,
        session,
    })
}

/// Loads session documents that the extraction service has already written to
/// disk. The request's `capture` field is interpreted as the document path.
#[derive(Clone, Debug, Default)]
pub struct FileSessionSource {
    root: Option<PathBuf>,
}

impl FileSessionSource {
    /// Resolve capture paths relative to the current directory.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Resolve capture paths relative to `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl SessionSource for FileSessionSource {
    fn load(&self, request: &SessionRequest) -> GazelineResult<LoadedSession> {
        let path = match &self.root {
            Some(root) => root.join(&request.capture),
            None => PathBuf::from(&request.capture),
        };
        let json = std::fs::read_to_string(&path).map_err(|e| {
            GazelineError::session(format!(
                "failed to read session document '{}': {e}",
                path.display()
            ))
        })?;
        parse_session_document(&json)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/ingest.rs"]
mod tests;
