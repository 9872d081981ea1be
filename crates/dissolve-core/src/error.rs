use thiserror::Error;

/// One-shot setup failures reported by frontends to their caller.
///
/// The per-frame core never produces these; they come from acquiring
/// platform resources before the loop starts.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("audio output unavailable: {0}")]
    Audio(String),
    #[error("graphics adapter unavailable: {0}")]
    Graphics(String),
    #[error("immersive session unavailable: {0}")]
    Session(String),
    #[error("missing host element #{0}")]
    MissingElement(String),
}
