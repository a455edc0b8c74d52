use thiserror::Error;

pub type Result<T, E = LexiconError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("empty keyword in group '{0}'")]
    EmptyKeyword(&'static str),
    #[error("no role markers configured for {0}")]
    MissingRole(&'static str),
    #[error("invalid range pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("lexicon decode error: {0}")]
    Decode(String),
}
