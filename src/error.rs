use std::io;

/// Errors raised while building or watching a rule table
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("read rule file failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed rule at line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("watch rule file failed: {0}")]
    Watch(#[from] notify::Error),
}
