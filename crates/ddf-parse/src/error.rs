use std::fmt;

/// Where in the input a diagnostic was raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub source: String,
    pub line: usize,
    /// Current entry as written in the header, e.g. `[IMP]`.
    pub entry: Option<String>,
    pub line_text: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)?;
        if let Some(entry) = &self.entry {
            write!(f, " {entry}")?;
        }
        Ok(())
    }
}

fn line_suffix(loc: &Location) -> String {
    if loc.line_text.is_empty() {
        String::new()
    } else {
        format!("\n  > {}", loc.line_text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DdfError {
    /// The input itself is malformed; the parse position can't be trusted.
    #[error("{loc}: {msg}{}", line_suffix(.loc))]
    Structural { loc: Location, msg: String },
    /// Well-formed input that says something invalid.
    #[error("{loc}: {msg}{}", line_suffix(.loc))]
    Semantic { loc: Location, msg: String },
}

impl DdfError {
    pub fn location(&self) -> &Location {
        match self {
            DdfError::Structural { loc, .. } | DdfError::Semantic { loc, .. } => loc,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DdfError::Structural { msg, .. } | DdfError::Semantic { msg, .. } => msg,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, DdfError::Structural { .. })
    }
}
