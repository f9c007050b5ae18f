use serde::Serialize;

/// A state label plus a zero-based offset from it (`DEATH:3` is offset 2).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct LabelOffset {
    pub label: String,
    pub offset: usize,
}

impl LabelOffset {
    pub fn new(label: impl Into<String>, offset: usize) -> Self {
        Self {
            label: label.into(),
            offset,
        }
    }

    pub fn is_set(&self) -> bool {
        !self.label.is_empty()
    }
}
