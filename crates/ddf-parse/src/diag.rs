//! Per-pass diagnostics: the current location, the error policy, and the
//! warnings collected so far.
//!
//! Every severity helper consults [`Policy`] to decide whether a condition
//! aborts the pass or is merely recorded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DdfError, Location};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Promote warn-errors and obsolete notices to fatal errors.
    pub strict_errors: bool,
    /// Demote lax errors to warnings.
    pub lax_errors: bool,
    pub no_warnings: bool,
    pub no_obsoletes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningKind {
    Warning,
    Obsolete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub loc: Location,
    pub msg: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc, self.msg)
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    loc: Location,
    policy: Policy,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new(source: &str, policy: Policy) -> Self {
        Self {
            loc: Location {
                source: source.to_string(),
                line: 1,
                ..Location::default()
            },
            policy,
            warnings: Vec::new(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn location(&self) -> &Location {
        &self.loc
    }

    pub fn set_line(&mut self, line: usize, text: &str) {
        self.loc.line = line;
        self.loc.line_text = text.trim_end_matches(['\r', '\n']).to_string();
    }

    pub fn clear_line_text(&mut self) {
        self.loc.line_text.clear();
    }

    pub fn set_entry(&mut self, entry: Option<String>) {
        self.loc.entry = entry;
    }

    pub fn error(&self, msg: impl Into<String>) -> DdfError {
        DdfError::Structural {
            loc: self.loc.clone(),
            msg: msg.into(),
        }
    }

    pub fn semantic(&self, msg: impl Into<String>) -> DdfError {
        DdfError::Semantic {
            loc: self.loc.clone(),
            msg: msg.into(),
        }
    }

    /// Fatal unless lax errors are allowed.
    pub fn lax_error(&mut self, msg: impl Into<String>) -> Result<(), DdfError> {
        if !self.policy.lax_errors {
            return Err(self.semantic(msg));
        }
        self.warning(msg);
        Ok(())
    }

    /// A warning, unless strict errors are requested.
    pub fn warn_error(&mut self, msg: impl Into<String>) -> Result<(), DdfError> {
        if self.policy.strict_errors {
            return Err(self.semantic(msg));
        }
        self.warning(msg);
        Ok(())
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.record(WarningKind::Warning, msg.into());
    }

    pub fn obsolete(&mut self, msg: impl Into<String>) -> Result<(), DdfError> {
        if self.policy.strict_errors {
            return Err(self.semantic(msg));
        }
        if !self.policy.no_obsoletes {
            self.record(WarningKind::Obsolete, msg.into());
        }
        Ok(())
    }

    fn record(&mut self, kind: WarningKind, msg: String) {
        if self.policy.no_warnings {
            return;
        }
        let warning = Warning {
            kind,
            loc: self.loc.clone(),
            msg,
        };
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_error_respects_strict() {
        let mut diag = Diagnostics::new("t", Policy::default());
        assert!(diag.warn_error("soft").is_ok());
        assert_eq!(diag.warnings().len(), 1);

        let mut strict = Diagnostics::new(
            "t",
            Policy {
                strict_errors: true,
                ..Policy::default()
            },
        );
        assert!(strict.warn_error("soft").is_err());
        assert!(strict.obsolete("old").is_err());
    }

    #[test]
    fn lax_error_respects_lax() {
        let mut diag = Diagnostics::new("t", Policy::default());
        assert!(diag.lax_error("hard").is_err());

        let mut lax = Diagnostics::new(
            "t",
            Policy {
                lax_errors: true,
                ..Policy::default()
            },
        );
        assert!(lax.lax_error("hard").is_ok());
        assert_eq!(lax.warnings()[0].msg, "hard");
    }

    #[test]
    fn quiet_policies_drop_warnings() {
        let mut diag = Diagnostics::new(
            "t",
            Policy {
                no_obsoletes: true,
                ..Policy::default()
            },
        );
        diag.obsolete("old").expect("not fatal");
        assert!(diag.warnings().is_empty());
        diag.warning("kept");
        assert_eq!(diag.warnings().len(), 1);

        let mut silent = Diagnostics::new(
            "t",
            Policy {
                no_warnings: true,
                ..Policy::default()
            },
        );
        silent.warning("dropped");
        silent.obsolete("dropped").expect("not fatal");
        assert!(silent.warnings().is_empty());
    }

    #[test]
    fn errors_carry_current_location() {
        let mut diag = Diagnostics::new("things.ddf", Policy::default());
        diag.set_line(7, "SPEED=fast;\r\n");
        diag.set_entry(Some("[IMP]".into()));
        let err = diag.error("boom");
        assert_eq!(err.location().line, 7);
        assert_eq!(err.location().line_text, "SPEED=fast;");
        assert_eq!(err.location().entry.as_deref(), Some("[IMP]"));
    }

    #[test]
    fn policy_from_partial_json() {
        let p: Policy = serde_json::from_str(r#"{"strict_errors": true}"#).expect("policy");
        assert!(p.strict_errors);
        assert!(!p.no_warnings);
    }
}
