//! Line-initial `#DIRECTIVE` handling and the per-pass macro table.

use winnow::ascii::space1;
use winnow::prelude::*;
use winnow::token::{one_of, take_till};

use crate::diag::Diagnostics;
use crate::error::DdfError;

/// Oldest `#VERSION` still understood.
pub const MIN_VERSION: u32 = 123;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Define,
    ClearAll,
    Version,
}

impl Directive {
    fn keyword(self) -> &'static str {
        match self {
            Directive::Define => "#DEFINE",
            Directive::ClearAll => "#CLEARALL",
            Directive::Version => "#VERSION",
        }
    }
}

/// Recognise a directive at the start of `line` (leading blanks skipped).
/// Returns the directive and the text following its keyword.
pub fn directive(line: &str) -> Option<(Directive, &str)> {
    let text = line.trim_start_matches([' ', '\t']);
    [Directive::Define, Directive::ClearAll, Directive::Version]
        .into_iter()
        .find_map(|d| {
            let kw = d.keyword();
            let head = text.get(..kw.len())?;
            head.eq_ignore_ascii_case(kw).then(|| (d, &text[kw.len()..]))
        })
}

/// `#DEFINE` name/value pairs for one pass. Names are stored upper-cased
/// since value tokens reach substitution upper-cased.
#[derive(Debug, Default)]
pub struct MacroTable {
    defines: Vec<(String, String)>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str, diag: &Diagnostics) -> Result<(), DdfError> {
        let name = name.to_ascii_uppercase();
        if self.defines.iter().any(|(n, _)| *n == name) {
            return Err(diag.error(format!("Redefinition of '{name}'")));
        }
        log::trace!("#DEFINE {name} = {value}");
        self.defines.push((name, value.to_string()));
        Ok(())
    }

    /// Replacement for `token` if it names a macro, else `token` itself.
    pub fn substitute<'a>(&'a self, token: &'a str) -> &'a str {
        self.defines
            .iter()
            .find(|(n, _)| n == token)
            .map_or(token, |(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    pub fn clear(&mut self) {
        self.defines.clear();
    }
}

fn define_name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let _ = space1.parse_next(input)?;
    take_till(1.., |c: char| c == ' ' || c == '\t').parse_next(input)
}

/// Split the body of a `#DEFINE` (already joined across `\` continuations)
/// into name and value. `None` for the value means nothing followed the name.
pub fn parse_define(body: &str) -> Option<(&str, Option<String>)> {
    let mut input = body;
    let name = define_name.parse_next(&mut input).ok()?;
    let value = input.replace('\r', " ");
    let value = value.trim();
    Some((name, (!value.is_empty()).then(|| value.to_string())))
}

fn version_digits(input: &mut &str) -> ModalResult<u32> {
    let digit = || one_of(|c: char| c.is_ascii_digit()).map(|c: char| c as u32 - '0' as u32);
    let _ = space1.parse_next(input)?;
    let (major, _, minor, patch) = (digit(), '.', digit(), digit()).parse_next(input)?;
    Ok(major * 100 + minor * 10 + patch)
}

/// Parse the text after `#VERSION`, e.g. `" 1.29"` → 129.
pub fn parse_version(rest: &str, engine_version: u32, diag: &mut Diagnostics) -> Result<u32, DdfError> {
    let mut input = rest.trim_end_matches(['\r', '\n']);
    let version = version_digits
        .parse_next(&mut input)
        .map_err(|_| diag.error("Badly formed #VERSION directive."))?;
    if version < MIN_VERSION {
        return Err(diag.error(format!("Illegal #VERSION number: {version}")));
    }
    if version > engine_version {
        diag.warn_error(format!(
            "This engine (version {engine_version}) cannot handle DDF version {version}"
        ))?;
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Policy;

    fn diag() -> Diagnostics {
        Diagnostics::new("test", Policy::default())
    }

    #[test]
    fn recognises_directives() {
        assert_eq!(directive("  #clearall").map(|d| d.0), Some(Directive::ClearAll));
        assert_eq!(directive("#VERSION 1.29"), Some((Directive::Version, " 1.29")));
        assert_eq!(directive("#Define X 1").map(|d| d.1), Some(" X 1"));
        assert_eq!(directive("#SEE:2"), None);
        assert_eq!(directive("HEALTH=1;"), None);
    }

    #[test]
    fn define_split() {
        assert_eq!(parse_define(" FOO 42"), Some(("FOO", Some("42".into()))));
        assert_eq!(parse_define(" FOO 1, \r 2 "), Some(("FOO", Some("1,   2".into()))));
        assert_eq!(parse_define(" FOO"), Some(("FOO", None)));
        assert_eq!(parse_define(""), None);
    }

    #[test]
    fn macro_table() {
        let d = diag();
        let mut macros = MacroTable::new();
        macros.insert("foo", "42", &d).expect("insert");
        assert_eq!(macros.substitute("FOO"), "42");
        assert_eq!(macros.substitute("BAR"), "BAR");
        assert!(macros.insert("FOO", "43", &d).is_err());
        macros.clear();
        assert!(macros.is_empty());
    }

    #[test]
    fn version_numbers() {
        let mut d = diag();
        assert_eq!(parse_version(" 1.29", 135, &mut d).expect("version"), 129);
        assert_eq!(parse_version("\t1.35xyz", 135, &mut d).expect("version"), 135);
        assert!(parse_version(" 1.22", 135, &mut d).is_err());
        assert!(parse_version("1.29", 135, &mut d).is_err());
        assert!(parse_version(" 1,29", 135, &mut d).is_err());
    }

    #[test]
    fn newer_version_is_a_warning() {
        let mut d = diag();
        assert_eq!(parse_version(" 2.00", 135, &mut d).expect("lenient"), 200);
        assert_eq!(d.warnings().len(), 1);
    }
}
