//! The outer read loop: feeds characters to the [`Lexer`], handles
//! line-initial directives, and turns entry and field boundaries into
//! [`Family`] callbacks.

use winnow::ascii::multispace0;
use winnow::prelude::*;
use winnow::token::take_while;

use crate::diag::{Diagnostics, Policy, Warning};
use crate::directive::{Directive, MacroTable, directive, parse_define, parse_version};
use crate::error::DdfError;
use crate::lexer::{LexEvent, Lexer, Mode};

/// Version assumed for files without `#VERSION`, and the newest understood.
pub const ENGINE_VERSION: u32 = 135;

/// One entity family: receives the entries of a DDF unit as they are read.
pub trait Family {
    /// A `[NAME]` header. `extend` is set for `[++NAME]`.
    fn start_entry(&mut self, name: &str, extend: bool, diag: &mut Diagnostics)
    -> Result<(), DdfError>;

    /// One value of `field = v0, v1, ...;`, called once per value.
    fn parse_field(
        &mut self,
        field: &str,
        value: &str,
        index: usize,
        is_last: bool,
        diag: &mut Diagnostics,
    ) -> Result<(), DdfError>;

    fn finish_entry(&mut self, diag: &mut Diagnostics) -> Result<(), DdfError>;

    /// `#CLEARALL`.
    fn clear_all(&mut self, diag: &mut Diagnostics) -> Result<(), DdfError>;
}

#[derive(Debug, Clone)]
pub struct ReadInfo<'a> {
    /// Expected `<TAG>` header.
    pub tag: &'a str,
    /// File or lump name used in diagnostics.
    pub source: &'a str,
    /// Logged when the pass starts.
    pub message: Option<&'a str>,
    pub engine_version: u32,
}

impl<'a> ReadInfo<'a> {
    pub fn new(tag: &'a str, source: &'a str) -> Self {
        Self {
            tag,
            source,
            message: None,
            engine_version: ENGINE_VERSION,
        }
    }
}

#[derive(Debug, Default)]
pub struct Report {
    pub entries: usize,
    pub warnings: Vec<Warning>,
    /// From `#VERSION`, if present.
    pub version: Option<u32>,
}

fn tag_header<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let _ = multispace0.parse_next(input)?;
    let _ = '<'.parse_next(input)?;
    let tag = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    let _ = '>'.parse_next(input)?;
    Ok(tag)
}

/// The `<TAG>` a unit starts with, used to pick its family.
pub fn peek_tag(input: &str) -> Option<String> {
    let mut rest = input;
    tag_header
        .parse_next(&mut rest)
        .ok()
        .map(str::to_ascii_uppercase)
}

fn line_at(rest: &str) -> &str {
    let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
    &rest[..end]
}

/// Join a `#DEFINE` body across lines ending in `\`. Returns the body,
/// the remaining input (at the final newline), and the lines consumed.
fn define_body(rest: &str) -> (String, &str, usize) {
    let mut body = String::new();
    let mut rest = rest;
    let mut extra = 0;
    loop {
        let end = rest.find('\n').unwrap_or(rest.len());
        let line = rest[..end].trim_end_matches('\r');
        match line.strip_suffix('\\') {
            Some(head) if end < rest.len() => {
                body.push_str(head);
                body.push(' ');
                rest = &rest[end + 1..];
                extra += 1;
            }
            _ => {
                body.push_str(line);
                return (body, &rest[end..], extra);
            }
        }
    }
}

struct Pass<'i> {
    info: &'i ReadInfo<'i>,
    lexer: Lexer,
    diag: Diagnostics,
    macros: MacroTable,
    command: Option<String>,
    index: usize,
    entries: usize,
    version: Option<u32>,
}

impl<'i> Pass<'i> {
    fn directive<'s, F: Family>(
        &mut self,
        d: Directive,
        after: &'s str,
        family: &mut F,
    ) -> Result<(&'s str, usize), DdfError> {
        let line_end = after.find('\n').unwrap_or(after.len());
        match d {
            Directive::Define => {
                let (body, rest, extra) = define_body(after);
                let (name, value) = parse_define(&body)
                    .ok_or_else(|| self.diag.error("#DEFINE without a name"))?;
                let value = value
                    .ok_or_else(|| self.diag.error(format!("#DEFINE '{name}' as what?!")))?;
                self.macros.insert(name, &value, &self.diag)?;
                return Ok((rest, extra));
            }
            Directive::ClearAll => {
                if self.entries > 0 {
                    return Err(self.diag.error("#CLEARALL cannot be used inside an entry !"));
                }
                log::debug!("{}: #CLEARALL", self.info.source);
                family.clear_all(&mut self.diag)?;
            }
            Directive::Version => {
                if self.entries > 0 {
                    return Err(self.diag.error("#VERSION cannot be used inside an entry !"));
                }
                let v = parse_version(&after[..line_end], self.info.engine_version, &mut self.diag)?;
                self.version = Some(v);
            }
        }
        Ok((&after[line_end..], 0))
    }

    fn send_value<F: Family>(&mut self, is_last: bool, family: &mut F) -> Result<(), DdfError> {
        let token = self.lexer.take_token();
        let Some(cmd) = self.command.as_deref() else {
            let what = if is_last { "semicolon `;'" } else { "comma `,'" };
            return Err(self.diag.error(format!("Unexpected {what}.")));
        };
        if is_last && self.lexer.bracket_depth() > 0 {
            return Err(self.diag.error("Missing ')' bracket in ddf command."));
        }
        if self.entries == 0 {
            return self
                .diag
                .warn_error(format!("Command {cmd} used outside of any entry"));
        }
        let value = self.macros.substitute(&token);
        family.parse_field(cmd, value, self.index, is_last, &mut self.diag)?;
        self.index += 1;
        Ok(())
    }

    fn event<F: Family>(&mut self, event: LexEvent, family: &mut F) -> Result<(), DdfError> {
        match event {
            LexEvent::TagStop => {
                let found = self.lexer.take_token();
                if !found.eq_ignore_ascii_case(self.info.tag) {
                    return Err(self.diag.error(format!(
                        "Start tag <{}> expected, found <{found}>!",
                        self.info.tag
                    )));
                }
            }
            LexEvent::DefStart => {
                if self.lexer.bracket_depth() > 0 {
                    return Err(self.diag.error("Unclosed () brackets detected."));
                }
                if self.entries > 0 {
                    family.finish_entry(&mut self.diag)?;
                    self.diag.set_entry(None);
                }
                self.entries += 1;
                self.command = None;
            }
            LexEvent::DefStop => {
                let token = self.lexer.take_token();
                self.diag.set_entry(Some(format!("[{token}]")));
                let (name, extend) = match token.strip_prefix("++") {
                    Some(name) => (name, true),
                    None => (token.as_str(), false),
                };
                log::trace!("entry {token}");
                family.start_entry(name, extend, &mut self.diag)?;
            }
            LexEvent::CommandRead => {
                let token = self.lexer.take_token();
                self.command = (!token.is_empty()).then_some(token);
                self.index = 0;
            }
            LexEvent::Separator => self.send_value(false, family)?,
            LexEvent::Terminator => {
                self.send_value(true, family)?;
                self.command = None;
                self.index = 0;
            }
            LexEvent::PropertyRead => {
                self.lexer.clear_token();
                self.diag
                    .warn_error("Badly formed command: Unexpected semicolon `;'")?;
            }
            LexEvent::IllegalChar(c) => {
                self.diag.warn_error(format!("Illegal character '{c}' found."))?;
            }
            LexEvent::UnclosedString => self.diag.warn_error("Unclosed string detected.")?,
            LexEvent::MissingTag => return Err(self.diag.error("File must start with a tag!")),
            LexEvent::UnmatchedRemarkStop => {
                return Err(self.diag.error("Encountered '}' without previous '{'."));
            }
            LexEvent::UnmatchedGroupStop => {
                return Err(self.diag.error("Unexpected `)' bracket."));
            }
            _ => {}
        }
        Ok(())
    }

    fn finish<F: Family>(mut self, family: &mut F) -> Result<Report, DdfError> {
        self.diag.clear_line_text();
        if self.lexer.comment_depth() > 0 {
            return Err(self.diag.error("Unclosed comments detected."));
        }
        if self.lexer.bracket_depth() > 0 {
            return Err(self.diag.error("Unclosed () brackets detected."));
        }
        match self.lexer.mode() {
            Mode::ReadingTag => return Err(self.diag.error("Unclosed <> brackets detected.")),
            Mode::ReadingEntry => return Err(self.diag.error("Unclosed [] brackets detected.")),
            Mode::ReadingData | Mode::ReadingString => {
                self.diag.warn_error("Unfinished DDF command on last line.")?;
            }
            _ => {}
        }
        if self.entries > 0 {
            family.finish_entry(&mut self.diag)?;
        }
        Ok(Report {
            entries: self.entries,
            warnings: self.diag.take_warnings(),
            version: self.version,
        })
    }
}

/// Run one complete DDF unit through `family`.
///
/// Macros live for this pass only. The first fatal error aborts the pass.
pub fn read_ddf<F: Family>(
    input: &str,
    info: &ReadInfo<'_>,
    family: &mut F,
    policy: Policy,
) -> Result<Report, DdfError> {
    if let Some(message) = info.message {
        log::info!("{message}");
    }
    let mut pass = Pass {
        info,
        lexer: Lexer::new(),
        diag: Diagnostics::new(info.source, policy),
        macros: MacroTable::new(),
        command: None,
        index: 0,
        entries: 0,
        version: None,
    };

    let mut rest = input;
    let mut line = 1;
    let mut line_start = true;
    pass.diag.set_line(line, line_at(rest));

    while let Some(ch) = rest.chars().next() {
        let plain = pass.lexer.mode() != Mode::ReadingString && pass.lexer.comment_depth() == 0;
        if line_start && plain {
            line_start = false;
            if let Some((d, after)) = directive(rest) {
                let (next, extra) = pass.directive(d, after, family)?;
                rest = next;
                if extra > 0 {
                    line += extra;
                    let consumed = &input[..input.len() - rest.len()];
                    let start = consumed.rfind('\n').map_or(0, |i| i + 1);
                    pass.diag.set_line(line, &consumed[start..]);
                }
                continue;
            }
        }
        if plain && rest.starts_with("//") {
            rest = &rest[line_at(rest).len()..];
            continue;
        }

        rest = &rest[ch.len_utf8()..];
        let event = pass.lexer.feed(ch);
        pass.event(event, family)?;

        if ch == '\n' {
            line += 1;
            line_start = true;
            pass.diag.set_line(line, line_at(rest));
        }
    }
    let report = pass.finish(family)?;
    log::debug!(
        "{}: {} entries, {} warnings",
        info.source,
        report.entries,
        report.warnings.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_peek() {
        assert_eq!(peek_tag("\n  <things>\n[IMP]"), Some("THINGS".into()));
        assert_eq!(peek_tag("[IMP]"), None);
        assert_eq!(peek_tag("<THINGS"), None);
        assert_eq!(peek_tag("<THINGS_2>"), None);
    }

    #[test]
    fn define_continuation() {
        let (body, rest, extra) = define_body(" A 1,\\\n 2,\\\r\n 3\nX=1;");
        assert_eq!(body, " A 1,  2,  3");
        assert_eq!(rest, "\nX=1;");
        assert_eq!(extra, 2);

        let (body, rest, extra) = define_body(" B 7");
        assert_eq!((body.as_str(), rest, extra), (" B 7", "", 0));
    }

    #[test]
    fn line_text() {
        assert_eq!(line_at("abc\r\ndef"), "abc");
        assert_eq!(line_at(""), "");
    }
}
