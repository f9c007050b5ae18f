//! Character-level state machine for DDF text.
//!
//! [`process_char`] classifies one character given the current [`Mode`];
//! [`Lexer`] wraps it with the state that persists between characters
//! (mode transitions, comment and bracket depth, the token buffer).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    WaitingTag,
    ReadingTag,
    WaitingEntry,
    ReadingEntry,
    ReadingCommand,
    ReadingData,
    ReadingRemark,
    ReadingString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexEvent {
    Nothing,
    /// Character to append to the current token.
    OkChar(char),
    TagStart,
    TagStop,
    DefStart,
    DefStop,
    CommandRead,
    /// `;` where a field name was expected.
    PropertyRead,
    Separator,
    Terminator,
    StringStart,
    StringStop,
    GroupStart,
    GroupStop,
    RemarkStart,
    RemarkStop,
    // Faults reported back to the driver.
    MissingTag,
    UnmatchedRemarkStop,
    UnmatchedGroupStop,
    IllegalChar(char),
    UnclosedString,
}

const DATA_PUNCT: &str = "_-:.[]\\!#%+@?";

/// Classify `ch` in `mode`. `escape` carries a pending `\` inside strings.
pub fn process_char(ch: char, mode: Mode, escape: &mut bool) -> LexEvent {
    match mode {
        Mode::ReadingString => string_char(ch, escape),
        _ => plain_char(ch, mode),
    }
}

fn string_char(ch: char, escape: &mut bool) -> LexEvent {
    if *escape {
        *escape = false;
        return LexEvent::OkChar(match ch {
            'n' => '\n',
            other => other,
        });
    }
    match ch {
        '\\' => {
            *escape = true;
            LexEvent::Nothing
        }
        '"' => LexEvent::StringStop,
        '\n' => LexEvent::UnclosedString,
        other => LexEvent::OkChar(other),
    }
}

fn plain_char(ch: char, mode: Mode) -> LexEvent {
    if ch.is_whitespace() {
        return LexEvent::Nothing;
    }
    if ch == '{' {
        return LexEvent::RemarkStart;
    }
    if ch == '}' {
        return if mode == Mode::ReadingRemark {
            LexEvent::RemarkStop
        } else {
            LexEvent::UnmatchedRemarkStop
        };
    }

    match mode {
        Mode::ReadingRemark | Mode::ReadingString => LexEvent::Nothing,
        Mode::WaitingTag => match ch {
            '<' => LexEvent::TagStart,
            _ => LexEvent::MissingTag,
        },
        Mode::ReadingTag => match ch {
            '>' => LexEvent::TagStop,
            c if c.is_ascii_alphabetic() => LexEvent::OkChar(c),
            _ => LexEvent::Nothing,
        },
        Mode::WaitingEntry => match ch {
            '[' => LexEvent::DefStart,
            _ => LexEvent::Nothing,
        },
        Mode::ReadingEntry => match ch {
            ']' => LexEvent::DefStop,
            c if c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '+') => {
                LexEvent::OkChar(c.to_ascii_uppercase())
            }
            _ => LexEvent::Nothing,
        },
        Mode::ReadingCommand => match ch {
            '=' => LexEvent::CommandRead,
            ';' => LexEvent::PropertyRead,
            '[' => LexEvent::DefStart,
            '(' => LexEvent::GroupStart,
            ')' => LexEvent::GroupStop,
            c if c.is_ascii_alphanumeric() || matches!(c, '_' | '.') => {
                LexEvent::OkChar(c.to_ascii_uppercase())
            }
            c if c.is_ascii_graphic() => LexEvent::IllegalChar(c),
            _ => LexEvent::Nothing,
        },
        Mode::ReadingData => match ch {
            '"' => LexEvent::StringStart,
            ';' => LexEvent::Terminator,
            ',' => LexEvent::Separator,
            '(' => LexEvent::GroupStart,
            ')' => LexEvent::GroupStop,
            c if c.is_ascii_alphanumeric() || DATA_PUNCT.contains(c) => {
                LexEvent::OkChar(c.to_ascii_uppercase())
            }
            c if c.is_ascii_graphic() => LexEvent::IllegalChar(c),
            _ => LexEvent::Nothing,
        },
    }
}

#[derive(Debug)]
pub struct Lexer {
    mode: Mode,
    saved_mode: Mode,
    comment_depth: usize,
    bracket_depth: usize,
    escape: bool,
    buf: String,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            mode: Mode::WaitingTag,
            saved_mode: Mode::WaitingTag,
            comment_depth: 0,
            bracket_depth: 0,
            escape: false,
            buf: String::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn comment_depth(&self) -> usize {
        self.comment_depth
    }

    pub fn bracket_depth(&self) -> usize {
        self.bracket_depth
    }

    pub fn token(&self) -> &str {
        &self.buf
    }

    pub fn take_token(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }

    pub fn clear_token(&mut self) {
        self.buf.clear();
    }

    /// Feed one character, applying the mode change its event implies.
    ///
    /// A `,` inside brackets is folded into the token and reported as
    /// [`LexEvent::OkChar`]. An unclosed string at end of line is closed.
    pub fn feed(&mut self, ch: char) -> LexEvent {
        let event = process_char(ch, self.mode, &mut self.escape);
        match event {
            LexEvent::OkChar(c) => self.buf.push(c),
            LexEvent::TagStart => self.mode = Mode::ReadingTag,
            LexEvent::TagStop => self.mode = Mode::WaitingEntry,
            LexEvent::DefStart => {
                self.buf.clear();
                self.mode = Mode::ReadingEntry;
            }
            LexEvent::DefStop => self.mode = Mode::ReadingCommand,
            LexEvent::CommandRead => self.mode = Mode::ReadingData,
            LexEvent::Terminator => self.mode = Mode::ReadingCommand,
            LexEvent::StringStart => self.mode = Mode::ReadingString,
            LexEvent::StringStop | LexEvent::UnclosedString => self.mode = Mode::ReadingData,
            LexEvent::Separator if self.bracket_depth > 0 => {
                self.buf.push(',');
                return LexEvent::OkChar(',');
            }
            LexEvent::GroupStart => {
                self.buf.push('(');
                self.bracket_depth += 1;
            }
            LexEvent::GroupStop => {
                if self.bracket_depth == 0 {
                    return LexEvent::UnmatchedGroupStop;
                }
                self.buf.push(')');
                self.bracket_depth -= 1;
            }
            LexEvent::RemarkStart => {
                if self.comment_depth == 0 {
                    self.saved_mode = self.mode;
                    self.mode = Mode::ReadingRemark;
                }
                self.comment_depth += 1;
            }
            LexEvent::RemarkStop => {
                self.comment_depth -= 1;
                if self.comment_depth == 0 {
                    self.mode = self.saved_mode;
                }
            }
            _ => {}
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(mode: Mode, input: &str) -> Vec<LexEvent> {
        let mut lx = Lexer::new();
        lx.mode = mode;
        input
            .chars()
            .map(|c| lx.feed(c))
            .filter(|e| *e != LexEvent::Nothing)
            .collect()
    }

    fn data_token(input: &str) -> String {
        let mut lx = Lexer::new();
        lx.mode = Mode::ReadingData;
        for c in input.chars() {
            lx.feed(c);
        }
        lx.take_token()
    }

    #[test]
    fn header_and_entry() {
        let ev = events(Mode::WaitingTag, "<THINGS> [imp]");
        assert_eq!(ev.first(), Some(&LexEvent::TagStart));
        assert!(ev.contains(&LexEvent::TagStop));
        assert!(ev.contains(&LexEvent::DefStart));
        assert!(ev.contains(&LexEvent::OkChar('I')));
        assert_eq!(ev.last(), Some(&LexEvent::DefStop));
    }

    #[test]
    fn tag_takes_letters_only() {
        let ev = events(Mode::WaitingTag, "<T1_x>");
        let chars: Vec<&LexEvent> = ev.iter().filter(|e| matches!(e, LexEvent::OkChar(_))).collect();
        assert_eq!(chars, [&LexEvent::OkChar('T'), &LexEvent::OkChar('x')]);
        assert_eq!(ev.last(), Some(&LexEvent::TagStop));
    }

    #[test]
    fn missing_tag() {
        assert_eq!(events(Mode::WaitingTag, "x"), vec![LexEvent::MissingTag]);
    }

    #[test]
    fn data_is_uppercased() {
        assert_eq!(data_token("troo:a:10"), "TROO:A:10");
    }

    #[test]
    fn strings_keep_case_and_escapes() {
        assert_eq!(data_token(r#""Hi \"you\"\n a\\b""#), "Hi \"you\"\n a\\b");
    }

    #[test]
    fn whitespace_dropped_outside_strings() {
        assert_eq!(data_token("1 2\t3"), "123");
        assert_eq!(data_token("\"1 2\""), "1 2");
    }

    #[test]
    fn nested_remarks_are_skipped() {
        assert_eq!(data_token("a{ b { c } d }e"), "AE");
    }

    #[test]
    fn brace_inside_string_is_literal() {
        assert_eq!(data_token("\"{x}\""), "{x}");
    }

    #[test]
    fn unmatched_close_brace() {
        assert_eq!(
            events(Mode::ReadingData, "a}"),
            vec![LexEvent::OkChar('A'), LexEvent::UnmatchedRemarkStop]
        );
    }

    #[test]
    fn comma_inside_brackets_is_folded() {
        let mut lx = Lexer::new();
        lx.mode = Mode::ReadingData;
        let seps = "JUMP(label,25%),OTHER"
            .chars()
            .map(|c| lx.feed(c))
            .filter(|e| *e == LexEvent::Separator)
            .count();
        assert_eq!(seps, 1);
        assert_eq!(lx.bracket_depth(), 0);
    }

    #[test]
    fn unmatched_group_stop() {
        assert_eq!(
            events(Mode::ReadingData, ")"),
            vec![LexEvent::UnmatchedGroupStop]
        );
    }

    #[test]
    fn illegal_char_dropped() {
        assert_eq!(
            events(Mode::ReadingData, "a&b"),
            vec![
                LexEvent::OkChar('A'),
                LexEvent::IllegalChar('&'),
                LexEvent::OkChar('B')
            ]
        );
    }

    #[test]
    fn newline_in_string_closes_it() {
        let mut lx = Lexer::new();
        lx.mode = Mode::ReadingData;
        lx.feed('"');
        lx.feed('a');
        assert_eq!(lx.feed('\n'), LexEvent::UnclosedString);
        assert_eq!(lx.mode(), Mode::ReadingData);
    }

    #[test]
    fn stray_semicolon_in_command() {
        assert_eq!(
            events(Mode::ReadingCommand, ";"),
            vec![LexEvent::PropertyRead]
        );
    }
}
