//! Animation state sequences: incremental building while fields are read,
//! then linking of symbolic jumps once an entry is complete.
//!
//! A `STATES(label)` value is a comma list of `SPRITE:FRAME:TICS:BRIGHT:ACTION`
//! frames. A frame starting with `#` is a redirector (`#SEE:2`, `#REMOVE`)
//! that sets where the previous frame goes next. Redirector targets are
//! recorded by name in [`Redirectors`] and only resolved by
//! [`resolve_group`], since they may name labels defined later.

use ddf_types::{
    ActionParam, Angle, BecomeInfo, JumpInfo, LabelOffset, NextRef, Percent, Rgb, S_NULL, State,
    StateFlags, StateGroup, StateNum,
};

use crate::coerce::{get_percent, get_rgb, leading_float, leading_int};
use crate::diag::Diagnostics;
use crate::dispatch::names_match;
use crate::error::DdfError;

/// Parts a frame is split into; anything further is dropped.
const MAX_SPLIT: usize = 10;
const MAX_LABEL_LEN: usize = 64;

/// Case-insensitive interned names with index 0 reserved.
#[derive(Debug, Clone)]
pub struct NameTable {
    names: Vec<String>,
    last: Option<usize>,
}

impl Default for NameTable {
    fn default() -> Self {
        Self {
            names: vec!["!NULL!".to_string()],
            last: None,
        }
    }
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `name`, inserting it if new. `NULL` is always 0.
    pub fn add(&mut self, name: &str) -> usize {
        if name.eq_ignore_ascii_case("NULL") {
            return 0;
        }
        if let Some(i) = self.last.filter(|&i| self.names[i].eq_ignore_ascii_case(name)) {
            return i;
        }
        let idx = (1..self.names.len())
            .rev()
            .find(|&i| self.names[i].eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                self.names.push(name.to_string());
                self.names.len() - 1
            });
        self.last = Some(idx);
        idx
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.len() <= 1
    }
}

/// Sprite and model name tables shared by every family.
#[derive(Debug, Clone, Default)]
pub struct SpriteNames {
    pub sprites: NameTable,
    pub models: NameTable,
}

/// Redirector names referenced by the entry being read.
#[derive(Debug, Clone, Default)]
pub struct Redirectors {
    names: Vec<String>,
}

impl Redirectors {
    pub fn id(&mut self, name: &str) -> usize {
        if let Some(i) = self.names.iter().position(|n| names_match(n, name)) {
            return i;
        }
        self.names.push(name.to_string());
        self.names.len() - 1
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

/// A well-known label, where its states continue by default, and which
/// entry point of the record it fills in.
#[derive(Debug, Clone, Copy)]
pub struct Starter<S> {
    pub label: &'static str,
    pub last_redir: &'static str,
    pub slot: S,
}

/// How an action's `(ARG)` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Integer,
    IntPair,
    Float,
    Percent,
    Angle,
    Slope,
    Rgb,
    Sound,
    Thing,
    Attack,
    /// `label[:n][,chance%]`; sets the state's jump.
    Jump,
    /// `label[:n]`; sets the state's jump only.
    Frame,
    /// `type[,label[:n]]`.
    Become,
}

#[derive(Debug, Clone, Copy)]
pub struct ActionCode<A> {
    /// A leading `!` marks the action obsolete.
    pub name: &'static str,
    pub action: A,
    pub arg: Option<ArgKind>,
}

impl<A> ActionCode<A> {
    pub const fn new(name: &'static str, action: A, arg: Option<ArgKind>) -> Self {
        Self { name, action, arg }
    }
}

/// Static description of one family's state handling.
#[derive(Debug)]
pub struct StateSpec<A: 'static, S: 'static> {
    pub starters: &'static [Starter<S>],
    pub actions: &'static [ActionCode<A>],
    /// Where states under an unknown label go after their last frame.
    pub default_redir: &'static str,
    pub is_weapon: bool,
}

/// The mutable pieces a state field writes into.
pub struct StateTarget<'a, A> {
    pub group: &'a mut StateGroup<A>,
    pub names: &'a mut SpriteNames,
    pub redirs: &'a mut Redirectors,
}

/// Result of reading one value of a `STATES(label)` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateField<S> {
    /// Entry point slot of a well-known label.
    pub slot: Option<S>,
    /// First state of this label, set on the first value only.
    pub entry: Option<StateNum>,
}

/// Decimal prefix, C `atol` style.
fn atoi(s: &str) -> i64 {
    let s = s.trim_start();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let n = match digits[..end].parse::<i64>() {
        Ok(n) => n,
        Err(_) if end > 0 => i64::MAX,
        Err(_) => 0,
    };
    if neg { -n } else { n }
}

fn offset_of(n: &str) -> usize {
    (atoi(n) - 1).max(0) as usize
}

/// `label[:n]` → label and zero-based offset.
fn split_label(text: &str) -> (&str, usize) {
    match text.split_once(':') {
        Some((label, n)) => (label, offset_of(n)),
        None => (text, 0),
    }
}

/// The label of a `STATES(label)` field name.
pub fn state_label(field: &str) -> Option<&str> {
    let head = field.get(..7)?;
    if !head.eq_ignore_ascii_case("STATES(") {
        return None;
    }
    let rest = &field[7..];
    let end = rest.find(')')?;
    (end > 0 && end <= MAX_LABEL_LEN).then(|| &rest[..end])
}

#[derive(Debug, PartialEq, Eq)]
enum Parts<'a> {
    Redirect { label: &'a str, offset: Option<&'a str> },
    Frame(Vec<&'a str>),
}

/// Split on `:` outside brackets.
fn split_into_state<'a>(info: &'a str, diag: &Diagnostics) -> Result<Parts<'a>, DdfError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in info.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    diag.error(format!("Mismatched ) bracket in states: {info}"))
                })?;
            }
            ':' if depth == 0 => {
                parts.push(&info[start..i]);
                start = i + 1;
                if parts.len() == MAX_SPLIT {
                    break;
                }
            }
            _ => {}
        }
    }
    if depth > 0 {
        return Err(diag.error(format!("Unclosed ( bracket in states: {info}")));
    }
    if parts.len() < MAX_SPLIT {
        parts.push(&info[start..]);
    }

    if let Some(label) = parts.first().and_then(|p| p.strip_prefix('#')) {
        let offset = info.split_once(':').map(|(_, rest)| rest);
        return Ok(Parts::Redirect { label, offset });
    }
    Ok(Parts::Frame(parts))
}

/// `FOO(BAR)` → (`FOO`, `BAR`); no brackets → (`FOO`, ``).
fn split_action_arg(info: &str) -> (&str, &str) {
    match info.find('(') {
        Some(open) if info.len() >= 4 && info.ends_with(')') => {
            (&info[..open], &info[open + 1..info.len() - 1])
        }
        _ => (info, ""),
    }
}

fn decode_frame<A>(frame: &str, state: &mut State<A>, diag: &Diagnostics) -> Result<(), DdfError> {
    let mut chars = frame.chars();
    match chars.next() {
        Some(c @ 'A'..=']') => state.frame = c as i32 - 'A' as i32,
        Some('@') => {
            let rest = chars.as_str();
            state.frame = -1;
            match rest.chars().next() {
                Some(c) if c.is_ascii_digit() => {
                    state.flags = StateFlags::MODEL;
                    state.frame = (atoi(rest) - 1).clamp(-1, i64::from(i32::MAX)) as i32;
                }
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                    state.flags = StateFlags::MODEL | StateFlags::UNMAPPED;
                    state.frame = 0;
                    state.model_frame = Some(rest.to_string());
                }
                _ => {}
            }
            if state.frame < 0 {
                return Err(diag.semantic(format!("Illegal model frame: {frame}")));
            }
        }
        _ => return Err(diag.semantic(format!("Illegal sprite frame: {frame}"))),
    }
    Ok(())
}

fn decode_bright(bright: &str, diag: &mut Diagnostics) -> Result<u8, DdfError> {
    if bright == "NORMAL" {
        return Ok(0);
    }
    if bright == "BRIGHT" {
        return Ok(255);
    }
    if let Some(level) = bright.strip_prefix("LIT") {
        return Ok((atoi(level).clamp(0, 99) * 255 / 99) as u8);
    }
    diag.warn_error("Lighting is not BRIGHT or NORMAL")?;
    Ok(0)
}

type ArgResult = Result<(Option<ActionParam>, Option<NextRef>), DdfError>;

/// Interpret an action argument. An empty argument leaves both unset.
pub fn parse_action_arg(
    kind: ArgKind,
    arg: &str,
    redirs: &mut Redirectors,
    diag: &mut Diagnostics,
) -> ArgResult {
    if arg.is_empty() {
        return Ok((None, None));
    }
    let bad = |what: &str, diag: &Diagnostics| diag.semantic(format!("Bad {what} value: {arg}"));
    let param = match kind {
        ArgKind::Integer => ActionParam::Integer(
            leading_int(arg).ok_or_else(|| bad("integer", diag))? as i32,
        ),
        ArgKind::IntPair => {
            let pair = arg
                .split_once(',')
                .and_then(|(a, b)| Some((leading_int(a)?, leading_int(b)?)))
                .ok_or_else(|| bad("integer pair", diag))?;
            ActionParam::IntPair(pair.0 as i32, pair.1 as i32)
        }
        ArgKind::Float => ActionParam::Float(leading_float(arg).ok_or_else(|| bad("float", diag))?),
        ArgKind::Percent => {
            let pct = arg
                .trim()
                .strip_suffix('%')
                .and_then(leading_float)
                .filter(|p| *p >= 0.0)
                .ok_or_else(|| bad("percentage", diag))?;
            ActionParam::Percent(pct / 100.0)
        }
        ArgKind::Angle => ActionParam::Angle(Angle::from_degrees(
            leading_float(arg).ok_or_else(|| bad("angle", diag))?,
        )),
        ArgKind::Slope => {
            let deg = leading_float(arg).ok_or_else(|| bad("slope", diag))?;
            ActionParam::Slope(Angle::from_degrees(deg.clamp(-89.5, 89.5)).tan())
        }
        ArgKind::Rgb => {
            let mut rgb = Rgb::NO_VALUE;
            get_rgb(arg, &mut rgb, diag)?;
            ActionParam::Rgb(rgb)
        }
        ArgKind::Sound => ActionParam::Sound(arg.to_string()),
        ArgKind::Thing => ActionParam::Thing(arg.to_string()),
        ArgKind::Attack => ActionParam::Attack(arg.to_string()),
        ArgKind::Jump => {
            let (target, chance) = match arg.split_once(',') {
                Some((target, chance)) => {
                    let mut pct: Percent = 1.0;
                    get_percent(chance, &mut pct, diag)?;
                    (target, pct)
                }
                None => (arg, 1.0),
            };
            let (label, offset) = split_label(target);
            if label.is_empty() {
                return Err(diag.semantic("JUMP: missing label!"));
            }
            let jump = NextRef::Redirector {
                id: redirs.id(label),
                offset,
            };
            return Ok((Some(ActionParam::Jump(JumpInfo { chance })), Some(jump)));
        }
        ArgKind::Frame => {
            let (label, offset) = split_label(arg);
            if label.is_empty() {
                return Err(diag.semantic("FRAME: missing label!"));
            }
            let jump = NextRef::Redirector {
                id: redirs.id(label),
                offset,
            };
            return Ok((None, Some(jump)));
        }
        ArgKind::Become => {
            let (type_name, start) = match arg.split_once(',') {
                Some((type_name, start)) => {
                    if start.is_empty() {
                        return Err(diag.semantic("BECOME: missing label!"));
                    }
                    let (label, offset) = split_label(start);
                    (type_name, LabelOffset::new(label, offset))
                }
                None => (arg, LabelOffset::new("IDLE", 0)),
            };
            if type_name.is_empty() {
                return Err(diag.semantic("BECOME: missing type name!"));
            }
            ActionParam::Become(BecomeInfo {
                type_name: type_name.to_string(),
                start,
            })
        }
    };
    Ok((Some(param), None))
}

fn decode_action<A: Copy>(
    text: &str,
    actions: &[ActionCode<A>],
    state: &mut State<A>,
    redirs: &mut Redirectors,
    diag: &mut Diagnostics,
) -> Result<(), DdfError> {
    let (name, arg) = split_action_arg(text);
    let Some(code) = actions.iter().find(|a| names_match(a.name, name)) else {
        return diag.warn_error(format!("Unknown code pointer: {text}"));
    };
    if let Some(current) = code.name.strip_prefix('!') {
        diag.obsolete(format!("The ddf action `{current}' is obsolete !"))?;
    }
    state.action = Some(code.action);
    state.action_param = None;
    if let Some(kind) = code.arg {
        let (param, jump) = parse_action_arg(kind, arg, redirs, diag)?;
        state.action_param = param;
        if let Some(jump) = jump {
            state.jump = jump;
        }
    }
    Ok(())
}

/// Phase one: apply one comma-list value of a `STATES(label)` field.
///
/// Returns the index of the appended state, or `None` for a redirector.
#[allow(clippy::too_many_arguments)]
pub fn build_incremental<A: Copy>(
    info: &str,
    label: &str,
    index: usize,
    redir: Option<&str>,
    actions: &[ActionCode<A>],
    is_weapon: bool,
    target: &mut StateTarget<'_, A>,
    diag: &mut Diagnostics,
) -> Result<Option<StateNum>, DdfError> {
    let parts = match split_into_state(info, diag)? {
        Parts::Redirect { label: to, offset } => {
            if to.is_empty() {
                return Err(diag.semantic(format!("Missing sprite in state frames: `{info}'")));
            }
            let last = target.group.last_in_range().ok_or_else(|| {
                diag.semantic(format!("Redirector used without any states (`{info}')"))
            })?;
            let next = if names_match("REMOVE", to) {
                NextRef::Terminal
            } else {
                NextRef::Redirector {
                    id: target.redirs.id(to),
                    offset: offset.map_or(0, offset_of),
                }
            };
            if let Some(st) = target.group.get_mut(last) {
                st.next = next;
            }
            return Ok(None);
        }
        Parts::Frame(parts) => parts,
    };

    if parts.len() < 5 {
        if info.contains('[') {
            return Err(diag.semantic(format!("Bad state '{info}', possibly missing ';'")));
        }
        return Err(diag.semantic(format!("Bad state '{info}'")));
    }
    if parts.len() > 5 {
        diag.warning(format!("Extra parts ignored in state '{info}'"));
    }
    if parts[0].is_empty() {
        return Err(diag.semantic(format!("Missing sprite in state frames: `{info}'")));
    }
    if parts[1..4].iter().any(|p| p.is_empty()) {
        return Err(diag.semantic(format!("Bad state frame, missing fields: {info}")));
    }
    if parts[0].len() != 4 {
        return Err(diag.semantic(format!(
            "Sprite names must be 4 characters long '{}'.",
            parts[0]
        )));
    }

    let mut state = State::new();
    decode_frame(parts[1], &mut state, diag)?;
    if is_weapon {
        state.flags |= StateFlags::WEAPON;
    }
    state.sprite = if state.flags.contains(StateFlags::MODEL) {
        target.names.models.add(parts[0])
    } else {
        target.names.sprites.add(parts[0])
    };
    state.tics = atoi(parts[2]).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    state.bright = decode_bright(parts[3], diag)?;
    if !parts[4].is_empty() {
        decode_action(parts[4], actions, &mut state, target.redirs, diag)?;
    }
    if let Some(redir) = redir {
        state.next = if names_match("REMOVE", redir) {
            NextRef::Terminal
        } else {
            NextRef::Redirector {
                id: target.redirs.id(redir),
                offset: 0,
            }
        };
    }
    if index == 0 {
        state.label = Some(label.to_string());
    }

    let st = target.group.push(state);
    if index == 0 {
        override_label(target.group, label, st);
    }
    Ok(Some(st))
}

/// An earlier state with the same label becomes a zero-tic pass-through
/// to `st`, so references already resolved to it land on the new frames.
fn override_label<A>(group: &mut StateGroup<A>, label: &str, st: StateNum) {
    let earlier = (1..st).rev().find(|&i| {
        group
            .get(i)
            .and_then(|s| s.label.as_deref())
            .is_some_and(|l| names_match(l, label))
    });
    if let Some(old) = earlier.and_then(|i| group.get_mut(i)) {
        log::debug!("state label {label} overridden: {st} replaces earlier frames");
        old.tics = 0;
        old.action = None;
        old.action_param = None;
        old.next = NextRef::Resolved(st);
    }
}

/// Handle a `STATES(label)` field. `Ok(None)` if `field` isn't one.
#[allow(clippy::too_many_arguments)]
pub fn parse_state_field<A: Copy, S: Copy>(
    spec: &StateSpec<A, S>,
    field: &str,
    value: &str,
    index: usize,
    is_last: bool,
    target: &mut StateTarget<'_, A>,
    diag: &mut Diagnostics,
) -> Result<Option<StateField<S>>, DdfError> {
    let Some(label) = state_label(field) else {
        return Ok(None);
    };
    let starter = spec.starters.iter().find(|s| names_match(s.label, label));
    let redir = is_last.then(|| starter.map_or(spec.default_redir, |s| s.last_redir));
    let st = build_incremental(
        value,
        label,
        index,
        redir,
        spec.actions,
        spec.is_weapon,
        target,
        diag,
    )?;
    Ok(Some(StateField {
        slot: starter.map(|s| s.slot),
        entry: st.filter(|_| index == 0),
    }))
}

/// Newest state labelled `label`. A missing `IDLE` falls back to `SPAWN`.
/// With `quiet`, a missing label gives [`S_NULL`] instead of an error.
pub fn find_label<A>(
    group: &StateGroup<A>,
    label: &str,
    quiet: bool,
    diag: &Diagnostics,
) -> Result<StateNum, DdfError> {
    let found = group.states().iter().enumerate().skip(1).rev().find(|(_, s)| {
        s.label
            .as_deref()
            .is_some_and(|l| names_match(l, label))
    });
    if let Some((i, _)) = found {
        return Ok(i);
    }
    if names_match("IDLE", label) {
        return find_label(group, "SPAWN", quiet, diag);
    }
    if quiet {
        return Ok(S_NULL);
    }
    Err(diag.semantic(format!(
        "Unknown label '{label}' (object has no such frames)."
    )))
}

/// `label[:n]` → state index.
pub fn lookup_director<A>(
    group: &StateGroup<A>,
    reference: &str,
    diag: &Diagnostics,
) -> Result<StateNum, DdfError> {
    let (label, offset) = split_label(reference);
    if label.is_empty() {
        return Err(diag.semantic(format!("Bad Director `{reference}' : Nothing before divide")));
    }
    Ok(find_label(group, label, false, diag)? + offset)
}

fn resolve_ref<A>(
    group: &StateGroup<A>,
    i: StateNum,
    last: StateNum,
    r: NextRef,
    redirs: &Redirectors,
    diag: &mut Diagnostics,
) -> Result<StateNum, DdfError> {
    let st = match r {
        NextRef::Terminal => S_NULL,
        NextRef::Sequential => {
            if i == last {
                S_NULL
            } else {
                i + 1
            }
        }
        NextRef::Resolved(st) => st,
        NextRef::Redirector { id, offset } => {
            let label = redirs
                .name(id)
                .ok_or_else(|| diag.error(format!("Unknown redirector #{id}")))?;
            find_label(group, label, false, diag)? + offset
        }
    };
    if st >= group.len() {
        let clamped = group.len().saturating_sub(1);
        diag.warning(format!(
            "State {i} jumps past the last state ({st}), clamped to {clamped}"
        ));
        return Ok(clamped);
    }
    Ok(st)
}

/// Phase two: link every state added since the current range began, then
/// forget the redirector names.
pub fn resolve_group<A>(
    group: &mut StateGroup<A>,
    redirs: &mut Redirectors,
    diag: &mut Diagnostics,
) -> Result<(), DdfError> {
    let Some(range) = group.close_range() else {
        redirs.clear();
        return Ok(());
    };
    for i in range.first..=range.last {
        let Some(state) = group.get(i) else { continue };
        let (next, jump) = (state.next, state.jump);
        let next = resolve_ref(group, i, range.last, next, redirs, diag)?;
        let jump = resolve_ref(group, i, range.last, jump, redirs, diag)?;
        if let Some(state) = group.get_mut(i) {
            state.next = NextRef::Resolved(next);
            state.jump = NextRef::Resolved(jump);
        }
    }
    redirs.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Policy;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Act {
        Look,
        Chase,
        Jump,
        Become,
        Old,
    }

    static ACTIONS: &[ActionCode<Act>] = &[
        ActionCode { name: "LOOKOUT", action: Act::Look, arg: None },
        ActionCode { name: "CHASE", action: Act::Chase, arg: None },
        ActionCode { name: "JUMP", action: Act::Jump, arg: Some(ArgKind::Jump) },
        ActionCode { name: "BECOME", action: Act::Become, arg: Some(ArgKind::Become) },
        ActionCode { name: "!OLDLOOK", action: Act::Old, arg: None },
    ];

    static STARTERS: &[Starter<u8>] = &[
        Starter { label: "SPAWN", last_redir: "IDLE", slot: 0 },
        Starter { label: "DEATH", last_redir: "REMOVE", slot: 1 },
    ];

    static SPEC: StateSpec<Act, u8> = StateSpec {
        starters: STARTERS,
        actions: ACTIONS,
        default_redir: "IDLE",
        is_weapon: false,
    };

    struct Fixture {
        group: StateGroup<Act>,
        names: SpriteNames,
        redirs: Redirectors,
        diag: Diagnostics,
    }

    impl Fixture {
        fn new() -> Self {
            let mut group = StateGroup::new();
            group.begin_range();
            Self {
                group,
                names: SpriteNames::default(),
                redirs: Redirectors::default(),
                diag: Diagnostics::new("test", Policy::default()),
            }
        }

        fn field(&mut self, field: &str, values: &[&str]) -> Result<Vec<StateField<u8>>, DdfError> {
            let mut out = Vec::new();
            for (i, v) in values.iter().enumerate() {
                let mut target = StateTarget {
                    group: &mut self.group,
                    names: &mut self.names,
                    redirs: &mut self.redirs,
                };
                let r = parse_state_field(
                    &SPEC,
                    field,
                    v,
                    i,
                    i + 1 == values.len(),
                    &mut target,
                    &mut self.diag,
                )?;
                out.extend(r);
            }
            Ok(out)
        }

        fn resolve(&mut self) -> Result<(), DdfError> {
            resolve_group(&mut self.group, &mut self.redirs, &mut self.diag)
        }

        fn next(&self, st: StateNum) -> Option<StateNum> {
            self.group.get(st).and_then(|s| s.next.resolved())
        }
    }

    #[test]
    fn splits_outside_brackets() {
        let d = Diagnostics::new("t", Policy::default());
        assert_eq!(
            split_into_state("TROO:A:10:NORMAL:JUMP(SEE:2,50%)", &d).expect("split"),
            Parts::Frame(vec!["TROO", "A", "10", "NORMAL", "JUMP(SEE:2,50%)"])
        );
        assert_eq!(
            split_into_state("#SEE:2", &d).expect("split"),
            Parts::Redirect { label: "SEE", offset: Some("2") }
        );
        assert_eq!(
            split_into_state("#REMOVE", &d).expect("split"),
            Parts::Redirect { label: "REMOVE", offset: None }
        );
        assert!(split_into_state("A:B)", &d).is_err());
        assert!(split_into_state("A:(B", &d).is_err());
    }

    #[test]
    fn state_labels() {
        assert_eq!(state_label("STATES(SPAWN)"), Some("SPAWN"));
        assert_eq!(state_label("states(see)"), Some("see"));
        assert_eq!(state_label("STATES()"), None);
        assert_eq!(state_label("SPAWNHEALTH"), None);
        let long = format!("STATES({})", "X".repeat(65));
        assert_eq!(state_label(&long), None);
    }

    #[test]
    fn two_frame_loop() {
        let mut f = Fixture::new();
        let fields = f
            .field("STATES(SPAWN)", &["TROO:A:10:NORMAL:LOOKOUT", "TROO:B:10:NORMAL:LOOKOUT"])
            .expect("states");
        assert_eq!(fields[0], StateField { slot: Some(0), entry: Some(1) });
        assert_eq!(fields[1].entry, None);
        f.resolve().expect("resolve");
        assert_eq!(f.group.len(), 3);
        assert_eq!(f.next(1), Some(2));
        // no IDLE label, falls back to SPAWN
        assert_eq!(f.next(2), Some(1));
        assert_eq!(f.group.get(1).and_then(|s| s.action), Some(Act::Look));
    }

    #[test]
    fn forward_redirector_with_offset() {
        let mut f = Fixture::new();
        f.field("STATES(SPAWN)", &["TROO:A:10:NORMAL:LOOKOUT", "TROO:B:10:NORMAL:", "#SEE:2"])
            .expect("spawn");
        f.field("STATES(SEE)", &["TROO:C:3:NORMAL:CHASE", "TROO:D:3:NORMAL:CHASE"])
            .expect("see");
        f.resolve().expect("resolve");
        // SEE is state 3, offset 2 means its second frame
        assert_eq!(f.next(2), Some(4));
        // SEE has no starter, so its last frame heads for IDLE → SPAWN
        assert_eq!(f.next(4), Some(1));
        assert!(f.redirs.is_empty());
    }

    #[test]
    fn remove_and_default_terminal() {
        let mut f = Fixture::new();
        f.field("STATES(DEATH)", &["TROO:I:8:NORMAL:", "TROO:J:-1:NORMAL:"])
            .expect("death");
        f.field("STATES(SPAWN)", &["TROO:A:10:NORMAL:", "#REMOVE"])
            .expect("spawn");
        f.resolve().expect("resolve");
        assert_eq!(f.next(1), Some(2));
        assert_eq!(f.next(2), Some(S_NULL));
        assert_eq!(f.next(3), Some(S_NULL));
        assert_eq!(f.group.get(2).map(|s| s.tics), Some(-1));
    }

    #[test]
    fn unknown_label_is_fatal() {
        let mut f = Fixture::new();
        f.field("STATES(SPAWN)", &["TROO:A:10:NORMAL:", "#MISSING"])
            .expect("spawn");
        let err = f.resolve().expect_err("missing label");
        assert!(err.message().contains("MISSING"));
    }

    #[test]
    fn redirector_needs_a_state() {
        let mut f = Fixture::new();
        assert!(f.field("STATES(SPAWN)", &["#SEE"]).is_err());
    }

    #[test]
    fn short_state_mentions_missing_semicolon() {
        let mut f = Fixture::new();
        let err = f.field("STATES(SPAWN)", &["TROO:A:10[IMP]"]).expect_err("short");
        assert!(err.message().contains("missing ';'"));
        assert!(f.field("STATES(SPAWN)", &["TROO:A:10"]).is_err());
    }

    #[test]
    fn sprite_name_length() {
        let mut f = Fixture::new();
        assert!(f.field("STATES(SPAWN)", &["TRO:A:10:NORMAL:"]).is_err());
    }

    #[test]
    fn frames_and_brightness() {
        let mut f = Fixture::new();
        f.field(
            "STATES(SPAWN)",
            &["TROO:]:1:BRIGHT:", "TROO:@3:1:LIT50:", "TROO:@run_1:1:NORMAL:"],
        )
        .expect("frames");
        let s = |i: usize| f.group.get(i).cloned().expect("state");
        assert_eq!((s(1).frame, s(1).bright), (28, 255));
        assert_eq!((s(2).frame, s(2).bright), (2, 128));
        assert!(s(2).flags.contains(StateFlags::MODEL));
        assert_eq!(s(3).model_frame.as_deref(), Some("run_1"));
        assert!(s(3).flags.contains(StateFlags::UNMAPPED));
        assert_eq!(f.names.models.get(s(2).sprite), Some("TROO"));
        assert_eq!(f.names.sprites.len(), 2);
    }

    #[test]
    fn lit_levels_are_clamped() {
        let mut f = Fixture::new();
        f.field(
            "STATES(SPAWN)",
            &[
                "TROO:A:2:LIT9223372036854775807:",
                "TROO:B:2:LIT-40:",
                "TROO:C:2:LIT99:",
                "TROO:D:2:LIT123456789012345678901234:",
            ],
        )
        .expect("lit");
        let bright = |i: usize| f.group.get(i).map(|s| s.bright);
        assert_eq!(bright(1), Some(255));
        assert_eq!(bright(2), Some(0));
        assert_eq!(bright(3), Some(255));
        assert_eq!(bright(4), Some(255));
    }

    #[test]
    fn bad_frames() {
        let mut f = Fixture::new();
        assert!(f.field("STATES(SPAWN)", &["TROO:a:1:NORMAL:"]).is_err());
        assert!(f.field("STATES(SPAWN)", &["TROO:@0:1:NORMAL:"]).is_err());
        let fields = f
            .field("STATES(SPAWN)", &["TROO:@2147483649:1:NORMAL:"])
            .expect("huge model frame");
        let idx = fields[0].entry.expect("entry");
        assert_eq!(f.group.get(idx).map(|s| s.frame), Some(i32::MAX));
    }

    #[test]
    fn jump_action_sets_jump_ref() {
        let mut f = Fixture::new();
        f.field(
            "STATES(SPAWN)",
            &["TROO:A:10:NORMAL:JUMP(DEATH:2,25%)", "TROO:B:10:NORMAL:"],
        )
        .expect("spawn");
        f.field("STATES(DEATH)", &["TROO:I:8:NORMAL:", "TROO:J:8:NORMAL:"])
            .expect("death");
        f.resolve().expect("resolve");
        let st = f.group.get(1).cloned().expect("state");
        assert_eq!(st.jump, NextRef::Resolved(4));
        assert_eq!(
            st.action_param,
            Some(ActionParam::Jump(JumpInfo { chance: 0.25 }))
        );
        // untouched jump refs resolve to nothing
        assert_eq!(f.group.get(2).map(|s| s.jump), Some(NextRef::Resolved(S_NULL)));
    }

    #[test]
    fn become_defaults_to_idle() {
        let mut r = Redirectors::default();
        let mut d = Diagnostics::new("t", Policy::default());
        let (param, jump) = parse_action_arg(ArgKind::Become, "DEMON", &mut r, &mut d).expect("ok");
        assert_eq!(jump, None);
        assert_eq!(
            param,
            Some(ActionParam::Become(BecomeInfo {
                type_name: "DEMON".into(),
                start: LabelOffset::new("IDLE", 0),
            }))
        );
        let (param, _) =
            parse_action_arg(ArgKind::Become, "DEMON,SEE:3", &mut r, &mut d).expect("ok");
        assert!(matches!(param, Some(ActionParam::Become(b)) if b.start == LabelOffset::new("SEE", 2)));
        assert!(parse_action_arg(ArgKind::Become, ",SEE", &mut r, &mut d).is_err());
    }

    #[test]
    fn simple_arguments() {
        let mut r = Redirectors::default();
        let mut d = Diagnostics::new("t", Policy::default());
        let mut arg = |k, a: &str| parse_action_arg(k, a, &mut r, &mut d).map(|p| p.0);
        assert_eq!(arg(ArgKind::Integer, "12").expect("int"), Some(ActionParam::Integer(12)));
        assert_eq!(arg(ArgKind::IntPair, "3,4").expect("pair"), Some(ActionParam::IntPair(3, 4)));
        assert_eq!(arg(ArgKind::Percent, "50%").expect("pct"), Some(ActionParam::Percent(0.5)));
        assert!(arg(ArgKind::Percent, "-5%").is_err());
        assert_eq!(arg(ArgKind::Sound, "").expect("empty"), None);
        assert_eq!(
            arg(ArgKind::Angle, "90").expect("angle"),
            Some(ActionParam::Angle(Angle::ANG90))
        );
    }

    #[test]
    fn unknown_and_obsolete_actions() {
        let mut f = Fixture::new();
        f.field("STATES(SPAWN)", &["TROO:A:10:NORMAL:FLY", "TROO:A:10:NORMAL:OLDLOOK"])
            .expect("lenient");
        assert_eq!(f.group.get(1).and_then(|s| s.action), None);
        assert_eq!(f.group.get(2).and_then(|s| s.action), Some(Act::Old));
        assert_eq!(f.diag.warnings().len(), 2);
    }

    #[test]
    fn override_turns_old_label_into_pass_through() {
        let mut f = Fixture::new();
        f.field("STATES(DEATH)", &["TROO:I:8:NORMAL:LOOKOUT"]).expect("death");
        f.field("STATES(SPAWN)", &["TROO:A:10:NORMAL:", "#DEATH"]).expect("spawn");
        f.resolve().expect("first entry");
        assert_eq!(f.next(2), Some(1));

        f.group.begin_range();
        f.field("STATES(DEATH)", &["TROO:K:8:NORMAL:"]).expect("new death");
        f.resolve().expect("second entry");
        let old = f.group.get(1).cloned().expect("old death");
        assert_eq!(old.tics, 0);
        assert_eq!(old.action, None);
        assert_eq!(old.next, NextRef::Resolved(3));
        assert_eq!(find_label(&f.group, "DEATH", false, &f.diag).expect("label"), 3);
    }

    #[test]
    fn director_lookup() {
        let mut f = Fixture::new();
        f.field("STATES(SPAWN)", &["TROO:A:10:NORMAL:", "TROO:B:10:NORMAL:"])
            .expect("spawn");
        f.resolve().expect("resolve");
        assert_eq!(lookup_director(&f.group, "SPAWN:2", &f.diag).expect("dir"), 2);
        assert_eq!(lookup_director(&f.group, "IDLE", &f.diag).expect("idle"), 1);
        assert!(lookup_director(&f.group, ":2", &f.diag).is_err());
        assert_eq!(find_label(&f.group, "PAIN", true, &f.diag).expect("quiet"), S_NULL);
    }

    #[test]
    fn frame_argument_sets_jump_only() {
        let mut d = Diagnostics::new("t", Policy::default());
        let mut redirs = Redirectors::default();
        let (param, jump) =
            parse_action_arg(ArgKind::Frame, "MISSILE:3", &mut redirs, &mut d).expect("frame");
        assert_eq!(param, None);
        assert_eq!(jump, Some(NextRef::Redirector { id: 0, offset: 2 }));
        assert_eq!(redirs.name(0), Some("MISSILE"));
        assert!(parse_action_arg(ArgKind::Frame, ":3", &mut redirs, &mut d).is_err());
    }

    #[test]
    fn name_table_interning() {
        let mut t = NameTable::new();
        assert_eq!(t.add("NULL"), 0);
        assert_eq!(t.add("TROO"), 1);
        assert_eq!(t.add("SARG"), 2);
        assert_eq!(t.add("troo"), 1);
        assert_eq!(t.get(0), Some("!NULL!"));
        assert_eq!(t.len(), 3);
    }
}
