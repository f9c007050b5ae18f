//! The fixed library of value coercers.
//!
//! Every coercer has the [`Setter`](crate::dispatch::Setter) shape
//! `(text, &mut target, &mut Diagnostics)`, so it can sit directly in a
//! command table or be called by a family's own handlers.

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::one_of;

use ddf_types::{
    Angle, BITSET_EMPTY, BitSet, Keys, LabelOffset, Percent, Rgb, TICRATE, Tics, WhenAppear,
};

use crate::diag::Diagnostics;
use crate::dispatch::compare_name;
use crate::error::DdfError;

/// Longest lump name the engine accepts.
pub const MAX_LUMP_NAME: usize = 8;

fn float_prefix<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        opt(one_of(['+', '-'])),
        alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

/// Leading float of `s`, ignoring anything after it.
pub fn leading_float(s: &str) -> Option<f32> {
    let mut input = s.trim_start();
    float_prefix
        .parse_next(&mut input)
        .ok()
        .and_then(|text| text.parse().ok())
}

/// Leading integer of `s` in C style: `0x` hex, leading-zero octal, else
/// decimal. `None` when no digits were found.
pub fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None if s.len() > 1 && s.starts_with('0') => (8, &s[1..]),
        None => (10, s),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return s.starts_with('0').then_some(0);
    }
    let value = i64::from_str_radix(&digits[..end], radix).unwrap_or(i64::MAX);
    Some(if neg { -value } else { value })
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub fn get_numeric(info: &str, dest: &mut i32, diag: &mut Diagnostics) -> Result<(), DdfError> {
    if info.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return diag.warn_error(format!("Bad numeric value: {info}"));
    }
    *dest = clamp_i32(leading_int(info).unwrap_or(0));
    Ok(())
}

pub fn get_boolean(info: &str, dest: &mut bool, diag: &mut Diagnostics) -> Result<(), DdfError> {
    if info.eq_ignore_ascii_case("TRUE") || info == "1" {
        *dest = true;
    } else if info.eq_ignore_ascii_case("FALSE") || info == "0" {
        *dest = false;
    } else {
        return Err(diag.semantic(format!("Bad boolean value: {info}")));
    }
    Ok(())
}

pub fn get_string(info: &str, dest: &mut String, _diag: &mut Diagnostics) -> Result<(), DdfError> {
    *dest = info.to_string();
    Ok(())
}

pub fn get_opt_string(
    info: &str,
    dest: &mut Option<String>,
    _diag: &mut Diagnostics,
) -> Result<(), DdfError> {
    *dest = Some(info.to_string());
    Ok(())
}

pub fn get_lump_name(info: &str, dest: &mut String, diag: &mut Diagnostics) -> Result<(), DdfError> {
    match info.len() {
        n if n > MAX_LUMP_NAME + 1 => {
            return Err(diag.semantic(format!(
                "Name {info} too long (must be {MAX_LUMP_NAME} characters or less)"
            )));
        }
        n if n > MAX_LUMP_NAME => {
            diag.warn_error(format!("Name {info} too long, truncated"))?;
        }
        _ => {}
    }
    *dest = info.chars().take(MAX_LUMP_NAME).collect();
    Ok(())
}

pub fn get_float(info: &str, dest: &mut f32, diag: &mut Diagnostics) -> Result<(), DdfError> {
    if info.contains('%') {
        return get_percent_any(info, dest, diag);
    }
    *dest = leading_float(info)
        .ok_or_else(|| diag.semantic(format!("Bad floating point value: {info}")))?;
    Ok(())
}

pub fn get_angle(info: &str, dest: &mut Angle, diag: &mut Diagnostics) -> Result<(), DdfError> {
    let mut val =
        leading_float(info).ok_or_else(|| diag.semantic(format!("Bad angle value: {info}")))?;
    if val as i32 == 360 {
        val = 359.5;
    } else if val > 360.0 {
        diag.warn_error(format!("Angle '{info}' too large (must be less than 360)"))?;
    }
    *dest = Angle::from_degrees(val);
    Ok(())
}

/// Vertical slope from an angle in degrees, clamped short of vertical.
pub fn get_slope(info: &str, dest: &mut f32, diag: &mut Diagnostics) -> Result<(), DdfError> {
    let val =
        leading_float(info).ok_or_else(|| diag.semantic(format!("Bad slope value: {info}")))?;
    *dest = Angle::from_degrees(val.clamp(-89.5, 89.5)).tan();
    Ok(())
}

/// The number before a required `%`, or `None` if the `%` is missing.
fn percent_body(info: &str) -> Option<&str> {
    let end = info
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(info.len());
    info[end..].starts_with('%').then(|| &info[..end])
}

fn percent_value(info: &str, body: &str, diag: &Diagnostics) -> Result<f32, DdfError> {
    leading_float(body).ok_or_else(|| diag.semantic(format!("Bad percent value '{info}'")))
}

/// `0%..=100%` as a fraction.
pub fn get_percent(info: &str, dest: &mut Percent, diag: &mut Diagnostics) -> Result<(), DdfError> {
    let Some(body) = percent_body(info) else {
        diag.warn_error(format!(
            "Bad percent value '{info}': Should be a number followed by %"
        ))?;
        let f = percent_value(info, info, diag)?;
        *dest = f.clamp(0.0, 1.0);
        return Ok(());
    };
    let f = percent_value(info, body, diag)?;
    if !(0.0..=100.0).contains(&f) {
        return Err(diag.semantic(format!(
            "Bad percent value '{info}': Must be between 0% and 100%"
        )));
    }
    *dest = f / 100.0;
    Ok(())
}

/// Like [`get_percent`] but without the range check.
pub fn get_percent_any(
    info: &str,
    dest: &mut Percent,
    diag: &mut Diagnostics,
) -> Result<(), DdfError> {
    let Some(body) = percent_body(info) else {
        diag.warn_error(format!(
            "Bad percent value '{info}': Should be a number followed by %"
        ))?;
        *dest = percent_value(info, info, diag)?;
        return Ok(());
    };
    *dest = percent_value(info, body, diag)? / 100.0;
    Ok(())
}

/// Seconds, or ticks with a `T` suffix. `MAXT` is forever.
pub fn get_time(info: &str, dest: &mut Tics, diag: &mut Diagnostics) -> Result<(), DdfError> {
    if info.eq_ignore_ascii_case("MAXT") {
        *dest = Tics::MAX;
        return Ok(());
    }
    if info.contains('T') {
        return get_numeric(info, dest, diag);
    }
    let val = leading_float(info).ok_or_else(|| diag.semantic(format!("Bad time value: {info}")))?;
    *dest = (val * TICRATE as f32) as Tics;
    Ok(())
}

pub fn get_rgb(info: &str, dest: &mut Rgb, diag: &mut Diagnostics) -> Result<(), DdfError> {
    if info.eq_ignore_ascii_case("NONE") {
        *dest = Rgb::NO_VALUE;
        return Ok(());
    }
    *dest = info.parse().map_err(|e| diag.semantic(format!("{e}")))?;
    Ok(())
}

/// `[!] skills [:] netmodes`, e.g. `1-3:SP`, `!DM`. Empty groups mean all.
pub fn get_when_appear(
    info: &str,
    dest: &mut WhenAppear,
    diag: &mut Diagnostics,
) -> Result<(), DdfError> {
    let mut result = WhenAppear::empty();
    let bytes = info.as_bytes();

    if let Some(pos) = info.find('-') {
        let lo = pos.checked_sub(1).and_then(|i| bytes.get(i)).copied();
        let hi = bytes.get(pos + 1).copied();
        match (lo, hi) {
            (Some(lo @ b'1'..=b'5'), Some(hi @ b'1'..=b'5')) if lo <= hi => {
                for sk in lo..=hi {
                    result |= WhenAppear::skill(sk - b'0');
                }
            }
            _ => return Err(diag.semantic(format!("Bad range in WHEN_APPEAR value: {info}"))),
        }
    } else {
        for sk in b'1'..=b'5' {
            if bytes.contains(&sk) {
                result |= WhenAppear::skill(sk - b'0');
            }
        }
    }

    let upper = info.to_ascii_uppercase();
    for (word, flag) in [
        ("SP", WhenAppear::SINGLE),
        ("COOP", WhenAppear::COOP),
        ("DM", WhenAppear::DEATHMATCH),
    ] {
        if upper.contains(word) {
            result |= flag;
        }
    }

    if info.starts_with('!') {
        result ^= WhenAppear::SKILL_BITS | WhenAppear::NET_BITS;
    }
    if (result & WhenAppear::SKILL_BITS).is_empty() {
        result |= WhenAppear::SKILL_BITS;
    }
    if (result & WhenAppear::NET_BITS).is_empty() {
        result |= WhenAppear::NET_BITS;
    }
    *dest = result;
    Ok(())
}

/// A number, or letters `A`-`Z` with `A-C` style ranges.
pub fn get_bitset(info: &str, dest: &mut BitSet, _diag: &mut Diagnostics) -> Result<(), DdfError> {
    if let Some(n) = leading_int(info) {
        *dest = n as BitSet;
        return Ok(());
    }
    let bytes = info.as_bytes();
    let mut result = BITSET_EMPTY;
    for (i, &c) in bytes.iter().enumerate() {
        if !c.is_ascii_uppercase() {
            continue;
        }
        let end = match (bytes.get(i + 1), bytes.get(i + 2)) {
            (Some(b'-'), Some(&e)) if e.is_ascii_uppercase() && e >= c => e,
            _ => c,
        };
        for bit in (c - b'A')..=(end - b'A') {
            result |= 1 << bit;
        }
    }
    *dest = result;
    Ok(())
}

pub const KEY_NAMES: &[(&str, Keys)] = &[
    ("NONE", Keys::empty()),
    ("BLUE_CARD", Keys::BLUE_CARD),
    ("YELLOW_CARD", Keys::YELLOW_CARD),
    ("RED_CARD", Keys::RED_CARD),
    ("BLUE_SKULL", Keys::BLUE_SKULL),
    ("YELLOW_SKULL", Keys::YELLOW_SKULL),
    ("RED_SKULL", Keys::RED_SKULL),
    ("GREEN_CARD", Keys::GREEN_CARD),
    ("GREEN_SKULL", Keys::GREEN_SKULL),
    ("GOLD_KEY", Keys::GOLD_KEY),
    ("SILVER_KEY", Keys::SILVER_KEY),
    ("BRASS_KEY", Keys::BRASS_KEY),
    ("COPPER_KEY", Keys::COPPER_KEY),
    ("STEEL_KEY", Keys::STEEL_KEY),
    ("WOODEN_KEY", Keys::WOODEN_KEY),
    ("FIRE_KEY", Keys::FIRE_KEY),
    ("WATER_KEY", Keys::WATER_KEY),
    (
        "REQUIRES_ALL",
        Keys::STRICTLY_ALL.union(Keys::CARDS.difference(Keys::GREEN_CARD)).union(
            Keys::SKULLS.difference(Keys::GREEN_SKULL),
        ),
    ),
];

/// One key name per call. `+NAME` makes the key required; once any key is
/// required the optional ones are ignored.
pub fn get_keys(info: &str, dest: &mut Keys, diag: &mut Diagnostics) -> Result<(), DdfError> {
    let (required, name) = match info.strip_prefix('+') {
        Some(rest) => (true, rest),
        None if dest.contains(Keys::STRICTLY_ALL) => return Ok(()),
        None => (false, info),
    };
    match KEY_NAMES
        .iter()
        .find(|(n, _)| compare_name(n, name).is_eq())
    {
        Some((_, keys)) => {
            *dest |= *keys;
            if required {
                *dest |= Keys::STRICTLY_ALL;
            }
            Ok(())
        }
        None => diag.warn_error(format!("Unknown key type {name}")),
    }
}

/// `label[:n]`; the offset is stored zero-based.
pub fn get_label_offset(
    info: &str,
    dest: &mut LabelOffset,
    diag: &mut Diagnostics,
) -> Result<(), DdfError> {
    let (label, offset) = match info.split_once(':') {
        Some((label, n)) => (label, n),
        None => (info, ""),
    };
    if label.is_empty() {
        return Err(diag.semantic(format!("Bad state label `{info}'")));
    }
    let n = leading_int(offset).unwrap_or(0);
    *dest = LabelOffset::new(label, (n - 1).max(0) as usize);
    Ok(())
}

/// `low%:high%`.
pub fn get_percent_range(
    info: &str,
    dest: &mut [Percent; 2],
    diag: &mut Diagnostics,
) -> Result<(), DdfError> {
    let (a, b) = info
        .split_once(':')
        .ok_or_else(|| diag.semantic(format!("Bad percentage range: {info}")))?;
    let (mut lo, mut hi) = (0.0, 0.0);
    get_percent(a, &mut lo, diag)?;
    get_percent(b, &mut hi, diag)?;
    if lo > hi {
        return Err(diag.semantic(format!("Bad percentage range (low > high): {info}")));
    }
    *dest = [lo, hi];
    Ok(())
}

/// `low:high` in degrees.
pub fn get_angle_range(
    info: &str,
    dest: &mut [Angle; 2],
    diag: &mut Diagnostics,
) -> Result<(), DdfError> {
    let (a, b) = info
        .split_once(':')
        .ok_or_else(|| diag.semantic(format!("Bad angle range: {info}")))?;
    get_angle(a, &mut dest[0], diag)?;
    get_angle(b, &mut dest[1], diag)
}

/// A named flag (or flag group) in a `SPECIAL`-style list.
#[derive(Debug, Clone, Copy)]
pub struct SpecialFlag<F: 'static> {
    pub name: &'static str,
    pub bits: F,
    /// Naming the flag clears these bits rather than setting them.
    pub negative: bool,
}

impl<F> SpecialFlag<F> {
    pub const fn new(name: &'static str, bits: F, negative: bool) -> Self {
        Self {
            name,
            bits,
            negative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagCheck<F> {
    Unknown,
    Positive(F),
    Negative(F),
    User(F),
}

fn find_special_flag<F>(
    prefix: &str,
    name: &str,
    table: &[SpecialFlag<F>],
    diag: &mut Diagnostics,
) -> Result<Option<usize>, DdfError> {
    for (i, flag) in table.iter().enumerate() {
        let (current, obsolete) = match flag.name.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (flag.name, false),
        };
        let try_name = format!("{prefix}{current}");
        if compare_name(name, &try_name).is_eq() {
            if obsolete {
                diag.obsolete(format!("The ddf flag `{try_name}' is obsolete !"))?;
            }
            return Ok(Some(i));
        }
    }
    Ok(None)
}

/// Look `name` up in `table`, trying the `ENABLE_`, `NO_`, `NOT_`,
/// `DISABLE_` and (with `allow_user`) `USER_` prefixes in that order.
pub fn check_special_flag<F: Copy>(
    name: &str,
    table: &[SpecialFlag<F>],
    allow_prefixes: bool,
    allow_user: bool,
    diag: &mut Diagnostics,
) -> Result<FlagCheck<F>, DdfError> {
    let mut negate = false;
    let mut user = false;
    let mut index = find_special_flag("", name, table, diag)?;

    if allow_prefixes {
        for (prefix, neg) in [
            ("ENABLE_", false),
            ("NO_", true),
            ("NOT_", true),
            ("DISABLE_", true),
        ] {
            if index.is_some() {
                break;
            }
            negate = neg;
            index = find_special_flag(prefix, name, table, diag)?;
        }
        if index.is_none() && allow_user {
            user = true;
            negate = false;
            index = find_special_flag("USER_", name, table, diag)?;
        }
    }

    let Some(flag) = index.map(|i| &table[i]) else {
        return Ok(FlagCheck::Unknown);
    };
    if flag.negative {
        negate = !negate;
    }
    Ok(if user {
        FlagCheck::User(flag.bits)
    } else if negate {
        FlagCheck::Negative(flag.bits)
    } else {
        FlagCheck::Positive(flag.bits)
    })
}

/// Split `OUTER(INNER)`. The outer keyword must be non-empty; the inner
/// part may be empty and may hold nested brackets and quoted strings.
pub fn decode_brackets(info: &str) -> Option<(&str, &str)> {
    let open = info.find('(')?;
    if open == 0 {
        return None;
    }
    let inner_start = open + 1;
    let bytes = info.as_bytes();
    let (mut depth, mut in_string, mut i) = (0usize, false, inner_start);
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'"') => i += 1,
            b'"' => in_string = !in_string,
            b'(' if !in_string => depth += 1,
            b')' if !in_string && depth == 0 => return Some((&info[..open], &info[inner_start..i])),
            b')' if !in_string => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Byte position of `divider` outside brackets and strings (`simple`
/// disables both). Unbalanced brackets or an open string are fatal.
pub fn decode_list(
    info: &str,
    divider: char,
    simple: bool,
    diag: &Diagnostics,
) -> Result<Option<usize>, DdfError> {
    let bytes = info.as_bytes();
    let (mut depth, mut in_string, mut i) = (0i32, false, 0);
    while i < bytes.len() {
        let c = bytes[i];
        if depth == 0 && !in_string && char::from(c) == divider {
            return Ok(Some(i));
        }
        if !simple {
            if c == b'\\' && bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            match c {
                b'"' => in_string = !in_string,
                b'(' if !in_string => depth += 1,
                b')' if !in_string => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(diag.error(format!("Too many ')' found: {info}")));
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }
    if in_string {
        return Err(diag.error(format!("Unterminated string found: {info}")));
    }
    if depth != 0 {
        return Err(diag.error(format!("Unclosed brackets found: {info}")));
    }
    Ok(None)
}
