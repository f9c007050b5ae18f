//! Command tables: field names mapped onto typed setters of a record.
//!
//! A table is a static slice of [`Command`]s built with [`field!`] and
//! [`sub_record!`]. Each entry knows how to reach its own field, so no
//! offsets or casts are involved. A leading `!` on a table name marks the
//! field obsolete: it still works but emits an obsolete notice.

use std::cmp::Ordering;

use crate::diag::Diagnostics;
use crate::error::DdfError;

pub type Setter<R> = fn(&str, &mut R, &mut Diagnostics) -> Result<(), DdfError>;

/// Dispatch `suffix` of a dotted field name into a nested record.
pub type SubParser<R> = fn(&str, &str, &mut R, &mut Diagnostics) -> Result<bool, DdfError>;

pub enum Command<R> {
    Field { name: &'static str, set: Setter<R> },
    /// `NAME.FIELD` forms, e.g. `DLIGHT.RADIUS`.
    Sub { name: &'static str, parse: SubParser<R> },
}

impl<R> Command<R> {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Field { name, .. } | Command::Sub { name, .. } => name,
        }
    }
}

/// Build a [`Command::Field`] that runs `$coerce` on `rec.$path`.
#[macro_export]
macro_rules! field {
    ($rec:ty, $name:literal, $($path:ident).+, $coerce:path) => {
        $crate::dispatch::Command::Field {
            name: $name,
            set: {
                fn set(
                    info: &str,
                    rec: &mut $rec,
                    diag: &mut $crate::diag::Diagnostics,
                ) -> Result<(), $crate::error::DdfError> {
                    $coerce(info, &mut rec.$($path).+, diag)
                }
                set
            },
        }
    };
}

/// Build a [`Command::Sub`] dispatching into `$table` on the record part
/// selected by `|$r| $proj`.
#[macro_export]
macro_rules! sub_record {
    ($rec:ty, $name:literal, $table:expr, |$r:ident| $proj:expr) => {
        $crate::dispatch::Command::Sub {
            name: $name,
            parse: {
                fn parse(
                    field: &str,
                    value: &str,
                    $r: &mut $rec,
                    diag: &mut $crate::diag::Diagnostics,
                ) -> Result<bool, $crate::error::DdfError> {
                    $crate::dispatch::dispatch($table, field, value, $proj, diag)
                }
                parse
            },
        }
    };
}

/// Compare names ignoring ASCII case, spaces and underscores.
pub fn compare_name(a: &str, b: &str) -> Ordering {
    let significant = |s: &str| {
        s.bytes()
            .filter(|b| *b != b' ' && *b != b'_')
            .map(|b| b.to_ascii_uppercase())
            .collect::<Vec<_>>()
    };
    significant(a).cmp(&significant(b))
}

/// `table_name` matches `name`, after dropping an obsolete marker from
/// the table side.
pub fn names_match(table_name: &str, name: &str) -> bool {
    let table_name = table_name.strip_prefix('!').unwrap_or(table_name);
    compare_name(table_name, name) == Ordering::Equal
}

/// The part after `prefix.` in `field`, when `field` addresses a sub-record.
fn sub_field<'a>(prefix: &str, field: &'a str) -> Option<&'a str> {
    let (head, rest) = field.split_once('.')?;
    let starts_alnum = rest.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    (starts_alnum && names_match(prefix, head)).then_some(rest)
}

/// Apply `value` to the field of `rec` named `field`. Returns `false` if
/// no entry in `table` matches; the caller decides how loud to be.
pub fn dispatch<R>(
    table: &[Command<R>],
    field: &str,
    value: &str,
    rec: &mut R,
    diag: &mut Diagnostics,
) -> Result<bool, DdfError> {
    for cmd in table {
        match cmd {
            Command::Field { name, set } => {
                if !names_match(name, field) {
                    continue;
                }
                if let Some(current) = name.strip_prefix('!') {
                    diag.obsolete(format!("The ddf {current} command is obsolete !"))?;
                }
                set(value, rec, diag)?;
                return Ok(true);
            }
            Command::Sub { name, parse } => {
                if let Some(rest) = sub_field(name, field) {
                    return parse(rest, value, rec, diag);
                }
            }
        }
    }
    Ok(false)
}
