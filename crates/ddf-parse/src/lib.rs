//! Reader for DDF definition files: lexing, directives, field dispatch,
//! value coercion and state-sequence resolution, plus the `THINGS` family.

pub mod coerce;
pub mod container;
pub mod diag;
pub mod directive;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod states;
pub mod things;

pub use container::{Container, Named};
pub use diag::{Diagnostics, Policy, Warning, WarningKind};
pub use driver::{ENGINE_VERSION, Family, ReadInfo, Report, peek_tag, read_ddf};
pub use error::{DdfError, Location};
pub use states::SpriteNames;
pub use things::{ThingDb, ThingParser};
