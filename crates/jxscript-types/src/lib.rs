//! jxscript-types: pure data types shared across the jxscript crates.
//!
//! Nothing here knows how to render or check a script. These are the values
//! that flow between the escaper, the builder, the validator, and callers:
//!
//! - [`LiteralValue`] and [`EscapeMode`]: what a caller binds into a script
//! - [`ValidationFinding`], [`ValidationResult`], [`QuickValidation`]: what the
//!   validator reports back

mod finding;
mod value;

pub use finding::{FindingType, QuickValidation, Severity, ValidationFinding, ValidationResult};
pub use value::{EscapeMode, LiteralValue, ParseEscapeModeError};
