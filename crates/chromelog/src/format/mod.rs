/// Console call formatting module
///
/// Turns decoded payload rows into console invocations with substitution
/// patterns, style tokens and optional backtrace/timestamp annotations.
///
/// # Architecture
///
/// - `method.rs`: Console method vocabulary
/// - `directive.rs`: `%` directive scanning and unescaping
/// - `sanitize.rs`: Argument cleanup
/// - `transform.rs`: Row normalization and pattern generation
/// - `model.rs`: Normalized entries and console calls

pub mod directive;
pub mod method;
pub mod model;
pub mod sanitize;
pub mod transform;

// Re-export commonly used types
pub use directive::{has_live_directive, unescape};
pub use method::{ConsoleMethod, UnknownMethod};
pub use model::{ConsoleCall, NormalizedEntry};
pub use sanitize::sanitize;
pub use transform::{is_truthy, normalize, Transformer, CLASS_NAME_MARKER};
