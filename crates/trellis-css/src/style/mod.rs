//! Style values and computed style.

pub mod computed;
pub mod properties;
pub mod shorthand;
pub mod values;

pub use computed::ComputedStyle;
pub use values::{ColorValue, LengthContext, LengthValue};
