pub mod args;
pub mod force;

pub use args::{FLAGS_WITH_VALUE, extract_namespace, extract_primary_command, takes_value};
pub use force::{OVERRIDE_FLAG, has_override, strip_override};
