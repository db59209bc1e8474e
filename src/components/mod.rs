pub mod templates;

pub use templates::{PageRenderer, Templates};
