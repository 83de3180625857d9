pub mod image;
pub use image::Image;

pub mod runtime;
pub use runtime::RunState;

pub mod term;
pub use term::{Console, TermConsole};

mod error;
