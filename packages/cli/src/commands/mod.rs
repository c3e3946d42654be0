pub mod init;
pub mod lint;
pub mod render;

pub use init::{init, InitArgs};
pub use lint::{lint, LintArgs};
pub use render::{render, RenderArgs};
