mod declare;
mod render;

pub use declare::{declare, DeclareArgs};
pub use render::{render, RenderArgs};
