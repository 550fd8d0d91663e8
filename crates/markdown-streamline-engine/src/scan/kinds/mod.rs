mod code_fence;
mod code_span;
mod heading;

pub use code_fence::CodeFence;
pub use code_span::CodeSpan;
pub use heading::Heading;
