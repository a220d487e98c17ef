//! Pure view builders: view models in, display strings out.
//!
//! Nothing here fetches; pages hand their section data to these functions and
//! the terminal renderer draws the result.

pub mod cards;
pub mod charts;
pub mod format;
pub mod tables;

/// Colour intent of a value, mapped to a palette by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Warn,
    Bad,
    Neutral,
}
