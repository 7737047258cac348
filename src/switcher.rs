//! Language switcher
/// Switcher state and event handling
mod controller;
/// Language code selection
mod language;
/// Rendered controls
mod widget;

pub use controller::{
    Switcher,
    UiEvent,
};
pub use language::{
    language_label,
    next_language,
    resolve_allowed,
    resolve_initial,
};
pub use widget::Controls;
