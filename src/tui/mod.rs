pub mod action;
pub mod app;
pub mod component;
pub mod components;
pub mod keybindings;
pub mod theme;

pub use action::{Action, ActionCategory};
pub use app::{App, LoadEvent};
pub use component::{Component, Focusable, Modal, ModalOutcome};
pub use keybindings::{KeyBinding, KeyBindings, KeyPattern};
pub use theme::Theme;
