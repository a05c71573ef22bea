//! Reusable UI components for medcheck
//!
//! Components implement the `Component<A>` trait from medcheck-core and emit
//! actions via callback functions passed through Props.
//!
//! # Components
//!
//! - [`SelectList`] - Scrollable list with keyboard navigation and optional
//!   multi-select check marks
//! - [`TextInput`] - Single-line text input with cursor
//! - [`render_modal`] - Overlay helper that dims the background
//!
//! # Example
//!
//! ```ignore
//! use medcheck_components::{SelectList, SelectListProps};
//!
//! // In your render function:
//! let mut list = SelectList::default();
//! list.render(frame, area, SelectListProps {
//!     items: &labels,
//!     selected: state.cursor,
//!     checked: Some(&state.chosen),
//!     is_focused: state.focus == Focus::List,
//!     on_select: Action::MoveCursor,
//!     on_toggle: Some(Action::Toggle),
//! });
//! ```

mod modal;
mod select_list;
mod text_input;

pub use modal::{centered_rect, render_modal, ModalStyle};
pub use select_list::{SelectList, SelectListProps};
pub use text_input::{TextInput, TextInputProps};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        centered_rect, render_modal, ModalStyle, SelectList, SelectListProps, TextInput,
        TextInputProps,
    };
}
