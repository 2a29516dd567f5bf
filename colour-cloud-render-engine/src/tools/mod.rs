//! Interactive tools for the colour-cube viewer.
//!
//! Currently a single tool: lasso/box point selection with a reactive state
//! machine keeping the 3D highlight layer, the 2D gesture outline, and the
//! masked source-image panel consistent with each other.
//!
//! ### Selection flow
//!
//! ```text
//! Pointer/keyboard input
//!   └─> SelectionState setters (synchronous observer notification)
//!       └─> ChangeJournal
//!           └─> apply_selection_effects()
//!               ├─> outline redraw (2D overlay)
//!               ├─> highlight layer rebuild (3D)
//!               ├─> mask recomposite (image panel)
//!               └─> control affordances (mode row)
//! ```

/// Lasso/box selection tool, state machine, and view synchronisation.
pub mod selection;
