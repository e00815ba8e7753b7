//! User preference services.
//!
//! # Responsibility
//! - Persist appearance preferences (color palette, dark mode) as explicit
//!   configuration objects.
//!
//! # Invariants
//! - Theme state is always passed and returned by value; there is no
//!   process-wide mutable palette.

pub mod theme;

pub use theme::{DarkMode, ThemeError, ThemeService, ThemeSettings};
