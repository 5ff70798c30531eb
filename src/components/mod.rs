//! UI components built with Leptos.
//!
//! - [`Shell`] - Page layout: sidebar with search and tree, reader pane
//! - [`tree`] - Lazily expanded document tree
//! - [`search`] - Search box, suggestions, results and pagination
//! - [`reader`] - Document pane with reading controls
//! - [`announcements`] - Release notes, recommendations and feedback
//! - [`icons`] - Centralized icon definitions

pub mod announcements;
pub mod icons;
pub mod reader;
pub mod search;
pub mod shell;
pub mod tree;

pub use shell::Shell;
