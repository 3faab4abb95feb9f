//! Placeholder templates for generated LAMMPS input.
//!
//! The `regionkit-template` crate turns a [`Fragment`] and a set of
//! bindings into literal command text. Fragments combine into [`Script`]s
//! either by fusion (`+`, one shared stage) or by chaining (`|`, one stage
//! per operand).
//!
//! # Rendering
//!
//! ```
//! use regionkit_template::{Fragment, Script, VarBag};
//!
//! let create = Fragment::new("create", 4, "create_atoms ${beadtype} region ${ID}");
//! let vars = VarBag::new().with("ID", "S1").with("beadtype", 2);
//! assert_eq!(create.render(&vars, &VarBag::new()), "create_atoms 2 region S1");
//!
//! let script = Script::from(create);
//! assert_eq!(script.render(&vars, &VarBag::new()), "create_atoms 2 region S1\n");
//! ```
//!
//! # Evaluation
//!
//! ```
//! use regionkit_template::{evaluate_with, VarBag};
//!
//! let vars = VarBag::new().with("up", 2);
//! assert_eq!(evaluate_with("${up}*3", &vars), Ok(6.0));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod expr;
pub mod fragment;
pub mod render;
pub mod script;
pub mod value;

pub use error::TemplateError;
pub use expr::{evaluate, evaluate_with, round_to};
pub use fragment::Fragment;
pub use render::{comment_lines, placeholders, render, render_value, strip_comments};
pub use script::{Binding, Part, Script, Stage};
pub use value::{Value, VarBag};
