//! # calc_core - Calculator Engine
//!
//! `calc_core` is the computational core behind the calculator site. It
//! provides pure formula calculations and a generic timed quiz controller,
//! with every input and result JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless formulas**: functions take plain inputs and return immutable results
//! - **Traceable**: every result carries the formula and substituted steps
//! - **Rich Errors**: structured error types, not just strings
//! - **Safe expressions**: user-typed functions go through a whitelisted parser
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::formulas::geometry::triangle_from_sides;
//! use calc_core::units::LengthUnit;
//!
//! let triangle = triangle_from_sides(3.0, 4.0, 5.0, LengthUnit::Centimeter).unwrap();
//! assert_eq!(triangle.area, 6.0);
//!
//! // Serialize for a front end
//! let json = serde_json::to_string_pretty(&triangle).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`formulas`] - Formula library and the `FormulaRequest` dispatcher
//! - [`session`] - Timed multiple-choice session controller and problem pools
//! - [`units`] - Type-safe unit wrappers and conversion tables
//! - [`numeric`] - Shared numeric helpers
//! - [`errors`] - Structured error types

pub mod errors;
pub mod formulas;
pub mod numeric;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use formulas::{Formula, FormulaOutcome, FormulaRequest};
pub use session::{ProblemPool, SessionConfig, SessionController, SessionEvent, SessionSnapshot};
