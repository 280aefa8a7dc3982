//! Vendor option version resolution
//!
//! This module decides which vendor-specific SLD extensions are available for
//! the versions a user has selected, and groups known versions into menus.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Catalogue  │────▶│   Manager   │────▶│    Menu     │
//! │ (versions)  │     │ (selection) │     │ (grouping)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │    Range    │
//!                     │ (is_allowed)│
//!                     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`family`]: Vendor option families and the identifier registry
//! - [`data`]: Single versions, their ordering and range containment
//! - [`range`]: Version ranges, their string form and decoded constraints
//! - [`menu`]: Grouping of version lists into menus, with memoization
//! - [`catalogue`]: Known versions per family
//! - [`minimum`]: Minimum version inference from detected vendor options
//! - [`manager`]: Service tying the above together
//! - [`error`]: Error types

pub mod catalogue;
pub mod data;
pub mod error;
pub mod family;
pub mod manager;
pub mod menu;
pub mod minimum;
pub mod range;
