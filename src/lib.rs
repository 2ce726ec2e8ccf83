// src/lib.rs

//! Traces a fix commit back to the commit that most likely introduced the
//! code it repairs: diff the fix against its parent, pick the parent lines
//! worth blaming, blame them at the parent, and take the most frequent
//! answer.

pub mod attribution;
pub mod blame;
pub mod classifier;
pub mod error;
pub mod filetype;
pub mod frequency;
pub mod git;
pub mod model;

pub use attribution::{attribute, attribute_detailed, AttributionConfig};
pub use error::{Error, Result};
pub use git::GitBackend;
pub use model::{Attribution, CommitRef};
