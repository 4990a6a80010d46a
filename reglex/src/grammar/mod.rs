//! Grammar model and the tag names the compiler treats specially

pub mod error;
pub mod model;
pub mod special_tags;

pub use error::GrammarParseError;
pub use model::{GrammarModel, GrammarToken, GroupKind, Rule, Tag, TagId};
pub use special_tags::{is_special_tag, SpecialTag};
