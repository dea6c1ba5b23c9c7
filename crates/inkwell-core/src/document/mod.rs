//! Document domain module.
//!
//! - `model`: the document text and its revision counter (`Document`)
//! - `paragraph`: paragraph-under-cursor extraction used by the reviewer
//! - `selection`: the live drag-selection (`Selection`, `Anchor`)

mod model;
mod paragraph;
mod selection;

pub use model::Document;
pub use paragraph::{Paragraph, paragraph_at};
pub use selection::{Anchor, Selection};
