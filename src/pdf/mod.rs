pub mod glyphs;
pub mod layout;
pub mod reader;

pub use glyphs::{Glyph, GlyphCollector};
pub use layout::{detect_tables, LayoutSettings};
pub use reader::{RawRows, StatementReader};
