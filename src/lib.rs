//! Procedural generator for the WellMinder application icon.

pub mod artwork;
pub mod canvas;
pub mod fonts;
pub mod icon_gen;

pub use artwork::{generate_icon, render_icon, ICON_SIZE};
pub use fonts::{Face, FontPair};
pub use icon_gen::{generate_icons, ICON_SIZES};
