pub mod images;
pub mod reference_data;

pub use images::{AssetIndex, BoardSlot, BrokenImages, ImageResolver};
pub use reference_data::ReferenceData;
