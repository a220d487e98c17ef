pub mod image_probe;
pub mod import_watcher;
pub mod poller;

pub use image_probe::{spawn_probe, BrokenImage, ImageProbe};
pub use import_watcher::{ImportEvent, ImportWatcher};
pub use poller::{PollHandle, PollTick};
