pub use video::*;

mod video;
