//! Framework-agnostic state for the gateway's front-end: the two page
//! orchestrators and the before/after comparison slider. Rendering, toasts,
//! file pickers, and blob downloads belong to whatever shell hosts these.

pub mod slider;
pub mod upscaler;
pub mod vidify;

pub use slider::{BoundingRect, ComparisonSlider, PointerListeners, SliderState};
pub use upscaler::{RequestToken, SelectedImage, UpscalerPage};
pub use vidify::VidifyPage;
