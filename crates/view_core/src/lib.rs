//! View side of the survey: the state a presentation shows, how control
//! messages change it, and the scene drawn for each slide.

mod client;
pub mod scene;
pub mod state;

pub use client::ViewClient;
pub use scene::{DrawCommand, Point};
pub use state::ViewState;
