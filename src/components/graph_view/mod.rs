mod attributes;
mod component;
mod engine;
mod gexf;
mod interaction;
mod popup;
mod presenter;
mod render;
mod session;
mod state;
mod types;
mod viewport;

pub use component::GraphView;
pub use session::GraphHandle;
pub use viewport::ZoomDirection;
