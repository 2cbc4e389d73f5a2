#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod redact;
pub mod render;
pub mod scene;
pub mod scene_dump;
pub mod spec;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{load_config, Config, LayoutConfig};
pub use error::{Degradation, RenderError};
pub use layout::{compute_layout, LayoutOptions};
pub use redact::redact_scene;
pub use render::render_svg;
pub use scene::SceneGraph;
pub use spec::{DiagramFamily, DiagramSpec};
pub use theme::Theme;
