//! Document sections.

pub mod findings;
pub mod notice;
pub mod overview;
pub mod traffic;

pub use findings::render_findings;
pub use notice::render_notice;
pub use overview::render_overview;
pub use traffic::TrafficSection;
