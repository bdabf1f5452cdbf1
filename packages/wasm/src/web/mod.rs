//! Browser implementations of the view's host services.

mod fetch;
mod scheduler;
mod svg;

pub use fetch::FetchTransport;
pub use scheduler::WebScheduler;
pub use svg::SvgSurface;
