//! Configuration module

mod site;

pub use site::AnalyticsConfig;
pub use site::BackgroundConfig;
pub use site::NavLink;
pub use site::ShellStyle;
pub use site::SiteConfig;
