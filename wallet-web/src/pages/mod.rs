//! Page modules

pub mod about;
pub mod dashboard;

pub use about::AboutPage;
pub use dashboard::DashboardPage;
