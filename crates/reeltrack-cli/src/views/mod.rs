pub mod campaign;
pub mod dashboard;

pub use campaign::CampaignView;
pub use dashboard::DashboardView;
