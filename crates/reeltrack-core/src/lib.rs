pub mod aggregate;
pub mod app_config;
pub mod bulk;
pub mod config;
pub mod error;
pub mod format;
pub mod html;
pub mod instagram;
pub mod model;
pub mod notice;
pub mod render;
pub mod sort;
pub mod status;

pub use aggregate::{rollup, Rollup};
pub use app_config::{AppConfig, Environment};
pub use bulk::{parse_bulk_rows, BulkEntry, BulkSheet};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use format::{format_compact, format_date, format_metric, format_number};
pub use model::{
    AddPostRequest, AddPostResponse, BulkAddRequest, BulkAddResponse, BulkRowError,
    CampaignDashboardResponse, CampaignRef, CampaignSummary, CreatorSummary, CronResponse,
    DashboardResponse, DeleteAllResponse, DeleteCreatorResponse, ErrorDetail, HealthResponse,
    PollRequest, PollResponse, PostRow, Totals,
};
pub use notice::{Notice, NoticeLevel};
pub use render::{render_campaign, render_dashboard, CampaignRender, DashboardRender};
pub use sort::{sort_posts, SortMode};
pub use status::StatusBadge;
