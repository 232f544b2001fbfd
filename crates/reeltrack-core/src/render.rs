//! Pure transformation of wire models into display rows.
//!
//! Both the dashboard and the campaign share page go through these functions,
//! whether the output is a terminal table or HTML.

use crate::format::{format_compact, format_date, format_metric, format_number, MISSING};
use crate::model::{CampaignRef, CampaignSummary, PostRow, Totals};
use crate::status::StatusBadge;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiTile {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignRowView {
    pub campaign_id: i64,
    pub name: String,
    pub href: String,
    pub posts: String,
    pub views: String,
    pub likes: String,
    pub comments: String,
}

/// Dashboard-only control for removing a creator everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAffordance {
    pub creator_id: i64,
    pub creator_handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRowView {
    pub post_id: i64,
    pub creator_label: String,
    pub creator_handle: String,
    pub campaign_name: Option<String>,
    pub followers: String,
    pub post_url: String,
    pub views: String,
    pub likes: String,
    pub comments: String,
    pub status: StatusBadge,
    pub last_snapshot: String,
    pub delete: Option<DeleteAffordance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRender {
    pub generated_at: String,
    pub kpis: Vec<KpiTile>,
    pub campaigns: Vec<CampaignRowView>,
    pub posts: Vec<PostRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignRender {
    pub campaign_id: i64,
    pub title: String,
    pub generated_at: String,
    pub kpis: Vec<KpiTile>,
    pub posts: Vec<PostRowView>,
}

fn kpi_tiles(totals: &Totals, fmt: fn(Option<i64>) -> String) -> Vec<KpiTile> {
    vec![
        KpiTile {
            label: "Posts",
            value: fmt(Some(totals.posts)),
        },
        KpiTile {
            label: "Views",
            value: fmt(Some(totals.views)),
        },
        KpiTile {
            label: "Likes",
            value: fmt(Some(totals.likes)),
        },
        KpiTile {
            label: "Comments",
            value: fmt(Some(totals.comments)),
        },
    ]
}

fn campaign_row(summary: &CampaignSummary) -> CampaignRowView {
    CampaignRowView {
        campaign_id: summary.campaign_id,
        name: summary.campaign_name.clone(),
        href: format!("/campaign/{}", summary.campaign_id),
        posts: format_number(Some(summary.posts)),
        views: format_number(Some(summary.views)),
        likes: format_number(Some(summary.likes)),
        comments: format_number(Some(summary.comments)),
    }
}

fn post_row(row: &PostRow, with_delete: bool) -> PostRowView {
    let creator_label = row
        .creator_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&row.creator_handle)
        .to_string();
    let followers = row
        .followers_text
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(MISSING)
        .to_string();
    PostRowView {
        post_id: row.post_id,
        creator_label,
        creator_handle: row.creator_handle.clone(),
        campaign_name: row.campaign_name.clone(),
        followers,
        post_url: row.post_url.clone(),
        views: format_metric(row.views),
        likes: format_metric(row.likes),
        comments: format_metric(row.comments),
        status: StatusBadge::for_post(row),
        last_snapshot: format_date(row.last_snapshot_at.as_deref()),
        delete: with_delete.then(|| DeleteAffordance {
            creator_id: row.creator_id,
            creator_handle: row.creator_handle.clone(),
        }),
    }
}

/// Rows for the global dashboard. `posts` is rendered in the order given;
/// sort before calling.
#[must_use]
pub fn render_dashboard(
    generated_at: Option<&str>,
    totals: &Totals,
    campaigns: &[CampaignSummary],
    posts: &[PostRow],
) -> DashboardRender {
    DashboardRender {
        generated_at: format_date(generated_at),
        kpis: kpi_tiles(totals, format_number),
        campaigns: campaigns.iter().map(campaign_row).collect(),
        posts: posts.iter().map(|p| post_row(p, true)).collect(),
    }
}

/// Rows for a campaign share page. Read-only: no delete affordances, compact KPIs.
#[must_use]
pub fn render_campaign(
    campaign: &CampaignRef,
    totals: &Totals,
    posts: &[PostRow],
    generated_at: Option<&str>,
) -> CampaignRender {
    CampaignRender {
        campaign_id: campaign.campaign_id,
        title: campaign.campaign_name.clone(),
        generated_at: format_date(generated_at),
        kpis: kpi_tiles(totals, format_compact),
        posts: posts.iter().map(|p| post_row(p, false)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> PostRow {
        PostRow {
            post_id: 4,
            creator_id: 9,
            creator_handle: "alice".to_string(),
            creator_name: None,
            campaign_id: Some(1),
            campaign_name: Some("Spring".to_string()),
            post_url: "https://www.instagram.com/reel/abc".to_string(),
            followers_text: None,
            views: Some(0),
            likes: None,
            comments: Some(1_234),
            source_status: None,
            ..PostRow::default()
        }
    }

    fn totals() -> Totals {
        Totals {
            posts: 1,
            views: 12_345,
            likes: 0,
            comments: 1_234,
        }
    }

    #[test]
    fn dashboard_rows_format_metrics_and_carry_delete() {
        let render = render_dashboard(None, &totals(), &[], &[sample_post()]);
        let row = &render.posts[0];
        assert_eq!(row.views, "0");
        assert_eq!(row.likes, "-");
        assert_eq!(row.comments, "1,234");
        assert_eq!(row.creator_label, "alice");
        assert_eq!(row.followers, "-");
        assert_eq!(row.status.text, "pending");
        assert_eq!(row.last_snapshot, "-");
        assert_eq!(
            row.delete,
            Some(DeleteAffordance {
                creator_id: 9,
                creator_handle: "alice".to_string()
            })
        );
        assert_eq!(render.kpis[1].value, "12,345");
        assert_eq!(render.generated_at, "-");
    }

    #[test]
    fn campaign_rows_link_to_share_page() {
        let summary = CampaignSummary {
            campaign_id: 3,
            campaign_name: "Spring".to_string(),
            posts: 2,
            views: 1_000,
            likes: 0,
            comments: 0,
        };
        let render = render_dashboard(None, &Totals::default(), &[summary], &[]);
        assert_eq!(render.campaigns[0].href, "/campaign/3");
        assert_eq!(render.campaigns[0].views, "1,000");
    }

    #[test]
    fn campaign_render_is_read_only_with_compact_kpis() {
        let campaign = CampaignRef {
            campaign_id: 1,
            campaign_name: "Spring".to_string(),
        };
        let render = render_campaign(&campaign, &totals(), &[sample_post()], None);
        assert_eq!(render.title, "Spring");
        assert_eq!(render.kpis[1].value, "12.3K");
        assert!(render.posts.iter().all(|p| p.delete.is_none()));
    }

    #[test]
    fn render_preserves_input_order() {
        let mut second = sample_post();
        second.post_id = 5;
        let render = render_dashboard(None, &totals(), &[], &[second, sample_post()]);
        let ids: Vec<_> = render.posts.iter().map(|p| p.post_id).collect();
        assert_eq!(ids, vec![5, 4]);
    }
}
