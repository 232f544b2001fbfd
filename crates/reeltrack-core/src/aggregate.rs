//! Server-side roll-up of post rows into totals and per-group summaries.
//!
//! Unknown metrics count as zero here and only here. Clients display the
//! totals they are given and never re-derive them.

use std::collections::HashMap;

use crate::model::{CampaignSummary, CreatorSummary, PostRow, Totals};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rollup {
    pub totals: Totals,
    /// Ordered by case-folded campaign name.
    pub campaigns: Vec<CampaignSummary>,
    /// Ordered by case-folded creator handle.
    pub creators: Vec<CreatorSummary>,
}

#[derive(Default)]
struct Counts {
    posts: i64,
    views: i64,
    likes: i64,
    comments: i64,
}

impl Counts {
    fn add(&mut self, row: &PostRow) {
        self.posts += 1;
        self.views = self.views.saturating_add(row.views.unwrap_or(0));
        self.likes = self.likes.saturating_add(row.likes.unwrap_or(0));
        self.comments = self.comments.saturating_add(row.comments.unwrap_or(0));
    }
}

/// Rolls `rows` up into global totals, campaign summaries and creator summaries.
///
/// Rows without a campaign (campaign-scoped rows) still count toward totals
/// and creators.
#[must_use]
pub fn rollup(rows: &[PostRow]) -> Rollup {
    let mut totals = Counts::default();
    let mut campaigns: HashMap<i64, (String, Counts)> = HashMap::new();
    let mut creators: HashMap<i64, (String, String, Counts)> = HashMap::new();

    for row in rows {
        totals.add(row);

        if let (Some(id), Some(name)) = (row.campaign_id, row.campaign_name.as_ref()) {
            campaigns
                .entry(id)
                .or_insert_with(|| (name.clone(), Counts::default()))
                .1
                .add(row);
        }

        let display = row
            .creator_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| row.creator_handle.clone());
        creators
            .entry(row.creator_id)
            .or_insert_with(|| (row.creator_handle.clone(), display, Counts::default()))
            .2
            .add(row);
    }

    let mut campaigns: Vec<CampaignSummary> = campaigns
        .into_iter()
        .map(|(campaign_id, (campaign_name, c))| CampaignSummary {
            campaign_id,
            campaign_name,
            posts: c.posts,
            views: c.views,
            likes: c.likes,
            comments: c.comments,
        })
        .collect();
    campaigns.sort_by(|a, b| {
        a.campaign_name
            .to_lowercase()
            .cmp(&b.campaign_name.to_lowercase())
            .then(a.campaign_id.cmp(&b.campaign_id))
    });

    let mut creators: Vec<CreatorSummary> = creators
        .into_iter()
        .map(|(creator_id, (creator_handle, creator_name, c))| CreatorSummary {
            creator_id,
            creator_handle,
            creator_name,
            posts: c.posts,
            views: c.views,
            likes: c.likes,
            comments: c.comments,
        })
        .collect();
    creators.sort_by(|a, b| {
        a.creator_handle
            .to_lowercase()
            .cmp(&b.creator_handle.to_lowercase())
            .then(a.creator_id.cmp(&b.creator_id))
    });

    Rollup {
        totals: Totals {
            posts: totals.posts,
            views: totals.views,
            likes: totals.likes,
            comments: totals.comments,
        },
        campaigns,
        creators,
    }
}
