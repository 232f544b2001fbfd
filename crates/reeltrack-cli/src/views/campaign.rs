//! Campaign View controller. Read-only: it fetches one campaign's aggregate
//! and re-sorts locally.

use reeltrack_core::{
    render_campaign, sort_posts, CampaignRef, CampaignRender, PostRow, SortMode, Totals,
};

use crate::api_client::{ApiClient, ClientError};

pub struct CampaignView {
    api: ApiClient,
    campaign_id: i64,
    sort: SortMode,
    generated_at: Option<String>,
    campaign: Option<CampaignRef>,
    totals: Totals,
    current_posts: Vec<PostRow>,
}

impl CampaignView {
    #[must_use]
    pub fn new(api: ApiClient, campaign_id: i64) -> Self {
        Self {
            api,
            campaign_id,
            sort: SortMode::default(),
            generated_at: None,
            campaign: None,
            totals: Totals::default(),
            current_posts: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn current_posts(&self) -> &[PostRow] {
        &self.current_posts
    }

    /// # Errors
    ///
    /// Returns [`ClientError`] if the fetch fails; displayed state is kept.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let data = self.api.campaign_dashboard(self.campaign_id).await?;
        self.generated_at = data.generated_at;
        self.campaign = Some(data.campaign);
        self.totals = data.totals;
        self.current_posts = data.posts;
        Ok(())
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    /// `None` until the first successful refresh.
    #[must_use]
    pub fn render(&self) -> Option<CampaignRender> {
        let campaign = self.campaign.as_ref()?;
        let posts = sort_posts(&self.current_posts, self.sort);
        Some(render_campaign(
            campaign,
            &self.totals,
            &posts,
            self.generated_at.as_deref(),
        ))
    }
}
