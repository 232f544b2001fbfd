//! Dashboard View controller.
//!
//! Owns the last fetched aggregate and `current_posts`, which is replaced
//! wholesale on every refresh and only read when re-sorting. Every successful
//! mutation is followed by a full re-fetch; responses are never patched into
//! local state.

use reeltrack_core::{
    notice::{delete_creator_prompt, DELETE_ALL_PROMPT},
    render_dashboard, sort_posts, AddPostRequest, BulkAddRequest, CampaignSummary,
    DashboardRender, Notice, PollRequest, PostRow, SortMode, Totals,
};

use crate::actions::{ActionOutcome, Confirm, DashboardControls};
use crate::api_client::{ApiClient, ClientError};

pub struct DashboardView {
    api: ApiClient,
    controls: DashboardControls,
    sort: SortMode,
    generated_at: Option<String>,
    totals: Totals,
    campaigns: Vec<CampaignSummary>,
    current_posts: Vec<PostRow>,
}

impl DashboardView {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            controls: DashboardControls::default(),
            sort: SortMode::default(),
            generated_at: None,
            totals: Totals::default(),
            campaigns: Vec::new(),
            current_posts: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn controls(&self) -> &DashboardControls {
        &self.controls
    }

    #[must_use]
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    #[cfg(test)]
    pub fn current_posts(&self) -> &[PostRow] {
        &self.current_posts
    }

    /// Fetches the global aggregate and replaces all displayed state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the fetch fails; displayed state is kept.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let data = self.api.dashboard().await?;
        self.generated_at = data.generated_at;
        self.totals = data.totals;
        self.campaigns = data.campaigns;
        self.current_posts = data.posts;
        tracing::debug!(posts = self.current_posts.len(), "dashboard refreshed");
        Ok(())
    }

    /// Re-sorts from `current_posts` without a network round trip.
    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    #[must_use]
    pub fn render(&self) -> DashboardRender {
        let posts = sort_posts(&self.current_posts, self.sort);
        render_dashboard(
            self.generated_at.as_deref(),
            &self.totals,
            &self.campaigns,
            &posts,
        )
    }

    /// Turns a mutation result into an outcome, re-fetching on success.
    async fn finish<T>(
        &mut self,
        result: Result<T, ClientError>,
        describe: impl FnOnce(&T) -> Notice,
    ) -> ActionOutcome {
        match result {
            Ok(response) => {
                let notice = describe(&response);
                if let Err(e) = self.refresh().await {
                    tracing::warn!(error = %e, "re-fetch after action failed; showing previous data");
                }
                ActionOutcome::Completed(notice)
            }
            Err(e) => {
                tracing::debug!(error = %e, "dashboard action failed");
                ActionOutcome::Failed(Notice::error(e.user_message()))
            }
        }
    }

    pub async fn add_post(&mut self, request: AddPostRequest) -> ActionOutcome {
        let Some(_guard) = self.controls.add_post.try_acquire() else {
            return ActionOutcome::Busy;
        };
        let result = self.api.add_post(&request).await;
        let handle = request.creator_handle.trim().trim_start_matches('@').to_string();
        let campaign = request.campaign_name.trim().to_string();
        self.finish(result, |_| Notice::post_added(&handle, &campaign))
            .await
    }

    /// Partial success comes back as a warning-level notice, never a failure.
    pub async fn bulk_add(&mut self, campaign_name: &str, rows: &str) -> ActionOutcome {
        let Some(_guard) = self.controls.bulk_add.try_acquire() else {
            return ActionOutcome::Busy;
        };
        let request = BulkAddRequest {
            campaign_name: campaign_name.to_string(),
            rows: rows.to_string(),
        };
        let result = self.api.bulk_add(&request).await;
        self.finish(result, Notice::bulk_added).await
    }

    pub async fn delete_all(&mut self, confirm: &mut dyn Confirm) -> ActionOutcome {
        let Some(_guard) = self.controls.delete_all.try_acquire() else {
            return ActionOutcome::Busy;
        };
        if !confirm.confirm(DELETE_ALL_PROMPT) {
            return ActionOutcome::Cancelled;
        }
        let result = self.api.delete_all().await;
        self.finish(result, Notice::all_data_deleted).await
    }

    /// Deletes a creator everywhere. `creator_handle` only labels the prompt.
    pub async fn delete_creator(
        &mut self,
        creator_id: i64,
        creator_handle: &str,
        confirm: &mut dyn Confirm,
    ) -> ActionOutcome {
        let Some(_guard) = self.controls.delete_creator.try_acquire() else {
            return ActionOutcome::Busy;
        };
        if !confirm.confirm(&delete_creator_prompt(creator_handle)) {
            return ActionOutcome::Cancelled;
        }
        let result = self.api.delete_creator(creator_id).await;
        self.finish(result, Notice::creator_deleted).await
    }

    pub async fn poll_now(&mut self, post_id: Option<i64>) -> ActionOutcome {
        let Some(_guard) = self.controls.poll_now.try_acquire() else {
            return ActionOutcome::Busy;
        };
        let result = self.api.poll_now(&PollRequest { post_id }).await;
        self.finish(result, Notice::polled).await
    }

    /// Handle shown for `creator_id` in the current rows, if any.
    #[must_use]
    pub fn creator_handle(&self, creator_id: i64) -> Option<&str> {
        self.current_posts
            .iter()
            .find(|p| p.creator_id == creator_id)
            .map(|p| p.creator_handle.as_str())
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
