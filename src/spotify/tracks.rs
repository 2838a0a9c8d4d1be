use crate::{error::SpotifyError, spotify::SpotifyClient, types::SavedTracksPage};

/// Items requested per saved-tracks page (Spotify maximum).
pub const SAVED_TRACKS_PAGE_SIZE: u32 = 50;

impl SpotifyClient {
    /// Collects the ids of every track in the user's library.
    ///
    /// Starts at `/me/tracks?limit=50` and follows the `next` link of each
    /// page until Spotify returns `null`. Pages are fetched one after another
    /// and ids keep page order, then item order. Duplicates are kept. Items
    /// without a track id (local files) are skipped.
    ///
    /// # Arguments
    ///
    /// * `token` - Access token with the `user-library-read` scope
    ///
    /// # Errors
    ///
    /// Any failed page aborts the listing; ids collected so far are dropped.
    /// If the cursor has not ended after `max_pages` pages the listing fails
    /// with [`SpotifyError::PageLimit`].
    ///
    /// # Example
    ///
    /// ```
    /// let ids = client.saved_track_ids(&token.access_token).await?;
    /// println!("{} saved tracks", ids.len());
    /// ```
    pub async fn saved_track_ids(&self, token: &str) -> Result<Vec<String>, SpotifyError> {
        let max_pages = self.config.max_pages;
        let mut ids = Vec::new();
        let mut next = Some(format!(
            "{uri}/me/tracks?limit={limit}",
            uri = self.config.api_url,
            limit = SAVED_TRACKS_PAGE_SIZE
        ));
        let mut pages = 0;

        while let Some(url) = next {
            if pages == max_pages {
                return Err(SpotifyError::PageLimit { max_pages });
            }

            let page: SavedTracksPage = self.get_json(&url, token).await?;
            pages += 1;

            tracing::debug!(
                page = pages,
                items = page.items.len(),
                total = ?page.total,
                "fetched saved tracks page"
            );
            ids.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.track.and_then(|track| track.id)),
            );
            next = page.next;
        }

        Ok(ids)
    }
}
