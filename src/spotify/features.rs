use crate::{error::SpotifyError, spotify::SpotifyClient, types::AudioFeaturesResponse, utils};

/// Ids per audio-features request (Spotify maximum).
pub const AUDIO_FEATURES_BATCH_SIZE: usize = 100;

/// Url-encoded comma used to join ids in the `ids` query parameter.
const ID_DELIMITER: &str = "%2C";

impl SpotifyClient {
    /// Fetches the danceability of every id, in request order.
    ///
    /// The ids are split into consecutive windows of at most 100 and each
    /// window becomes one `/audio-features` request, issued sequentially.
    /// The input slice is left untouched. Ids Spotify has no analysis for
    /// come back as `null` and are skipped, so the result may be shorter
    /// than `ids`.
    ///
    /// # Errors
    ///
    /// The first failed batch aborts the whole fetch; values from earlier
    /// batches are discarded.
    pub async fn danceabilities(
        &self,
        ids: &[String],
        token: &str,
    ) -> Result<Vec<f64>, SpotifyError> {
        let mut values = Vec::with_capacity(ids.len());

        for (n, batch) in ids.chunks(AUDIO_FEATURES_BATCH_SIZE).enumerate() {
            let url = format!(
                "{uri}/audio-features?ids={ids}",
                uri = self.config.api_url,
                ids = batch.join(ID_DELIMITER)
            );

            let res: AudioFeaturesResponse = self.get_json(&url, token).await?;
            tracing::debug!(
                batch = n + 1,
                requested = batch.len(),
                returned = res.audio_features.len(),
                "fetched audio features"
            );

            values.extend(
                res.audio_features
                    .into_iter()
                    .flatten()
                    .map(|f| f.danceability),
            );
        }

        Ok(values)
    }

    /// Mean danceability over `ids` together with the number of values
    /// averaged. The mean is `None` when there is nothing to average, which
    /// includes an empty library.
    pub async fn average_danceability(
        &self,
        ids: &[String],
        token: &str,
    ) -> Result<(Option<f64>, usize), SpotifyError> {
        let values = self.danceabilities(ids, token).await?;
        Ok((utils::mean(&values), values.len()))
    }
}
