//! Presentation boundary: which asset to play, and what to do when it fails.

use mascot_core::catalog::AssetRef;
use mascot_core::emotion::Emotion;

use crate::runtime::MascotHandle;

/// Resolves the mascot's emotion to an animation asset.
pub struct Stage {
    mascot: MascotHandle,
}

impl Stage {
    /// Create a stage for `mascot`.
    #[must_use]
    pub fn new(mascot: MascotHandle) -> Self {
        Self { mascot }
    }

    /// Asset for `emotion`.
    #[must_use]
    pub fn asset_for(&self, emotion: Emotion) -> &AssetRef {
        self.mascot.catalog().asset(emotion)
    }

    /// Asset for a raw identifier; unknown identifiers play the `idle` asset.
    #[must_use]
    pub fn asset_for_id(&self, id: &str) -> &AssetRef {
        self.mascot.catalog().asset_of(id)
    }

    /// Asset for the emotion currently displayed.
    #[must_use]
    pub fn current_asset(&self) -> &AssetRef {
        self.asset_for(self.mascot.current())
    }

    /// Called by the renderer when `asset` cannot be loaded.
    pub fn on_load_error(&self, asset: &AssetRef) {
        self.mascot.report_asset_failure(asset);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mascot_core::catalog::EmotionCatalog;
    use mascot_core::config::MascotConfig;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn resolves_assets_and_recovers_from_load_errors() {
        let mascot = MascotHandle::spawn(&MascotConfig::default(), Arc::new(EmotionCatalog::default()));
        let stage = Stage::new(mascot.clone());

        assert_eq!(stage.current_asset().as_str(), "Animation/hellow.lottie");
        assert_eq!(stage.asset_for(Emotion::Star).as_str(), "Animation/star.lottie");
        assert_eq!(stage.asset_for_id("moonwalk"), stage.asset_for(Emotion::Idle));

        mascot.request_emotion(Emotion::Star, None);
        mascot.snapshot().await.expect("running");
        assert_eq!(stage.current_asset().as_str(), "Animation/star.lottie");

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        stage.on_load_error(&AssetRef("Animation/star.lottie".into()));
        assert_eq!(mascot.snapshot().await.expect("running").displayed, Emotion::Idle);
    }
}
