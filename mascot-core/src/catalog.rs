//! Emotion catalog — priority tiers and animation assets.
//!
//! A static, read-only table built once at startup. Priorities decide whether
//! a requested emotion preempts the one on screen; assets tell the
//! presentation surface what to play. `idle` is always tier 0 and its asset is
//! the universal fallback for anything unrecognized.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::config::CatalogConfig;
use crate::emotion::Emotion;

/// Priority tier. Higher numbers override lower ones; ties do not preempt.
pub type Priority = u8;

/// The tier every unrecognized identifier is coerced to.
pub const FALLBACK_PRIORITY: Priority = 0;

/// Built-in priority tier for an emotion.
#[must_use]
pub const fn default_priority(emotion: Emotion) -> Priority {
    use Emotion as E;
    match emotion {
        E::Idle => 0,
        E::WaitTimeLoop
        | E::Sleeping
        | E::CoffeeMug
        | E::CoolWalkWithSnel
        | E::Hellow
        | E::EyesOnYou
        | E::HideQuetions => 1,
        E::Brainstorm => 2,
        E::WorkBurdon | E::EffordsPutPant => 3,
        E::Laughing
        | E::Cry
        | E::Love
        | E::Fulllove
        | E::Socked
        | E::RocketScare
        | E::Angel
        | E::DemonInside
        | E::NoNo
        | E::OkayDone
        | E::Shit => 4,
        E::Star
        | E::HundredthBirthday
        | E::Eating
        | E::FullStomach
        | E::Bathing
        | E::ListChecked => 5,
        E::Quetionmark | E::AngryAttack | E::MiddleFingerAngry | E::Raining => 6,
    }
}

/// Opaque reference to an animation asset, as understood by the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AssetRef(pub String);

impl AssetRef {
    /// The reference as a path-like string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One catalog row.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    /// The emotion this row describes.
    pub emotion: Emotion,
    /// Priority tier.
    pub priority: Priority,
    /// Animation asset to display.
    pub asset: AssetRef,
}

/// Immutable lookup table from emotion to priority and asset.
#[derive(Debug, Clone)]
pub struct EmotionCatalog {
    entries: HashMap<Emotion, CatalogEntry>,
    fallback: AssetRef,
}

impl EmotionCatalog {
    /// Build the catalog, resolving assets under the configured base path.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let base = config.asset_base.trim_end_matches('/');
        let asset_for = |emotion: Emotion| {
            // The resting state reuses the greeting animation.
            let stem = match emotion {
                Emotion::Idle => Emotion::Hellow.as_str(),
                other => other.as_str(),
            };
            if base.is_empty() {
                AssetRef(format!("{stem}.{}", config.asset_extension))
            } else {
                AssetRef(format!("{base}/{stem}.{}", config.asset_extension))
            }
        };

        let entries: HashMap<Emotion, CatalogEntry> = Emotion::all()
            .map(|emotion| {
                (
                    emotion,
                    CatalogEntry {
                        emotion,
                        priority: default_priority(emotion),
                        asset: asset_for(emotion),
                    },
                )
            })
            .collect();

        let fallback = asset_for(Emotion::Idle);
        Self { entries, fallback }
    }

    /// Priority of a catalog emotion.
    #[must_use]
    pub fn priority(&self, emotion: Emotion) -> Priority {
        self.entries
            .get(&emotion)
            .map_or(FALLBACK_PRIORITY, |entry| entry.priority)
    }

    /// Priority of an arbitrary identifier; unknown identifiers sit in the `idle` tier.
    #[must_use]
    pub fn priority_of(&self, id: &str) -> Priority {
        Emotion::parse(id).map_or(FALLBACK_PRIORITY, |emotion| self.priority(emotion))
    }

    /// Asset for a catalog emotion.
    #[must_use]
    pub fn asset(&self, emotion: Emotion) -> &AssetRef {
        self.entries
            .get(&emotion)
            .map_or(&self.fallback, |entry| &entry.asset)
    }

    /// Asset for an arbitrary identifier; unknown identifiers get the `idle` asset.
    #[must_use]
    pub fn asset_of(&self, id: &str) -> &AssetRef {
        Emotion::parse(id).map_or(&self.fallback, |emotion| self.asset(emotion))
    }

    /// Whether `id` names a catalog emotion.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        Emotion::parse(id).is_some_and(|emotion| self.entries.contains_key(&emotion))
    }

    /// All entries, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        Emotion::all().filter_map(|emotion| self.entries.get(&emotion))
    }

    /// Identifiers a chat model may choose from. `idle` is reserved for the controller.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries()
            .filter(|entry| entry.emotion != Emotion::Idle)
            .map(|entry| entry.emotion.as_str())
            .collect()
    }

    /// Number of emotions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty (never true for a built catalog).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EmotionCatalog {
    fn default() -> Self {
        Self::new(&CatalogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_lowest_tier() {
        let catalog = EmotionCatalog::default();
        assert_eq!(catalog.priority(Emotion::Idle), 0);
        for entry in catalog.entries() {
            assert!(entry.priority >= catalog.priority(Emotion::Idle));
        }
    }

    #[test]
    fn priority_table_matches_tiers() {
        let catalog = EmotionCatalog::default();
        assert_eq!(catalog.priority_of("hellow"), 1);
        assert_eq!(catalog.priority_of("brainstorm"), 2);
        assert_eq!(catalog.priority_of("work-burdon"), 3);
        assert_eq!(catalog.priority_of("love"), 4);
        assert_eq!(catalog.priority_of("okay-done"), 4);
        assert_eq!(catalog.priority_of("list-checked"), 5);
        assert_eq!(catalog.priority_of("raining"), 6);
    }

    #[test]
    fn unknown_ids_get_idle_tier_and_asset() {
        let catalog = EmotionCatalog::default();
        assert_eq!(catalog.priority_of("moonwalk"), FALLBACK_PRIORITY);
        assert_eq!(catalog.asset_of("moonwalk"), catalog.asset(Emotion::Idle));
        assert!(!catalog.contains("moonwalk"));
        assert!(catalog.contains("cry"));
    }

    #[test]
    fn assets_follow_base_path() {
        let catalog = EmotionCatalog::default();
        assert_eq!(catalog.asset(Emotion::Cry).as_str(), "Animation/cry.lottie");
        // idle shares the greeting animation
        assert_eq!(catalog.asset(Emotion::Idle).as_str(), "Animation/hellow.lottie");

        let bare = EmotionCatalog::new(&CatalogConfig {
            asset_base: String::new(),
            ..CatalogConfig::default()
        });
        assert_eq!(bare.asset(Emotion::Star).as_str(), "star.lottie");
    }

    #[test]
    fn names_exclude_idle() {
        let catalog = EmotionCatalog::default();
        let names = catalog.names();
        assert_eq!(names.len(), catalog.len() - 1);
        assert!(!names.contains(&"idle"));
        assert!(names.contains(&"100thbirthday"));
    }
}
