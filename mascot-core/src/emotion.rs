//! The closed set of mascot emotion identifiers.
//!
//! Identifiers travel as kebab-case strings (they double as animation file
//! stems and as the names an LLM is told to choose from), but inside the crate
//! they are an enum so an unrecognized name can never reach controller state.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::warn;

/// One mascot animation state.
///
/// Spelling follows the animation asset names, typos included, because the
/// string form is a wire contract with the chat model and the asset store.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    IntoStaticStr,
    EnumIter,
    EnumCount,
)]
#[strum(ascii_case_insensitive)]
pub enum Emotion {
    /// Resting state and universal fallback.
    #[default]
    #[strum(serialize = "idle")]
    Idle,
    /// Waiting loop.
    #[strum(serialize = "wait-time-loop")]
    WaitTimeLoop,
    /// Dozing off.
    #[strum(serialize = "sleeping")]
    Sleeping,
    /// Sipping coffee.
    #[strum(serialize = "coffee-mug")]
    CoffeeMug,
    /// Strolling with a snail.
    #[strum(serialize = "cool-walk-with-snel")]
    CoolWalkWithSnel,
    /// Waving hello; the greeting state.
    #[strum(serialize = "hellow")]
    Hellow,
    /// Watching the user.
    #[strum(serialize = "eyes-on-you")]
    EyesOnYou,
    /// Hiding from questions.
    #[strum(serialize = "hide-quetions")]
    HideQuetions,
    /// Thinking.
    #[strum(serialize = "brainstorm")]
    Brainstorm,
    /// Overloaded with work.
    #[strum(serialize = "work-burdon")]
    WorkBurdon,
    /// Straining with effort.
    #[strum(serialize = "effords-put-pant")]
    EffordsPutPant,
    /// Laughing.
    #[strum(serialize = "laughing")]
    Laughing,
    /// Crying.
    #[strum(serialize = "cry")]
    Cry,
    /// Heart eyes.
    #[strum(serialize = "love")]
    Love,
    /// Overflowing hearts.
    #[strum(serialize = "fulllove")]
    Fulllove,
    /// Shocked.
    #[strum(serialize = "socked")]
    Socked,
    /// Scared by a rocket.
    #[strum(serialize = "rocket-scare")]
    RocketScare,
    /// Halo.
    #[strum(serialize = "angel")]
    Angel,
    /// Mischief.
    #[strum(serialize = "demon-inside")]
    DemonInside,
    /// Refusing.
    #[strum(serialize = "no-no")]
    NoNo,
    /// Task complete.
    #[strum(serialize = "okay-done")]
    OkayDone,
    /// Something went badly.
    #[strum(serialize = "shit")]
    Shit,
    /// Star-struck.
    #[strum(serialize = "star")]
    Star,
    /// Birthday celebration.
    #[strum(serialize = "100thbirthday")]
    HundredthBirthday,
    /// Eating.
    #[strum(serialize = "eating")]
    Eating,
    /// Stuffed after eating.
    #[strum(serialize = "full-stomach")]
    FullStomach,
    /// Taking a bath.
    #[strum(serialize = "bathing")]
    Bathing,
    /// Checklist ticked off.
    #[strum(serialize = "list-checked")]
    ListChecked,
    /// Confused.
    #[strum(serialize = "quetionmark")]
    Quetionmark,
    /// Attacking angrily.
    #[strum(serialize = "angry-attack")]
    AngryAttack,
    /// Rude gesture.
    #[strum(serialize = "middle-finger-angry")]
    MiddleFingerAngry,
    /// Rain cloud overhead.
    #[strum(serialize = "raining")]
    Raining,
}

impl Emotion {
    /// Canonical kebab-case identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Parse an identifier, returning `None` if it is not in the catalog.
    ///
    /// Matching ignores ASCII case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    /// Parse an identifier, degrading anything unrecognized to [`Emotion::Idle`].
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|| {
            warn!(id = raw, "Unrecognized emotion identifier, falling back to idle");
            Self::Idle
        })
    }

    /// Every emotion in the catalog.
    pub fn all() -> impl Iterator<Item = Emotion> {
        Self::iter()
    }
}

impl Serialize for Emotion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Emotion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown emotion identifier {raw:?}")))
    }
}
