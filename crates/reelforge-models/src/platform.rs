//! Platform output profiles.
//!
//! The profile table is an immutable structure constructed once at startup
//! and shared by reference; resolution always succeeds by falling back to
//! the default portrait profile.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default target resolution for unknown platforms.
pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1920;

/// Named output configuration for a distribution platform.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlatformProfile {
    pub width: u32,
    pub height: u32,

    /// Suggested call-to-action line for the platform
    #[serde(rename = "defaultCta")]
    pub default_cta: String,

    /// Suggested hashtags for the platform
    #[serde(rename = "suggestedTags")]
    pub suggested_tags: Vec<String>,
}

impl PlatformProfile {
    fn new(width: u32, height: u32, cta: &str, tags: &[&str]) -> Self {
        Self {
            width,
            height,
            default_cta: cta.to_string(),
            suggested_tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, "", &[])
    }
}

/// Immutable platform profile table.
#[derive(Debug, Clone)]
pub struct PlatformProfiles {
    profiles: BTreeMap<String, PlatformProfile>,
    fallback: PlatformProfile,
}

impl PlatformProfiles {
    /// The built-in platform table.
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "YouTube".to_string(),
            PlatformProfile::new(1080, 1920, "Like and Subscribe!", &[
                "#youtube",
                "#subscribe",
                "#viral",
            ]),
        );
        profiles.insert(
            "YouTube Standard".to_string(),
            PlatformProfile::new(1920, 1080, "Like and Subscribe!", &[
                "#youtube",
                "#subscribe",
                "#viral",
            ]),
        );
        profiles.insert(
            "TikTok".to_string(),
            PlatformProfile::new(1080, 1920, "Follow for more!", &["#fyp", "#viral", "#foryou"]),
        );
        profiles.insert(
            "Instagram".to_string(),
            PlatformProfile::new(1080, 1920, "Link in bio!", &[
                "#reels",
                "#instagram",
                "#viral",
            ]),
        );

        Self {
            profiles,
            fallback: PlatformProfile::default(),
        }
    }

    /// Look up a platform profile. Unknown names resolve to the default
    /// 1080x1920 profile; there is no error path.
    pub fn resolve(&self, platform: &str) -> &PlatformProfile {
        self.profiles.get(platform).unwrap_or(&self.fallback)
    }

    /// Suggested caption text for a platform (empty for unknown platforms).
    pub fn suggested_caption(&self, platform: &str) -> &'static str {
        match platform {
            "YouTube" | "YouTube Standard" => {
                "Don't forget to like and subscribe!\n#youtube #content"
            }
            "TikTok" => "Follow for more!\n#fyp #viral #content",
            "Instagram" => "Link in bio!\n#reels #instagram #content",
            _ => "",
        }
    }

    /// Iterate over the known platform names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}
