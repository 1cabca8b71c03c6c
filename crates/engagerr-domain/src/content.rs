//! Content module - published items on external platforms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// External platform a content item was published on
///
/// Values the backend adds later decode to [`PlatformType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformType {
    /// YouTube channel
    #[serde(rename = "YOUTUBE")]
    YouTube,
    /// Instagram account
    #[serde(rename = "INSTAGRAM")]
    Instagram,
    /// TikTok account
    #[serde(rename = "TIKTOK")]
    TikTok,
    /// Twitter / X account
    #[serde(rename = "TWITTER")]
    Twitter,
    /// LinkedIn profile or page
    #[serde(rename = "LINKEDIN")]
    LinkedIn,
    /// Facebook page
    #[serde(rename = "FACEBOOK")]
    Facebook,
    /// Twitch channel
    #[serde(rename = "TWITCH")]
    Twitch,
    /// Podcast feed
    #[serde(rename = "PODCAST")]
    Podcast,
    /// Blog or newsletter
    #[serde(rename = "BLOG")]
    Blog,
    /// Anything else
    #[serde(rename = "OTHER")]
    #[serde(other)]
    Other,
}

impl PlatformType {
    /// All known platforms, in display order
    pub const ALL: [PlatformType; 10] = [
        PlatformType::YouTube,
        PlatformType::Instagram,
        PlatformType::TikTok,
        PlatformType::Twitter,
        PlatformType::LinkedIn,
        PlatformType::Facebook,
        PlatformType::Twitch,
        PlatformType::Podcast,
        PlatformType::Blog,
        PlatformType::Other,
    ];

    /// Wire name of the platform (e.g. `YOUTUBE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::YouTube => "YOUTUBE",
            PlatformType::Instagram => "INSTAGRAM",
            PlatformType::TikTok => "TIKTOK",
            PlatformType::Twitter => "TWITTER",
            PlatformType::LinkedIn => "LINKEDIN",
            PlatformType::Facebook => "FACEBOOK",
            PlatformType::Twitch => "TWITCH",
            PlatformType::Podcast => "PODCAST",
            PlatformType::Blog => "BLOG",
            PlatformType::Other => "OTHER",
        }
    }

    /// Parse a platform from its wire name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.to_ascii_uppercase();
        Self::ALL.into_iter().find(|p| p.as_str() == upper)
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    /// Long-form video
    Video,
    /// Short-form video
    Short,
    /// Feed post
    Post,
    /// Ephemeral story
    Story,
    /// Instagram/Facebook reel
    Reel,
    /// Tweet
    Tweet,
    /// Written article
    Article,
    /// Podcast episode
    PodcastEpisode,
    /// Live stream or VOD of one
    Livestream,
    /// Anything else
    #[serde(other)]
    Other,
}

impl ContentType {
    /// Wire name of the content type
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "VIDEO",
            ContentType::Short => "SHORT",
            ContentType::Post => "POST",
            ContentType::Story => "STORY",
            ContentType::Reel => "REEL",
            ContentType::Tweet => "TWEET",
            ContentType::Article => "ARTICLE",
            ContentType::PodcastEpisode => "PODCAST_EPISODE",
            ContentType::Livestream => "LIVESTREAM",
            ContentType::Other => "OTHER",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single piece of published material on one external platform
///
/// Content is created when a creator registers a platform item and is never
/// deleted by relationship operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Unique identifier
    pub id: String,

    /// Display title
    pub title: String,

    /// Platform the item lives on
    pub platform: PlatformType,

    /// Kind of item
    pub content_type: ContentType,

    /// Public URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Identifier on the external platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// When the item was published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    /// Owning creator
    pub creator_id: String,

    /// Lifetime views reported by the platform
    #[serde(default)]
    pub views: u64,

    /// Likes, comments, shares and saves combined
    #[serde(default)]
    pub engagements: u64,

    /// Estimated monetary value in USD
    #[serde(default)]
    pub estimated_value: f64,
}

impl Content {
    /// Create a content item with zeroed metrics
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        platform: PlatformType,
        content_type: ContentType,
        creator_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            platform,
            content_type,
            url: None,
            external_id: None,
            published_at: None,
            creator_id: creator_id.into(),
            views: 0,
            engagements: 0,
            estimated_value: 0.0,
        }
    }
}
