//! Content type and identifier parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing content types and ids.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("content id is empty")]
    EmptyId,
}

/// The kind of media a request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    /// Wire name used in provider paths and the cache `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "series",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentType::Movie),
            "series" => Ok(ContentType::Series),
            other => Err(ContentError::UnsupportedType(other.to_string())),
        }
    }
}

/// Season/episode coordinates of an episodic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeRef {
    pub season: u32,
    pub episode: u32,
}

/// A parsed content identifier.
///
/// Parsing is purely syntactic. An id is episodic only when it has exactly
/// three `:`-separated segments and the last two are non-negative integers;
/// anything else keeps its raw form and is treated as a single title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId {
    raw: String,
    title_len: usize,
    episode: Option<EpisodeRef>,
}

impl ContentId {
    /// Parse a raw id as received from the transport.
    pub fn parse(raw: &str) -> Result<Self, ContentError> {
        if raw.is_empty() {
            return Err(ContentError::EmptyId);
        }

        let title_len = raw.find(':').unwrap_or(raw.len());
        let parts: Vec<&str> = raw.split(':').collect();
        let episode = match parts.as_slice() {
            [_, season, episode] => match (season.parse::<u32>(), episode.parse::<u32>()) {
                (Ok(season), Ok(episode)) => Some(EpisodeRef { season, episode }),
                _ => None,
            },
            _ => None,
        };

        Ok(Self {
            raw: raw.to_string(),
            title_len,
            episode,
        })
    }

    /// Build an episodic id from its parts.
    pub fn episode(title_id: &str, season: u32, episode: u32) -> Self {
        Self {
            raw: format!("{}:{}:{}", title_id, season, episode),
            title_len: title_id.len(),
            episode: Some(EpisodeRef { season, episode }),
        }
    }

    /// The full id, exactly as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Title-level part of the id (everything before the first `:`).
    pub fn title_id(&self) -> &str {
        &self.raw[..self.title_len]
    }

    /// Season/episode coordinates, if the id is episodic.
    pub fn episode_ref(&self) -> Option<EpisodeRef> {
        self.episode
    }

    pub fn is_episodic(&self) -> bool {
        self.episode.is_some()
    }

    /// The following episode of the same season (`t:s:e+1`).
    pub fn next_episode(&self) -> Option<ContentId> {
        let ep = self.episode?;
        let next = ep.episode.checked_add(1)?;
        Some(Self::episode(self.title_id(), ep.season, next))
    }

    /// The first episode of the following season (`t:s+1:1`).
    pub fn next_season(&self) -> Option<ContentId> {
        let ep = self.episode?;
        let next = ep.season.checked_add(1)?;
        Some(Self::episode(self.title_id(), next, 1))
    }

    /// Ids to prefetch alongside this one: next episode then next season.
    /// Empty for non-episodic ids.
    pub fn adjacent(&self) -> Vec<ContentId> {
        self.next_episode()
            .into_iter()
            .chain(self.next_season())
            .collect()
    }

    /// This id followed by its adjacent ids, in fetch order.
    pub fn with_adjacent(&self) -> Vec<ContentId> {
        let mut ids = vec![self.clone()];
        ids.extend(self.adjacent());
        ids
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ContentId {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
