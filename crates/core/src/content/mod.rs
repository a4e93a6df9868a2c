//! Content identifiers for the add-on protocol.
//!
//! A content id is either a bare title id (`tt0111161`) for movies or a
//! `title:season:episode` triple for series episodes. The title id is the
//! grouping key shared by every episode of a series; it drives both the
//! request frequency log and movie-wide cache eviction.

mod types;

pub use types::*;
