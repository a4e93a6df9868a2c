//! Deduplication of merged provider results.

use std::collections::HashSet;

use crate::source::Stream;

/// Deduplicate streams by `(url, title)`.
///
/// The first occurrence of each key is kept in arrival order; later
/// duplicates are dropped. This is a stable filter, not a sort.
pub fn deduplicate_streams(streams: Vec<Stream>) -> Vec<Stream> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(streams.len());
    let mut results = Vec::with_capacity(streams.len());

    for stream in streams {
        let (url, title) = stream.dedup_key();
        if seen.insert((url.to_string(), title.to_string())) {
            results.push(stream);
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(streams: &[Stream]) -> Vec<&str> {
        streams
            .iter()
            .map(|s| s.title.as_deref().unwrap_or(""))
            .collect()
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut first = Stream::new("magnet:a", "A");
        first.extra.insert("name".into(), "provider-1".into());
        let mut dup = Stream::new("magnet:a", "A");
        dup.extra.insert("name".into(), "provider-2".into());

        let results = deduplicate_streams(vec![first, Stream::new("magnet:b", "B"), dup]);

        assert_eq!(results.len(), 2);
        assert_eq!(titles(&results), vec!["A", "B"]);
        assert_eq!(results[0].extra["name"], "provider-1");
    }

    #[test]
    fn test_dedup_same_url_different_title_kept() {
        let results = deduplicate_streams(vec![
            Stream::new("magnet:a", "A 1080p"),
            Stream::new("magnet:a", "A 720p"),
        ]);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_dedup_missing_fields_compare_as_empty() {
        let no_url = Stream {
            title: Some("T".to_string()),
            ..Default::default()
        };
        let empty_url = Stream {
            url: Some(String::new()),
            title: Some("T".to_string()),
            ..Default::default()
        };
        let results = deduplicate_streams(vec![no_url, empty_url, Stream::default()]);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_dedup_preserves_order() {
        let results = deduplicate_streams(vec![
            Stream::new("u3", "C"),
            Stream::new("u1", "A"),
            Stream::new("u3", "C"),
            Stream::new("u2", "B"),
            Stream::new("u1", "A"),
        ]);
        assert_eq!(titles(&results), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let input = vec![
            Stream::new("u1", "A"),
            Stream::new("u1", "A"),
            Stream::new("u2", "B"),
            Stream::new("u1", "B"),
            Stream::new("u2", "B"),
        ];
        let once = deduplicate_streams(input);
        let twice = deduplicate_streams(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_dedup_empty() {
        assert!(deduplicate_streams(Vec::new()).is_empty());
    }
}
