pub mod auth;
pub mod client;
pub mod types;

/// Accept a bare playlist ID, a `spotify:playlist:<id>` URI or an
/// `open.spotify.com/playlist/<id>` link and return the bare ID.
pub fn parse_playlist_id(input: &str) -> String {
    let input = input.trim();

    if let Some(id) = input.strip_prefix("spotify:playlist:") {
        return id.to_string();
    }

    if let Ok(url) = url::Url::parse(input) {
        let mut segments = url.path_segments().into_iter().flatten();
        while let Some(segment) = segments.next() {
            if segment == "playlist" {
                if let Some(id) = segments.next() {
                    return id.to_string();
                }
            }
        }
    }

    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_id() {
        assert_eq!(parse_playlist_id("37i9dQZF1DXcBWIGoYBM5M"), "37i9dQZF1DXcBWIGoYBM5M");
        assert_eq!(parse_playlist_id("  abc  "), "abc");
    }

    #[test]
    fn test_parse_uri() {
        assert_eq!(parse_playlist_id("spotify:playlist:abc123"), "abc123");
    }

    #[test]
    fn test_parse_link() {
        assert_eq!(
            parse_playlist_id("https://open.spotify.com/playlist/abc123?si=xyz"),
            "abc123"
        );
        assert_eq!(
            parse_playlist_id("https://open.spotify.com/intl-de/playlist/abc123"),
            "abc123"
        );
    }
}
