use regex::Regex;
use std::sync::LazyLock;

/// Format string handed to `git for-each-ref` so `parse_tracking_refs` can split it
pub const TRACKING_FORMAT: &str = "--format=%(refname:short)|%(upstream:short)|%(upstream:track)";

static AHEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ahead (\d+)\s*[\],]").expect("valid ahead regex"));
static BEHIND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"behind (\d+)\s*\]").expect("valid behind regex"));

/// Commit counts from a `%(upstream:track)` annotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackDelta {
    pub ahead: usize,
    pub behind: usize,
}

/// One local branch from `for-each-ref`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRef {
    pub name: String,
    pub upstream: Option<String>,
    pub delta: TrackDelta,
}

/// Parse `[ahead N, behind M]`, `[ahead N]`, `[behind M]`
///
/// Each count must be followed by `]` or `,` (a behind count by `]`), which
/// is how `%(upstream:track)` always prints them. Anything else, including
/// `[gone]`, the empty string, `ahead 4` with no bracket, or doubled spaces,
/// counts as zero.
pub fn parse_track_annotation(annotation: &str) -> TrackDelta {
    TrackDelta {
        ahead: capture_count(&AHEAD_RE, annotation),
        behind: capture_count(&BEHIND_RE, annotation),
    }
}

fn capture_count(re: &Regex, text: &str) -> usize {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Parse `for-each-ref` output produced with `TRACKING_FORMAT`
pub fn parse_tracking_refs(output: &str) -> Vec<TrackingRef> {
    let mut refs = Vec::new();

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }

        // Format: name|upstream|track, upstream and track may be empty
        let mut parts = line.splitn(3, '|');
        let (Some(name), Some(upstream)) = (parts.next(), parts.next()) else {
            continue;
        };
        let track = parts.next().unwrap_or("");

        refs.push(TrackingRef {
            name: name.to_string(),
            upstream: (!upstream.is_empty()).then(|| upstream.to_string()),
            delta: parse_track_annotation(track),
        });
    }

    refs
}
