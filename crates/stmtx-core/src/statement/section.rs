//! Transaction section isolation.

/// Line that opens (or re-opens, on later pages) the transaction table.
#[derive(Debug, Clone, Copy)]
pub enum StartMarker {
    /// Line contains the text.
    Contains(&'static str),
    /// Line contains every one of the texts.
    ContainsAll(&'static [&'static str]),
}

impl StartMarker {
    fn matches(&self, line: &str) -> bool {
        match self {
            StartMarker::Contains(s) => line.contains(s),
            StartMarker::ContainsAll(parts) => parts.iter().all(|p| line.contains(p)),
        }
    }
}

/// Boundaries and noise filters of a layout's transaction table.
#[derive(Debug, Clone, Copy)]
pub struct SectionMarkers {
    /// A matching line enters the section and is itself dropped.
    pub start: &'static [StartMarker],
    /// A matching line inside the section ends the scan.
    pub end: &'static [&'static str],
    /// Lines inside the section containing any of these are skipped.
    pub skip: &'static [&'static str],
}

/// Collect the candidate transaction lines of a document, in order.
///
/// Returns an empty list when no start marker is found.
pub fn extract_section<'a>(text: &'a str, markers: &SectionMarkers) -> Vec<&'a str> {
    let mut inside = false;
    let mut lines = Vec::new();

    for line in text.lines() {
        if markers.start.iter().any(|m| m.matches(line)) {
            inside = true;
            continue;
        }

        if !inside {
            continue;
        }

        if markers.end.iter().any(|m| line.contains(m)) {
            break;
        }

        if line.trim().is_empty() || markers.skip.iter().any(|m| line.contains(m)) {
            continue;
        }

        lines.push(line);
    }

    lines
}
