use formats::Record;
use url::Url;

pub const UNKNOWN_CATEGORY: &str = "Unknown Category";
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Comment length shown in popups before clipping, in characters.
pub const POPUP_COMMENT_MAX: usize = 250;

/// Structured popup body for one record; the surface decides the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub heading: String,
    pub comment: Option<String>,
    pub from: String,
    pub to: String,
    pub year: Option<String>,
    pub source: Option<SourceLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub url: String,
    pub display_name: String,
}

impl PopupContent {
    pub fn for_record(record: &Record) -> Self {
        Self {
            heading: heading(record),
            comment: record
                .comments
                .as_deref()
                .map(|c| clip_chars(c, POPUP_COMMENT_MAX)),
            from: from_text(record),
            to: to_text(record),
            year: record.year_text().map(str::to_string),
            source: record.source.as_deref().map(|url| SourceLink {
                url: url.to_string(),
                display_name: source_display_name(url),
            }),
        }
    }

    /// Plain-text rendering, one row per line.
    pub fn to_text(&self) -> String {
        let mut out = vec![self.heading.clone()];
        if let Some(c) = &self.comment {
            out.push(c.clone());
        }
        out.push(format!("From: {}", self.from));
        out.push(format!("To: {}", self.to));
        if let Some(y) = &self.year {
            out.push(format!("Year: {y}"));
        }
        if let Some(s) = &self.source {
            out.push(format!("Source: {} <{}>", s.display_name, s.url));
        }
        out.join("\n")
    }
}

/// Parsed categories joined with `" / "`.
pub fn heading(record: &Record) -> String {
    record
        .category_label()
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

pub fn from_text(record: &Record) -> String {
    join_or_unknown(&record.delivering_countries())
}

pub fn to_text(record: &Record) -> String {
    join_or_unknown(&record.receiving_countries_list())
}

/// `"from → to (year)"`, the year part only when present.
pub fn compact_line(record: &Record) -> String {
    let mut line = format!("{} \u{2192} {}", from_text(record), to_text(record));
    if let Some(y) = record.year_text() {
        line.push_str(&format!(" ({y})"));
    }
    line
}

fn join_or_unknown(items: &[&str]) -> String {
    if items.is_empty() {
        UNKNOWN_COUNTRY.to_string()
    } else {
        items.join(", ")
    }
}

/// Clips `text` to at most `max` characters, ending in `"..."` when clipped.
pub fn clip_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Host of an http(s) url without a leading `www.`; anything else verbatim.
pub fn source_display_name(source: &str) -> String {
    if !source.starts_with("http") {
        return source.to_string();
    }
    match Url::parse(source) {
        Ok(url) => match url.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => source.to_string(),
        },
        Err(_) => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formats::Attributes;
    use foundation::{LonLat, RecordId};
    use pretty_assertions::assert_eq;

    fn record(attrs: Attributes) -> Record {
        Record::new(RecordId(0), LonLat::new(160.0, -9.0), attrs)
    }

    #[test]
    fn full_record_renders_every_row() {
        let r = record(Attributes {
            category: Some("Training; Maritime Security".to_string()),
            delivering_country: Some("Australia; Japan".to_string()),
            receiving_countries: Some("Solomon Islands".to_string()),
            year: Some("2019".to_string()),
            comments: Some("Patrol boat handover".to_string()),
            source: Some("https://www.defence.gov.au/news/1".to_string()),
        });
        let p = PopupContent::for_record(&r);
        assert_eq!(p.heading, "Training / Maritime Security");
        assert_eq!(p.from, "Australia, Japan");
        assert_eq!(p.to, "Solomon Islands");
        assert_eq!(p.year.as_deref(), Some("2019"));
        assert_eq!(
            p.source,
            Some(SourceLink {
                url: "https://www.defence.gov.au/news/1".to_string(),
                display_name: "defence.gov.au".to_string(),
            })
        );
        assert_eq!(
            compact_line(&r),
            "Australia, Japan \u{2192} Solomon Islands (2019)"
        );
    }

    #[test]
    fn empty_record_uses_unknowns() {
        let p = PopupContent::for_record(&record(Attributes::default()));
        assert_eq!(p.heading, UNKNOWN_CATEGORY);
        assert_eq!(p.from, "Unknown");
        assert_eq!(p.to, "Unknown");
        assert_eq!(p.comment, None);
        assert_eq!(p.to_text(), "Unknown Category\nFrom: Unknown\nTo: Unknown");
    }

    #[test]
    fn comments_clip_at_250_chars() {
        let long = "é".repeat(300);
        let clipped = clip_chars(&long, POPUP_COMMENT_MAX);
        assert_eq!(clipped.chars().count(), 250);
        assert!(clipped.ends_with("..."));
        assert_eq!(clip_chars(&long, POPUP_COMMENT_MAX), clipped);

        let exact = "a".repeat(250);
        assert_eq!(clip_chars(&exact, POPUP_COMMENT_MAX), exact);
    }

    #[test]
    fn non_url_sources_are_shown_verbatim() {
        assert_eq!(source_display_name("Annual report 2020"), "Annual report 2020");
        assert_eq!(source_display_name("http://example.org/x"), "example.org");
    }
}
