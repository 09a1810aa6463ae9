//! Front-matter parsing

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

const FENCE: &str = "---";

/// Accepts `tags: rust` as well as `tags: [rust, web]`
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}

/// Metadata block at the top of a markdown file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,

    /// Any other keys, kept for templates
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split `content` into its front-matter and the remaining body. Content
    /// that does not open with a `---` fence has empty front-matter.
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let trimmed = content.trim_start();
        let Some(rest) = trimmed.strip_prefix(FENCE).filter(|r| ends_line(r)) else {
            return Ok((FrontMatter::default(), content));
        };
        let rest = rest.trim_start_matches([' ', '\t']);
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .ok_or_else(|| anyhow!("front-matter fence must be followed by a newline"))?;

        let (yaml, body) = if let Some(body) = rest.strip_prefix(FENCE).filter(|b| ends_line(b)) {
            ("", body)
        } else {
            let end = closing_fence(rest)
                .ok_or_else(|| anyhow!("missing closing `---` for front-matter"))?;
            (&rest[..end], &rest[end + 1 + FENCE.len()..])
        };
        let body = body
            .trim_start_matches([' ', '\t'])
            .trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm: FrontMatter = serde_yaml::from_str(yaml)
            .map_err(|e| anyhow!("invalid YAML front-matter: {}", e))?;
        Ok((fm, body))
    }

    /// Parse the `date` key, if present
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Offset of the newline that starts the closing fence: a line holding only
/// `---` (trailing blanks allowed)
fn closing_fence(rest: &str) -> Option<usize> {
    let needle = "\n---";
    let mut from = 0;
    while let Some(found) = rest[from..].find(needle) {
        let at = from + found;
        if ends_line(&rest[at + needle.len()..]) {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

/// Whether only blanks remain before the end of the line
fn ends_line(after: &str) -> bool {
    let after = after.trim_start_matches([' ', '\t']);
    after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n")
}

fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.and_local_timezone(Local).earliest();
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).earliest();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
tags:
  - rust
  - web
cover: hero.png
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.tags, vec!["rust", "web"]);
        assert_eq!(
            fm.extra.get("cover"),
            Some(&serde_yaml::Value::String("hero.png".to_string()))
        );
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_single_string_tag() {
        let (fm, _) = FrontMatter::parse("---\ntitle: One\ntags: notes\n---\nbody").unwrap();
        assert_eq!(fm.tags, vec!["notes"]);
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_dashed_first_line_is_body() {
        let content = "-----\n\nText after a rule.\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = FrontMatter::parse("---\n---\nbody").unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(body, "body");
    }

    #[test]
    fn test_unclosed_frontmatter_is_error() {
        assert!(FrontMatter::parse("---\ntitle: x\nbody").is_err());
    }

    #[test]
    fn test_closing_fence_needs_a_line_of_its_own() {
        let rest = "a: 1\n----\nb: ---text\n---text\n---  \nbody";
        let end = closing_fence(rest).unwrap();
        assert_eq!(&rest[end..], "\n---  \nbody");

        assert_eq!(closing_fence("a: 1\n---"), Some(4));
        assert_eq!(closing_fence("a: 1\r\n---\r\nbody"), Some(5));
        assert_eq!(closing_fence("a: 1\n----\n---x"), None);
    }

    #[test]
    fn test_fence_at_end_of_input() {
        let (fm, body) = FrontMatter::parse("---\ntitle: Eof\n---").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Eof"));
        assert_eq!(body, "");

        assert!(FrontMatter::parse("---\ntitle: x\n---more\nbody").is_err());
        assert!(FrontMatter::parse("---\n----\nbody").is_err());

        let (_, body) = FrontMatter::parse("---\ntitle: y\n---  \nbody").unwrap();
        assert_eq!(body, "body");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(FrontMatter::parse("---\ntitle: [unclosed\n---\nbody").is_err());
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-01-15 10:30:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");

        let fm = FrontMatter {
            date: Some("2020/05/01".to_string()),
            ..Default::default()
        };
        assert_eq!(
            fm.parse_date().unwrap().format("%Y-%m-%d").to_string(),
            "2020-05-01"
        );
    }
}
