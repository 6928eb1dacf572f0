//! Generation of the two feed artifacts derived from the post collection:
//! the RSS 2.0 channel (`rss.xml`) and the sitemap (`sitemap.xml`). Both are
//! produced inside one best-effort step: the orchestrator reports an error
//! from [`write_feeds`] without failing the build, and whichever artifact
//! had not yet been written is simply absent.

use crate::config::Config;
use crate::post::Post;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use std::fmt;
use std::fs;

/// XML namespace for the sitemap protocol.
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Writes `rss.xml` and `sitemap.xml` into the output directory. Posts must
/// already be in canonical order.
pub fn write_feeds(config: &Config, posts: &[Post]) -> Result<()> {
    let channel = rss_channel(config, posts);
    fs::write(
        config.output_directory.join("rss.xml"),
        channel.to_string(),
    )?;

    fs::write(
        config.output_directory.join("sitemap.xml"),
        sitemap_xml(config, posts),
    )?;

    Ok(())
}

/// Assembles the RSS channel. `lastBuildDate` is the build time, not derived
/// from post dates.
pub fn rss_channel(config: &Config, posts: &[Post]) -> Channel {
    let items: Vec<Item> = posts.iter().map(|p| rss_item(config, p)).collect();

    ChannelBuilder::default()
        .title(&config.site_title)
        .link(config.site_url.to_string())
        .description(&config.site_description)
        .last_build_date(Utc::now().to_rfc2822())
        .items(items)
        .build()
}

fn rss_item(config: &Config, post: &Post) -> Item {
    let link = config.post_url(&post.slug);
    ItemBuilder::default()
        .title(post.title.clone())
        .link(Some(link.clone()))
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(post.excerpt.clone())
        .pub_date(pub_date(&post.date))
        .build()
}

/// Converts a post's date into an RFC-2822 `pubDate`. A date that doesn't
/// parse strictly as `YYYY-MM-DD` yields an empty value; this is a per-item
/// fallback, never an error.
fn pub_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Err(_) => String::new(),
        Ok(naive_date) => {
            // Posts carry no time-of-day or timezone; pin them to midnight
            // UTC.
            let naive = NaiveDateTime::new(naive_date, NaiveTime::from_hms(0, 0, 0));
            FixedOffset::east(0).from_utc_datetime(&naive).to_rfc2822()
        }
    }
}

/// Assembles the sitemap document: one `<url>` for the site root with
/// today's date as `lastmod`, then one `<url>` per post with `lastmod` taken
/// verbatim from the post's date when non-empty.
pub fn sitemap_xml(config: &Config, posts: &[Post]) -> String {
    let mut xml = String::with_capacity(1024);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{}">"#, SITEMAP_NS));
    xml.push('\n');

    let today = Utc::now().format("%Y-%m-%d").to_string();
    push_url(&mut xml, config.site_url.as_str(), Some(&today));

    for post in posts {
        let lastmod = match post.date.is_empty() {
            true => None,
            false => Some(post.date.as_str()),
        };
        push_url(&mut xml, &config.post_url(&post.slug), lastmod);
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    if let Some(lastmod) = lastmod {
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
    }
    xml.push_str("  </url>\n");
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem generating or writing a feed artifact.
#[derive(Debug)]
pub enum Error {
    /// Returned when a feed artifact can't be written to disk.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "writing feed artifact: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url::Url;

    fn test_config() -> Config {
        Config {
            site_title: "Example Blog".to_owned(),
            site_url: Url::parse("https://example.com/").unwrap(),
            site_description: "A test site".to_owned(),
            content_directory: PathBuf::from("content/posts"),
            post_template: PathBuf::from("templates/post.html"),
            index_template: PathBuf::from("templates/index.html"),
            assets_directory: PathBuf::from("assets"),
            output_directory: PathBuf::from("dist"),
        }
    }

    fn post(title: &str, date: &str, slug: &str, excerpt: &str) -> Post {
        Post {
            title: title.to_owned(),
            date: date.to_owned(),
            slug: slug.to_owned(),
            excerpt: excerpt.to_owned(),
            content_html: String::new(),
        }
    }

    #[test]
    fn test_rss_item_fields() {
        let config = test_config();
        let channel = rss_channel(
            &config,
            &[post("Hello", "2024-01-01", "hello", "greetings")],
        );

        assert_eq!(channel.title(), "Example Blog");
        assert_eq!(channel.items().len(), 1);
        let item = &channel.items()[0];
        assert_eq!(item.title(), Some("Hello"));
        assert_eq!(item.link(), Some("https://example.com/posts/hello.html"));
        assert_eq!(
            item.guid().map(|g| g.value()),
            Some("https://example.com/posts/hello.html")
        );
        assert_eq!(item.description(), Some("greetings"));
        assert!(item.pub_date().unwrap().contains("Jan 2024"));
    }

    #[test]
    fn test_rss_garbled_date_yields_empty_pub_date() {
        let config = test_config();
        let channel = rss_channel(&config, &[post("Bad", "not-a-date", "bad", "")]);
        assert_eq!(channel.items()[0].pub_date(), Some(""));
    }

    #[test]
    fn test_rss_empty_collection_has_no_items() {
        let channel = rss_channel(&test_config(), &[]);
        assert!(channel.items().is_empty());
        assert!(channel.last_build_date().is_some());
    }

    #[test]
    fn test_pub_date_formats_midnight_utc() {
        assert_eq!(pub_date("2024-01-01"), "Mon, 1 Jan 2024 00:00:00 +0000");
        assert_eq!(pub_date(""), "");
        assert_eq!(pub_date("01/02/2024"), "");
    }

    #[test]
    fn test_sitemap_contains_root_and_posts() {
        let config = test_config();
        let xml = sitemap_xml(
            &config,
            &[
                post("A", "2024-02-15", "a", ""),
                post("B", "", "b", ""),
            ],
        );

        assert!(xml.contains(&format!(r#"<urlset xmlns="{}">"#, SITEMAP_NS)));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/posts/a.html</loc>"));
        assert!(xml.contains("<lastmod>2024-02-15</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), 3);
    }

    #[test]
    fn test_sitemap_omits_lastmod_for_empty_date() {
        let config = test_config();
        let xml = sitemap_xml(&config, &[post("B", "", "b", "")]);
        let post_entry = xml.split("<url>").nth(2).unwrap();
        assert!(post_entry.contains("<loc>https://example.com/posts/b.html</loc>"));
        assert!(!post_entry.contains("<lastmod>"));
    }

    #[test]
    fn test_sitemap_keeps_malformed_date_verbatim() {
        let config = test_config();
        let xml = sitemap_xml(&config, &[post("C", "sometime in march", "c", "")]);
        assert!(xml.contains("<lastmod>sometime in march</lastmod>"));
    }

    #[test]
    fn test_sitemap_empty_collection_keeps_root_entry() {
        let xml = sitemap_xml(&test_config(), &[]);
        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<loc>https://example.com/</loc>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(
            escape_xml("https://example.com/?a=1&b=2"),
            "https://example.com/?a=1&amp;b=2"
        );
    }
}
