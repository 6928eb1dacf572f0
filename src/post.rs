//! Defines the [`Post`] and [`PostSummary`] types and the logic for building
//! a post from a parsed source document. See [`Post::bindings`] and
//! [`PostSummary::to_value`] for details on how posts are converted into
//! template values.

use crate::frontmatter::FrontMatter;
use crate::markdown;
use gtmpl::Value;
use serde::Serialize;
use std::collections::HashMap;

/// The canonical record for one post, derived from exactly one source
/// document. The rendered body is produced once at construction and never
/// mutated afterwards.
#[derive(Clone, Debug)]
pub struct Post {
    /// The post title. Defaults to the document's base filename.
    pub title: String,

    /// The publication date as written in the front-matter, expected (but
    /// not validated) to be a `YYYY-MM-DD` calendar date. Consumers must
    /// tolerate malformed or empty values.
    pub date: String,

    /// The output filename stem and URL path segment. Defaults to the
    /// document's base filename. Uniqueness is not enforced; a later post
    /// with the same slug overwrites the earlier one's page.
    pub slug: String,

    /// A short plain-text summary for the index and feed. Defaults to the
    /// empty string.
    pub excerpt: String,

    /// The post body rendered to HTML.
    pub content_html: String,
}

impl Post {
    /// Builds a [`Post`] from a document's identity, metadata, and body.
    /// `doc_id` is the source file's base name without extension and is the
    /// fallback for both `title` and `slug`. The body is rendered through
    /// `renderer`; a rendering failure is fatal for the document.
    pub fn from_document(
        doc_id: &str,
        mut meta: FrontMatter,
        body: &str,
        renderer: &markdown::Renderer,
    ) -> markdown::Result<Post> {
        let content_html = renderer.render(body)?;
        Ok(Post {
            title: meta.remove("title").unwrap_or_else(|| doc_id.to_owned()),
            date: meta.remove("date").unwrap_or_default(),
            slug: meta.remove("slug").unwrap_or_else(|| doc_id.to_owned()),
            excerpt: meta.remove("excerpt").unwrap_or_default(),
            content_html,
        })
    }

    /// The post's output file name: `{slug}.html`.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug)
    }

    /// Projects the post down to its listing fields.
    pub fn summarize(&self) -> PostSummary {
        PostSummary {
            title: self.title.clone(),
            date: self.date.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
        }
    }

    /// Converts the post into the variable bindings for the `post` template:
    /// `title`, `date`, `content`, `excerpt`, and `slug`.
    pub fn bindings(&self) -> HashMap<String, Value> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("date".to_owned(), Value::String(self.date.clone()));
        m.insert("content".to_owned(), Value::String(self.content_html.clone()));
        m.insert("excerpt".to_owned(), Value::String(self.excerpt.clone()));
        m.insert("slug".to_owned(), Value::String(self.slug.clone()));
        m
    }
}

/// The listing projection of a [`Post`]: everything except the rendered
/// body. This is both the `posts.json` record shape and the per-post binding
/// for the `index` template.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub date: String,
    pub slug: String,
    pub excerpt: String,
}

impl PostSummary {
    /// Converts the summary into a [`Value`] for templating.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("date".to_owned(), Value::String(self.date.clone()));
        m.insert("slug".to_owned(), Value::String(self.slug.clone()));
        m.insert("excerpt".to_owned(), Value::String(self.excerpt.clone()));
        Value::Object(m)
    }
}
