//! Responsible for templating and writing the HTML pages and the machine
//! readable post listing from [`Post`] records.

use crate::config::Config;
use crate::post::Post;
use gtmpl::{Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Templates posts into output files. Holds the parsed `post` and `index`
/// templates for the duration of a build.
pub struct Writer<'a> {
    /// The template for post pages.
    pub post_template: &'a Template,

    /// The template for the index page.
    pub index_template: &'a Template,

    /// The build configuration; provides site metadata bindings and output
    /// locations.
    pub config: &'a Config,
}

impl Writer<'_> {
    /// Templates a single post and writes it to
    /// `{output}/posts/{slug}.html`. Posts are written in processing order;
    /// a post whose slug collides with an earlier one silently overwrites
    /// its page.
    pub fn write_post_page(&self, post: &Post) -> Result<()> {
        let mut bindings = post.bindings();
        bindings.insert("site".to_owned(), self.site_value());
        let html = render(self.post_template, Value::Object(bindings))?;
        let path = self
            .config
            .output_directory
            .join("posts")
            .join(post.file_name());
        write_file(&path, html)
    }

    /// Renders the listing page for the ordered post collection.
    pub fn render_index(&self, posts: &[Post]) -> Result<String> {
        let mut bindings: HashMap<String, Value> = HashMap::new();
        bindings.insert(
            "posts".to_owned(),
            Value::Array(posts.iter().map(|p| p.summarize().to_value()).collect()),
        );
        bindings.insert("site".to_owned(), self.site_value());
        render(self.index_template, Value::Object(bindings))
    }

    /// Writes the listing page to `{output}/index.html`.
    pub fn write_index(&self, posts: &[Post]) -> Result<()> {
        let html = self.render_index(posts)?;
        write_file(&self.config.output_directory.join("index.html"), html)
    }

    /// Writes `{output}/posts.json`: the ordered post summaries as
    /// pretty-printed JSON, for clients that want the listing without an
    /// HTML parse.
    pub fn write_manifest(&self, posts: &[Post]) -> Result<()> {
        let summaries: Vec<_> = posts.iter().map(Post::summarize).collect();
        let file = fs::File::create(self.config.output_directory.join("posts.json"))?;
        serde_json::to_writer_pretty(file, &summaries)?;
        Ok(())
    }

    fn site_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "title".to_owned(),
            Value::String(self.config.site_title.clone()),
        );
        m.insert(
            "url".to_owned(),
            Value::String(self.config.site_url.to_string()),
        );
        m.insert(
            "description".to_owned(),
            Value::String(self.config.site_description.clone()),
        );
        Value::Object(m)
    }
}

/// Executes a template against a binding value and returns the rendered
/// text.
fn render(template: &Template, value: Value) -> Result<String> {
    let mut out = Vec::new();
    template.execute(&mut out, &gtmpl::Context::from(value)?)?;
    String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    fs::write(path, contents)?;
    Ok(())
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error serializing the post listing.
    Json(serde_json::Error),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<serde_json::Error> for Error {
    /// Converts a [`serde_json::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator when writing the post listing.
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Json(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Json(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url::Url;

    fn parse_template(text: &str) -> Template {
        let mut template = Template::default();
        template.parse(text).unwrap();
        template
    }

    fn test_config() -> Config {
        Config {
            site_title: "Example Blog".to_owned(),
            site_url: Url::parse("https://example.com").unwrap(),
            site_description: "A test site".to_owned(),
            content_directory: PathBuf::from("content/posts"),
            post_template: PathBuf::from("templates/post.html"),
            index_template: PathBuf::from("templates/index.html"),
            assets_directory: PathBuf::from("assets"),
            output_directory: PathBuf::from("dist"),
        }
    }

    fn post(title: &str, date: &str, slug: &str) -> Post {
        Post {
            title: title.to_owned(),
            date: date.to_owned(),
            slug: slug.to_owned(),
            excerpt: String::new(),
            content_html: String::new(),
        }
    }

    #[test]
    fn test_render_index_lists_posts_in_order() -> Result<()> {
        let post_template = parse_template("unused");
        let index_template =
            parse_template("{{.site.title}}:{{range .posts}} {{.title}} ({{.date}});{{end}}");
        let config = test_config();
        let writer = Writer {
            post_template: &post_template,
            index_template: &index_template,
            config: &config,
        };

        let posts = vec![
            post("Newest", "2024-03-01", "newest"),
            post("Middle", "2024-02-15", "middle"),
            post("Oldest", "2024-01-01", "oldest"),
        ];
        let html = writer.render_index(&posts)?;
        assert_eq!(
            html,
            "Example Blog: Newest (2024-03-01); Middle (2024-02-15); Oldest (2024-01-01);"
        );
        Ok(())
    }

    #[test]
    fn test_render_index_with_no_posts() -> Result<()> {
        let post_template = parse_template("unused");
        let index_template = parse_template("{{range .posts}}{{.title}}{{end}}empty");
        let config = test_config();
        let writer = Writer {
            post_template: &post_template,
            index_template: &index_template,
            config: &config,
        };
        assert_eq!(writer.render_index(&[])?, "empty");
        Ok(())
    }
}
