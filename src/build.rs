//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the output static site: parsing and
//! rendering the posts ([`crate::frontmatter`], [`crate::post`]), writing
//! the post, index, and listing files ([`crate::write`]), generating the
//! feed artifacts ([`crate::feed`]), and mirroring the static assets into
//! the output directory.

use crate::config::Config;
use crate::feed;
use crate::frontmatter;
use crate::markdown;
use crate::post::Post;
use crate::write::{Error as WriteError, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSION: &str = ".md";

/// Builds the site from a [`Config`] object. Document processing is a
/// straight-line sequence with no retries: each source document is parsed,
/// transformed, and written exactly once, then the ordered collection drives
/// the index, listing, and feed artifacts. Feed generation is best-effort; a
/// failure there is reported on stderr without failing the build.
pub fn build_site(config: &Config) -> Result<()> {
    // Parse the template files up front so a broken template aborts before
    // any output is touched.
    let post_template = parse_template(&config.post_template)?;
    let index_template = parse_template(&config.index_template)?;

    let renderer = markdown::Renderer::new();

    fs::create_dir_all(&config.output_directory)?;
    fs::create_dir_all(config.output_directory.join("posts"))?;

    let writer = Writer {
        post_template: &post_template,
        index_template: &index_template,
        config,
    };

    // Parse every source document, render its body, and write its page. The
    // page write is independent of the final ordering; only the index and
    // feed artifacts care about order.
    let mut posts = parse_posts(config, &renderer, &writer)?;

    // Canonical ordering: newest first, comparing the date field as a raw
    // string.
    posts.sort_by(|a, b| b.date.cmp(&a.date));

    writer.write_index(&posts)?;
    writer.write_manifest(&posts)?;

    if let Err(e) = feed::write_feeds(config, &posts) {
        eprintln!("warning: skipping feed artifacts: {}", e);
    }

    publish_assets(
        &config.assets_directory,
        &config.output_directory.join("assets"),
    )?;

    println!(
        "Build complete. Output in {}",
        config.output_directory.display()
    );
    Ok(())
}

/// Walks the content directory and returns one [`Post`] per `.md` file, in
/// directory order, writing each post's page as a side effect.
fn parse_posts(
    config: &Config,
    renderer: &markdown::Renderer,
    writer: &Writer,
) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    let entries = fs::read_dir(&config.content_directory).map_err(|err| Error::ReadSource {
        path: config.content_directory.clone(),
        err,
    })?;

    for result in entries {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if !file_name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }

        let doc_id = file_name.trim_end_matches(MARKDOWN_EXTENSION);
        let contents = fs::read_to_string(entry.path())?;
        let (meta, body) = frontmatter::parse(&contents);
        let post =
            Post::from_document(doc_id, meta, body, renderer).map_err(|err| Error::Render {
                path: entry.path(),
                err,
            })?;

        writer.write_post_page(&post)?;
        posts.push(post);
    }

    Ok(posts)
}

/// Mirrors the static assets directory into the output tree. Any previous
/// output subtree is removed first; there are no merge semantics. A missing
/// source directory is a no-op.
fn publish_assets(src: &Path, dst: &Path) -> Result<()> {
    rmdir(dst)?;
    if !src.is_dir() {
        return Ok(());
    }

    for result in walkdir::WalkDir::new(src) {
        let entry = result?;
        // strip_prefix shouldn't fail since `src` is always an ancestor of
        // the entry path
        let target = dst.join(entry.path().strip_prefix(src).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

// Loads a template file's contents and parses it into a template.
fn parse_template(template_file: &Path) -> Result<Template> {
    let contents = fs::read_to_string(template_file).map_err(|err| Error::OpenTemplateFile {
        path: template_file.to_owned(),
        err,
    })?;

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

fn rmdir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during reading the
/// content directory, rendering a document, writing output files, cleaning
/// output directories, parsing template files, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned when the content directory can't be enumerated.
    ReadSource { path: PathBuf, err: std::io::Error },

    /// Returned when a document's body fails to render.
    Render {
        path: PathBuf,
        err: markdown::Error,
    },

    /// Returned for errors writing pages or the post listing to disk.
    Write(WriteError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for I/O errors while mirroring the assets directory.
    Assets(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ReadSource { path, err } => {
                write!(f, "Reading content directory '{}': {}", path.display(), err)
            }
            Error::Render { path, err } => {
                write!(f, "Rendering '{}': {}", path.display(), err)
            }
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Assets(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadSource { path: _, err } => Some(err),
            Error::Render { path: _, err } => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Assets(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator while mirroring assets.
    fn from(err: walkdir::Error) -> Error {
        Error::Assets(err)
    }
}
