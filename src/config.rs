//! Loads build configuration from an `inkpress.yaml` project file. The
//! resulting [`Config`] is populated once at process start and passed by
//! reference into every step of the build; nothing mutates it afterwards.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file searched for in the starting directory and
/// its ancestors.
pub const PROJECT_FILE: &str = "inkpress.yaml";

/// The on-disk shape of the project file. Directory fields are optional and
/// resolved relative to the project root.
#[derive(Deserialize)]
struct Project {
    site_title: String,
    site_url: Url,

    #[serde(default)]
    site_description: String,

    #[serde(default)]
    content_dir: Option<PathBuf>,

    #[serde(default)]
    templates_dir: Option<PathBuf>,

    #[serde(default)]
    assets_dir: Option<PathBuf>,

    #[serde(default)]
    output_dir: Option<PathBuf>,
}

/// Site-wide, read-only configuration for one build run.
pub struct Config {
    /// The site title, available to every template and the feed channel.
    pub site_title: String,

    /// The site's base URL. Post links in the feed artifacts are built
    /// beneath it.
    pub site_url: Url,

    /// A short site description for the index template and feed channel.
    pub site_description: String,

    /// The directory containing the Markdown source documents.
    pub content_directory: PathBuf,

    /// The `post` template file.
    pub post_template: PathBuf,

    /// The `index` template file.
    pub index_template: PathBuf,

    /// The static assets directory, mirrored verbatim into the output.
    pub assets_directory: PathBuf,

    /// The root of the output tree.
    pub output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for [`PROJECT_FILE`] and loads it.
    pub fn from_directory(dir: &Path, output_override: Option<&Path>) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_override)
                .map_err(|e| anyhow!("Loading configuration: {:?}", e))
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_override),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads configuration from a specific project file. Relative directory
    /// options resolve against the file's parent directory.
    pub fn from_project_file(path: &Path, output_override: Option<&Path>) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;

        let resolve = |dir: Option<PathBuf>, default: &str| -> PathBuf {
            let dir = dir.unwrap_or_else(|| PathBuf::from(default));
            if dir.is_relative() {
                project_root.join(dir)
            } else {
                dir
            }
        };

        let templates_directory = resolve(project.templates_dir, "templates");
        let output_directory = match output_override {
            Some(dir) => dir.to_owned(),
            None => resolve(project.output_dir, "dist"),
        };

        Ok(Config {
            site_title: project.site_title,
            site_url: project.site_url,
            site_description: project.site_description,
            content_directory: resolve(project.content_dir, "content/posts"),
            post_template: templates_directory.join("post.html"),
            index_template: templates_directory.join("index.html"),
            assets_directory: resolve(project.assets_dir, "assets"),
            output_directory,
        })
    }

    /// The absolute URL for a post page: `{site_url}/posts/{slug}.html`.
    pub fn post_url(&self, slug: &str) -> String {
        format!(
            "{}/posts/{}.html",
            self.site_url.as_str().trim_end_matches('/'),
            slug
        )
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}
