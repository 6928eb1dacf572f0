//! The library code for the `inkpress` static site generator. The build is a
//! short, linear pipeline:
//!
//! 1. Parsing front-matter and bodies out of the Markdown source documents
//!    ([`crate::frontmatter`]) and transforming them into normalized post
//!    records ([`crate::post`], [`crate::markdown`])
//! 2. Writing the per-post pages, the index page, and the machine-readable
//!    post listing ([`crate::write`])
//! 3. Deriving the feed artifacts — RSS channel and sitemap — from the
//!    ordered collection ([`crate::feed`])
//!
//! Everything downstream of step 1 consumes the same ordered post
//! collection: posts are sorted newest-first by comparing their date fields
//! as raw strings, and the index, listing, and both feeds all observe that
//! one ordering. The [`crate::build`] module owns the sequencing and the
//! output-directory lifecycle; [`crate::config`] carries the site metadata
//! that every renderer binds.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod markdown;
pub mod post;
pub mod write;
