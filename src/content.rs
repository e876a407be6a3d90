//! Content resolution.
//!
//! A file's content comes from exactly one of four sources, tried in order:
//!
//! 1. `content` - used as is
//! 2. `content_file` - read from the first template folder that has it
//! 3. `template` - rendered with the options as variables
//! 4. `template_file` - read from the first template folder that has it, then rendered
//!
//! A missing `content_file` or `template_file` does not fail the build. The
//! generated content becomes `content not found: <ref>` or
//! `template not found: <ref>` so every missing template in a run shows up in
//! its own output file. Strict resolution turns these into errors instead.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layered_folders::LayeredFolders;
use crate::renderer::TemplateRenderer;

/// Content sources plus the variables made available to templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_file: Option<String>,
    /// Extra template variables.
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl ContentOptions {
    pub fn content<S: Into<String>>(content: S) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    pub fn content_file<S: Into<String>>(file: S) -> Self {
        Self { content_file: Some(file.into()), ..Self::default() }
    }

    pub fn template<S: Into<String>>(template: S) -> Self {
        Self { template: Some(template.into()), ..Self::default() }
    }

    pub fn template_file<S: Into<String>>(file: S) -> Self {
        Self { template_file: Some(file.into()), ..Self::default() }
    }

    /// Adds a template variable.
    pub fn with<K: Into<String>, V: Into<serde_json::Value>>(mut self, key: K, value: V) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Merges a JSON object into the template variables. Non-object values are ignored.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = data {
            self.data.extend(map);
        }
        self
    }

    pub fn has_source(&self) -> bool {
        self.content.is_some()
            || self.content_file.is_some()
            || self.template.is_some()
            || self.template_file.is_some()
    }

    /// The variable bag handed to the renderer: the extra data plus the
    /// source fields that were supplied.
    pub fn to_context(&self) -> serde_json::Value {
        let mut context = self.data.clone();
        let sources = [
            ("content", &self.content),
            ("content_file", &self.content_file),
            ("template", &self.template),
            ("template_file", &self.template_file),
        ];
        for (key, value) in sources {
            if let Some(value) = value {
                context.insert(key.to_string(), serde_json::Value::String(value.clone()));
            }
        }
        serde_json::Value::Object(context)
    }
}

enum TemplateSource {
    Text(String),
    /// Soft-failure message for a template file that was not found.
    Missing(String),
}

/// Resolves [`ContentOptions`] into final content.
pub struct ContentResolver<'a> {
    template_folders: &'a LayeredFolders,
    renderer: &'a dyn TemplateRenderer,
    strict: bool,
}

impl<'a> ContentResolver<'a> {
    pub fn new(template_folders: &'a LayeredFolders, renderer: &'a dyn TemplateRenderer) -> Self {
        Self { template_folders, renderer, strict: false }
    }

    /// Missing content or template files become errors instead of inline messages.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns `content` as is, or the text of `content_file`.
    ///
    /// `Ok(None)` means neither source was supplied.
    pub fn resolve_content(&self, opts: &ContentOptions) -> Result<Option<String>> {
        if let Some(content) = &opts.content {
            return Ok(Some(content.clone()));
        }

        let Some(reference) = &opts.content_file else {
            return Ok(None);
        };

        match self.locate(reference) {
            Some(file) => {
                debug!("Using content file {}", file.display());
                Ok(Some(fs::read_to_string(file)?))
            }
            None if self.strict => Err(Error::ContentNotFound { reference: reference.clone() }),
            None => {
                warn!("content not found: {reference}");
                Ok(Some(format!("content not found: {reference}")))
            }
        }
    }

    /// Returns `template` as is, or the text of `template_file`. Nothing is rendered here.
    pub fn resolve_template(&self, opts: &ContentOptions) -> Result<Option<String>> {
        Ok(self.template_source(opts)?.map(|source| match source {
            TemplateSource::Text(text) | TemplateSource::Missing(text) => text,
        }))
    }

    /// Produces the final content, rendering templates with `opts` as variables.
    ///
    /// `Ok(None)` means no content source was supplied at all, which is
    /// different from empty content. A missing template's message is returned
    /// as is, not rendered.
    pub fn process(&self, opts: &ContentOptions) -> Result<Option<String>> {
        if let Some(content) = self.resolve_content(opts)? {
            return Ok(Some(content));
        }

        match self.template_source(opts)? {
            Some(TemplateSource::Text(template)) => {
                Ok(Some(self.renderer.render(&template, &opts.to_context())?))
            }
            Some(TemplateSource::Missing(message)) => Ok(Some(message)),
            None => Ok(None),
        }
    }

    fn template_source(&self, opts: &ContentOptions) -> Result<Option<TemplateSource>> {
        if let Some(template) = &opts.template {
            return Ok(Some(TemplateSource::Text(template.clone())));
        }

        let Some(reference) = &opts.template_file else {
            return Ok(None);
        };

        match self.locate(reference) {
            Some(file) => {
                debug!("Using template file {}", file.display());
                Ok(Some(TemplateSource::Text(fs::read_to_string(file)?)))
            }
            None if self.strict => Err(Error::TemplateNotFound { reference: reference.clone() }),
            None => {
                warn!("template not found: {reference}");
                Ok(Some(TemplateSource::Missing(format!("template not found: {reference}"))))
            }
        }
    }

    /// Absolute references are used directly, everything else goes through
    /// the template folders.
    fn locate(&self, reference: &str) -> Option<PathBuf> {
        let path = Path::new(reference);
        if path.is_absolute() {
            return path.is_file().then(|| path.to_path_buf());
        }
        self.template_folders.find_file(path)
    }
}
