//! `primer render` command implementation.

use std::path::PathBuf;

use clap::Args;
use primer_config::{Config, MarkupConfig};
use primer_markup::{HtmlBackend, Parser, RenderBackend};

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Lesson document to render.
    file: PathBuf,

    /// Emit HTML instead of JSON nodes.
    #[arg(long)]
    html: bool,

    /// Path to configuration file (default: auto-discover primer.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the document cannot be read.
    pub(crate) fn execute(self, output: &Output) -> Result<i32, CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let document = read_input(&self.file)?;

        let rendered = render_document(&document, &config.markup, self.html)?;
        output.result(&rendered)?;
        Ok(0)
    }
}

/// Parse `document` and serialize the nodes.
fn render_document(document: &str, markup: &MarkupConfig, html: bool) -> Result<String, CliError> {
    let nodes = Parser::new()
        .default_language(&markup.default_language)
        .diagram_keyword(&markup.diagram_keyword)
        .parse(document);

    tracing::info!(nodes = nodes.len(), "Parsed document");

    if html {
        Ok(HtmlBackend::render(&nodes))
    } else {
        Ok(serde_json::to_string_pretty(&nodes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_json() {
        let json = render_document("# Title\n\nSome **bold** text", &MarkupConfig::default(), false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["type"], "heading");
        assert_eq!(value[0]["level"], 1);
        assert_eq!(value[1]["type"], "paragraph");
        assert_eq!(value[1]["runs"][1]["text"], "bold");
        assert_eq!(value[1]["runs"][1]["style"], "bold");
    }

    #[test]
    fn test_render_html() {
        let html = render_document("## Sub", &MarkupConfig::default(), true).unwrap();
        assert_eq!(html, "<h2>Sub</h2>");
    }

    #[test]
    fn test_render_uses_markup_config() {
        let markup = MarkupConfig {
            default_language: "python".to_owned(),
            diagram_keyword: "tree".to_owned(),
        };
        let json = render_document(
            "```\nprint(1)\n```\n```tree\n{\"label\": \"root\"}\n```",
            &markup,
            false,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["type"], "code_block");
        assert_eq!(value[0]["language"], "python");
        assert_eq!(value[1]["type"], "diagram_block");
        assert_eq!(value[1]["kind"], "tree");
        assert_eq!(value[1]["payload"]["label"], "root");
    }
}
