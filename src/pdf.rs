//! Story-to-PDF export. This module only assembles the HTML; rasterisation
//! is done by an external renderer.

use crate::error::{AppError, Result};

pub const PDF_TITLE: &str = "My Story";
const FOOTER: &str = "Generated with Story Captioner";

#[async_trait::async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>>;
}

/// Posts HTML to a rendering service and takes the response body as the PDF.
#[derive(Clone)]
pub struct HttpPdfRenderer {
    client: reqwest::Client,
    url: String,
}

impl HttpPdfRenderer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(html.to_string())
            .send()
            .await
            .map_err(|e| AppError::RenderFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RenderFailure(format!(
                "renderer returned {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::RenderFailure(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

pub async fn render(renderer: &dyn PdfRenderer, story_text: &str) -> Result<Vec<u8>> {
    renderer.render_pdf(&render_html(story_text)).await
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Fixed template. Blank lines in the story separate paragraphs.
pub fn render_html(story_text: &str) -> String {
    let paragraphs: String = story_text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>\n", escape_html(p).replace('\n', "<br>")))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title}</title>
<style>
    body {{
        font-family: Georgia, 'Times New Roman', serif;
        margin: 0;
        padding: 40px;
    }}
    .story {{
        max-width: 680px;
        margin: 0 auto;
    }}
    h1 {{
        text-align: center;
        font-size: 28px;
        margin-bottom: 30px;
    }}
    p {{
        text-align: justify;
        font-size: 16px;
        line-height: 1.7;
    }}
    .footer {{
        margin-top: 40px;
        text-align: center;
        font-size: 10px;
        color: #888;
    }}
</style>
</head>
<body>
<div class="story">
<h1>{title}</h1>
{paragraphs}<div class="footer">{footer}</div>
</div>
</body>
</html>
"#,
        title = PDF_TITLE,
        paragraphs = paragraphs,
        footer = FOOTER,
    )
}
