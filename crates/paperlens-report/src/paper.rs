//! Per-paper report assembly and Markdown rendering.

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use tracing::error;

use paperlens_model::{
    DocumentSource, ImplementationVerdict, InnovationFindings, PaperAnalysis, PaperInfo,
};

use crate::locale::Locale;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// An analysis record together with its rendered Markdown.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperReport {
    pub analysis: PaperAnalysis,
    pub markdown: String,
}

/// Combines extractor outputs into a report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder {
    locale: Locale,
}

impl ReportBuilder {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn build(
        &self,
        document: &DocumentSource,
        paper_info: PaperInfo,
        implementation: ImplementationVerdict,
        innovation: InnovationFindings,
        timestamp: DateTime<Utc>,
    ) -> PaperReport {
        let analysis = PaperAnalysis {
            document: document.title.clone(),
            source: document.path.clone(),
            analyzed_at: timestamp,
            paper_info,
            implementation,
            innovation,
        };
        let markdown = self.render(&analysis);
        PaperReport { analysis, markdown }
    }

    /// Renders the fixed-section Markdown report.
    ///
    /// A formatting failure yields a minimal error report instead.
    pub fn render(&self, analysis: &PaperAnalysis) -> String {
        let mut out = String::new();
        match write_paper(&mut out, analysis, self.locale) {
            Ok(()) => out,
            Err(err) => {
                error!(document = %analysis.document, "report rendering failed");
                fallback_report(self.locale, &err.to_string())
            }
        }
    }
}

/// Minimal report carrying only an error notice.
pub fn fallback_report(locale: Locale, message: &str) -> String {
    let labels = locale.labels();
    format!(
        "# {}\n\n{}\n\n{}{}{}",
        labels.paper_title, labels.report_failed, labels.error, labels.separator, message
    )
}

fn write_paper(out: &mut String, analysis: &PaperAnalysis, locale: Locale) -> fmt::Result {
    let labels = locale.labels();
    let sep = labels.separator;
    let info = &analysis.paper_info;
    let implementation = &analysis.implementation;
    let innovation = &analysis.innovation;

    writeln!(out, "# {}", labels.paper_title)?;
    writeln!(out)?;
    writeln!(
        out,
        "{}{sep}{}",
        labels.generated,
        analysis.analyzed_at.format(TIMESTAMP_FORMAT)
    )?;
    writeln!(out)?;

    writeln!(out, "## {}", labels.basic_info)?;
    writeln!(
        out,
        "- {}{sep}{}",
        labels.title,
        info.title.as_deref().unwrap_or(labels.not_provided)
    )?;
    writeln!(out, "- {}{sep}{}", labels.authors, joined_or(&info.authors, labels.not_provided))?;
    writeln!(
        out,
        "- {}{sep}{}",
        labels.institutions,
        joined_or(&info.institutions, labels.not_provided)
    )?;
    writeln!(out)?;

    writeln!(out, "## {}", labels.implementation)?;
    writeln!(out, "- {}{sep}{}", labels.kind, locale.kind(implementation.kind))?;
    writeln!(
        out,
        "- {}{sep}{}",
        labels.confidence,
        locale.confidence(implementation.confidence)
    )?;
    if let Some(url) = &implementation.code_url {
        writeln!(out, "- {}{sep}{url}", labels.code_link)?;
    }
    if !implementation.evidence.is_empty() {
        writeln!(out)?;
        writeln!(out, "### {}", labels.evidence)?;
        for evidence in &implementation.evidence {
            writeln!(out, "- {evidence}")?;
        }
    }
    writeln!(out)?;

    writeln!(out, "## {}", labels.innovation)?;
    writeln!(out)?;
    writeln!(out, "### {}", labels.novel_methods)?;
    write_bullets(out, &innovation.novel_methods, labels.no_novel_methods)?;
    writeln!(out)?;
    writeln!(out, "### {}", labels.improvements)?;
    write_bullets(out, &innovation.improvements, labels.no_improvements)?;
    writeln!(out)?;

    writeln!(out, "## {}", labels.summary)?;
    writeln!(out)?;
    writeln!(out, "### {}", labels.implementation_summary)?;
    writeln!(
        out,
        "{}",
        locale.verdict_sentence(implementation.kind, implementation.confidence)
    )?;
    if let Some(url) = &implementation.code_url {
        writeln!(out, "{}", locale.code_link_sentence(url))?;
    }
    writeln!(out)?;
    writeln!(out, "### {}", labels.innovation_summary)?;
    if innovation.is_empty() {
        writeln!(out, "{}", labels.no_innovation)?;
    } else {
        writeln!(
            out,
            "{}",
            locale.innovation_sentence(innovation.novel_methods.len(), innovation.improvements.len())
        )?;
    }
    Ok(())
}

fn write_bullets(out: &mut String, items: &[String], empty: &str) -> fmt::Result {
    if items.is_empty() {
        return writeln!(out, "- {empty}");
    }
    for item in items {
        writeln!(out, "- {item}")?;
    }
    Ok(())
}

fn joined_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}
