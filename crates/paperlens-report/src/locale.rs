//! Report label tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use paperlens_model::{Confidence, ImplementationKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Fixed strings used by the Markdown renderers.
#[derive(Debug)]
pub struct Labels {
    pub paper_title: &'static str,
    pub generated: &'static str,
    pub basic_info: &'static str,
    pub title: &'static str,
    pub authors: &'static str,
    pub institutions: &'static str,
    pub not_provided: &'static str,
    pub implementation: &'static str,
    pub kind: &'static str,
    pub confidence: &'static str,
    pub code_link: &'static str,
    pub evidence: &'static str,
    pub innovation: &'static str,
    pub novel_methods: &'static str,
    pub improvements: &'static str,
    pub no_novel_methods: &'static str,
    pub no_improvements: &'static str,
    pub summary: &'static str,
    pub implementation_summary: &'static str,
    pub innovation_summary: &'static str,
    pub no_innovation: &'static str,
    pub report_failed: &'static str,
    pub error: &'static str,
    pub separator: &'static str,
    pub batch_title: &'static str,
    pub overview: &'static str,
    pub total: &'static str,
    pub succeeded: &'static str,
    pub failed: &'static str,
    pub skipped: &'static str,
    pub success_rate: &'static str,
    pub timing: &'static str,
    pub started: &'static str,
    pub finished: &'static str,
    pub total_duration: &'static str,
    pub average_duration: &'static str,
    pub kind_stats: &'static str,
    pub documents: &'static str,
    pub size_mb: &'static str,
    pub modified: &'static str,
    pub failures: &'static str,
    pub attempts: &'static str,
}

const EN: Labels = Labels {
    paper_title: "Paper Analysis Report",
    generated: "Generated",
    basic_info: "Basic Information",
    title: "Title",
    authors: "Authors",
    institutions: "Institutions",
    not_provided: "Not provided",
    implementation: "Implementation Analysis",
    kind: "Implementation type",
    confidence: "Confidence",
    code_link: "Code link",
    evidence: "Supporting Evidence",
    innovation: "Innovation Analysis",
    novel_methods: "Novel Methods",
    improvements: "Improvements",
    no_novel_methods: "No clear novel methods found",
    no_improvements: "No clear improvements found",
    summary: "Summary",
    implementation_summary: "Implementation",
    innovation_summary: "Innovation",
    no_innovation: "No clear novel methods or improvements were found.",
    report_failed: "Report generation failed.",
    error: "Error",
    separator: ": ",
    batch_title: "Batch Analysis Report",
    overview: "Overview",
    total: "Total documents",
    succeeded: "Succeeded",
    failed: "Failed",
    skipped: "Skipped",
    success_rate: "Success rate",
    timing: "Timing",
    started: "Started",
    finished: "Finished",
    total_duration: "Total duration",
    average_duration: "Average per document",
    kind_stats: "Implementation Statistics",
    documents: "Documents",
    size_mb: "Size (MB)",
    modified: "Modified",
    failures: "Failed Documents",
    attempts: "Attempts",
};

const ZH: Labels = Labels {
    paper_title: "论文分析报告",
    generated: "生成时间",
    basic_info: "基本信息",
    title: "标题",
    authors: "作者",
    institutions: "机构",
    not_provided: "未提供",
    implementation: "代码实现分析",
    kind: "实现类型",
    confidence: "置信度",
    code_link: "代码链接",
    evidence: "支持证据",
    innovation: "方法创新分析",
    novel_methods: "创新方法",
    improvements: "改进点",
    no_novel_methods: "未发现明显的创新方法",
    no_improvements: "未发现明显的改进点",
    summary: "分析总结",
    implementation_summary: "代码实现情况",
    innovation_summary: "创新性分析",
    no_innovation: "未发现明显的创新方法或改进点。",
    report_failed: "生成报告时发生错误。",
    error: "错误信息",
    separator: "：",
    batch_title: "批量分析报告",
    overview: "概览",
    total: "总文件数",
    succeeded: "成功",
    failed: "失败",
    skipped: "跳过",
    success_rate: "成功率",
    timing: "时间统计",
    started: "开始时间",
    finished: "结束时间",
    total_duration: "总耗时",
    average_duration: "平均耗时",
    kind_stats: "实现类型统计",
    documents: "论文汇总",
    size_mb: "大小(MB)",
    modified: "修改时间",
    failures: "失败文件",
    attempts: "尝试次数",
};

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Self::En => &EN,
            Self::Zh => &ZH,
        }
    }

    pub fn kind(self, kind: ImplementationKind) -> &'static str {
        match (self, kind) {
            (Self::En, ImplementationKind::Official) => "Official implementation",
            (Self::En, ImplementationKind::Unofficial) => "Unofficial implementation",
            (Self::En, ImplementationKind::Unknown) => "Unknown",
            (Self::Zh, ImplementationKind::Official) => "官方实现",
            (Self::Zh, ImplementationKind::Unofficial) => "非官方实现",
            (Self::Zh, ImplementationKind::Unknown) => "未知",
        }
    }

    pub fn confidence(self, confidence: Confidence) -> &'static str {
        match (self, confidence) {
            (Self::En, Confidence::High) => "High",
            (Self::En, Confidence::Medium) => "Medium",
            (Self::En, Confidence::Low) => "Low",
            (Self::Zh, Confidence::High) => "高",
            (Self::Zh, Confidence::Medium) => "中",
            (Self::Zh, Confidence::Low) => "低",
        }
    }

    pub(crate) fn verdict_sentence(self, kind: ImplementationKind, confidence: Confidence) -> String {
        match self {
            Self::En => format!(
                "Classified as {} with {} confidence.",
                self.kind(kind),
                self.confidence(confidence).to_lowercase()
            ),
            Self::Zh => format!(
                "该论文{}，置信度{}。",
                self.kind(kind),
                self.confidence(confidence)
            ),
        }
    }

    pub(crate) fn code_link_sentence(self, url: &str) -> String {
        match self {
            Self::En => format!("Code link provided: {url}"),
            Self::Zh => format!("提供了代码链接：{url}"),
        }
    }

    pub(crate) fn innovation_sentence(self, novel: usize, improvements: usize) -> String {
        match self {
            Self::En => format!(
                "The paper proposes {novel} novel method(s) and {improvements} improvement(s)."
            ),
            Self::Zh => format!("论文提出了 {novel} 个创新方法和 {improvements} 个改进点。"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::En => "en",
            Self::Zh => "zh",
        })
    }
}
