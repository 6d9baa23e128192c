use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_TITLE: &str = "报告详情";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    CaptureTime,
    ArticleCount,
    Source,
    GeneratedAt,
}

impl MetaField {
    pub const ALL: [MetaField; 4] = [
        MetaField::CaptureTime,
        MetaField::ArticleCount,
        MetaField::Source,
        MetaField::GeneratedAt,
    ];

    /// Label as written in the report text.
    pub fn source_label(&self) -> &'static str {
        match self {
            MetaField::CaptureTime => "抓取时间",
            MetaField::ArticleCount => "分析文章数",
            MetaField::Source => "来源",
            MetaField::GeneratedAt => "报告生成时间",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetaField::CaptureTime => "抓取时间",
            MetaField::ArticleCount => "文章数",
            MetaField::Source => "来源",
            MetaField::GeneratedAt => "生成时间",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MetaField::CaptureTime => "🕐",
            MetaField::ArticleCount => "📊",
            MetaField::Source => "📰",
            MetaField::GeneratedAt => "⏰",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            MetaField::CaptureTime => &CAPTURE_TIME,
            MetaField::ArticleCount => &ARTICLE_COUNT,
            MetaField::Source => &SOURCE,
            MetaField::GeneratedAt => &GENERATED_AT,
        }
    }
}

fn label_pattern(label: &str) -> Regex {
    // `**label:** value`, ASCII or full-width colon
    Regex::new(&format!(r"\*\*{}[:：]\*\*\s*(.+)", regex::escape(label)))
        .expect("static metadata pattern")
}

lazy_static! {
    static ref CAPTURE_TIME: Regex = label_pattern(MetaField::CaptureTime.source_label());
    static ref ARTICLE_COUNT: Regex = label_pattern(MetaField::ArticleCount.source_label());
    static ref SOURCE: Regex = label_pattern(MetaField::Source.source_label());
    static ref GENERATED_AT: Regex = label_pattern(MetaField::GeneratedAt.source_label());
    static ref H1: Regex = Regex::new(r"(?m)^#[ \t]+(.+)$").expect("static heading pattern");
    static ref TITLE_NOISE: Regex = Regex::new(r"[#*`_\[\]]").expect("static title pattern");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaInfo {
    pub field: MetaField,
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Scan a report for the known metadata labels. Each field is optional.
pub fn extract_meta_info(markdown: &str) -> Vec<MetaInfo> {
    MetaField::ALL
        .iter()
        .filter_map(|field| {
            let caps = field.pattern().captures(markdown)?;
            let value = caps[1].replace("**", "").trim().to_string();
            Some(MetaInfo {
                field: *field,
                icon: field.icon(),
                label: field.label(),
                value,
            })
        })
        .collect()
}

/// Text of the first level-1 heading, without inline Markdown markers.
pub fn extract_title(markdown: &str) -> Option<String> {
    let caps = H1.captures(markdown)?;
    let title = TITLE_NOISE.replace_all(caps[1].trim_end_matches('\r'), "");
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "# 🤖 HN AI **Insights** 日报\n\n\
        **抓取时间:** 2024-01-01 08:00\n\
        **来源:** Hacker News\n\
        **分析文章数:** **12**\n\n\
        ## 1. Something\n\n\
        ---\n\
        **报告生成时间：** 2024-01-01 08:05\n";

    #[test]
    fn test_capture_time() {
        let meta = extract_meta_info("**抓取时间:** 2024-01-01");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].field, MetaField::CaptureTime);
        assert_eq!(meta[0].label, "抓取时间");
        assert_eq!(meta[0].value, "2024-01-01");
    }

    #[test]
    fn test_all_fields_in_fixed_order() {
        let meta = extract_meta_info(REPORT);
        let fields: Vec<MetaField> = meta.iter().map(|m| m.field).collect();
        assert_eq!(fields, MetaField::ALL.to_vec());
        assert_eq!(meta[1].value, "12");
        assert_eq!(meta[1].label, "文章数");
        assert_eq!(meta[2].value, "Hacker News");
        assert_eq!(meta[3].value, "2024-01-01 08:05");
    }

    #[test]
    fn test_fields_are_independent() {
        let meta = extract_meta_info("intro\n**来源:** HN\n");
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].field, MetaField::Source);
        assert!(!meta.iter().any(|m| m.field == MetaField::CaptureTime));
    }

    #[test]
    fn test_label_free_document() {
        assert!(extract_meta_info("# Title\n\nJust text, 抓取时间 without markers.").is_empty());
        assert!(extract_meta_info("").is_empty());
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title(REPORT).as_deref(), Some("🤖 HN AI Insights 日报"));
        assert_eq!(extract_title("## Only second level"), None);
        assert_eq!(extract_title("intro\n# [Linked](x) `title`\r\n"), Some("Linked(x) title".to_string()));
        assert_eq!(extract_title("#\n"), None);
    }
}
