//! HTML documents for the index and report pages.
//!
//! Everything taken from report data is escaped here; the converted Markdown
//! body is the only fragment inserted as-is.

use hn_core::ViewerConfig;

use crate::escape::escape_html;
use crate::meta::{MetaInfo, DEFAULT_TITLE};
use crate::pagination::PageControl;
use crate::view::{ArticleItem, DetailState, IndexBody, IndexPage, PaginationView, ReportCard};

const BASE_CSS: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", "PingFang SC", "Microsoft YaHei", sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; color: #333; line-height: 1.6; }
.container { max-width: 900px; margin: 0 auto; padding: 16px; }
.site-header { text-align: center; color: #fff; padding: 24px 0 16px; }
.site-header h1 { font-size: 1.6rem; }
.subtitle, #last-update { opacity: 0.85; font-size: 0.9rem; }
.loading, .error, .error-box { background: #fff; border-radius: 12px; padding: 32px 20px; text-align: center; }
.error, .error-box { color: #c0392b; }
.hint, .error-detail { font-size: 0.9rem; margin-top: 10px; opacity: 0.8; }
.spinner { width: 40px; height: 40px; margin: 0 auto 16px; border: 4px solid #eee; border-top-color: #667eea; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.report-card { background: #fff; border-radius: 12px; padding: 18px; margin-bottom: 16px; box-shadow: 0 4px 14px rgba(0,0,0,0.08); }
.report-header { display: flex; justify-content: space-between; align-items: baseline; margin-bottom: 8px; }
.report-date { font-size: 1.15rem; }
.report-time { color: #888; font-size: 0.9rem; }
.report-summary { color: #555; margin-bottom: 12px; }
.article-list { list-style: none; margin-bottom: 12px; }
.article-item { display: flex; justify-content: space-between; gap: 8px; padding: 6px 0; border-bottom: 1px solid #f0f0f0; font-size: 0.92rem; }
.article-title { color: #333; text-decoration: none; }
.article-meta { color: #888; white-space: nowrap; display: flex; gap: 8px; }
.more-articles { font-size: 0.85rem; color: #888; text-align: center; margin-bottom: 12px; }
.view-btn, .back-btn { display: inline-block; background: #667eea; color: #fff; border: none; border-radius: 8px; padding: 10px 16px; text-decoration: none; cursor: pointer; margin-top: 12px; }
.pagination { display: flex; flex-wrap: wrap; justify-content: center; gap: 6px; margin: 20px 0 8px; }
.page-btn { min-width: 36px; padding: 6px 10px; border-radius: 8px; background: #fff; color: #667eea; text-decoration: none; text-align: center; }
.page-btn.current { background: #667eea; color: #fff; font-weight: bold; }
.page-ellipsis { color: #fff; padding: 6px 4px; }
.pagination-info { text-align: center; color: #fff; font-size: 0.85rem; margin-bottom: 20px; }
.report-nav { padding: 12px 0; }
.back-link { color: #fff; text-decoration: none; }
.meta-card { background: #fff; border-radius: 12px; padding: 16px; margin-bottom: 16px; display: grid; grid-template-columns: repeat(auto-fit, minmax(160px, 1fr)); gap: 12px; }
.meta-item { display: flex; gap: 10px; align-items: center; }
.meta-icon { font-size: 1.4rem; }
.meta-label { font-size: 0.8rem; color: #888; }
.meta-value { font-weight: 600; }
.markdown-body { background: #fff; border-radius: 12px; padding: 20px; overflow-wrap: break-word; }
.markdown-body h1, .markdown-body h2, .markdown-body h3 { margin: 1.2em 0 0.6em; }
.markdown-body p, .markdown-body ul, .markdown-body ol, .markdown-body blockquote { margin-bottom: 0.9em; }
.markdown-body ul, .markdown-body ol { padding-left: 1.4em; }
.markdown-body blockquote { border-left: 4px solid #ddd; padding-left: 12px; color: #666; }
.markdown-body pre { background: #f6f8fa; border-radius: 8px; padding: 12px; overflow-x: auto; margin-bottom: 1em; }
.markdown-body code { font-family: SFMono-Regular, Consolas, Menlo, monospace; font-size: 0.88em; }
.markdown-body a { color: #667eea; }
.table-wrapper { margin-bottom: 1em; }
.markdown-body table { border-collapse: collapse; min-width: 100%; }
.markdown-body th, .markdown-body td { border: 1px solid #e1e4e8; padding: 6px 10px; }
@media (max-width: 600px) {
  .container { padding: 10px; }
  .article-item { flex-direction: column; }
  .markdown-body { padding: 14px; }
}
"#;

const SCROLL_TO_TOP: &str = "<script>window.scrollTo({ top: 0, behavior: 'smooth' });</script>";

fn document(title: &str, extra_css: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}{extra_css}</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>
"#,
        title = escape_html(title),
        css = BASE_CSS,
        extra_css = extra_css,
        body = body,
    )
}

pub fn index_document(page: &IndexPage, config: &ViewerConfig) -> String {
    let last_update = page
        .last_update
        .as_deref()
        .map(|text| format!("📅 最后更新：{}", escape_html(text)))
        .unwrap_or_default();

    let (body, script) = match &page.body {
        IndexBody::Empty => (
            r#"<div class="loading"><div>📭 暂无报告</div><div class="hint">等待首次分析...</div></div>"#
                .to_string(),
            "",
        ),
        IndexBody::Failed { message } => (
            format!(
                r#"<div class="error">
    <h3>⚠️ 加载失败</h3>
    <p>无法加载报告列表，请稍后重试</p>
    <p class="error-detail">{}</p>
    <button onclick="location.reload()" class="view-btn">🔄 刷新页面</button>
</div>"#,
                escape_html(message)
            ),
            "",
        ),
        IndexBody::Cards {
            cards,
            pagination,
            scroll_to_top,
        } => {
            let mut html: String = cards.iter().map(render_card).collect();
            if let Some(pagination) = pagination {
                html.push_str(&render_pagination(pagination));
            }
            (html, if *scroll_to_top { SCROLL_TO_TOP } else { "" })
        }
    };

    let body = format!(
        r#"<header class="site-header">
    <h1>🤖 {site}</h1>
    <p class="subtitle">Hacker News AI 热点洞察</p>
    <div id="last-update">{last_update}</div>
</header>
<main id="reports-container">
{body}
</main>
{script}"#,
        site = escape_html(&config.site_title),
        last_update = last_update,
        body = body,
        script = script,
    );

    document(&config.site_title, "", &body)
}

fn render_card(card: &ReportCard) -> String {
    format!(
        r#"<article class="report-card">
    <div class="report-header">
        <h2 class="report-date">📅 {date}</h2>
        <span class="report-time">⏰ {time}</span>
    </div>
    <p class="report-summary">{summary}</p>
    {articles}
    <a href="{href}" class="view-btn">📄 查看完整报告</a>
</article>
"#,
        date = escape_html(&card.date_label),
        time = escape_html(&card.time),
        summary = escape_html(&card.summary),
        articles = render_articles(&card.articles, card.remaining),
        href = escape_html(&card.report_href),
    )
}

fn render_articles(articles: &[ArticleItem], remaining: usize) -> String {
    if articles.is_empty() {
        return String::new();
    }

    let items: String = articles
        .iter()
        .map(|article| {
            format!(
                r#"<li class="article-item">
            <a href="{href}" target="_blank" rel="noopener" class="article-title" title="{full}">{title}</a>
            <span class="article-meta">
                <span class="hot-score">🔥 {points}</span>
                <span>💬 {comments}</span>
            </span>
        </li>"#,
                href = escape_html(&article.href),
                full = escape_html(&article.full_title),
                title = escape_html(&article.title),
                points = escape_html(&article.points),
                comments = article.comments,
            )
        })
        .collect();

    let more = if remaining > 0 {
        format!(r#"<p class="more-articles">还有 {} 篇文章 →</p>"#, remaining)
    } else {
        String::new()
    };

    format!(r#"<ul class="article-list">{}</ul>{}"#, items, more)
}

fn render_pagination(pagination: &PaginationView) -> String {
    let buttons: String = pagination
        .links
        .iter()
        .map(|link| {
            let href = escape_html(&link.href);
            match link.control {
                PageControl::Previous(_) => {
                    format!(r#"<a class="page-btn page-prev" href="{}">‹ 上一页</a>"#, href)
                }
                PageControl::Page { number, current: true } => format!(
                    r#"<span class="page-btn current" aria-current="page">{}</span>"#,
                    number
                ),
                PageControl::Page { number, .. } => {
                    format!(r#"<a class="page-btn" href="{}">{}</a>"#, href, number)
                }
                PageControl::Ellipsis => r#"<span class="page-ellipsis">…</span>"#.to_string(),
                PageControl::Next(_) => {
                    format!(r#"<a class="page-btn page-next" href="{}">下一页 ›</a>"#, href)
                }
            }
        })
        .collect();

    format!(
        r#"<nav class="pagination">{}</nav>
<div class="pagination-info">{}</div>"#,
        buttons,
        escape_html(&pagination.summary)
    )
}

/// Detail page for any state of the report lifecycle.
pub fn report_document(state: &DetailState, config: &ViewerConfig, highlight_css: &str) -> String {
    let (title, content) = match state {
        DetailState::Idle => (DEFAULT_TITLE.to_string(), String::new()),
        DetailState::Loading { .. } => (
            DEFAULT_TITLE.to_string(),
            r#"<div class="loading">
    <div class="spinner"></div>
    <div class="loading-text">正在加载报告...</div>
    <div class="hint">使用 pulldown-cmark + syntect 渲染</div>
</div>"#
                .to_string(),
        ),
        DetailState::Failed { title, message, .. } => (
            title.clone(),
            format!(
                r#"<div class="error-box">
    <h3>⚠️ {}</h3>
    <p>{}</p>
    <a href="index.html" class="back-btn">返回首页</a>
</div>"#,
                escape_html(title),
                escape_html(message)
            ),
        ),
        DetailState::Rendered(report) => (
            report.title.clone(),
            format!(
                "{}<div class=\"markdown-body\">\n{}</div>",
                render_meta(&report.meta),
                report.body_html
            ),
        ),
    };

    let body = format!(
        r#"<nav class="report-nav"><a href="index.html" class="back-link">← 返回首页</a></nav>
<main id="report-container">
{}
</main>"#,
        content
    );

    document(
        &format!("{} - {}", title, config.site_title),
        highlight_css,
        &body,
    )
}

fn render_meta(meta: &[MetaInfo]) -> String {
    if meta.is_empty() {
        return String::new();
    }
    let items: String = meta
        .iter()
        .map(|item| {
            format!(
                r#"<div class="meta-item">
        <span class="meta-icon">{}</span>
        <div>
            <div class="meta-label">{}</div>
            <div class="meta-value">{}</div>
        </div>
    </div>"#,
                item.icon,
                item.label,
                escape_html(&item.value)
            )
        })
        .collect();
    format!("<div class=\"meta-card\">{}</div>\n", items)
}
