use std::collections::{HashMap, HashSet};

use url::form_urlencoded;

use crate::meta::MetaInfo;
use crate::pagination::PaginationControls;

/// Builds the URLs pages link to.
pub trait Linker: Send + Sync {
    fn index_page(&self, page: usize) -> String;
    fn report(&self, file: &str) -> String;
}

/// Links for the live server: `index.html?page=N` and `report.html?file=...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryLinks;

impl Linker for QueryLinks {
    fn index_page(&self, page: usize) -> String {
        if page <= 1 {
            "index.html".to_string()
        } else {
            format!("index.html?page={}", page)
        }
    }

    fn report(&self, file: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(file.as_bytes()).collect();
        format!("report.html?file={}", encoded)
    }
}

/// Links between exported files: `index.html`, `page-N.html`, `report-<slug>.html`.
///
/// Report names are resolved once for the whole index so that two reports
/// whose slugs collide still get distinct files.
#[derive(Debug, Clone, Default)]
pub struct StaticLinks {
    reports: HashMap<String, String>,
}

impl StaticLinks {
    /// Assign a unique output name to each distinct file, in order. Later
    /// collisions get a `-2`, `-3`... suffix.
    pub fn new<'a>(files: impl IntoIterator<Item = &'a str>) -> Self {
        let mut reports = HashMap::new();
        let mut taken = HashSet::new();
        for file in files {
            if reports.contains_key(file) {
                continue;
            }
            let slug = Self::report_slug(file);
            let mut name = format!("report-{}.html", slug);
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("report-{}-{}.html", slug, n);
                n += 1;
            }
            reports.insert(file.to_string(), name);
        }
        Self { reports }
    }

    /// Resolved `(file, output name)` pairs.
    pub fn reports(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.reports.iter().map(|(file, name)| (file.as_str(), name.as_str()))
    }

    /// Output file name for a report, flattened to one directory level.
    /// Not unique on its own, see [`StaticLinks::new`].
    pub fn report_file_name(file: &str) -> String {
        format!("report-{}.html", Self::report_slug(file))
    }

    fn report_slug(file: &str) -> String {
        let trimmed = file.trim_start_matches("./");
        let stem = trimmed
            .rsplit_once('.')
            .filter(|(stem, ext)| !stem.is_empty() && !ext.contains('/'))
            .map(|(stem, _)| stem)
            .unwrap_or(trimmed);
        stem.chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }

    pub fn index_file_name(page: usize) -> String {
        if page <= 1 {
            "index.html".to_string()
        } else {
            format!("page-{}.html", page)
        }
    }
}

impl Linker for StaticLinks {
    fn index_page(&self, page: usize) -> String {
        Self::index_file_name(page)
    }

    fn report(&self, file: &str) -> String {
        self.reports
            .get(file)
            .cloned()
            .unwrap_or_else(|| Self::report_file_name(file))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleItem {
    pub title: String,
    /// Untruncated title, used as tooltip.
    pub full_title: String,
    pub href: String,
    pub points: String,
    pub comments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCard {
    pub date_label: String,
    pub time: String,
    pub summary: String,
    pub articles: Vec<ArticleItem>,
    /// Articles not shown on the card.
    pub remaining: usize,
    pub report_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub control: crate::pagination::PageControl,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub links: Vec<PageLink>,
    pub summary: String,
}

impl PaginationView {
    pub fn new(controls: &PaginationControls, linker: &dyn Linker) -> Self {
        use crate::pagination::PageControl;

        let links = controls
            .items
            .iter()
            .map(|control| {
                let href = match control {
                    PageControl::Previous(n) | PageControl::Next(n) => linker.index_page(*n),
                    PageControl::Page { number, .. } => linker.index_page(*number),
                    PageControl::Ellipsis => String::new(),
                };
                PageLink { control: *control, href }
            })
            .collect();
        Self {
            links,
            summary: controls.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBody {
    Empty,
    Failed { message: String },
    Cards {
        cards: Vec<ReportCard>,
        pagination: Option<PaginationView>,
        scroll_to_top: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub last_update: Option<String>,
    pub body: IndexBody,
}

impl IndexPage {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            last_update: None,
            body: IndexBody::Failed { message: message.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub title: String,
    pub meta: Vec<MetaInfo>,
    pub body_html: String,
}

/// Detail page lifecycle: `Idle -> Loading -> Rendered | Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Idle,
    Loading { file: String },
    Rendered(RenderedReport),
    Failed {
        title: String,
        message: String,
        status: u16,
    },
}

impl DetailState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DetailState::Rendered(_) | DetailState::Failed { .. })
    }

    /// HTTP status a server should use for this state.
    pub fn status(&self) -> u16 {
        match self {
            DetailState::Failed { status, .. } => *status,
            _ => 200,
        }
    }
}
