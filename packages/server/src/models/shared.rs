use serde::Serialize;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 5)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page.max(1)),
        }
    }
}

/// Normalize 1-based page parameters: page >= 1, per_page in 1..=100.
pub fn page_params(page: Option<u64>, per_page: Option<u64>, default_per_page: u64) -> (u64, u64) {
    let page = Ord::max(page.unwrap_or(1), 1);
    let per_page = per_page.unwrap_or(default_per_page).clamp(1, 100);
    (page, per_page)
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Validate a trimmed movie title (5-80 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), String> {
    let len = title.trim().chars().count();
    if !(5..=80).contains(&len) {
        return Err("Title must be 5-80 characters".into());
    }
    Ok(())
}

/// Validate an absolute http(s) image URL.
pub fn validate_image_url(url: &str) -> Result<(), String> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host_and_path)
            if !host_and_path.is_empty()
                && url.len() <= 2048
                && !url.chars().any(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err("Image must be an http(s) URL of at most 2048 characters".into()),
    }
}
