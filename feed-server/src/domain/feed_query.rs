//! Typed feed query options and the plan they compile to.
//!
//! Raw request values never fail to parse here: anything unrecognized falls
//! back to a default so the feed always answers.

use crate::domain::post::Post;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    Likes,
    Views,
}

impl SortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("likes") => SortKey::Likes,
            Some("views") => SortKey::Views,
            _ => SortKey::CreatedAt,
        }
    }

    /// `views` only exists on some schemas; without it the feed sorts by time.
    pub fn resolve(self, has_views: bool) -> Self {
        match self {
            SortKey::Views if !has_views => SortKey::CreatedAt,
            other => other,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::Likes => "likes",
            SortKey::Views => "views",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Missing, unparsable or non-positive values take the defaults;
    /// `per_page` is capped at [`MAX_PER_PAGE`].
    pub fn from_raw(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let per_page = parse_positive(per_page)
            .unwrap_or(DEFAULT_PER_PAGE)
            .min(MAX_PER_PAGE);
        Self { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// One condition a post must satisfy to appear in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring of the content.
    ContentContains(String),
    CategoryIs(String),
    VisibilityIs(String),
    /// Substring of the raw tag field, case-sensitive.
    TagsContain(String),
    AuthorIs(i64),
}

impl Predicate {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Predicate::ContentContains(needle) => post
                .content
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Predicate::CategoryIs(category) => post.category.as_deref() == Some(category.as_str()),
            Predicate::VisibilityIs(visibility) => post.visibility == *visibility,
            Predicate::TagsContain(tag) => post
                .tags
                .as_deref()
                .is_some_and(|raw| raw.contains(tag.as_str())),
            Predicate::AuthorIs(author_id) => post.author_id == *author_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub visibility: Option<String>,
    pub tags: Vec<String>,
    pub author_id: Option<i64>,
}

impl PostFilter {
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(search) = &self.search {
            predicates.push(Predicate::ContentContains(search.clone()));
        }
        if let Some(category) = &self.category {
            predicates.push(Predicate::CategoryIs(category.clone()));
        }
        if let Some(visibility) = &self.visibility {
            predicates.push(Predicate::VisibilityIs(visibility.clone()));
        }
        predicates.extend(self.tags.iter().cloned().map(Predicate::TagsContain));
        if let Some(author_id) = self.author_id {
            predicates.push(Predicate::AuthorIs(author_id));
        }
        predicates
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub filter: PostFilter,
    pub sort: SortKey,
    pub order: SortOrder,
    pub pagination: Pagination,
}

impl FeedQuery {
    pub fn plan(&self, has_views: bool) -> QueryPlan {
        QueryPlan {
            predicates: self.filter.predicates(),
            sort: self.sort.resolve(has_views),
            order: self.order,
            limit: self.pagination.per_page,
            offset: self.pagination.offset(),
        }
    }
}

/// What the store executes: a conjunction of predicates, one sort key, one page.
///
/// The matching count is taken over `predicates` alone, ignoring the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub sort: SortKey,
    pub order: SortOrder,
    pub limit: u32,
    pub offset: u64,
}

impl QueryPlan {
    pub fn matches(&self, post: &Post) -> bool {
        self.predicates.iter().all(|p| p.matches(post))
    }
}
