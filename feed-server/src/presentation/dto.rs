use crate::application::aggregate_service::DEFAULT_POPULAR_TAGS;
use crate::domain::feed_query::{FeedQuery, Pagination, PostFilter, SortKey, SortOrder};
use crate::domain::post::NewPost;
use crate::domain::profile::ProfileChanges;
use serde::{Deserialize, Deserializer, Serialize};

// ======================= FEED =======================

/// Feed query string as sent by clients, before normalization.
///
/// Read from raw pairs so that `tags` can repeat (`tags=a&tags=b`, or the
/// `tags[]=a` spelling).
#[derive(Debug, Default)]
pub struct ListPostsParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub visibility: Option<String>,
    pub tags: Vec<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub user_id: Option<String>,
}

impl ListPostsParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "search" => params.search = Some(value),
                "category" => params.category = Some(value),
                "visibility" => params.visibility = Some(value),
                "tags" | "tags[]" => params.tags.push(value),
                "sort" => params.sort = Some(value),
                "order" => params.order = Some(value),
                "page" => params.page = Some(value),
                "per_page" => params.per_page = Some(value),
                "user_id" => params.user_id = Some(value),
                _ => {}
            }
        }
        params
    }

    /// Blank filters are dropped; sort and paging fall back to defaults.
    pub fn into_query(self) -> FeedQuery {
        let filter = PostFilter {
            search: non_blank(self.search),
            category: non_blank(self.category),
            visibility: non_blank(self.visibility),
            tags: self
                .tags
                .into_iter()
                .filter_map(|tag| non_blank(Some(tag)))
                .collect(),
            author_id: non_blank(self.user_id).and_then(|raw| raw.parse().ok()),
        };

        FeedQuery {
            filter,
            sort: SortKey::parse(self.sort.as_deref()),
            order: SortOrder::parse(self.order.as_deref()),
            pagination: Pagination::from_raw(self.page.as_deref(), self.per_page.as_deref()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct PopularTagsQuery {
    pub limit: Option<String>,
}

impl PopularTagsQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_POPULAR_TAGS)
    }
}

// ======================= POSTS =======================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
}

impl CreatePostRequest {
    pub fn into_new_post(self, author_id: i64) -> NewPost {
        NewPost::new(
            author_id,
            self.content,
            self.media_url,
            self.tags,
            self.category,
            self.visibility,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: i64,
}

// ======================= COMMENTS =======================

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

// ======================= PROFILES =======================

/// Partial profile edit. A key that is absent leaves the field alone; a key
/// sent as `null` or `""` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "sent")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub skills: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub experience: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub education: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub job_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent")]
    pub social_links: Option<Option<String>>,
}

fn sent<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            bio: req.bio,
            location: req.location,
            skills: req.skills,
            experience: req.experience,
            education: req.education,
            job_title: req.job_title,
            company: req.company,
            social_links: req.social_links,
        }
    }
}
