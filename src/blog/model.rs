//! Blog content store.
//!
//! Posts are defined in code and never change at runtime.

use chrono::NaiveDate;
use serde::Serialize;

/// Default page size for the recent-posts listing.
pub const DEFAULT_RECENT_LIMIT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub excerpt: String,
    pub published_at: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDate>,
    pub author: Author,
    pub tags: Vec<String>,
    pub reading_time: String,
    pub featured: bool,
}

/// Read-only collection of posts.
#[derive(Debug, Clone, Default)]
pub struct BlogStore {
    posts: Vec<BlogPost>,
}

impl BlogStore {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self { posts }
    }

    /// The posts published on the site.
    pub fn builtin() -> Self {
        Self::new(vec![BlogPost {
            slug: "spec-driven-development".into(),
            title: "Spec-Driven Development: How I 10x'd My Development Speed with AI".into(),
            description: "Learn how Spec-Driven Development (SDD) transformed my workflow, \
                comparing spec-kit for enterprise projects and OpenSpec for smaller teams."
                .into(),
            excerpt: "Discover how writing specifications before code dramatically accelerates \
                development when working with AI coding assistants. A practical comparison \
                of spec-kit and OpenSpec tools."
                .into(),
            published_at: NaiveDate::from_ymd_opt(2026, 1, 7).unwrap_or_default(),
            updated_at: None,
            author: Author {
                name: "Josip Budalic".into(),
                role: "Founder & CEO".into(),
            },
            tags: [
                "Spec-Driven Development",
                "AI",
                "Productivity",
                "spec-kit",
                "OpenSpec",
                "Development Workflow",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            reading_time: "8 min read".into(),
            featured: true,
        }])
    }

    pub fn get(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    pub fn featured(&self) -> Vec<&BlogPost> {
        self.posts.iter().filter(|post| post.featured).collect()
    }

    /// Newest first, at most `limit` posts.
    pub fn recent(&self, limit: usize) -> Vec<&BlogPost> {
        let mut posts: Vec<&BlogPost> = self.posts.iter().collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts.truncate(limit);
        posts
    }
}

/// Long-form US date, e.g. "January 7, 2026".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
