/// One news article as delivered to the consumer.
///
/// `title`, `section` and `url` are always populated by the parser; `author`
/// and `published_date` may be empty but are never absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleRecord {
    title: String,
    section: String,
    url: String,
    author: String,
    published_date: String,
}

impl ArticleRecord {
    pub fn new(
        title: impl Into<String>,
        section: impl Into<String>,
        url: impl Into<String>,
        author: impl Into<String>,
        published_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            section: section.into(),
            url: url.into(),
            author: author.into(),
            published_date: published_date.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Navigation target for this article.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Date portion (`YYYY-MM-DD`) of the publication timestamp.
    pub fn published_date(&self) -> &str {
        &self.published_date
    }
}
