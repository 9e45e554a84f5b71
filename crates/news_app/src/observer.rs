use std::io::Write;

use news_core::{ArticleRecord, FailureReason};
use news_engine::LoadObserver;
use news_logging::news_warn;

/// Prints delivered articles, or the matching empty-state message.
pub struct TerminalObserver<W: Write> {
    out: W,
}

impl<W: Write> TerminalObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            news_warn!("Failed to write output: {}", err);
        }
    }
}

impl<W: Write> LoadObserver for TerminalObserver<W> {
    fn on_load_finished(&mut self, articles: &[ArticleRecord]) {
        if articles.is_empty() {
            self.emit("No news found.\n");
            return;
        }
        let mut text = String::new();
        for (index, article) in articles.iter().enumerate() {
            text.push_str(&format_article(index + 1, article));
        }
        self.emit(&text);
    }

    fn on_load_failed(&mut self, reason: &FailureReason) {
        let message = match reason {
            FailureReason::NoConnectivity => "No network access.\n".to_string(),
            FailureReason::Fetch(err) => format!("Could not load news: {err}\n"),
        };
        self.emit(&message);
    }
}

fn format_article(position: usize, article: &ArticleRecord) -> String {
    let mut details = vec![article.section()];
    if !article.author().is_empty() {
        details.push(article.author());
    }
    if !article.published_date().is_empty() {
        details.push(article.published_date());
    }
    format!(
        "{position:>2}. {}\n    {}\n    {}\n",
        article.title(),
        details.join(" | "),
        article.url()
    )
}
