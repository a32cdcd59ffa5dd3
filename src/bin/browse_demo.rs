//! Walkthrough of one browsing session. Runs against the bundled fixture
//! archive by default; set NEWSSTAND_BASE_URL to browse a live export.

use std::sync::Arc;
use std::time::Duration;

use newsstand::article::reading_content;
use newsstand::catalog::{Catalog, MonthKey};
use newsstand::config::{self, ENV_BASE_URL};
use newsstand::{Article, BrowseConfig, BrowseSession, BrowseView, FixtureFetcher, ReadingContent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let _ = dotenvy::dotenv();

    let mut cfg = config::load_default()?;
    let live = std::env::var(ENV_BASE_URL).is_ok();

    if live {
        let session = BrowseSession::from_config(&cfg);
        let view = session.initialize().await?;
        print_view("live archive", &view);
        if let Some(article) = session.open_reader(0) {
            print_reading(&article);
        }
        println!("browse-demo done");
        return Ok(());
    }

    // Small pages so the walkthrough shows paging on the tiny fixture set.
    cfg.page_size = 3;
    let session = fixture_session(&cfg)?;

    let view = session.initialize().await?;
    print_view("initialized, latest month", &view);

    session.select_month("2024-01".parse()?).await;
    print_view("switched to 2024-01", &session.view());

    session.set_page(99);
    print_view("asked for page 99", &session.view());

    let (first, second) = tokio::join!(session.set_query_debounced("lau"), async {
        tokio::time::sleep(Duration::from_millis(60)).await;
        session.set_query_debounced("launch").await
    });
    println!("debounce: 'lau' committed={first}, 'launch' committed={second}");
    print_view("searched for 'launch'", &session.view());

    session.set_query("");
    session.toggle_source("Harbor Dispatch");
    print_view("unticked Harbor Dispatch", &session.view());

    if let Some(article) = session.open_reader(0) {
        print_reading(&article);
    }
    while let Some(article) = session.advance_reader(1) {
        print_reading(&article);
    }

    println!("browse-demo done");
    Ok(())
}

fn fixture_session(cfg: &BrowseConfig) -> anyhow::Result<BrowseSession> {
    let catalog: Catalog = serde_json::from_str(include_str!("../../tests/fixtures/catalog.json"))?;
    let january: Vec<Article> =
        serde_json::from_str(include_str!("../../tests/fixtures/month_2024_01.json"))?;
    let february: Vec<Article> =
        serde_json::from_str(include_str!("../../tests/fixtures/month_2024_02.json"))?;
    let fetcher = Arc::new(
        FixtureFetcher::new()
            .with_catalog(catalog)
            .with_month("2024-01".parse()?, january)
            .with_month("2024-02".parse()?, february),
    );
    Ok(BrowseSession::new(fetcher, cfg))
}

fn print_view(tag: &str, view: &BrowseView) {
    let month = view
        .selected_month
        .as_ref()
        .map(MonthKey::as_str)
        .unwrap_or("-");
    println!(
        "== {tag}: month {month}, {} match(es), page {}/{} ==",
        view.filtered_len, view.page, view.total_pages
    );
    for article in &view.page_articles {
        println!("   {} [{}]", article.title, meta_line(article));
    }
}

fn meta_line(article: &Article) -> String {
    let mut meta = String::new();
    if !article.author.is_empty() {
        meta.push_str(&article.author);
        meta.push_str(" · ");
    }
    meta.push_str(&article.published_at);
    meta.push_str(" · ");
    meta.push_str(&article.source);
    meta
}

fn print_reading(article: &Article) {
    match reading_content(article) {
        ReadingContent::Html(html) => {
            println!("   reader: {} -> html body, {} chars", article.title, html.len());
        }
        ReadingContent::Text(paragraphs) => {
            println!(
                "   reader: {} -> text body, {} paragraph(s)",
                article.title,
                paragraphs.len()
            );
        }
        ReadingContent::LinkOnly(url) => {
            println!("   reader: {} -> read at {url}", article.title);
        }
    }
}
