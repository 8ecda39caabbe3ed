//! Snapshot preview tool.
//!
//! Fetches a path once with a crawler User-Agent and once with a browser
//! User-Agent, and reports what each client receives. Quick answer to
//! "what does Googlebot actually see on this route?".

use clap::Parser;
use reqwest::header::{HeaderValue, USER_AGENT};

const CRAWLER_UA: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Parser)]
#[command(name = "prerender-check")]
#[command(about = "Compare what a crawler and a browser receive for a route", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Route to check.
    #[arg(short, long, default_value = "/")]
    path: String,

    /// Override the crawler User-Agent.
    #[arg(long, default_value = CRAWLER_UA)]
    crawler_ua: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let target = format!("{}{}", cli.url.trim_end_matches('/'), cli.path);

    let crawler = fetch(&client, &target, &cli.crawler_ua).await?;
    let browser = fetch(&client, &target, BROWSER_UA).await?;

    println!("GET {}", target);
    println!();
    print_fetch("crawler", &cli.crawler_ua, &crawler);
    print_fetch("browser", BROWSER_UA, &browser);

    if crawler.prerender_hit {
        println!("Crawlers receive the prerendered snapshot for this route.");
    } else if crawler.body_len == browser.body_len {
        println!("Both clients receive the same document; no snapshot was served.");
    } else {
        println!("No snapshot header, but responses differ; check the route allow-list.");
    }

    Ok(())
}

struct Fetch {
    status: u16,
    cache_control: Option<String>,
    prerender_hit: bool,
    body_len: usize,
}

async fn fetch(
    client: &reqwest::Client,
    url: &str,
    user_agent: &str,
) -> Result<Fetch, reqwest::Error> {
    let response = client
        .get(url)
        .header(USER_AGENT, HeaderValue::from_str(user_agent).unwrap_or(HeaderValue::from_static("")))
        .send()
        .await?;

    let status = response.status().as_u16();
    let cache_control = response
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let prerender_hit = response
        .headers()
        .get("x-prerender")
        .map(|v| v == "hit")
        .unwrap_or(false);
    let body_len = response.bytes().await?.len();

    Ok(Fetch {
        status,
        cache_control,
        prerender_hit,
        body_len,
    })
}

fn print_fetch(label: &str, user_agent: &str, fetch: &Fetch) {
    println!("[{}] {}", label, user_agent);
    println!("  status:        {}", fetch.status);
    println!(
        "  cache-control: {}",
        fetch.cache_control.as_deref().unwrap_or("(none)")
    );
    println!(
        "  x-prerender:   {}",
        if fetch.prerender_hit { "hit" } else { "(none)" }
    );
    println!("  body bytes:    {}", fetch.body_len);
    println!();
}
