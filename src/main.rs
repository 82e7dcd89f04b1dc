use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use unifi_sdk::dom::{ChromeBrowser, HtmlBrowser};
use unifi_sdk::schema::{APIEndpoint, GenerateResult};
use unifi_sdk::{clientgen, codegen, discovery, output, parser, scraper};

#[derive(Parser)]
#[command(name = "typegen", about = "Generate Rust types from the UniFi API documentation")]
struct Cli {
    /// How pages are loaded
    #[arg(long, value_enum, global = true, default_value_t = Backend::Chrome)]
    backend: Backend,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Headless Chrome; renders client-side pages and expands collapsed sections
    Chrome,
    /// Plain HTTP fetch of the server-rendered HTML
    Static,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one endpoint page and print (or write) its types
    Scrape {
        /// Endpoint documentation URL
        #[arg(long)]
        url: String,
        /// Write the generated code here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Module name for endpoints without a category
        #[arg(long, default_value = "network")]
        package: String,
    },
    /// List every endpoint linked from the docs navigation
    Discover {
        /// Any page of the API docs, e.g. .../network/v10.0.162/gettingstarted
        #[arg(long)]
        base_url: String,
    },
    /// Discover, scrape and generate types for every endpoint
    Generate {
        #[arg(long)]
        base_url: String,
        #[arg(short, long, default_value = "generated")]
        output_dir: PathBuf,
        /// Concurrent browser workers
        #[arg(short = 'w', long, default_value_t = scraper::DEFAULT_WORKERS)]
        workers: usize,
        #[arg(long, default_value = "network")]
        package: String,
    },
    /// Generate API client methods from existing schema files
    Clients {
        /// Directory searched recursively for `*_schema.json`
        #[arg(short, long, default_value = "generated")]
        schema_dir: PathBuf,
        /// Defaults to the schema directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let backend = cli.backend;

    let result = match cli.command {
        Commands::Scrape { url, output, package } => {
            let code = tokio::task::spawn_blocking(move || scrape_one(backend, &url, &package)).await??;
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, code).with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", code),
            }
            Ok(())
        }
        Commands::Discover { base_url } => {
            let endpoints = tokio::task::spawn_blocking(move || discover(backend, &base_url)).await??;
            print_endpoints(&endpoints);
            Ok(())
        }
        Commands::Generate { base_url, output_dir, workers, package } => {
            let t_discover = Instant::now();
            let endpoints = tokio::task::spawn_blocking(move || discover(backend, &base_url)).await??;
            println!(
                "Discovered {} endpoints in {:.1}s",
                endpoints.len(),
                t_discover.elapsed().as_secs_f64()
            );

            let results = match backend {
                Backend::Chrome => scraper::generate_all(endpoints, workers, &package, ChromeBrowser::launch).await?,
                Backend::Static => scraper::generate_all(endpoints, workers, &package, HtmlBrowser::http).await?,
            };
            print_failures(&results);

            let stats = scraper::RunStats::from_results(&results);
            println!("Generation complete: {} succeeded, {} failed", stats.ok, stats.errors);

            let schemas = output::write_schemas(&output_dir, &results)?;
            let files = output::write_code(&output_dir, &results)?;
            println!(
                "Wrote {} schema files and {} source files to {}",
                schemas.len(),
                files.len(),
                output_dir.display()
            );
            for (category, count) in output::category_counts(&results) {
                println!("  {:<24} {:>4}", category, count);
            }

            if !schemas.is_empty() {
                let clients = clientgen::generate_clients(&output_dir, &output_dir)?;
                println!("Wrote {} client files", clients.len());
            }
            Ok(())
        }
        Commands::Clients { schema_dir, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| schema_dir.clone());
            let clients = clientgen::generate_clients(&schema_dir, &output_dir)?;
            println!("Wrote {} client files to {}", clients.len(), output_dir.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn scrape_one(backend: Backend, url: &str, package: &str) -> anyhow::Result<String> {
    let schema = match backend {
        Backend::Chrome => parser::scrape_url(&ChromeBrowser::launch()?, url)?,
        Backend::Static => parser::scrape_url(&HtmlBrowser::http()?, url)?,
    };
    let module = if schema.category.is_empty() { package } else { schema.category.as_str() };
    Ok(codegen::render(&schema, module))
}

fn discover(backend: Backend, base_url: &str) -> anyhow::Result<Vec<APIEndpoint>> {
    match backend {
        Backend::Chrome => discovery::discover_endpoints(&ChromeBrowser::launch()?, base_url),
        Backend::Static => discovery::discover_endpoints(&HtmlBrowser::http()?, base_url),
    }
}

fn print_endpoints(endpoints: &[APIEndpoint]) {
    let mut current: Option<&str> = None;
    for ep in endpoints {
        let category = if ep.category.is_empty() { "(uncategorized)" } else { ep.category.as_str() };
        if current != Some(category) {
            println!("\n{}", category);
            current = Some(category);
        }
        println!("  {:<40} {}", truncate(&ep.name, 40), ep.url);
    }
    println!("\n{} endpoints", endpoints.len());
}

fn print_failures(results: &[GenerateResult]) {
    for r in results.iter().filter(|r| !r.is_ok()) {
        println!(
            "FAILED: {} - {}",
            r.endpoint.name,
            r.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
