// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use review_insights::loader::{parse_range_end, parse_timestamp};
use review_insights::{
    build_engine, logging, write_reviews_csv, AppConfig, FilterOptions, Rating, ReviewEngine,
    ReviewView, Sentiment, TimePeriod,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "review-insights", version, about = "Customer review analytics")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, env = "REVIEW_INSIGHTS_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Dashboard statistics
    Stats(FilterArgs),
    /// One page of reviews, newest first
    Reviews {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// List regions
    Regions,
    /// List branches, optionally for one region code
    Branches {
        #[arg(long)]
        region: Option<String>,
    },
    /// Search branches by name, city or address
    Search { query: String },
    /// Write the matching reviews to CSV
    Export {
        output: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Interactive terminal dashboard (default)
    Ui(FilterArgs),
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Region code, e.g. NE
    #[arg(long)]
    region: Option<String>,
    /// Branch id
    #[arg(long)]
    branch: Option<String>,
    /// Star ratings, comma separated
    #[arg(long, value_delimiter = ',')]
    rating: Vec<Rating>,
    /// positive, neutral or negative; comma separated
    #[arg(long, value_delimiter = ',')]
    sentiment: Vec<Sentiment>,
    /// 7days, 30days, 90days, 1year or all
    #[arg(long)]
    period: Option<TimePeriod>,
    /// Start of a custom range (RFC 3339 or YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<String>,
    #[arg(long, requires = "from")]
    to: Option<String>,
}

impl FilterArgs {
    fn resolve(&self, engine: &ReviewEngine) -> Result<FilterOptions> {
        let mut filters = FilterOptions::new()
            .ratings(self.rating.iter().copied())
            .sentiments(self.sentiment.iter().copied());

        if let Some(code) = &self.region {
            let region = engine
                .get_region(code)
                .with_context(|| format!("Unknown region code: {}", code))?;
            filters = filters.region(region.id.clone());
        }
        if let Some(branch) = &self.branch {
            filters = filters.branch(branch.clone());
        }
        if let Some(period) = self.period {
            filters = filters.period(period);
        }
        if let (Some(from), Some(to)) = (&self.from, &self.to) {
            let start =
                parse_timestamp(from).with_context(|| format!("Bad --from date: {}", from))?;
            // a plain --to date includes that whole day
            let end = parse_range_end(to).with_context(|| format!("Bad --to date: {}", to))?;
            if start > end {
                bail!("--from must not be after --to");
            }
            filters = filters.date_range(start, end);
        }
        Ok(filters)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(&config.log_level, false);

    let engine = build_engine(&config)?;
    let command = cli.command.unwrap_or(Command::Ui(FilterArgs::default()));

    match command {
        Command::Stats(args) => run_stats(&engine, &args.resolve(&engine)?, cli.json),
        Command::Reviews { filters, page, page_size } => {
            let filters = filters.resolve(&engine)?;
            let page_size = page_size.unwrap_or(config.default_page_size);
            run_reviews(&engine, &filters, page, page_size, cli.json)
        }
        Command::Regions => run_regions(&engine, cli.json),
        Command::Branches { region } => run_branches(&engine, region.as_deref(), cli.json),
        Command::Search { query } => run_search(&engine, &config, &query, cli.json),
        Command::Export { output, filters } => {
            run_export(&engine, &filters.resolve(&engine)?, &output)
        }
        Command::Ui(args) => {
            let filters = args.resolve(&engine)?;
            run_ui_mode(engine, filters)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_stats(engine: &ReviewEngine, filters: &FilterOptions, json: bool) -> Result<()> {
    let stats = engine.compute_dashboard_stats(filters);
    if json {
        return print_json(&stats);
    }

    println!("📊 Review Dashboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total reviews:  {}", stats.total_reviews);
    println!("Average rating: {:.1}", stats.average_rating);

    println!("\n⭐ Ratings");
    for bucket in stats.rating_distribution.iter().rev() {
        println!(
            "  {} stars  {:>5}  {:>5.1}%",
            bucket.rating, bucket.count, bucket.percentage
        );
    }

    println!("\n💬 Sentiment");
    for bucket in &stats.sentiment_distribution {
        println!(
            "  {:<9} {:>5}  {:>5.1}%",
            bucket.sentiment.label(),
            bucket.count,
            bucket.percentage
        );
    }

    println!("\n📈 Monthly trends");
    for trend in &stats.monthly_trends {
        println!(
            "  {:<9} {:>5} reviews  avg {:.1}",
            trend.month, trend.review_count, trend.average_rating
        );
    }
    Ok(())
}

fn run_reviews(
    engine: &ReviewEngine,
    filters: &FilterOptions,
    page: usize,
    page_size: usize,
    json: bool,
) -> Result<()> {
    let result = engine.list_reviews(page, page_size, filters);
    if json {
        let views: Vec<ReviewView> = result.reviews.iter().map(ReviewView::from).collect();
        return print_json(&views);
    }

    println!(
        "📝 Reviews - page {}/{} ({} matching)",
        result.page,
        result.page_count().max(1),
        result.total_count
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for review in &result.reviews {
        println!(
            "{}  {:<20} {}  {:<8} {}",
            review.date.format("%Y-%m-%d"),
            review.branch_name,
            review.rating,
            review.sentiment().label(),
            review.content
        );
    }
    Ok(())
}

fn run_regions(engine: &ReviewEngine, json: bool) -> Result<()> {
    if json {
        return print_json(&engine.list_regions());
    }
    for region in engine.list_regions() {
        println!(
            "{:<3} {:<12} {:>2} branches  {:>4} reviews  avg {:.1}",
            region.code,
            region.name,
            region.branch_count,
            region.review_count,
            region.average_rating
        );
    }
    Ok(())
}

fn run_branches(engine: &ReviewEngine, region_code: Option<&str>, json: bool) -> Result<()> {
    let branches = match region_code {
        Some(code) => {
            let region = engine
                .get_region(code)
                .with_context(|| format!("Unknown region code: {}", code))?;
            engine.list_branches_by_region(&region.id)
        }
        None => engine.list_branches().iter().collect(),
    };

    if json {
        return print_json(&branches);
    }
    for branch in branches {
        println!(
            "{:>3}  {:<20} {:<12} {:>4} reviews  avg {:.1}",
            branch.id, branch.name, branch.region_name, branch.review_count, branch.average_rating
        );
    }
    Ok(())
}

fn run_search(engine: &ReviewEngine, config: &AppConfig, query: &str, json: bool) -> Result<()> {
    if !config.accepts_search(query) {
        bail!("Search needs at least {} characters", config.search_min_chars);
    }
    let hits = engine.search_branches(query.trim());
    if json {
        return print_json(&hits);
    }
    if hits.is_empty() {
        println!("No branches match '{}'", query);
    }
    for branch in hits {
        println!("{:>3}  {:<20} {}, {}", branch.id, branch.name, branch.address, branch.city);
    }
    Ok(())
}

fn run_export(engine: &ReviewEngine, filters: &FilterOptions, output: &Path) -> Result<()> {
    let matching = engine.filtered_reviews_at(filters, chrono::Utc::now());
    let written = write_reviews_csv(output, matching)
        .with_context(|| format!("Failed to write {:?}", output))?;
    println!("✓ Exported {} reviews to {:?}", written, output);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(engine: ReviewEngine, filters: FilterOptions) -> Result<()> {
    println!("🖥️  Loading Review Insights UI...\n");
    let mut app = ui::App::new(engine, filters);
    ui::run_ui(&mut app)?;
    println!("\n✅ UI closed successfully");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_engine: ReviewEngine, _filters: FilterOptions) -> Result<()> {
    bail!("TUI mode not available; rebuild with --features tui or use another subcommand")
}
