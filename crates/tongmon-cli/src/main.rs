use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::{fs, io};

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use tongmon::clan::parser::parse_clan_detail;
use tongmon::clan::types::ClanDetailExtractedData;
use tongmon::scraper::WebScraper;
use tongmon::shop::parser::parse_shop_catalog;
use tongmon::shop::types::ShopCatalog;
use tongmon::types::ItemCategory;
use tongmon::utils::{ClanStats, RosterFilter};

#[derive(Parser)]
#[command(name = "tongmon")]
#[command(about = "A clan and guild-shop scraper for the Mộng Tu Tiên web client", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        short = 's',
        long = "session",
        global = true,
        help = "Session cookie sent with every request (ignored with --file)"
    )]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the clan detail page: roster, treasury, benefits and action bar
    Clan {
        #[arg(long, help = "Parse a saved HTML snapshot instead of fetching")]
        file: Option<PathBuf>,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,

        #[arg(long, help = "Append roll-up statistics (text output only)")]
        stats: bool,

        #[arg(long, help = "Only roster rows with this exact role")]
        role: Option<String>,

        #[arg(long, help = "Only members with weekly points above zero")]
        active_only: bool,

        #[arg(long, help = "Only members with at least this many weekly points")]
        min_points: Option<u64>,

        #[arg(
            long,
            help = "Maximum number of roster rows to keep",
            value_parser = clap::value_parser!(u16).range(1..)
        )]
        limit: Option<u16>,

        #[arg(
            long,
            help = "Number of roster rows to skip from the top",
            value_parser = clap::value_parser!(u16).range(1..)
        )]
        offset: Option<u16>,
    },
    /// Fetch the guild shop page: Tông Môn, Pháp Bảo and Đan Dược items
    Shop {
        #[arg(long, help = "Parse a saved HTML snapshot instead of fetching")]
        file: Option<PathBuf>,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,

        #[arg(
            long,
            value_parser = parse_category,
            help = "Keep only one item category (guild, artifact, elixir)"
        )]
        category: Option<ItemCategory>,
    },
}

fn parse_category(s: &str) -> Result<ItemCategory, String> {
    ItemCategory::from_str(s).map_err(|e| e.to_string())
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn read_snapshot(path: &PathBuf) -> String {
    fs::read_to_string(path).unwrap_or_else(|e: io::Error| {
        log::error!("Error reading {}: {}", path.display(), e);
        process::exit(1);
    })
}

fn build_scraper(session: Option<&str>) -> WebScraper {
    let scraper = match session {
        Some(cookie) => WebScraper::with_session(cookie),
        None => WebScraper::new(),
    };
    scraper.unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    })
}

fn filter_catalog(catalog: ShopCatalog, category: ItemCategory) -> ShopCatalog {
    ShopCatalog {
        guild_items: if category == ItemCategory::Guild {
            catalog.guild_items
        } else {
            Vec::new()
        },
        artifact_items: if category == ItemCategory::Artifact {
            catalog.artifact_items
        } else {
            Vec::new()
        },
        elixir_items: if category == ItemCategory::Elixir {
            catalog.elixir_items
        } else {
            Vec::new()
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    match cli.command {
        Commands::Clan {
            file,
            format,
            stats,
            role,
            active_only,
            min_points,
            limit,
            offset,
        } => {
            let filter = RosterFilter {
                role,
                active_only,
                min_weekly_points: min_points,
                limit: limit.map(usize::from),
                offset: offset.map(usize::from),
            }
            .validate()
            .unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let mut data: ClanDetailExtractedData = match file {
                Some(path) => parse_clan_detail(&read_snapshot(&path), Utc::now()),
                None => {
                    let scraper = build_scraper(cli.session.as_deref());
                    scraper.fetch_clan_detail().await.unwrap_or_else(|e| {
                        log::error!("Error fetching clan detail: {}", e);
                        process::exit(1);
                    })
                }
            };

            data.clan_detail.members = filter.apply(data.clan_detail.members);

            match format {
                OutputFormat::Json => serialize_json(&data),
                OutputFormat::Text => {
                    println!("{}", data);
                    if stats {
                        print!("{}", ClanStats::from_clan_detail(&data.clan_detail));
                    }
                }
            }
        }

        Commands::Shop {
            file,
            format,
            category,
        } => {
            let mut catalog = match file {
                Some(path) => parse_shop_catalog(&read_snapshot(&path)),
                None => {
                    let scraper = build_scraper(cli.session.as_deref());
                    scraper.fetch_shop_catalog().await.unwrap_or_else(|e| {
                        log::error!("Error fetching shop catalog: {}", e);
                        process::exit(1);
                    })
                }
            };

            if let Some(category) = category {
                catalog = filter_catalog(catalog, category);
            }

            match format {
                OutputFormat::Json => serialize_json(&catalog),
                OutputFormat::Text => {
                    if catalog.total_items() == 0 {
                        println!("No items to display.");
                    } else {
                        print!("{}", catalog);
                    }
                }
            }
        }
    }
}
