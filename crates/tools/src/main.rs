use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compute::EventStatistics;
use foundation::parse_list;
use layers::Classifier;
use scene::RecordStore;
use tools::{ListFilter, list_lines, parse_script, replay, stats_lines};
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::{
    CONFIG_ENV, DATA_ENV, LoadState, NoAssets, Session, ViewerConfig, load_dataset,
    loader_for, source_for, startup_messages,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Defence diplomacy map tools")]
struct Args {
    /// Viewer config (JSON)
    #[arg(long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Dataset file or http(s) url; overrides the config
    #[arg(long, env = DATA_ENV)]
    data: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the records that pass the given filter
    List {
        /// Category to uncheck (repeatable)
        #[arg(long = "exclude-category")]
        exclude_categories: Vec<String>,

        /// Delivering country to uncheck (repeatable)
        #[arg(long = "exclude-country")]
        exclude_countries: Vec<String>,

        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Print the statistics panel
    Stats,

    /// Classify a category field and resolve country flags
    Classify {
        /// Raw category field, e.g. "Training; Arms control"
        category: String,

        /// Country to resolve to a flag (repeatable)
        #[arg(long)]
        country: Vec<String>,
    },

    /// Drive a headless session with a JSON script and print issued commands
    Replay {
        script: PathBuf,

        /// Skip loading icon assets; every icon uses its fallback
        #[arg(long)]
        no_assets: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let mut config = ViewerConfig::resolve(args.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(data) = args.data {
        config.data = data;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;

    match args.command {
        Command::List {
            exclude_categories,
            exclude_countries,
            search,
            year,
        } => {
            let mut store = rt.block_on(load_store(&config))?;
            let filter = ListFilter {
                exclude_categories,
                exclude_countries,
                search,
                year,
            };
            filter.apply(&mut store);
            println!("Events ({})", store.filtered_len());
            for line in list_lines(&store) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Stats => {
            let store = rt.block_on(load_store(&config))?;
            for line in stats_lines(&EventStatistics::compute(store.records())) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Classify { category, country } => {
            cmd_classify(&config, &category, &country);
            Ok(())
        }
        Command::Replay { script, no_assets } => {
            let text = std::fs::read_to_string(&script)
                .map_err(|e| format!("read {}: {e}", script.display()))?;
            let steps = parse_script(&text).map_err(|e| format!("parse {}: {e}", script.display()))?;

            let source = source_for(&config.data);
            let messages = if no_assets {
                rt.block_on(startup_messages(&config, source.as_ref(), &NoAssets))
            } else {
                let assets = loader_for(&config.asset_root);
                rt.block_on(startup_messages(&config, source.as_ref(), assets.as_ref()))
            };

            let mut session = Session::new(config);
            for m in messages {
                print_block(&format!("startup {}", m.name()), &session.handle(m));
            }
            if session.load_state() != LoadState::Loaded {
                return Err("dataset did not load".to_string());
            }
            for (name, commands) in replay(&mut session, &steps) {
                println!("{name}");
                for c in commands {
                    println!("  {c}");
                }
            }

            let snapshot = session.metrics().snapshot();
            info!(steps = steps.len(), "replay finished");
            println!("metrics");
            for (name, value) in snapshot.counters {
                println!("  {name} {value}");
            }
            for (name, value) in snapshot.gauges {
                println!("  {name} {value}");
            }
            Ok(())
        }
    }
}

async fn load_store(config: &ViewerConfig) -> Result<RecordStore, String> {
    let source = source_for(&config.data);
    let dataset = load_dataset(source.as_ref())
        .await
        .map_err(|e| e.to_string())?;
    Ok(RecordStore::from_dataset(dataset))
}

fn cmd_classify(config: &ViewerConfig, category: &str, countries: &[String]) {
    let classifier = Classifier::new(config.classifier.clone());
    let tokens = parse_list(Some(category));
    let key = classifier.classify(&tokens);
    println!("tokens  {tokens:?}");
    println!("icon    {key}");
    println!("url     {}", config.icons.url_for(key));
    for c in countries {
        let flag = config.flags.flag(c);
        println!(
            "flag    {c}: {} ({}), fallback {} {}",
            flag.key,
            flag.url,
            flag.fallback.letter,
            flag.fallback.css_color()
        );
    }
}

fn print_block(name: &str, commands: &[viewer::Command]) {
    println!("{name}");
    for c in commands {
        println!("  {}", c.summary());
    }
}
