use clap::{Parser, Subcommand};
use se_app::{
    AppError, AppResult, Selection, SelectionQuery, Session, SessionConfig, select, tabs,
};
use se_catalog::{Catalog, ParentStage, SubStage, parent_stages};
use se_core::StepNumber;
use se_history::{MilestoneKind, ProfileQuery};
use se_store::DataStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "se-cli")]
#[command(about = "Stellar evolution explorer - stages, example models and milestones", long_about = None)]
struct Cli {
    /// Session config YAML file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Catalog YAML file (defaults to the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the parent stages in flowchart order
    Stages,
    /// List substages, optionally filtered by mass range or stage
    Substages {
        /// Mass range in solar masses, e.g. 0.8-1.5
        #[arg(long, conflicts_with = "stage")]
        mass_range: Option<String>,
        /// Parent stage key, short name or full name
        #[arg(long)]
        stage: Option<String>,
    },
    /// List the selectable mass ranges
    MassRanges,
    /// Resolve a substage and its example model
    Select {
        /// Mass range in solar masses, e.g. 0.8-1.5
        #[arg(long, conflicts_with = "stage", required_unless_present = "stage")]
        mass_range: Option<String>,
        /// Parent stage key, short name or full name
        #[arg(long)]
        stage: Option<String>,
        /// Substage id (defaults to the first candidate)
        #[arg(long)]
        substage: Option<String>,
    },
    /// Print the milestones of one evolution series
    Milestones {
        /// Data store directory
        #[arg(long)]
        data: Option<PathBuf>,
        /// Initial mass in solar masses
        #[arg(long)]
        mass: f64,
    },
    /// Resolve a stored structural snapshot
    Profile {
        /// Data store directory
        #[arg(long)]
        data: Option<PathBuf>,
        /// Initial mass in solar masses
        #[arg(long)]
        mass: f64,
        /// 0-based series index
        #[arg(long)]
        index: Option<usize>,
        /// 1-based step number
        #[arg(long)]
        step: Option<u32>,
        /// Star age in years
        #[arg(long)]
        age: Option<f64>,
        /// Move this many stored snapshots forward (negative: backward)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        skip: i64,
    },
    /// Load every example model of the catalog
    Preload {
        /// Data store directory
        #[arg(long)]
        data: Option<PathBuf>,
        /// Read histories for different masses in parallel
        #[arg(long)]
        parallel: bool,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load_yaml(path)?,
        None => SessionConfig::default(),
    };
    if cli.catalog.is_some() {
        config.catalog = cli.catalog.clone();
    }

    match cli.command {
        Commands::Stages => cmd_stages(),
        Commands::Substages { mass_range, stage } => {
            cmd_substages(&config, mass_range.as_deref(), stage.as_deref())
        }
        Commands::MassRanges => cmd_mass_ranges(&config),
        Commands::Select {
            mass_range,
            stage,
            substage,
        } => cmd_select(
            &config,
            mass_range.as_deref(),
            stage.as_deref(),
            substage.as_deref(),
        ),
        Commands::Milestones { data, mass } => {
            let store = open_store(&config, data.as_deref())?;
            cmd_milestones(store, config, mass)
        }
        Commands::Profile {
            data,
            mass,
            index,
            step,
            age,
            skip,
        } => {
            let step = step
                .map(|n| {
                    StepNumber::new(n)
                        .ok_or_else(|| AppError::InvalidInput("--step starts at 1".to_string()))
                })
                .transpose()?;
            let query = ProfileQuery {
                index,
                step,
                age,
                skip,
            };
            let store = open_store(&config, data.as_deref())?;
            cmd_profile(store, config, mass, &query)
        }
        Commands::Preload { data, parallel } => {
            let store = open_store(&config, data.as_deref())?;
            cmd_preload(store, config, parallel)
        }
    }
}

fn open_store(config: &SessionConfig, data: Option<&Path>) -> AppResult<DataStore> {
    let dir = data.or(config.data_dir.as_deref()).ok_or_else(|| {
        AppError::InvalidInput("no data directory: pass --data or set data_dir".to_string())
    })?;
    Ok(DataStore::open(dir)?)
}

fn parse_query(mass_range: Option<&str>, stage: Option<&str>) -> AppResult<SelectionQuery> {
    match (mass_range, stage) {
        (Some(_), Some(_)) => Err(AppError::InvalidInput(
            "give either a mass range or a stage, not both".to_string(),
        )),
        (Some(range), None) => Ok(SelectionQuery::MassFirst(range.parse()?)),
        (None, Some(name)) => ParentStage::from_name(name)
            .map(SelectionQuery::StageFirst)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown stage: {}", name))),
        (None, None) => Ok(SelectionQuery::NoSelection),
    }
}

fn cmd_stages() -> AppResult<()> {
    for info in parent_stages() {
        println!(
            "  {} {:<24} {:<8} {}",
            info.ordinal, info.key, info.short_name, info.full_name
        );
    }
    Ok(())
}

fn print_substage(substage: &SubStage) {
    let models: Vec<String> = substage
        .models
        .iter()
        .map(|m| {
            let marker = if m.is_default { "*" } else { "" };
            format!("{}@{}{}", m.mass, m.model_example, marker)
        })
        .collect();
    println!(
        "  {:<16} {:<24} {:.1}-{:.1} Msun  [{}]",
        substage.id,
        substage.parent_stage.full_name(),
        substage.mass_min,
        substage.mass_max,
        models.join(", ")
    );
}

fn cmd_substages(
    config: &SessionConfig,
    mass_range: Option<&str>,
    stage: Option<&str>,
) -> AppResult<()> {
    let catalog = config.load_catalog()?;
    let query = parse_query(mass_range, stage)?;
    let substages: Vec<&SubStage> = match query {
        SelectionQuery::NoSelection => catalog.substages().iter().collect(),
        _ => se_app::available_substages(&catalog, &query),
    };

    if substages.is_empty() {
        println!("No substages match");
    }
    for substage in substages {
        print_substage(substage);
    }
    Ok(())
}

fn cmd_mass_ranges(config: &SessionConfig) -> AppResult<()> {
    let catalog = config.load_catalog()?;
    for range in catalog.mass_range_options() {
        let count = catalog.filter_by_mass_range(&range).len();
        println!("  {:<10} {} substages", range.to_string(), count);
    }
    Ok(())
}

fn cmd_select(
    config: &SessionConfig,
    mass_range: Option<&str>,
    stage: Option<&str>,
    substage: Option<&str>,
) -> AppResult<()> {
    let catalog: Catalog = config.load_catalog()?;
    let query = parse_query(mass_range, stage)?;

    let candidates = tabs(&catalog, &query);
    if !candidates.is_empty() {
        println!("Candidates:");
        for tab in &candidates {
            println!("  {:<16} {}", tab.substage.id, tab.label);
        }
    }

    match select(&catalog, &query, substage) {
        Selection::NoSelection => println!("No selection"),
        Selection::NoModelAvailable { substage } => {
            println!("{}: no example model for this query", substage.id)
        }
        Selection::Resolved { substage, model } => {
            println!("Selected {} ({})", substage.id, substage.parent_stage);
            println!("  {}", substage.text.plot_text);
            println!(
                "  example: M = {} Msun, step {}{}",
                model.mass,
                model.model_example,
                if model.is_default { " (default)" } else { "" }
            );
            if let Some((start, end)) = model.extent() {
                println!("  extent: steps {}..={}", start, end);
            }
        }
    }
    Ok(())
}

fn cmd_milestones(store: DataStore, config: SessionConfig, mass: f64) -> AppResult<()> {
    let mut session = Session::with_config(store, config);
    let history = session.get_history(mass)?;

    println!(
        "M = {} Msun: {} steps, {} snapshots",
        mass,
        history.len(),
        history.available_steps().len()
    );
    for kind in MilestoneKind::ALL {
        println!("  {:<12} {}", kind.label(), history.milestones().get(kind));
    }
    Ok(())
}

fn cmd_profile(
    store: DataStore,
    config: SessionConfig,
    mass: f64,
    query: &ProfileQuery,
) -> AppResult<()> {
    let mut session = Session::with_config(store, config);
    let profile = session.get_profile(mass, query)?;

    println!(
        "M = {} Msun, step {} (index {}), age {:.6e} yr, total mass {} Msun",
        profile.mass,
        profile.step,
        profile.index(),
        profile.age,
        profile.total_mass
    );
    println!("  {} shells", profile.shell_count());
    for (name, values) in &profile.columns {
        println!("  {:<20} {} values", name, values.len());
    }
    Ok(())
}

fn cmd_preload(store: DataStore, config: SessionConfig, parallel: bool) -> AppResult<()> {
    let catalog = config.load_catalog()?;
    let mut session = Session::with_config(store, config);
    let report = if parallel {
        session.preload_parallel(&catalog)
    } else {
        session.preload(&catalog)
    };

    println!(
        "Loaded {} histories and {} profiles",
        report.histories, report.profiles
    );
    for failure in &report.failures {
        match failure.step {
            Some(step) => println!("  ✗ M = {} step {}: {}", failure.mass, step, failure.message),
            None => println!("  ✗ M = {}: {}", failure.mass, failure.message),
        }
    }
    Ok(())
}
