//! render / checksum / check - work on saved structures and config files

use anyhow::Context;
use clap::Subcommand;
use config::Config;
use model::Structure;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use view::View;

#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Render a structure snapshot (JSON) as a PlantUML diagram
    Render {
        /// Structure snapshot
        structure: PathBuf,
        /// YAML configuration providing the view
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the checksum of one snapshot, or compare two
    Checksum {
        /// One or two structure snapshots
        #[arg(required = true, num_args = 1..=2)]
        snapshots: Vec<PathBuf>,
    },
    /// Validate a configuration file
    Check {
        /// YAML configuration
        config: PathBuf,
    },
}

pub fn run(cmd: SnapshotCommands) -> anyhow::Result<()> {
    match cmd {
        SnapshotCommands::Render { structure, config, output } => {
            cmd_render(&structure, config.as_deref(), output.as_deref())
        }
        SnapshotCommands::Checksum { snapshots } => cmd_checksum(&snapshots),
        SnapshotCommands::Check { config } => cmd_check(&config),
    }
}

pub fn load_structure(path: &Path) -> anyhow::Result<Structure> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Structure::from_json(&text).with_context(|| format!("invalid structure in {}", path.display()))
}

pub fn load_view(config_path: Option<&Path>) -> anyhow::Result<View> {
    match config_path {
        Some(path) => config::view_from_file(path)
            .with_context(|| format!("invalid view in {}", path.display())),
        None => Ok(View::default()),
    }
}

/// Writes to `output`, or stdout when absent
pub fn write_diagram(view: &View, structure: &Structure, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            view.render_structure_to(structure, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), "diagram written");
            eprintln!("Saved to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            view.render_structure_to(structure, &mut lock)?;
        }
    }
    Ok(())
}

fn cmd_render(structure: &Path, config: Option<&Path>, output: Option<&Path>) -> anyhow::Result<()> {
    let snapshot = load_structure(structure)?;
    let view = load_view(config)?;
    write_diagram(&view, &snapshot, output)
}

fn cmd_checksum(snapshots: &[PathBuf]) -> anyhow::Result<()> {
    let mut sums = Vec::with_capacity(snapshots.len());
    for path in snapshots {
        let sum = load_structure(path)?.checksum()?;
        println!("{}  {}", sum, path.display());
        sums.push(sum);
    }

    if let [a, b] = sums.as_slice() {
        if a != b {
            anyhow::bail!("structures differ");
        }
        println!("structures match");
    }
    Ok(())
}

fn cmd_check(path: &Path) -> anyhow::Result<()> {
    let config = Config::load_from_file(path)?;
    let scraper = config.to_scraper()?;
    let view = config.to_view()?;

    println!("Configuration: {}", path.display());
    println!("  packages:  {}", scraper.config().packages.join(", "));
    println!("  revisits:  {}", scraper.config().max_revisits);
    println!("  rules:     {}", scraper.rule_count());
    for rule in config.to_rules()? {
        let component = rule.component();
        let name = if component.name.is_empty() { "<matched name>" } else { component.name.as_str() };
        println!("    -> {} [{}]", name, component.tags.join(", "));
    }
    println!("  title:     {}", view.title);
    println!("  styles:    {}", view.component_styles.len());
    if !view.root_component_tags.is_empty() {
        println!("  root tags: {}", view.root_component_tags.join(", "));
    }
    if !view.component_tags.is_empty() {
        println!("  tags:      {}", view.component_tags.join(", "));
    }
    println!("OK");
    Ok(())
}
