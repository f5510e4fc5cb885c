//! demo subcommand - scrape the bundled shop and render it

use crate::demo::{self, DEMO_CONFIG};
use crate::snapshot_cli::write_diagram;
use anyhow::Context;
use clap::Args;
use config::Config;
use model::Structure;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args)]
pub struct DemoArgs {
    /// YAML configuration (default: built-in demo configuration)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Dump the scraped structure as JSON instead of a diagram
    #[arg(long)]
    json: bool,
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: DemoArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let structure = scrape_demo(&config)?;
    info!(
        components = structure.components.len(),
        relations = structure.relation_count(),
        "demo scraped"
    );

    if args.json {
        let json = structure.to_json()?;
        match args.output {
            Some(path) => {
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Saved to: {}", path.display());
            }
            None => println!("{}", json),
        }
        return Ok(());
    }

    let view = config.to_view()?;
    write_diagram(&view, &structure, args.output.as_deref())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("invalid configuration {}", path.display())),
        None => Ok(Config::parse(DEMO_CONFIG)?),
    }
}

fn scrape_demo(config: &Config) -> anyhow::Result<Structure> {
    let scraper = config.to_scraper()?;
    let shop = demo::shop::build();
    Ok(scraper.scrape(&shop))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(structure: &Structure) -> Vec<&str> {
        let mut names: Vec<_> = structure.components.values().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn id_of<'a>(structure: &'a Structure, name: &str) -> &'a str {
        structure
            .components
            .values()
            .find(|c| c.name == name)
            .map(|c| c.id.as_str())
            .unwrap()
    }

    #[test]
    fn test_demo_components() {
        let config = load_config(None).unwrap();
        let structure = scrape_demo(&config).unwrap();

        assert_eq!(
            names(&structure),
            vec![
                "Audit Service",
                "Catalog Service",
                "Catalog Store",
                "Order Service",
                "Order Store",
                "Shop",
                "Stripe API",
            ]
        );
    }

    #[test]
    fn test_demo_relations() {
        let config = load_config(None).unwrap();
        let s = scrape_demo(&config).unwrap();

        let related = |a: &str, b: &str| {
            s.targets(id_of(&s, a)).any(|t| t == id_of(&s, b))
        };
        assert!(related("Shop", "Order Service"));
        assert!(related("Shop", "Catalog Service"));
        assert!(related("Shop", "Stripe API"));
        assert!(related("Shop", "Audit Service"));
        assert!(related("Order Service", "Order Store"));
        // the weak handle still reaches the live catalog
        assert!(related("Order Service", "Catalog Service"));
        assert!(related("Catalog Service", "Catalog Store"));
        assert_eq!(s.relation_count(), 7);
    }

    #[test]
    fn test_demo_render() {
        let config = load_config(None).unwrap();
        let structure = scrape_demo(&config).unwrap();
        let out = config.to_view().unwrap().render(&structure);

        assert!(out.contains("title Demo Shop"));
        assert!(out.contains("skinparam database<<DB>>"));
        assert!(out.contains("cloud \"==Stripe API"));
        assert!(out.contains(".[#4a4a4a].>"));
    }

    #[test]
    fn test_demo_scrape_is_stable() {
        let config = load_config(None).unwrap();
        let a = scrape_demo(&config).unwrap().checksum().unwrap();
        let b = scrape_demo(&config).unwrap().checksum().unwrap();
        assert_eq!(a, b);
    }
}
