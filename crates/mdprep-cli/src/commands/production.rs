use crate::cli::ProductionArgs;
use crate::config::PartialProductionConfig;
use crate::error::Result;
use tracing::info;

pub fn run(args: ProductionArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialProductionConfig::from_file(path)?,
        None => PartialProductionConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let mut production = partial_config.merge_with_cli(&args)?;

    if production.k() > 0.0 {
        println!(
            "Flat-bottom restraint enabled (k = {} kcal/mol/A^2).",
            production.k()
        );
    }

    let written = production.write(&args.input, &args.output)?;

    println!(
        "Production setup written to {} ({} file(s)):",
        args.output.display(),
        written.len()
    );
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}
