use crate::cli::{HomeArgs, HomeCommands};
use crate::error::Result;
use mdprep::core::home::{ResourceLocator, platform_name};
use std::path::Path;
use tracing::info;

pub fn run(args: HomeArgs) -> Result<()> {
    match args.command {
        Some(HomeCommands::SetPath { path }) => handle_set_path(&path),
        Some(HomeCommands::ResetPath) => handle_reset_path(),
        None => handle_show(args.data.as_deref(), args.lib),
    }
}

fn handle_show(data: Option<&str>, lib: bool) -> Result<()> {
    let locator = ResourceLocator::discover()?;
    let path = match data {
        Some(name) => locator.data_dir(name),
        None if lib => {
            info!("Looking up libraries for platform {}", platform_name());
            locator.lib_dir()?
        }
        None => locator.home().to_path_buf(),
    };
    println!("{}", path.display());
    Ok(())
}

fn handle_set_path(path: &Path) -> Result<()> {
    ResourceLocator::set_custom_root(path)?;
    println!("Installation root set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    ResourceLocator::reset_custom_root()?;
    println!("Installation root reset to the default location.");
    Ok(())
}
