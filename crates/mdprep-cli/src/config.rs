use crate::cli::ProductionArgs;
use crate::error::{CliError, Result};
use mdprep::protocols::acemd::Acemd;
use mdprep::protocols::production::Production;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A production protocol file. Every key is optional; command-line values win.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialProductionConfig {
    temperature: Option<f64>,
    k: Option<f64>,
    reference: Option<String>,
    selection: Option<String>,
    #[serde(rename = "box")]
    flatbottom: Option<[f64; 6]>,
    acemd: Option<Acemd>,
    /// ACEMD keys removed from the protocol defaults.
    acemd_unset: Option<Vec<String>>,
}

impl PartialProductionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(self, args: &ProductionArgs) -> Result<Production> {
        let flatbottom = match &args.flatbottom {
            Some(values) => Some(<[f64; 6]>::try_from(values.as_slice()).map_err(|_| {
                CliError::Config(format!("--box expects 6 values, got {}", values.len()))
            })?),
            None => self.flatbottom,
        };

        let mut acemd = Acemd::production_defaults();
        if let Some(file_acemd) = self.acemd {
            acemd.merge(file_acemd);
        }
        if let Some(run) = &args.run {
            acemd.run = Some(run.clone());
        }
        let unset = self.acemd_unset.unwrap_or_default();
        for key in unset.iter().chain(&args.unset) {
            acemd
                .unset(key)
                .map_err(|e| CliError::Config(e.to_string()))?;
        }

        let mut builder = Production::builder().acemd(acemd);
        if let Some(temperature) = args.temperature.or(self.temperature) {
            builder = builder.temperature(temperature);
        }
        if let Some(k) = args.k.or(self.k) {
            builder = builder.k(k);
        }
        if let Some(reference) = args.reference.clone().or(self.reference) {
            builder = builder.reference(reference);
        }
        if let Some(selection) = args.selection.clone().or(self.selection) {
            builder = builder.selection(selection);
        }
        if let Some(bounds) = flatbottom {
            builder = builder.flatbottom(bounds);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("production.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn production_args(extra: &[&str]) -> ProductionArgs {
        let mut argv = vec!["mdprep", "production", "-i", "in", "-o", "out"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Production(args) => args,
            other => panic!("Expected 'production' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn file_values_are_applied_over_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            temperature = 310.0
            k = 5.0
            reference = "protein and name CA"
            selection = "segname L and noh"
            box = [-20.0, 20.0, -20.0, 20.0, 43.0, 45.0]
            acemd-unset = ["binindex"]

            [acemd]
            run = "50ns"
            1-4scaling = 0.8333
            "#,
        );

        let production = PartialProductionConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&production_args(&[]))
            .unwrap();

        assert_eq!(production.temperature(), 310.0);
        assert_eq!(production.k(), 5.0);
        assert_eq!(production.selection(), Some("segname L and noh"));
        assert_eq!(production.flatbottom().bounds()[4], 43.0);
        assert_eq!(production.acemd().run.as_deref(), Some("50ns"));
        assert_eq!(production.acemd().scaling14, Some(0.8333));
        assert_eq!(production.acemd().timestep, Some(4.0));
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            temperature = 310.0
            [acemd]
            run = "50ns"
            "#,
        );

        let args = production_args(&[
            "-t",
            "290",
            "--run",
            "1000",
            "--unset",
            "extendedsystem",
        ]);
        let production = PartialProductionConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(production.temperature(), 290.0);
        assert_eq!(production.acemd().run.as_deref(), Some("1000"));
        assert!(production.acemd().extendedsystem.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "temprature = 300.0\n");
        assert!(matches!(
            PartialProductionConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));

        let path = write_config_file(&dir, "[acemd]\nnot-a-key = 1\n");
        assert!(PartialProductionConfig::from_file(&path).is_err());
    }

    #[test]
    fn unknown_unset_key_is_a_config_error() {
        let result = PartialProductionConfig::default()
            .merge_with_cli(&production_args(&["--unset", "warpdrive"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("warpdrive")));
    }

    #[test]
    fn positive_k_without_selections_fails_validation() {
        let result =
            PartialProductionConfig::default().merge_with_cli(&production_args(&["-k", "5"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("reference")));
    }
}
