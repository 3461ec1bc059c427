use crate::cli::ResiduesArgs;
use crate::error::{CliError, Result};
use mdprep::preparation::pka::PkaResults;
use mdprep::preparation::residue_data::ResidueData;
use tracing::info;

pub fn run(args: ResiduesArgs) -> Result<()> {
    info!("Reading propKa report from {:?}", &args.pka);
    let results = PkaResults::read_from_path(&args.pka).map_err(|e| CliError::FileParsing {
        path: args.pka.clone(),
        source: e.into(),
    })?;

    let mut residues = ResidueData::new();
    residues.import_pka_values(&results);

    match &args.csv {
        Some(path) => {
            residues
                .write_csv(path)
                .map_err(|e| CliError::Other(e.into()))?;
            println!("Wrote {} residue(s) to {}", residues.len(), path.display());
        }
        None => print!("{}", residues),
    }
    Ok(())
}
