use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};
use mdprep::core::io::pdb::PdbFile;
use mdprep::core::io::traits::StructureFile;
use mdprep::projections::null::NullProjection;
use mdprep::projections::{Projection, Trajectory, project_all};
use tracing::info;

pub fn run(args: ProjectArgs) -> Result<()> {
    info!("Loading structure from {:?}", &args.structure);
    let molecule = PdbFile::read_from_path(&args.structure).map_err(|e| CliError::FileParsing {
        path: args.structure.clone(),
        source: e.into(),
    })?;

    let mut projection = NullProjection::new(args.ndim);
    let tables = project_all(&mut projection, &molecule, &[&molecule as &dyn Trajectory]);

    let (frames, dims) = tables.first().map(|t| t.shape()).unwrap_or((0, args.ndim));
    println!("Frames:  {}", frames);
    println!("Shape:   ({}, {})", frames, dims);
    println!("Mapping: {}", projection.mapping().join(", "));
    Ok(())
}
