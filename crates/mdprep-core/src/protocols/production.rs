use super::acemd::{Acemd, OnOff};
use super::error::{ConfigError, ProtocolError};
use super::flatbottom::{FlatBottomBox, FlatBottomScript};
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::molecule::Molecule;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_TEMPERATURE: f64 = 300.0;

/// Production protocol for globular and membrane proteins, with an optional flat-bottom
/// restraint that keeps a group of atoms inside a box centered on a reference group.
///
/// The restraint is active only when `k > 0`; `reference` and `selection` are then
/// required by [`Production::write`] and [`ProductionBuilder::build`]. Setters may be
/// called in any order; they reject non-finite values and inverted boxes and leave the
/// configuration unchanged on error.
#[derive(Debug, Clone, PartialEq)]
pub struct Production {
    temperature: f64,
    k: f64,
    reference: Option<String>,
    selection: Option<String>,
    flatbottom: FlatBottomBox,
    acemd: Acemd,
}

impl Default for Production {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            k: 0.0,
            reference: None,
            selection: None,
            flatbottom: FlatBottomBox::default(),
            acemd: Acemd::production_defaults(),
        }
    }
}

impl Production {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ProductionBuilder {
        ProductionBuilder::new()
    }

    /// Thermostat temperature in Kelvin.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
    /// Flat-bottom force constant in kcal/mol/Å².
    pub fn k(&self) -> f64 {
        self.k
    }
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }
    pub fn flatbottom(&self) -> &FlatBottomBox {
        &self.flatbottom
    }
    pub fn acemd(&self) -> &Acemd {
        &self.acemd
    }
    pub fn acemd_mut(&mut self) -> &mut Acemd {
        &mut self.acemd
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), ConfigError> {
        self.update(|p| p.temperature = temperature)
    }
    pub fn set_k(&mut self, k: f64) -> Result<(), ConfigError> {
        self.update(|p| p.k = k)
    }
    pub fn set_reference(&mut self, reference: Option<String>) -> Result<(), ConfigError> {
        self.update(|p| p.reference = reference)
    }
    pub fn set_selection(&mut self, selection: Option<String>) -> Result<(), ConfigError> {
        self.update(|p| p.selection = selection)
    }
    pub fn set_flatbottom(&mut self, flatbottom: FlatBottomBox) -> Result<(), ConfigError> {
        self.update(|p| p.flatbottom = flatbottom)
    }

    fn update(&mut self, change: impl FnOnce(&mut Self)) -> Result<(), ConfigError> {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.check_values()?;
        *self = candidate;
        Ok(())
    }

    fn check_values(&self) -> Result<(), ConfigError> {
        for (field, value) in [("temperature", self.temperature), ("k", self.k)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        self.flatbottom.validate()
    }

    /// Checks the values and, with a positive force constant, that both restraint
    /// selections are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_values()?;
        if self.k > 0.0 {
            if self.reference.is_none() {
                return Err(ConfigError::MissingRestraintSelection("reference"));
            }
            if self.selection.is_none() {
                return Err(ConfigError::MissingRestraintSelection("selection"));
            }
        }
        Ok(())
    }

    /// Writes the production setup from an equilibrated `input_dir` into `output_dir`.
    ///
    /// An existing `output_dir` is replaced. With a positive force constant the
    /// coordinates file is loaded to resolve the restraint selections and a `forces.tcl`
    /// script is emitted; otherwise any script from a previous call is dropped.
    #[instrument(skip_all, name = "production_write", fields(k = self.k))]
    pub fn write(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ProtocolError> {
        self.validate()?;
        self.acemd.check_input_files()?;
        info!(
            "Writing production protocol from {} to {}",
            input_dir.display(),
            output_dir.display()
        );

        self.acemd.temperature = Some(self.temperature);
        self.acemd.langevintemp = Some(self.temperature);

        if self.k > 0.0 {
            let script = self.flatbottom_script(input_dir)?;
            self.acemd.tclforces = Some(OnOff::On);
            self.acemd.set_tcl(Some(script.render()));
        } else {
            self.acemd.tclforces = None;
            self.acemd.set_tcl(None);
        }

        self.acemd.setup(input_dir, output_dir, true)
    }

    fn flatbottom_script(&self, input_dir: &Path) -> Result<FlatBottomScript, ProtocolError> {
        let coordinates = self
            .acemd
            .coordinates
            .as_deref()
            .ok_or(ConfigError::MissingParameter("acemd.coordinates"))?;
        let path = input_dir.join(coordinates);
        if !path.is_file() {
            return Err(ProtocolError::MissingInputFile { path });
        }
        let molecule = PdbFile::read_from_path(&path)?;
        debug!(
            "Loaded {} atom(s) from {}",
            molecule.num_atoms(),
            path.display()
        );

        let reference = resolve(&molecule, self.reference.as_deref(), "reference")?;
        let selection = resolve(&molecule, self.selection.as_deref(), "selection")?;
        self.log_initial_placement(&molecule, &reference, &selection);

        Ok(FlatBottomScript {
            k: self.k,
            reference,
            selection,
            bounds: self.flatbottom,
        })
    }

    fn log_initial_placement(
        &self,
        molecule: &Molecule,
        reference: &[usize],
        selection: &[usize],
    ) {
        let (Some(center), Some(target)) = (
            molecule.centroid(reference, 0),
            molecule.centroid(selection, 0),
        ) else {
            return;
        };
        let displacement = target - center;
        if self.flatbottom.contains(&displacement) {
            debug!(
                "Selection starts inside the flat-bottom box (dr = [{:.3}, {:.3}, {:.3}])",
                displacement.x, displacement.y, displacement.z
            );
        } else {
            let force = self.flatbottom.force(&displacement, self.k);
            info!(
                "Selection starts outside the flat-bottom box (dr = [{:.3}, {:.3}, {:.3}], |F| = {:.3})",
                displacement.x,
                displacement.y,
                displacement.z,
                force.norm()
            );
        }
    }
}

fn resolve(
    molecule: &Molecule,
    expr: Option<&str>,
    field: &'static str,
) -> Result<Vec<usize>, ProtocolError> {
    let expr = expr.ok_or(ConfigError::MissingRestraintSelection(field))?;
    let indices = molecule
        .indices(expr)
        .map_err(|source| ProtocolError::Selection {
            expr: expr.to_string(),
            source,
        })?;
    if indices.is_empty() {
        warn!("{} selection '{}' matched no atoms", field, expr);
    } else {
        debug!("{} selection '{}' matched {} atom(s)", field, expr, indices.len());
    }
    Ok(indices)
}

/// Builds a validated [`Production`]. Unset values take the protocol defaults.
#[derive(Default)]
pub struct ProductionBuilder {
    temperature: Option<f64>,
    k: Option<f64>,
    reference: Option<String>,
    selection: Option<String>,
    flatbottom: Option<FlatBottomBox>,
    acemd: Option<Acemd>,
}

impl ProductionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn k(mut self, k: f64) -> Self {
        self.k = Some(k);
        self
    }
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
    pub fn selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }
    pub fn flatbottom(mut self, bounds: [f64; 6]) -> Self {
        self.flatbottom = Some(FlatBottomBox::new(bounds));
        self
    }
    /// Replaces the engine configuration instead of starting from the production defaults.
    pub fn acemd(mut self, acemd: Acemd) -> Self {
        self.acemd = Some(acemd);
        self
    }

    pub fn build(self) -> Result<Production, ConfigError> {
        let production = Production {
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            k: self.k.unwrap_or(0.0),
            reference: self.reference,
            selection: self.selection,
            flatbottom: self.flatbottom.unwrap_or_default(),
            acemd: self.acemd.unwrap_or_else(Acemd::production_defaults),
        };
        production.validate()?;
        Ok(production)
    }
}
