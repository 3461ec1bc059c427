use super::error::{ConfigError, ProtocolError};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Name of the ACEMD configuration file written into the output directory.
pub const INPUT_FILE_NAME: &str = "input";
/// Name of the Tcl force script written next to the configuration file.
pub const TCL_FILE_NAME: &str = "forces.tcl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnOff {
    On,
    Off,
}

impl fmt::Display for OnOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnOff::On => f.write_str("on"),
            OnOff::Off => f.write_str("off"),
        }
    }
}

impl From<bool> for OnOff {
    fn from(value: bool) -> Self {
        if value { OnOff::On } else { OnOff::Off }
    }
}

macro_rules! acemd_config {
    ($( $(#[$meta:meta])* $field:ident => $key:literal : $ty:ty ),* $(,)?) => {
        /// Configuration of an ACEMD run.
        ///
        /// Every field maps to one ACEMD configuration key. Unset fields are left out of
        /// the generated `input` file, so ACEMD applies its own defaults for them. Fields
        /// are written in declaration order.
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct Acemd {
            $( $(#[$meta])* pub $field: Option<$ty>, )*
            #[serde(skip)]
            tcl: Option<String>,
        }

        impl Acemd {
            fn entries(&self) -> Vec<(&'static str, String)> {
                let mut entries = Vec::new();
                $(
                    if let Some(value) = &self.$field {
                        entries.push(($key, value.to_string()));
                    }
                )*
                entries
            }

            /// Overrides every field that is set in `other`. The Tcl script is untouched.
            pub fn merge(&mut self, other: Acemd) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            }

            /// Clears the field configured under the ACEMD key `key`.
            pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
                match key {
                    $( $key => self.$field = None, )*
                    _ => return Err(ConfigError::UnknownEngineKey(key.to_string())),
                }
                Ok(())
            }
        }
    };
}

acemd_config! {
    coordinates => "coordinates": String,
    structure => "structure": String,
    parameters => "parameters": String,
    extendedsystem => "extendedsystem": String,
    bincoordinates => "bincoordinates": String,
    binvelocities => "binvelocities": String,
    binindex => "binindex": String,
    /// Initial temperature in Kelvin.
    temperature => "temperature": f64,
    restart => "restart": OnOff,
    restartfreq => "restartfreq": u64,
    outputname => "outputname": String,
    xtcfile => "xtcfile": String,
    xtcfreq => "xtcfreq": u64,
    /// Integration time step in femtoseconds.
    timestep => "timestep": f64,
    rigidbonds => "rigidbonds": String,
    hydrogenscale => "hydrogenscale": f64,
    switching => "switching": OnOff,
    switchdist => "switchdist": f64,
    cutoff => "cutoff": f64,
    exclude => "exclude": String,
    #[serde(rename = "1-4scaling")]
    scaling14 => "1-4scaling": f64,
    langevin => "langevin": OnOff,
    langevintemp => "langevintemp": f64,
    langevindamping => "langevindamping": f64,
    pme => "pme": OnOff,
    pmegridspacing => "pmegridspacing": f64,
    fullelectfrequency => "fullelectfrequency": u32,
    energyfreq => "energyfreq": u64,
    berendsenpressure => "berendsenpressure": OnOff,
    minimize => "minimize": u64,
    tclforces => "tclforces": OnOff,
    /// Simulation length, either in steps or with a time unit (e.g. `10ns`).
    run => "run": String,
}

impl Acemd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine settings for an NVT production run with a 4 fs time step.
    pub fn production_defaults() -> Self {
        Self {
            extendedsystem: Some("input.xsc".to_string()),
            coordinates: Some("structure.pdb".to_string()),
            structure: Some("structure.psf".to_string()),
            parameters: Some("parameters".to_string()),
            temperature: Some(300.0),
            restart: Some(OnOff::On),
            restartfreq: Some(5000),
            outputname: Some("output".to_string()),
            xtcfile: Some("output.xtc".to_string()),
            xtcfreq: Some(25000),
            timestep: Some(4.0),
            rigidbonds: Some("all".to_string()),
            hydrogenscale: Some(4.0),
            switching: Some(OnOff::On),
            switchdist: Some(7.5),
            cutoff: Some(9.0),
            exclude: Some("scaled1-4".to_string()),
            scaling14: Some(1.0),
            langevin: Some(OnOff::On),
            langevintemp: Some(300.0),
            langevindamping: Some(0.1),
            pme: Some(OnOff::On),
            pmegridspacing: Some(1.0),
            fullelectfrequency: Some(2),
            energyfreq: Some(5000),
            run: Some("10ns".to_string()),
            ..Self::default()
        }
    }

    pub fn tcl(&self) -> Option<&str> {
        self.tcl.as_deref()
    }

    /// Attaches (or with `None`, detaches) a Tcl force script.
    pub fn set_tcl(&mut self, script: Option<String>) {
        self.tcl = script;
    }

    /// File names referenced by the file-valued fields that are set.
    pub fn input_files(&self) -> impl Iterator<Item = &str> {
        [
            &self.coordinates,
            &self.structure,
            &self.parameters,
            &self.extendedsystem,
            &self.bincoordinates,
            &self.binvelocities,
            &self.binindex,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
    }

    /// Checks that every referenced input file is a relative path without `..` or root
    /// components, so it resolves inside both the input and the output directory.
    pub fn check_input_files(&self) -> Result<(), ConfigError> {
        for name in self.input_files() {
            let path = Path::new(name);
            let plain = !name.is_empty()
                && path.components().all(|c| matches!(c, Component::Normal(_)));
            if !plain {
                return Err(ConfigError::UnsafeFileName(name.to_string()));
            }
        }
        Ok(())
    }

    /// Renders the contents of the ACEMD `input` file.
    pub fn to_input_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.entries() {
            out.push_str(key);
            out.push(' ');
            out.push_str(&value);
            out.push('\n');
        }
        if self.tcl.is_some() {
            out.push_str("source ");
            out.push_str(TCL_FILE_NAME);
            out.push('\n');
        }
        out
    }

    /// Writes a runnable simulation directory.
    ///
    /// Copies every referenced input file from `input_dir`, then writes the `input`
    /// configuration and, if a script is attached, `forces.tcl`. An existing `output_dir`
    /// is replaced only when `overwrite` is set. Returns the paths written, in order.
    ///
    /// # Errors
    ///
    /// Fails without touching `output_dir` if a referenced file name is not a plain
    /// relative path, if `output_dir` is or contains `input_dir`, if the output exists
    /// and `overwrite` is false, or if a referenced input file is missing.
    pub fn setup(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        overwrite: bool,
    ) -> Result<Vec<PathBuf>, ProtocolError> {
        self.check_input_files()?;
        check_directories(input_dir, output_dir)?;

        let files: Vec<&str> = self.input_files().collect();
        for name in &files {
            let source = input_dir.join(name);
            if !source.is_file() {
                return Err(ProtocolError::MissingInputFile { path: source });
            }
        }

        if output_dir.exists() {
            if !overwrite {
                return Err(ProtocolError::OutputExists(output_dir.to_path_buf()));
            }
            info!("Removing existing output directory {}", output_dir.display());
            fs::remove_dir_all(output_dir).map_err(|e| ProtocolError::io(output_dir, e))?;
        }
        fs::create_dir_all(output_dir).map_err(|e| ProtocolError::io(output_dir, e))?;

        let mut written = Vec::with_capacity(files.len() + 2);
        for name in files {
            let target = output_dir.join(name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ProtocolError::io(parent, e))?;
            }
            debug!("Copying {} to {}", name, output_dir.display());
            fs::copy(input_dir.join(name), &target).map_err(|e| ProtocolError::io(&target, e))?;
            written.push(target);
        }

        let input_path = output_dir.join(INPUT_FILE_NAME);
        fs::write(&input_path, self.to_input_string())
            .map_err(|e| ProtocolError::io(&input_path, e))?;
        written.push(input_path);

        if let Some(script) = &self.tcl {
            let tcl_path = output_dir.join(TCL_FILE_NAME);
            fs::write(&tcl_path, script).map_err(|e| ProtocolError::io(&tcl_path, e))?;
            written.push(tcl_path);
        }

        info!(
            "Wrote ACEMD setup with {} file(s) to {}",
            written.len(),
            output_dir.display()
        );
        Ok(written)
    }
}

fn check_directories(input_dir: &Path, output_dir: &Path) -> Result<(), ProtocolError> {
    let (input, output) = match (fs::canonicalize(input_dir), fs::canonicalize(output_dir)) {
        (Ok(input), Ok(output)) => (input, output),
        _ => (input_dir.to_path_buf(), output_dir.to_path_buf()),
    };
    if input == output {
        return Err(ProtocolError::SameDirectory(output_dir.to_path_buf()));
    }
    if input.starts_with(&output) {
        return Err(ProtocolError::OutputContainsInput {
            input: input_dir.to_path_buf(),
            output: output_dir.to_path_buf(),
        });
    }
    Ok(())
}
