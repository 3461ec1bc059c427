use super::error::ConfigError;
use nalgebra::Vector3;
use std::fmt;

const TEMPLATE: &str = r#"
set refindex { REFINDEX }
set selindex { SELINDEX }
set box { BOX }
set K KCONST
#
proc flatbot1d {x xm xM K} {
  set f 0
  if {$x < $xm} {
    set f [expr $K*[expr $xm-$x]]
  }
  if {$x > $xM} {
    set f [expr $K*[expr $xM-$x]]
  }
  return $f
}
proc calcforces_init {} {
  global ref sel refindex selindex
  berendsenpressure  off
  set ref [addgroup  $refindex]
  set sel [addgroup  $selindex]
}
proc calcforces {} {
  global ref sel K box
  loadcoords coords
##FLATBOTTOM
  if {$K>0} {
    set r0 $coords($ref)
    set r1 $coords($sel)
    set dr  [vecsub $r1 $r0]
    set fx [flatbot1d [lindex $dr 0] [lindex $box 0] [lindex $box 1] $K]
    set fy [flatbot1d [lindex $dr 1] [lindex $box 2] [lindex $box 3] $K]
    set fz [flatbot1d [lindex $dr 2] [lindex $box 4] [lindex $box 5] $K]
    #print "dr: $dr  fx: $fx fy: $fy fz: $fz"
    addforce $sel [list $fx $fy $fz]
  }
}
proc calcforces_endstep { } { }
"#;

/// Axis-aligned box `[xmin, xmax, ymin, ymax, zmin, zmax]` in Å, relative to the
/// reference group's center.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatBottomBox(pub [f64; 6]);

impl FlatBottomBox {
    const AXES: [char; 3] = ['x', 'y', 'z'];

    pub fn new(bounds: [f64; 6]) -> Self {
        Self(bounds)
    }

    pub fn bounds(&self) -> &[f64; 6] {
        &self.0
    }

    /// `(min, max)` along axis 0, 1 or 2.
    pub fn axis(&self, axis: usize) -> (f64, f64) {
        (self.0[2 * axis], self.0[2 * axis + 1])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, name) in Self::AXES.iter().enumerate() {
            let (min, max) = self.axis(i);
            for value in [min, max] {
                if !value.is_finite() {
                    return Err(ConfigError::NonFinite {
                        field: "box",
                        value,
                    });
                }
            }
            if min > max {
                return Err(ConfigError::InvertedBox {
                    axis: *name,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    pub fn contains(&self, displacement: &Vector3<f64>) -> bool {
        (0..3).all(|i| {
            let (min, max) = self.axis(i);
            (min..=max).contains(&displacement[i])
        })
    }

    /// Restoring force on the selection for a displacement from the reference center.
    ///
    /// Each component is zero inside `[min, max]` and `k * (bound - x)` outside, which
    /// is what the generated Tcl script applies every step.
    pub fn force(&self, displacement: &Vector3<f64>, k: f64) -> Vector3<f64> {
        Vector3::from_fn(|i, _| {
            let (min, max) = self.axis(i);
            let x = displacement[i];
            if x < min {
                k * (min - x)
            } else if x > max {
                k * (max - x)
            } else {
                0.0
            }
        })
    }
}

impl fmt::Display for FlatBottomBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    ForceConstant,
    ReferenceIndices,
    SelectionIndices,
    Box,
}

impl Placeholder {
    const ALL: [Placeholder; 4] = [
        Placeholder::ForceConstant,
        Placeholder::ReferenceIndices,
        Placeholder::SelectionIndices,
        Placeholder::Box,
    ];

    fn token(self) -> &'static str {
        match self {
            Placeholder::ForceConstant => "KCONST",
            Placeholder::ReferenceIndices => "REFINDEX",
            Placeholder::SelectionIndices => "SELINDEX",
            Placeholder::Box => "BOX",
        }
    }
}

fn next_placeholder(text: &str) -> Option<(usize, Placeholder)> {
    Placeholder::ALL
        .iter()
        .filter_map(|&p| text.find(p.token()).map(|pos| (pos, p)))
        .min_by_key(|&(pos, _)| pos)
}

/// The ACEMD `tclforces` script for a flat-bottom restraint between two atom groups.
///
/// Indices are 0-based atom indices as resolved from the coordinates file.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBottomScript {
    pub k: f64,
    pub reference: Vec<usize>,
    pub selection: Vec<usize>,
    pub bounds: FlatBottomBox,
}

impl FlatBottomScript {
    fn value(&self, placeholder: Placeholder) -> String {
        match placeholder {
            Placeholder::ForceConstant => self.k.to_string(),
            Placeholder::ReferenceIndices => join_indices(&self.reference),
            Placeholder::SelectionIndices => join_indices(&self.selection),
            Placeholder::Box => self.bounds.to_string(),
        }
    }

    /// Fills the template in one left-to-right pass; inserted values are not re-scanned.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(TEMPLATE.len() + 8 * self.selection.len());
        let mut rest = TEMPLATE;
        while let Some((pos, placeholder)) = next_placeholder(rest) {
            out.push_str(&rest[..pos]);
            out.push_str(&self.value(placeholder));
            rest = &rest[pos + placeholder.token().len()..];
        }
        out.push_str(rest);
        out
    }
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
