//! `ToPy` problem definition files.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gripper_types::ToPySolverParams;
use tracing::info;

use crate::boundary::BoundaryConditions;
use crate::error::{ExportError, ExportResult};

/// First line of every problem definition file.
pub const TOPY_HEADER: &str = "[ToPy Problem Definition File v2007]";

/// Key/value contents of a `ToPy` problem definition file.
///
/// Keys are written in sorted order, one `KEY:VALUE` line each, after
/// [`TOPY_HEADER`]. The same inputs therefore always render to the same
/// bytes.
///
/// # Example
///
/// ```
/// use gripper_topo::{ToPyConfig, TOPY_HEADER};
///
/// let mut config = ToPyConfig::new();
/// config.set("NUM_ELEM_X", 10);
/// config.set("ETA", "0.4");
///
/// let text = config.render();
/// let mut lines = text.lines();
/// assert_eq!(lines.next(), Some(TOPY_HEADER));
/// assert_eq!(lines.next(), Some("ETA:0.4"));
/// assert_eq!(lines.next(), Some("NUM_ELEM_X:10"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToPyConfig {
    entries: BTreeMap<String, String>,
}

impl ToPyConfig {
    /// An empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for a set of boundary conditions.
    ///
    /// Fixed and loaded node lists are repeated for all three axes, as the
    /// attachment is clamped and every contact is loaded in all directions.
    #[must_use]
    pub fn from_boundary(
        name: &str,
        boundary: &BoundaryConditions,
        solver: &ToPySolverParams,
    ) -> Self {
        let mut config = Self::new();
        config.set("PROB_NAME", name);
        config.set("PROB_TYPE", &solver.problem_type);
        config.set("ETA", format_float(solver.eta));
        config.set("DOF_PN", solver.dof_per_node);
        config.set("VOL_FRAC", format_float(solver.volume_fraction));
        config.set("FILT_RAD", format_float(solver.filter_radius));
        config.set("P_FAC", format_float(solver.penalty));
        config.set("ELEM_K", &solver.element_type);
        config.set("NUM_ITER", solver.iterations);

        let [x, y, z] = boundary.size();
        config.set("NUM_ELEM_X", x);
        config.set("NUM_ELEM_Y", y);
        config.set("NUM_ELEM_Z", z);

        let fixed = format_list(boundary.fixed_node_indices());
        for key in ["FXTR_NODE_X", "FXTR_NODE_Y", "FXTR_NODE_Z"] {
            config.set(key, &fixed);
        }
        let loaded = format_list(boundary.load_node_indices());
        for key in ["LOAD_NODE_X", "LOAD_NODE_Y", "LOAD_NODE_Z"] {
            config.set(key, &loaded);
        }

        let loads = boundary.loads();
        config.set("LOAD_VALU_X", format_list(loads.iter().map(|l| format_float(l.x))));
        config.set("LOAD_VALU_Y", format_list(loads.iter().map(|l| format_float(l.y))));
        config.set("LOAD_VALU_Z", format_list(loads.iter().map(|l| format_float(l.z))));

        config.set("PASV_ELEM", format_list(boundary.passive_element_indices()));
        config
    }

    /// Set a key, replacing any previous value.
    pub fn set(&mut self, key: &str, value: impl Display) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Value of a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the config has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write the file contents to a writer.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{TOPY_HEADER}")?;
        for (key, value) in self.entries() {
            writeln!(writer, "{key}:{value}")?;
        }
        writer.flush()
    }

    /// The file contents as a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{TOPY_HEADER}\n");
        for (key, value) in self.entries() {
            out.push_str(key);
            out.push(':');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    /// Write the file to `path`, replacing it if present.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::IoWrite`] if the file cannot be created or
    /// written.
    pub fn write_file(&self, path: &Path) -> ExportResult<()> {
        let io_err = |source| ExportError::IoWrite {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_err)?;
        self.write_to(BufWriter::new(file)).map_err(io_err)
    }
}

/// Problem name for an output path: the file name without its extension.
#[must_use]
pub fn problem_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write the problem definition for `boundary` to `path`.
///
/// The problem name is taken from the file name.
///
/// # Errors
///
/// Returns [`ExportError::IoWrite`] if the file cannot be written.
pub fn export_topy_config(
    path: &Path,
    boundary: &BoundaryConditions,
    solver: &ToPySolverParams,
) -> ExportResult<ToPyConfig> {
    let config = ToPyConfig::from_boundary(&problem_name(path), boundary, solver);
    config.write_file(path)?;
    info!(
        path = %path.display(),
        fixed = boundary.attachment_nodes().len(),
        loaded = boundary.contact_voxels().len(),
        passive = boundary.forbidden_voxels().len(),
        "topology optimization config written"
    );
    Ok(config)
}

/// Six-decimal fixed-point rendering used for every real value.
#[must_use]
pub fn format_float(value: f64) -> String {
    // Adding zero turns -0.0 into 0.0
    format!("{:.6}", value + 0.0)
}

/// Join values with `;`.
#[must_use]
pub fn format_list<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(&item.to_string());
    }
    out
}
