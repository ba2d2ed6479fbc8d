//! The loaded and working mesh slots, and the rules for changing them.
//!
//! ```text
//! Empty ──load──▶ Loaded ──repair──▶ Repaired ──any operation──▶ Repaired
//!                   ▲                    │
//!                   └───────load─────────┘
//! ```
//!
//! Every operator borrows its input and returns a new mesh. The session
//! swaps the result in only when the operator succeeded and its output is
//! a valid mesh; any failure, including a panic inside the operator,
//! leaves both slots untouched.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use mesh_repair::{HoleFillParams, HoleFillRepairer, MeshReport, Repairer, analyze};
use mesh_retopo::{ClusterDecimator, Decimator, Remesher};
use mesh_types::IndexedMesh;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::error::{Classified, SessionError, SessionResult};
use crate::operation::{Operation, OperatorContext};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing loaded.
    Empty,
    /// A mesh is loaded; no working mesh yet.
    Loaded,
    /// A working mesh exists and operators may run on it.
    Repaired,
}

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Center meshes on the origin when loaded, repaired or decimated.
    pub center_on_load: bool,
    /// Parameters of the built-in repairer and of hole filling.
    pub hole_fill: HoleFillParams,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            center_on_load: true,
            hole_fill: HoleFillParams::default(),
        }
    }
}

/// What an operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    /// Operator name.
    pub operator: &'static str,
    /// One-line description of the change.
    pub summary: String,
    /// Partial-success conditions the caller may want to act on.
    pub warnings: Vec<String>,
    /// Faces before the operation.
    pub faces_before: usize,
    /// Faces after the operation.
    pub faces_after: usize,
}

impl OperationReport {
    /// Whether the operation completed without warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl std::fmt::Display for OperationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.operator, self.summary)?;
        for warning in &self.warnings {
            write!(f, "\n  warning: {warning}")?;
        }
        Ok(())
    }
}

/// Owner of the loaded mesh and the working mesh.
///
/// # Example
///
/// ```
/// use mesh::{MeshSession, Operation, SessionState};
/// use mesh::types::unit_cube;
///
/// let mut session = MeshSession::new();
/// session.load(unit_cube()).unwrap();
/// assert_eq!(session.state(), SessionState::Loaded);
///
/// let report = session.apply(&Operation::Repair).unwrap();
/// assert_eq!(report.summary, "already watertight");
/// assert_eq!(session.state(), SessionState::Repaired);
///
/// session.apply(&Operation::Subdivide(Default::default())).unwrap();
/// assert_eq!(session.working().unwrap().faces.len(), 36);
/// ```
pub struct MeshSession {
    loaded: Option<IndexedMesh>,
    working: Option<IndexedMesh>,
    settings: SessionSettings,
    repairer: Box<dyn Repairer>,
    decimator: Box<dyn Decimator>,
    remesher: Option<Box<dyn Remesher>>,
}

impl Default for MeshSession {
    fn default() -> Self {
        Self::with_settings(SessionSettings::default())
    }
}

impl std::fmt::Debug for MeshSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshSession")
            .field("state", &self.state())
            .field("loaded_faces", &self.loaded.as_ref().map(|m| m.faces.len()))
            .field("working_faces", &self.working.as_ref().map(|m| m.faces.len()))
            .field("repairer", &self.repairer.name())
            .field("decimator", &self.decimator.name())
            .field("remesher", &self.remesher.as_ref().map(|r| r.name().to_string()))
            .finish_non_exhaustive()
    }
}

impl MeshSession {
    /// Empty session with default settings and built-in backends.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty session with the given settings.
    #[must_use]
    pub fn with_settings(settings: SessionSettings) -> Self {
        Self {
            loaded: None,
            working: None,
            repairer: Box::new(HoleFillRepairer::new(settings.hole_fill.clone())),
            decimator: Box::new(ClusterDecimator::default()),
            remesher: None,
            settings,
        }
    }

    /// Empty session configured from a pipeline document.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::with_settings(config.settings())
    }

    /// Replace the repair backend.
    #[must_use]
    pub fn with_repairer(mut self, repairer: impl Repairer + 'static) -> Self {
        self.repairer = Box::new(repairer);
        self
    }

    /// Replace the decimation backend.
    #[must_use]
    pub fn with_decimator(mut self, decimator: impl Decimator + 'static) -> Self {
        self.decimator = Box::new(decimator);
        self
    }

    /// Install a remeshing backend for auto-retopology.
    #[must_use]
    pub fn with_remesher(mut self, remesher: impl Remesher + 'static) -> Self {
        self.remesher = Some(Box::new(remesher));
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        match (&self.loaded, &self.working) {
            (None, _) => SessionState::Empty,
            (Some(_), None) => SessionState::Loaded,
            (Some(_), Some(_)) => SessionState::Repaired,
        }
    }

    /// Session settings.
    #[must_use]
    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// The mesh as loaded (after centering).
    #[must_use]
    pub const fn loaded(&self) -> Option<&IndexedMesh> {
        self.loaded.as_ref()
    }

    /// The working mesh, present once the loaded mesh has been repaired.
    #[must_use]
    pub const fn working(&self) -> Option<&IndexedMesh> {
        self.working.as_ref()
    }

    /// Take ownership of the working mesh, returning the session to `Loaded`.
    pub fn take_working(&mut self) -> Option<IndexedMesh> {
        self.working.take()
    }

    /// Load a new mesh, discarding any working mesh.
    ///
    /// # Errors
    ///
    /// [`SessionError::Input`] if the mesh is malformed or has no faces;
    /// the session is unchanged in that case.
    pub fn load(&mut self, mesh: IndexedMesh) -> SessionResult<MeshReport> {
        mesh.require_faces().map_err(|e| e.into_session_error("load"))?;
        let mesh = if self.settings.center_on_load {
            mesh.centered()
        } else {
            mesh
        };

        let report = analyze(&mesh);
        info!("Loaded mesh: {report}");
        self.loaded = Some(mesh);
        self.working = None;
        Ok(report)
    }

    /// Load a mesh file, detecting the format from its extension.
    ///
    /// # Errors
    ///
    /// [`SessionError::Io`] if the file cannot be read or parsed, or
    /// [`SessionError::Input`] as for [`MeshSession::load`].
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> SessionResult<MeshReport> {
        let mesh = mesh_io::load_mesh(path)?;
        self.load(mesh)
    }

    /// Save the working mesh, detecting the format from the extension.
    ///
    /// # Errors
    ///
    /// [`SessionError::Precondition`] without a working mesh, or
    /// [`SessionError::Io`] if writing fails.
    pub fn save_working(&self, path: impl AsRef<Path>) -> SessionResult<()> {
        let mesh = self
            .working
            .as_ref()
            .ok_or_else(|| SessionError::precondition("save", "no repaired mesh to save"))?;
        mesh_io::save_mesh(mesh, path)?;
        Ok(())
    }

    /// Analysis of the loaded mesh.
    #[must_use]
    pub fn loaded_report(&self) -> Option<MeshReport> {
        self.loaded.as_ref().map(analyze)
    }

    /// Analysis of the working mesh.
    #[must_use]
    pub fn working_report(&self) -> Option<MeshReport> {
        self.working.as_ref().map(analyze)
    }

    /// Run one operation.
    ///
    /// [`Operation::Repair`] needs a loaded mesh and replaces the working
    /// mesh with the repaired copy. Every other operation needs a working
    /// mesh and replaces it with the operator's output.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Precondition`] if the session is in the wrong state
    ///   or the operator's precondition fails
    /// - [`SessionError::Input`] if the operator rejects its input mesh
    /// - [`SessionError::Internal`] if the operator panics, fails
    ///   unexpectedly, or returns a mesh with out-of-range indices or
    ///   non-finite positions
    ///
    /// On any error the session is unchanged.
    pub fn apply(&mut self, operation: &Operation) -> SessionResult<OperationReport> {
        let name = operation.name();
        let result = self.run_guarded(operation);

        match result {
            Ok((mesh, report)) => {
                for warning in &report.warnings {
                    warn!(operator = name, "{warning}");
                }
                info!("{}: {}", name, report.summary);
                self.working = Some(mesh);
                Ok(report)
            }
            Err(err) => {
                if err.is_precondition() {
                    warn!("{err}");
                } else {
                    error!("{err}");
                }
                Err(err)
            }
        }
    }

    /// Run a sequence of operations, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// The first failing operation's error. Operations before it keep
    /// their effect.
    pub fn run_pipeline<'a>(
        &mut self,
        operations: impl IntoIterator<Item = &'a Operation>,
    ) -> SessionResult<Vec<OperationReport>> {
        operations.into_iter().map(|op| self.apply(op)).collect()
    }

    fn run_guarded(&self, operation: &Operation) -> SessionResult<(IndexedMesh, OperationReport)> {
        let name = operation.name();
        let input = if operation.reads_loaded_mesh() {
            self.loaded
                .as_ref()
                .ok_or_else(|| SessionError::precondition(name, "no mesh loaded"))?
        } else {
            self.working.as_ref().ok_or_else(|| {
                SessionError::precondition(name, "requires a repaired mesh; run repair first")
            })?
        };

        let ctx = OperatorContext {
            loaded: self.loaded.as_ref(),
            repairer: self.repairer.as_ref(),
            decimator: self.decimator.as_ref(),
            remesher: self.remesher.as_deref(),
            max_hole_edges: self.settings.hole_fill.max_hole_edges,
        };

        let applied = catch_unwind(AssertUnwindSafe(|| operation.run(input, &ctx)))
            .map_err(|payload| SessionError::internal(name, panic_message(payload.as_ref())))??;

        applied
            .mesh
            .validate()
            .map_err(|e| SessionError::internal(name, format!("produced an invalid mesh: {e}")))?;

        let mesh = if self.settings.center_on_load && operation.recenters() {
            applied.mesh.centered()
        } else {
            applied.mesh
        };
        let report = OperationReport {
            operator: name,
            summary: applied.summary,
            warnings: applied.warnings,
            faces_before: input.faces.len(),
            faces_after: mesh.faces.len(),
        };
        Ok((mesh, report))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
