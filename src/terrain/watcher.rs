//! Change detection between host ticks
//!
//! The host calls [`ChangeWatcher::poll`] once per tick with the current
//! parameters. The watcher compares them field by field against the snapshot
//! of the last successful build and rebuilds at most once per tick.

use super::color_map::ColorRamp;
use super::error::ConfigError;
use super::height_field::HeightField;
use super::mesh::{MeshBuilder, MeshData};
use super::noise::NoiseLayerConfig;
use super::params::GenerationParameters;

/// Produces the height field for a parameter set
pub type FieldFactory = Box<dyn Fn(&GenerationParameters) -> Result<HeightField, ConfigError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Committed mesh matches the committed snapshot
    Idle,
    /// A rebuild must happen on the next poll
    Dirty,
}

/// Which groups of parameters differ between two snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub dimensions: bool,
    pub height_scale: bool,
    pub seed: bool,
    pub color_ramp: bool,
    pub noise_layers: bool,
}

impl ChangeSet {
    /// Everything counts as changed, used when there is nothing to compare against
    pub fn all() -> Self {
        Self {
            dimensions: true,
            height_scale: true,
            seed: true,
            color_ramp: true,
            noise_layers: true,
        }
    }

    /// Compare every tracked field. Floats are compared bit for bit.
    pub fn between(old: &GenerationParameters, new: &GenerationParameters) -> Self {
        Self {
            dimensions: old.grid_width != new.grid_width || old.grid_depth != new.grid_depth,
            height_scale: !same_bits(old.height_scale, new.height_scale),
            seed: old.seed != new.seed,
            color_ramp: ramp_differs(&old.color_ramp, &new.color_ramp),
            noise_layers: layers_differ(&old.noise_layers, &new.noise_layers),
        }
    }

    pub fn any(&self) -> bool {
        self.dimensions || self.height_scale || self.seed || self.color_ramp || self.noise_layers
    }
}

fn same_bits(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits()
}

fn ramp_differs(old: &ColorRamp, new: &ColorRamp) -> bool {
    if old.mode != new.mode
        || old.color_stops.len() != new.color_stops.len()
        || old.alpha_stops.len() != new.alpha_stops.len()
    {
        return true;
    }

    let colors_differ = old.color_stops.iter().zip(&new.color_stops).any(|(a, b)| {
        !same_bits(a.position, b.position)
            || a.color.iter().zip(&b.color).any(|(x, y)| !same_bits(*x, *y))
    });
    let alphas_differ = old
        .alpha_stops
        .iter()
        .zip(&new.alpha_stops)
        .any(|(a, b)| !same_bits(a.position, b.position) || !same_bits(a.alpha, b.alpha));

    colors_differ || alphas_differ
}

fn layers_differ(old: &[NoiseLayerConfig], new: &[NoiseLayerConfig]) -> bool {
    old.len() != new.len()
        || old.iter().zip(new).any(|(a, b)| {
            !same_bits(a.weight, b.weight)
                || !same_bits(a.frequency_scale, b.frequency_scale)
                || !same_bits(a.x_frequency, b.x_frequency)
                || !same_bits(a.z_frequency, b.z_frequency)
        })
}

/// What a single poll did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    /// Nothing differed from the committed snapshot
    Unchanged,
    /// The parameters equal a set that already failed validation
    StillInvalid,
    /// One rebuild ran and its result is now committed
    Rebuilt(ChangeSet),
}

pub struct ChangeWatcher {
    state: WatchState,
    committed: Option<GenerationParameters>,
    mesh: Option<MeshData>,
    rejected: Option<GenerationParameters>,
    rebuilds: u64,
    field_factory: FieldFactory,
}

impl Default for ChangeWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeWatcher {
    /// Watcher building Perlin layers straight from the parameters
    pub fn new() -> Self {
        Self::with_field_factory(Box::new(HeightField::from_params))
    }

    /// Watcher with a custom height field per build
    pub fn with_field_factory(field_factory: FieldFactory) -> Self {
        Self {
            state: WatchState::Dirty,
            committed: None,
            mesh: None,
            rejected: None,
            rebuilds: 0,
            field_factory,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Mesh of the last successful build
    pub fn mesh(&self) -> Option<&MeshData> {
        self.mesh.as_ref()
    }

    /// Parameters the committed mesh was built from
    pub fn committed(&self) -> Option<&GenerationParameters> {
        self.committed.as_ref()
    }

    /// Number of successful rebuilds so far
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Force a rebuild on the next poll even if nothing changed
    pub fn invalidate(&mut self) {
        self.state = WatchState::Dirty;
    }

    /// Compare `params` with the committed snapshot and rebuild if anything differs.
    ///
    /// On error the previously committed mesh and snapshot stay untouched.
    pub fn poll(&mut self, params: &GenerationParameters) -> Result<PollOutcome, ConfigError> {
        let changes = match &self.committed {
            Some(committed) => ChangeSet::between(committed, params),
            None => ChangeSet::all(),
        };

        if changes.any() {
            if let Some(rejected) = &self.rejected {
                if self.state == WatchState::Idle && !ChangeSet::between(rejected, params).any() {
                    return Ok(PollOutcome::StillInvalid);
                }
            }
            self.state = WatchState::Dirty;
        }

        if self.state == WatchState::Idle {
            return Ok(PollOutcome::Unchanged);
        }

        log::debug!("Parameters changed: {:?}", changes);

        match self.rebuild(params) {
            Ok(mesh) => {
                self.mesh = Some(mesh);
                self.committed = Some(params.clone());
                self.rejected = None;
                self.rebuilds += 1;
                self.state = WatchState::Idle;
                Ok(PollOutcome::Rebuilt(changes))
            }
            Err(err) => {
                log::warn!("Keeping previous mesh, rebuild rejected: {}", err);
                self.rejected = Some(params.clone());
                self.state = WatchState::Idle;
                Err(err)
            }
        }
    }

    fn rebuild(&self, params: &GenerationParameters) -> Result<MeshData, ConfigError> {
        params.validate()?;
        let field = (self.field_factory)(params)?;
        let builder = MeshBuilder::with_height_field(params, field)?;
        Ok(builder.build(self.mesh.as_ref()))
    }
}
