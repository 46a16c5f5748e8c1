//! A single water droplet descending a height grid.

use glam::Vec2;

use super::brush::ErosionBrush;
use super::settings::ErosionSettings;

/// Why a droplet stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// Ran for `max_droplet_lifetime` steps.
    Lifetime,
    /// Direction collapsed to zero (local minimum or flat ground).
    Flat,
    /// Moved into the outer border where bilinear sampling is not valid.
    OutOfBounds,
}

/// What one simulation step did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// Sediment was dropped onto the four cells around the old position.
    Deposited(f32),
    /// Material was lifted through the brush around the old position.
    Eroded(f32),
    /// The droplet stopped before changing the grid.
    Terminated(TerminationReason),
}

/// Bilinear height and gradient at a fractional grid position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightAndGradient {
    /// Interpolated height.
    pub height: f32,
    /// Slope along X and Z.
    pub gradient: Vec2,
}

/// Sample height and gradient at `pos` on a `width`-wide row-major grid.
///
/// `pos` must satisfy `0 <= pos < (width - 1, rows - 1)` so the four corner
/// cells exist.
pub fn height_and_gradient(map: &[f32], width: usize, pos: Vec2) -> HeightAndGradient {
    let (cx, cz) = (pos.x as usize, pos.y as usize);
    let x = pos.x - cx as f32;
    let z = pos.y - cz as f32;

    let nw = cx + cz * width;
    let h_nw = map[nw];
    let h_ne = map[nw + 1];
    let h_sw = map[nw + width];
    let h_se = map[nw + width + 1];

    let gradient = Vec2::new(
        (h_ne - h_nw) * (1.0 - z) + (h_se - h_sw) * z,
        (h_sw - h_nw) * (1.0 - x) + (h_se - h_ne) * x,
    );
    let height = h_nw * (1.0 - x) * (1.0 - z)
        + h_ne * x * (1.0 - z)
        + h_sw * (1.0 - x) * z
        + h_se * x * z;

    HeightAndGradient { height, gradient }
}

/// Mutable state of one droplet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Droplet {
    /// Fractional grid position (`y` is the Z axis).
    pub pos: Vec2,
    /// Unit direction of travel, or zero before the first step.
    pub dir: Vec2,
    /// Current speed.
    pub speed: f32,
    /// Remaining water.
    pub water: f32,
    /// Carried sediment.
    pub sediment: f32,
}

impl Droplet {
    /// Spawn a droplet at rest on a grid cell.
    pub fn spawn(x: f32, z: f32, settings: &ErosionSettings) -> Self {
        Self {
            pos: Vec2::new(x, z),
            dir: Vec2::ZERO,
            speed: settings.initial_speed,
            water: settings.initial_water_volume,
            sediment: 0.0,
        }
    }

    /// Advance one step, eroding or depositing at the cell just left.
    ///
    /// The grid is `width` × `height` and `brush` must have been built for
    /// the same dimensions.
    pub fn step(
        &mut self,
        map: &mut [f32],
        width: usize,
        height: usize,
        brush: &ErosionBrush,
        settings: &ErosionSettings,
    ) -> StepOutcome {
        let node_x = self.pos.x as usize;
        let node_z = self.pos.y as usize;
        let node = node_x + node_z * width;
        let offset = self.pos - Vec2::new(node_x as f32, node_z as f32);

        let here = height_and_gradient(map, width, self.pos);

        self.dir = self.dir * settings.inertia - here.gradient * (1.0 - settings.inertia);
        let len = self.dir.length();
        if len != 0.0 {
            self.dir /= len;
        }
        self.pos += self.dir;

        if self.dir == Vec2::ZERO {
            return StepOutcome::Terminated(TerminationReason::Flat);
        }
        let limit = Vec2::new(width as f32 - 2.0, height as f32 - 2.0);
        // Negated so a NaN position also counts as outside.
        let inside = self.pos.x >= 0.0
            && self.pos.y >= 0.0
            && self.pos.x < limit.x
            && self.pos.y < limit.y;
        if !inside {
            return StepOutcome::Terminated(TerminationReason::OutOfBounds);
        }

        let delta_height = height_and_gradient(map, width, self.pos).height - here.height;

        if self.speed.is_nan() {
            self.speed = 0.0;
        }
        let capacity = (-delta_height * self.speed * self.water * settings.sediment_capacity_factor)
            .max(settings.min_sediment_capacity);

        let outcome = if self.sediment > capacity || delta_height > 0.0 {
            let amount = if delta_height > 0.0 {
                delta_height.min(self.sediment)
            } else {
                (self.sediment - capacity) * settings.deposit_speed
            };
            self.sediment -= amount;

            map[node] += amount * (1.0 - offset.x) * (1.0 - offset.y);
            map[node + 1] += amount * offset.x * (1.0 - offset.y);
            map[node + width] += amount * (1.0 - offset.x) * offset.y;
            map[node + width + 1] += amount * offset.x * offset.y;
            StepOutcome::Deposited(amount)
        } else {
            let amount = ((capacity - self.sediment) * settings.erode_speed).min(-delta_height);

            let (indices, weights) = brush.cell(node);
            let mut removed = 0.0;
            for (&index, &weight) in indices.iter().zip(weights) {
                let cell = &mut map[index as usize];
                let delta = (amount * weight).min(cell.max(0.0));
                *cell -= delta;
                removed += delta;
            }
            self.sediment += removed;
            StepOutcome::Eroded(removed)
        };

        self.speed = (self.speed * self.speed + delta_height * settings.gravity).sqrt();
        self.water *= 1.0 - settings.evaporate_speed;
        outcome
    }
}
