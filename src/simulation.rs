use crate::pointer::SharedPointer;
use crate::settings::FieldConfig;
use crate::surface::Surface;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// A single animated point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Unique for the lifetime of the field, never reused after a reinitialization
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Fixed at creation, 1.0-3.0
    pub radius: f32,
}

/// A line to draw between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the first particle (always less than `b`)
    pub a: usize,
    pub b: usize,
    /// Stroke opacity, already scaled by the line base opacity
    pub opacity: f32,
}

/// Opacity of the line joining two particles `distance_sq` apart, or `None` when they
/// are too far apart to be joined. Falls linearly in squared distance and reaches 0 at
/// the threshold. A zero threshold never joins anything.
pub fn line_opacity(distance_sq: f32, threshold_sq: f32, base_opacity: f32) -> Option<f32> {
    if distance_sq < threshold_sq {
        Some((1.0 - distance_sq / threshold_sq) * base_opacity)
    } else {
        None
    }
}

/// Move one coordinate by its velocity, reflecting off `[0, max]`.
///
/// The velocity sign flips on the frame the move would leave the range. If even the
/// reflected move leaves it (velocity larger than the surface) the coordinate holds.
fn advance_axis(position: &mut f32, velocity: &mut f32, max: f32) {
    let next = *position + *velocity;
    if (0.0..=max).contains(&next) {
        *position = next;
        return;
    }

    *velocity = -*velocity;
    let reflected = *position + *velocity;
    if (0.0..=max).contains(&reflected) {
        *position = reflected;
    }
}

/// Clamp a surface dimension to something usable
fn sane_dimension(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Particle field state: one owned instance per drawing surface
pub struct ParticleField {
    pub width: f32,
    pub height: f32,
    pub config: FieldConfig,
    particles: Vec<Particle>,
    next_id: u64,
    /// Frames stepped since the last reinitialization
    pub frame: u64,
    pointer: SharedPointer,
    /// Pointer position as read at the start of the current frame
    last_pointer: Option<(f32, f32)>,
    rng: StdRng,
}

impl ParticleField {
    /// A seed makes every particle set, including those from later
    /// reinitializations, reproducible.
    pub fn new(
        width: f32,
        height: f32,
        config: FieldConfig,
        pointer: SharedPointer,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut field = Self {
            width: 0.0,
            height: 0.0,
            config: config.sanitized(),
            particles: Vec::new(),
            next_id: 0,
            frame: 0,
            pointer,
            last_pointer: None,
            rng,
        };
        field.initialize(width, height);
        field
    }

    /// Replace the whole particle set with a fresh one sized for `width` x `height`.
    /// Safe to call repeatedly; every call discards the previous particles.
    pub fn initialize(&mut self, width: f32, height: f32) {
        self.width = sane_dimension(width);
        self.height = sane_dimension(height);

        let count = self.config.effective_count(self.width);
        let speed = self.config.particle_speed;
        let margin_x = self.config.margin.min(self.width / 2.0);
        let margin_y = self.config.margin.min(self.height / 2.0);
        let span_x = self.width - 2.0 * margin_x;
        let span_y = self.height - 2.0 * margin_y;

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = self.rng.gen::<f32>() * TAU;
            let particle = Particle {
                id: self.next_id,
                x: self.rng.gen::<f32>() * span_x + margin_x,
                y: self.rng.gen::<f32>() * span_y + margin_y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                radius: self.rng.gen::<f32>() * 2.0 + 1.0,
            };
            self.next_id += 1;
            self.particles.push(particle);
        }

        self.frame = 0;
        tracing::debug!(
            count,
            width = self.width,
            height = self.height,
            "particle field initialized"
        );
    }

    /// Advance every particle one frame
    pub fn step(&mut self) {
        // Pointer interaction is not applied; the position is sampled once per frame
        // so every reader of this frame sees the same value.
        self.last_pointer = self.pointer.load();

        let (width, height) = (self.width, self.height);
        for p in &mut self.particles {
            advance_axis(&mut p.x, &mut p.vx, width);
            advance_axis(&mut p.y, &mut p.vy, height);
        }
        self.frame += 1;
    }

    /// Clear the surface, draw every particle, then the connection pass.
    /// Returns the number of lines drawn.
    pub fn render<S: Surface>(&self, surface: &mut S) -> usize {
        surface.clear();
        let color = self.config.base_color;
        for p in &self.particles {
            surface.fill_circle(p.x, p.y, p.radius, color);
        }
        self.connect(surface)
    }

    /// Draw a line for every pair closer than the connection distance and
    /// return how many were drawn
    pub fn connect<S: Surface>(&self, surface: &mut S) -> usize {
        let line_color = self.config.line_color;
        let connections = self.connections();
        for c in &connections {
            let (a, b) = (&self.particles[c.a], &self.particles[c.b]);
            surface.stroke_line(a.x, a.y, b.x, b.y, line_color.with_alpha(c.opacity));
        }
        connections.len()
    }

    /// Every unordered pair within the connection distance. O(n^2), fine for the
    /// small counts this is used with.
    pub fn connections(&self) -> Vec<Connection> {
        let threshold_sq = self.config.connection_distance * self.config.connection_distance;
        let base_opacity = self.config.line_base_opacity();
        let mut connections = Vec::new();

        for (a, pa) in self.particles.iter().enumerate() {
            for (offset, pb) in self.particles[a + 1..].iter().enumerate() {
                let dx = pa.x - pb.x;
                let dy = pa.y - pb.y;
                let distance_sq = dx * dx + dy * dy;
                if let Some(opacity) = line_opacity(distance_sq, threshold_sq, base_opacity) {
                    connections.push(Connection {
                        a,
                        b: a + 1 + offset,
                        opacity,
                    });
                }
            }
        }
        connections
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Pointer position sampled by the last `step`
    pub fn last_pointer(&self) -> Option<(f32, f32)> {
        self.last_pointer
    }

    #[cfg(test)]
    fn with_seed(width: f32, height: f32, config: FieldConfig, seed: u64) -> Self {
        Self::new(width, height, config, SharedPointer::new(), Some(seed))
    }

    #[cfg(test)]
    fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }
}
