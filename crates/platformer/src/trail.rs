//! Fading polyline behind moving objects

use platform_engine::ecs::{Component, GameContext, GameObject};
use platform_engine::foundation::math::Vec2;
use platform_engine::render::{Color, RenderContext};
use std::collections::VecDeque;

/// One remembered position
#[derive(Debug, Clone)]
pub struct TrailSegment {
    /// World position
    pub position: Vec2,

    /// Seconds since the segment was laid down
    pub age: f32,
}

impl TrailSegment {
    /// Fresh segment at `position`
    pub fn new(position: Vec2) -> Self {
        Self { position, age: 0.0 }
    }

    /// Quadratic fade from 1 to 0 over `lifetime`
    pub fn alpha(&self, lifetime: f32) -> f32 {
        let t = (self.age / lifetime).clamp(0.0, 1.0);
        (1.0 - t).powf(2.0)
    }

    /// Nearly invisible segments are dropped instead of cut off at full age
    pub fn should_remove(&self, lifetime: f32) -> bool {
        self.alpha(lifetime) < 0.01
    }
}

/// Records the owner's path and draws it as fading lines
#[derive(Debug, Clone)]
pub struct TrailRenderer {
    segments: VecDeque<TrailSegment>,

    /// Maximum number of segments kept
    pub max_segments: usize,

    /// Seconds a segment takes to fade out
    pub segment_lifetime: f32,

    /// Distance the owner must travel before a new segment is laid
    pub segment_length: f32,

    /// Line color at full opacity
    pub color: Color,

    last_spawn: Option<Vec2>,
}

impl TrailRenderer {
    /// Trail with default spacing and fade
    pub fn new() -> Self {
        Self {
            segments: VecDeque::with_capacity(16),
            max_segments: 16,
            segment_lifetime: 0.4,
            segment_length: 0.2,
            color: Color::CYAN,
            last_spawn: None,
        }
    }

    /// Configure segment count, spacing and fade time
    pub fn with_trail_config(
        mut self,
        max_segments: usize,
        segment_length: f32,
        lifetime: f32,
    ) -> Self {
        self.max_segments = max_segments;
        self.segment_length = segment_length;
        self.segment_lifetime = lifetime;
        self
    }

    /// Set the line color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Trail used by projectiles
    pub fn projectile() -> Self {
        Self::new()
            .with_color(Color::YELLOW)
            .with_trail_config(12, 0.25, 0.3)
    }

    /// Segments, oldest first
    pub fn segments(&self) -> &VecDeque<TrailSegment> {
        &self.segments
    }

    /// Age segments, drop faded ones and lay a new one if the owner moved far enough
    pub fn advance(&mut self, position: Vec2, delta_time: f32) {
        for segment in &mut self.segments {
            segment.age += delta_time;
        }
        while self
            .segments
            .front()
            .is_some_and(|segment| segment.should_remove(self.segment_lifetime))
        {
            self.segments.pop_front();
        }

        let due = self
            .last_spawn
            .map_or(true, |last| (position - last).norm() >= self.segment_length);
        if due {
            self.segments.push_back(TrailSegment::new(position));
            self.last_spawn = Some(position);
            while self.segments.len() > self.max_segments {
                self.segments.pop_front();
            }
        }
    }
}

impl Default for TrailRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for TrailRenderer {
    fn init(&mut self, object: &mut GameObject, _ctx: &mut GameContext<'_>) {
        self.segments.clear();
        self.last_spawn = None;
        self.advance(object.transform().position, 0.0);
    }

    fn update(&mut self, object: &mut GameObject, ctx: &mut GameContext<'_>) {
        self.advance(object.transform().position, ctx.tick.delta_time);
    }

    fn render(&self, object: &GameObject, ctx: &mut dyn RenderContext) {
        // Segments are stored in world space; drawing happens in the owner's space
        let transform = object.transform();
        let local: Vec<(Vec2, f32)> = self
            .segments
            .iter()
            .filter_map(|segment| {
                let point = transform.inverse_transform_point(segment.position)?;
                Some((point, segment.alpha(self.segment_lifetime)))
            })
            .collect();

        for pair in local.windows(2) {
            let (from, _) = pair[0];
            let (to, alpha) = pair[1];
            ctx.draw_line(from, to, self.color.with_alpha(alpha));
        }
        if let Some((newest, alpha)) = local.last() {
            ctx.draw_line(*newest, Vec2::zeros(), self.color.with_alpha(*alpha));
        }
    }
}
