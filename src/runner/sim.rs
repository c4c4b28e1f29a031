//! Pure simulation for the endless runner.
//!
//! Nothing here touches the DOM: the glue code in the parent module owns a
//! [`RunnerState`] and calls [`RunnerState::tick`] once per animation frame.
//! Keeping this half free of `web_sys` lets the whole rule set run under
//! plain `cargo test` on the host.

/// Run-cycle sprite frames (column indices into the dino sheet).
pub const RUN_FRAMES: &[usize] = &[0, 1];

/// Per-run constants. [`Tuning::default`] describes the classic game;
/// tests build custom ones.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Fixed y of the dino's (and every cactus's) top edge while grounded.
    pub ground_y: f64,
    pub dino_x: f64,
    pub dino_width: f64,
    pub dino_height: f64,
    pub gravity: f64,
    /// Vertical velocity applied when a queued jump is consumed (negative = up).
    pub jump_impulse: f64,
    pub obstacle_width: f64,
    pub obstacle_height: f64,
    /// A cactus spawns when the spawn timer strictly exceeds this frame count.
    pub spawn_interval: u32,
    pub base_speed: f64,
    pub speed_increment: f64,
    /// Frames between run-cycle sprite advances.
    pub frame_interval: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 300.0,
            ground_y: 206.0,
            dino_x: 50.0,
            dino_width: 88.0,
            dino_height: 94.0,
            gravity: 1.1,
            jump_impulse: -20.0,
            obstacle_width: 40.0,
            obstacle_height: 80.0,
            spawn_interval: 100,
            base_speed: 10.0,
            speed_increment: 0.2,
            frame_interval: 5,
        }
    }
}

/// Lifecycle of a run. `Over` is one-way until the reset path maps it back
/// to `Running`; `NotStarted` is left only by [`RunnerState::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Over,
}

#[derive(Clone, Copy, Debug)]
pub struct Dino {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical velocity; positive is downward.
    pub dy: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The whole mutable game state. One instance lives in the browser glue's
/// thread-local cell for the page session; tests own theirs directly.
pub struct RunnerState {
    pub tuning: Tuning,
    pub phase: Phase,
    pub dino: Dino,
    /// Active cacti in insertion (= spawn) order.
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub speed: f64,
    pub dark_theme: bool,
    /// Index into [`RUN_FRAMES`].
    pub anim_frame: usize,
    jump_requested: bool,
    spawn_timer: u32,
    frame_counter: u32,
}

impl RunnerState {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            phase: Phase::NotStarted,
            dino: Dino {
                x: tuning.dino_x,
                y: tuning.ground_y,
                width: tuning.dino_width,
                height: tuning.dino_height,
                dy: 0.0,
            },
            obstacles: Vec::new(),
            score: 0,
            speed: tuning.base_speed,
            dark_theme: false,
            anim_frame: 0,
            jump_requested: false,
            spawn_timer: 0,
            frame_counter: 0,
        }
    }

    /// Position-equals-ground is the only grounded signal; there is no
    /// separate airborne flag.
    pub fn is_grounded(&self) -> bool {
        self.dino.y == self.tuning.ground_y
    }

    /// True once a run has ever started; stays true through game over.
    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    /// Restore the run variables to their starting values. `Over` maps back
    /// to `Running`; `NotStarted` stays put. A queued jump and the animation
    /// counters deliberately survive a reset (see DESIGN.md).
    pub fn reset(&mut self) {
        let t = self.tuning;
        self.dino.y = t.ground_y;
        self.dino.dy = 0.0;
        self.obstacles.clear();
        self.score = 0;
        self.spawn_timer = 0;
        self.speed = t.base_speed;
        if self.phase == Phase::Over {
            self.phase = Phase::Running;
        }
    }

    /// Begin (or restart) a run. Both the Start and Restart buttons land here.
    pub fn start(&mut self) {
        self.phase = Phase::Running;
        self.reset();
    }

    /// Queue a jump for the next tick. The grounded and started guards run
    /// here, at input-event time, not at the next frame.
    pub fn request_jump(&mut self) {
        if self.has_started() && self.is_grounded() {
            self.jump_requested = true;
        }
    }

    /// Flip the visual theme. Only draw colors depend on it.
    pub fn toggle_theme(&mut self) -> bool {
        self.dark_theme = !self.dark_theme;
        self.dark_theme
    }

    /// Advance the simulation by one frame. A no-op unless a run is active.
    pub fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        // Consume a queued jump; the grounded check already happened at the
        // input event.
        if self.jump_requested {
            self.dino.dy = self.tuning.jump_impulse;
            self.jump_requested = false;
        }
        self.dino.dy += self.tuning.gravity;
        self.dino.y += self.dino.dy;

        // Ground clamp
        if self.dino.y > self.tuning.ground_y {
            self.dino.y = self.tuning.ground_y;
            self.dino.dy = 0.0;
        }

        // Scroll cacti; each one fully past the left edge scores a point.
        let speed = self.speed;
        let mut cleared = 0u32;
        self.obstacles.retain_mut(|ob| {
            ob.x -= speed;
            if ob.x + ob.width < 0.0 {
                cleared += 1;
                false
            } else {
                true
            }
        });
        self.score += cleared;

        // Spawn on a frame timer; strict > so the first cactus appears on
        // tick interval + 1.
        self.spawn_timer += 1;
        if self.spawn_timer > self.tuning.spawn_interval {
            self.obstacles.push(Obstacle {
                x: self.tuning.canvas_width,
                y: self.tuning.ground_y,
                width: self.tuning.obstacle_width,
                height: self.tuning.obstacle_height,
            });
            self.spawn_timer = 0;
        }

        // Speed ramp. Re-fires on every frame while the score sits on a
        // multiple of ten, matching the original game (see DESIGN.md).
        if self.score > 0 && self.score % 10 == 0 {
            self.speed += self.tuning.speed_increment;
        }

        // Run-cycle animation cadence
        self.frame_counter += 1;
        if self.frame_counter >= self.tuning.frame_interval {
            self.anim_frame = (self.anim_frame + 1) % RUN_FRAMES.len();
            self.frame_counter = 0;
        }

        // Any overlap ends the run; the flag is sticky until reset.
        for ob in &self.obstacles {
            if overlaps(&self.dino, ob) {
                self.phase = Phase::Over;
            }
        }
    }
}

/// Axis-aligned bounding-box overlap between the dino and a cactus; both
/// axes must overlap simultaneously.
fn overlaps(d: &Dino, ob: &Obstacle) -> bool {
    d.x < ob.x + ob.width
        && d.x + d.width > ob.x
        && d.y < ob.y + ob.height
        && d.y + d.height > ob.y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_state() -> RunnerState {
        let mut s = RunnerState::new(Tuning::default());
        s.start();
        s
    }

    fn cactus_at(s: &RunnerState, x: f64) -> Obstacle {
        Obstacle {
            x,
            y: s.tuning.ground_y,
            width: s.tuning.obstacle_width,
            height: s.tuning.obstacle_height,
        }
    }

    #[test]
    fn tick_is_noop_before_start() {
        let mut s = RunnerState::new(Tuning::default());
        s.tick();
        assert_eq!(s.phase, Phase::NotStarted);
        assert_eq!(s.dino.y, s.tuning.ground_y);
        assert!(s.obstacles.is_empty());
        assert_eq!(s.score, 0);
    }

    #[test]
    fn tick_is_noop_after_game_over() {
        let mut s = started_state();
        let ob = cactus_at(&s, s.dino.x);
        s.obstacles.push(ob);
        s.tick();
        assert_eq!(s.phase, Phase::Over);
        let y = s.dino.y;
        let ob_x = s.obstacles[0].x;
        let score = s.score;
        s.tick();
        assert_eq!(s.dino.y, y);
        assert_eq!(s.obstacles[0].x, ob_x);
        assert_eq!(s.score, score);
    }

    #[test]
    fn jump_guard_requires_started_and_grounded() {
        let mut s = RunnerState::new(Tuning::default());
        // Not started: request ignored
        s.request_jump();
        s.start();
        s.tick();
        assert_eq!(s.dino.y, s.tuning.ground_y, "ignored request must not fire");

        // Started + grounded: next tick leaves the ground
        s.request_jump();
        s.tick();
        assert!(s.dino.y < s.tuning.ground_y);

        // Airborne: request ignored, dy unchanged by the handler
        let dy = s.dino.dy;
        s.request_jump();
        assert_eq!(s.dino.dy, dy);
        s.tick();
        assert_eq!(s.dino.dy, dy + s.tuning.gravity);
    }

    #[test]
    fn dino_never_sinks_below_ground() {
        let mut s = started_state();
        s.request_jump();
        for _ in 0..200 {
            s.tick();
            assert!(s.dino.y <= s.tuning.ground_y);
            if s.is_grounded() {
                assert_eq!(s.dino.dy, 0.0);
            }
        }
        assert!(s.is_grounded(), "jump arc must land within 200 frames");
    }

    #[test]
    fn obstacle_exit_scores_exactly_once() {
        let mut s = started_state();
        // One tick from the exit threshold at base speed 10:
        // x = -35 -> -45, right edge -5 < 0.
        let ob = cactus_at(&s, -35.0);
        s.obstacles.push(ob);
        s.tick();
        assert_eq!(s.score, 1);
        assert!(s.obstacles.is_empty());

        // Right edge still visible: no score.
        let ob = cactus_at(&s, 5.0);
        s.obstacles.push(ob);
        s.tick();
        assert_eq!(s.score, 1);
        assert_eq!(s.obstacles.len(), 1);
    }

    #[test]
    fn obstacle_x_strictly_decreases_each_frame() {
        let mut s = started_state();
        let ob = cactus_at(&s, s.tuning.canvas_width);
        s.obstacles.push(ob);
        let mut prev = s.obstacles[0].x;
        for _ in 0..10 {
            s.tick();
            assert!(s.obstacles[0].x < prev);
            prev = s.obstacles[0].x;
        }
    }

    #[test]
    fn spawn_fires_when_timer_strictly_exceeds_interval() {
        let mut s = started_state();
        for _ in 0..100 {
            s.tick();
        }
        assert!(s.obstacles.is_empty(), "no spawn at timer == interval");
        s.tick();
        assert_eq!(s.obstacles.len(), 1);
        let ob = s.obstacles[0];
        assert_eq!(ob.x, s.tuning.canvas_width);
        assert_eq!(ob.y, s.tuning.ground_y);
        assert_eq!(ob.width, s.tuning.obstacle_width);
        assert_eq!(ob.height, s.tuning.obstacle_height);
        // Timer reset: the next spawn is another full interval away. Clear
        // live cacti between ticks so the dino is never hit along the way.
        for _ in 0..100 {
            s.obstacles.clear();
            s.tick();
        }
        assert!(s.obstacles.is_empty());
        s.tick();
        assert_eq!(s.obstacles.len(), 1);
    }

    #[test]
    fn speed_ramp_refires_each_frame_on_multiple_of_ten() {
        let mut s = started_state();
        s.score = 10;
        let base = s.speed;
        s.tick();
        s.tick();
        s.tick();
        let expect = base + 3.0 * s.tuning.speed_increment;
        assert!((s.speed - expect).abs() < 1e-9);
    }

    #[test]
    fn speed_ramp_silent_off_multiples() {
        let mut s = started_state();
        s.score = 7;
        let base = s.speed;
        s.tick();
        assert_eq!(s.speed, base);
    }

    #[test]
    fn collision_sets_over_and_sticks() {
        let mut s = started_state();
        // Overlapping the dino even after one frame of scrolling.
        let ob = cactus_at(&s, s.dino.x + 20.0);
        s.obstacles.push(ob);
        s.tick();
        assert_eq!(s.phase, Phase::Over);
        s.tick();
        assert_eq!(s.phase, Phase::Over);
        s.reset();
        assert_eq!(s.phase, Phase::Running);
    }

    #[test]
    fn airborne_dino_clears_a_cactus() {
        let mut s = started_state();
        // Dino high in the air, cactus passing underneath at ground level.
        s.dino.y = 50.0;
        let ob = cactus_at(&s, s.dino.x);
        s.obstacles.push(ob);
        s.tick();
        // y axis: 50 + 94 = 144 < 206, no overlap even though x overlaps.
        assert_ne!(s.phase, Phase::Over);
    }

    #[test]
    fn reset_restores_baseline() {
        let mut s = started_state();
        for _ in 0..150 {
            s.tick();
        }
        s.score = 30;
        s.speed = 13.0;
        s.phase = Phase::Over;
        s.reset();
        assert_eq!(s.phase, Phase::Running);
        assert_eq!(s.dino.y, s.tuning.ground_y);
        assert_eq!(s.dino.dy, 0.0);
        assert!(s.obstacles.is_empty());
        assert_eq!(s.score, 0);
        assert_eq!(s.speed, s.tuning.base_speed);
        // Next spawn is a full interval away again.
        for _ in 0..100 {
            s.tick();
        }
        assert!(s.obstacles.is_empty());
    }

    #[test]
    fn anim_frame_advances_on_cadence_and_cycles() {
        let mut s = started_state();
        assert_eq!(s.anim_frame, 0);
        for _ in 0..s.tuning.frame_interval {
            s.tick();
        }
        assert_eq!(s.anim_frame, 1);
        for _ in 0..s.tuning.frame_interval {
            s.tick();
        }
        assert_eq!(s.anim_frame, 0, "frame index cycles through RUN_FRAMES");
    }

    #[test]
    fn theme_toggle_leaves_simulation_alone() {
        let mut s = started_state();
        s.tick();
        let y = s.dino.y;
        let score = s.score;
        assert!(s.toggle_theme());
        assert!(!s.toggle_theme());
        assert_eq!(s.dino.y, y);
        assert_eq!(s.score, score);
    }
}
