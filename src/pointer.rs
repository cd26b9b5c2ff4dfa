// Typed input events fed to the engine, and the tracker that turns
// successive pointer samples into a velocity

use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    PointerMove,
    TouchMove,
    Resize,
}

/// A host event translated for the engine. For `Resize`, `x` and `y`
/// carry the new viewport width and height.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub x: f64,
    pub y: f64,
    pub timestamp: f64,
}

impl InputEvent {
    pub fn pointer_move(x: f64, y: f64, timestamp: f64) -> Self {
        InputEvent { kind: InputKind::PointerMove, x, y, timestamp }
    }

    pub fn touch_move(x: f64, y: f64, timestamp: f64) -> Self {
        InputEvent { kind: InputKind::TouchMove, x, y, timestamp }
    }

    pub fn resize(width: f64, height: f64, timestamp: f64) -> Self {
        InputEvent { kind: InputKind::Resize, x: width, y: height, timestamp }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pub pos: Vector2<f64>,
    pub last_pos: Vector2<f64>,
    pub vel: Vector2<f64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        PointerTracker::default()
    }

    pub fn record(&mut self, x: f64, y: f64) {
        self.pos = [x, y];
        self.vel = vecmath::vec2_sub(self.pos, self.last_pos);
        self.last_pos = self.pos;
    }

    pub fn speed(&self) -> f64 {
        vecmath::vec2_len(self.vel)
    }
}
