/// Routes pointer motion to the knob being dragged.
///
/// The event loop owns one router. A press that hits a knob calls
/// [`begin`](DragRouter::begin); motion events call
/// [`motion`](DragRouter::motion), which converts absolute pointer positions
/// into deltas and reports which target should receive them; release calls
/// [`end`](DragRouter::end). While no drag is active, motion still updates
/// the stored pointer position so the first delta of the next drag is not
/// measured from a stale point.
#[derive(Debug, Default)]
pub struct DragRouter<T: Copy> {
    active: Option<T>,
    last_x: f64,
    last_y: f64,
}

impl<T: Copy> DragRouter<T> {
    pub fn new() -> Self {
        Self {
            active: None,
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    /// Start routing motion to `target` from pointer position `(x, y)`.
    /// A second press while a drag is active simply retargets.
    pub fn begin(&mut self, target: T, x: f64, y: f64) {
        self.active = Some(target);
        self.last_x = x;
        self.last_y = y;
    }

    /// Feed an absolute pointer position. Returns the active target and the
    /// delta since the previous position, or `None` while idle.
    pub fn motion(&mut self, x: f64, y: f64) -> Option<(T, f64, f64)> {
        let dx = x - self.last_x;
        let dy = y - self.last_y;
        self.last_x = x;
        self.last_y = y;
        self.active.map(|target| (target, dx, dy))
    }

    /// Stop routing; further motion only tracks the pointer position.
    pub fn end(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<T> {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_motion_routes_nowhere_but_tracks_position() {
        let mut router: DragRouter<u8> = DragRouter::new();
        assert_eq!(router.motion(40.0, 20.0), None);

        // First drag delta is measured from the tracked position, not (0,0)
        router.begin(3, 40.0, 20.0);
        assert_eq!(router.motion(42.0, 19.0), Some((3, 2.0, -1.0)));
    }

    #[test]
    fn release_stops_routing() {
        let mut router: DragRouter<u8> = DragRouter::new();
        router.begin(1, 0.0, 0.0);
        assert!(router.motion(5.0, 0.0).is_some());

        router.end();
        assert_eq!(router.motion(10.0, 0.0), None);
        assert_eq!(router.active(), None);
    }

    #[test]
    fn second_press_retargets() {
        let mut router: DragRouter<u8> = DragRouter::new();
        router.begin(1, 0.0, 0.0);
        router.begin(2, 10.0, 10.0);
        assert_eq!(router.motion(11.0, 10.0), Some((2, 1.0, 0.0)));
    }
}
