//! Wheel-driven camera zoom with planet-dependent bounds.

/// Tuning for [`CameraZoomController`]. Bounds are `min_factor / radius` and `max_factor / radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    /// Zoom change per unit of wheel delta.
    pub step: f32,
    pub min_factor: f32,
    pub max_factor: f32,
    /// Exponential approach rate (1/s). `None` applies wheel input immediately.
    pub smoothing: Option<f32>,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            step: 0.005,
            min_factor: 0.5,
            max_factor: 5.0,
            smoothing: None,
        }
    }
}

/// Outcome of one wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelZoom {
    /// New zoom target, inside the current bounds.
    pub target: f32,
    /// Value to report right away. Smoothed zoom reports through [`CameraZoomController::advance`]
    /// instead, except when the wheel pushed against a bound the zoom already sits on.
    pub report: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct CameraZoomController {
    settings: ZoomSettings,
    zoom: f32,
    target: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl CameraZoomController {
    pub fn new(settings: ZoomSettings, radius: f32) -> Self {
        let (min_zoom, max_zoom) = Self::bounds(&settings, radius);
        let zoom = 1.0_f32.clamp(min_zoom, max_zoom);
        Self {
            settings,
            zoom,
            target: zoom,
            min_zoom,
            max_zoom,
        }
    }

    fn bounds(settings: &ZoomSettings, radius: f32) -> (f32, f32) {
        debug_assert!(radius > 0.0, "zoom bounds need a positive radius");
        (settings.min_factor / radius, settings.max_factor / radius)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    /// Apply one wheel event.
    ///
    /// A clamped value is still reported, even when it equals the previous one.
    pub fn on_wheel_delta(&mut self, delta_y: f32, radius: f32) -> WheelZoom {
        let (min_zoom, max_zoom) = Self::bounds(&self.settings, radius);
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;

        let requested = self.target - delta_y * self.settings.step;
        let next = requested.clamp(min_zoom, max_zoom);
        self.target = next;

        let report = if self.settings.smoothing.is_none() {
            self.zoom = next;
            Some(next)
        } else if next != requested && self.zoom == next {
            // advance() has nothing left to do, so it would never report this
            Some(next)
        } else {
            None
        };
        WheelZoom { target: next, report }
    }

    /// Recompute bounds for a new planet radius. Returns the zoom if clamping changed it.
    pub fn rebound(&mut self, radius: f32) -> Option<f32> {
        let (min_zoom, max_zoom) = Self::bounds(&self.settings, radius);
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.target = self.target.clamp(min_zoom, max_zoom);

        let clamped = self.zoom.clamp(min_zoom, max_zoom);
        if clamped != self.zoom {
            self.zoom = clamped;
            Some(clamped)
        } else {
            None
        }
    }

    /// Move the applied zoom toward the target. Never overshoots.
    pub fn advance(&mut self, dt_secs: f32) -> Option<f32> {
        let rate = self.settings.smoothing?;
        if self.zoom == self.target {
            return None;
        }

        let alpha = (1.0 - (-rate * dt_secs.max(0.0)).exp()).clamp(0.0, 1.0);
        let remaining = self.target - self.zoom;
        let next = if remaining.abs() < 1e-4 {
            self.target
        } else {
            self.zoom + remaining * alpha
        };
        if next == self.zoom {
            return None;
        }
        self.zoom = next;
        Some(next)
    }
}

/// Vertical FOV for `zoom`: the tangent of the half-angle shrinks by the zoom factor.
pub fn zoomed_fov(base_fov: f32, zoom: f32) -> f32 {
    2.0 * ((base_fov * 0.5).tan() / zoom).atan()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_wheel_zoom_in_on_earth() {
        let mut zoom = CameraZoomController::new(ZoomSettings::default(), 1.0);
        assert_eq!(zoom.zoom(), 1.0);

        let wheel = zoom.on_wheel_delta(-100.0, 1.0);
        assert!((wheel.target - 1.5).abs() < EPSILON);
        assert_eq!(wheel.report, Some(wheel.target));
        assert!((zoom.zoom() - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_bounds_are_inverse_to_radius() {
        let zoom = CameraZoomController::new(ZoomSettings::default(), 0.5);
        assert!((zoom.min_zoom() - 1.0).abs() < EPSILON);
        assert!((zoom.max_zoom() - 10.0).abs() < EPSILON);
        assert_eq!(zoom.zoom(), 1.0);
    }

    #[test]
    fn test_initial_zoom_clamped_into_bounds() {
        // Bounds for radius 0.1 are [5, 50]
        let zoom = CameraZoomController::new(ZoomSettings::default(), 0.1);
        assert!((zoom.zoom() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_wheel_result_always_within_bounds() {
        for radius in [0.38_f32, 0.53, 0.95, 1.0, 2.5] {
            let mut zoom = CameraZoomController::new(ZoomSettings::default(), radius);
            for delta in [-10_000.0_f32, -250.0, -3.0, 0.0, 7.0, 400.0, 10_000.0] {
                let next = zoom.on_wheel_delta(delta, radius).target;
                assert!(next >= 0.5 / radius - EPSILON, "{next} below bound for r={radius}");
                assert!(next <= 5.0 / radius + EPSILON, "{next} above bound for r={radius}");
            }
        }
    }

    #[test]
    fn test_clamped_wheel_still_reports_value() {
        let mut zoom = CameraZoomController::new(ZoomSettings::default(), 1.0);
        assert_eq!(zoom.on_wheel_delta(-10_000.0, 1.0).report, Some(5.0));
        // Already at the bound: the clamped value comes back again
        assert_eq!(zoom.on_wheel_delta(-100.0, 1.0).report, Some(5.0));
        assert_eq!(zoom.on_wheel_delta(10_000.0, 1.0).report, Some(0.5));
    }

    #[test]
    fn test_rebound_clamps_for_smaller_planet() {
        let mut zoom = CameraZoomController::new(ZoomSettings::default(), 1.0);
        zoom.on_wheel_delta(100.0, 1.0); // 0.5
        assert!((zoom.zoom() - 0.5).abs() < EPSILON);

        let changed = zoom.rebound(0.38).unwrap();
        assert!((changed - 0.5 / 0.38).abs() < EPSILON);
        assert!((zoom.target() - changed).abs() < EPSILON);

        // Inside the new bounds: nothing to report
        assert_eq!(zoom.rebound(0.38), None);
    }

    #[test]
    fn test_unsmoothed_advance_is_noop() {
        let mut zoom = CameraZoomController::new(ZoomSettings::default(), 1.0);
        zoom.on_wheel_delta(-100.0, 1.0);
        assert_eq!(zoom.advance(1.0 / 60.0), None);
    }

    #[test]
    fn test_smoothed_zoom_moves_monotonically_without_overshoot() {
        let settings = ZoomSettings {
            smoothing: Some(8.0),
            ..ZoomSettings::default()
        };
        let mut zoom = CameraZoomController::new(settings, 1.0);
        let wheel = zoom.on_wheel_delta(-100.0, 1.0);
        let target = wheel.target;
        assert!((target - 1.5).abs() < EPSILON);
        assert_eq!(wheel.report, None);
        assert_eq!(zoom.zoom(), 1.0);

        let first = zoom.advance(1.0 / 60.0).unwrap();
        assert!(first > 1.0 && first < target);

        let mut previous = first;
        for _ in 0..600 {
            if let Some(next) = zoom.advance(1.0 / 60.0) {
                assert!(next >= previous);
                assert!(next <= target);
                previous = next;
            }
        }
        assert_eq!(zoom.zoom(), target);
        assert_eq!(zoom.advance(1.0 / 60.0), None);
    }

    #[test]
    fn test_smoothed_wheel_at_bound_reports_clamped_value() {
        let settings = ZoomSettings {
            smoothing: Some(8.0),
            ..ZoomSettings::default()
        };
        let mut zoom = CameraZoomController::new(settings, 1.0);
        // Heading for the bound: frames report, the wheel does not
        assert_eq!(zoom.on_wheel_delta(-10_000.0, 1.0).report, None);
        while zoom.advance(1.0 / 60.0).is_some() {}
        assert_eq!(zoom.zoom(), 5.0);

        for _ in 0..2 {
            let wheel = zoom.on_wheel_delta(-100.0, 1.0);
            assert_eq!(wheel.report, Some(5.0));
            assert_eq!(zoom.advance(1.0 / 60.0), None);
        }
        // Backing off the bound goes through the frames again
        assert_eq!(zoom.on_wheel_delta(100.0, 1.0).report, None);
    }

    #[test]
    fn test_zoomed_fov() {
        let base = 75.0_f32.to_radians();
        assert!((zoomed_fov(base, 1.0) - base).abs() < EPSILON);
        assert!(zoomed_fov(base, 2.0) < base);
        assert!(zoomed_fov(base, 0.5) > base);
    }
}
