/// Cumulative exposure carried across all frames of a run.
///
/// Shutter speed is advanced by the same increment as exposure time. This
/// mirrors how stacked raws have always been tagged by this tool; it is not a
/// photometric APEX conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExposureRecord {
    exposure_time: f64,
    shutter_speed: f64,
    frames: usize,
}

impl ExposureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return to the zero baseline.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add one frame's exposure time.
    pub fn accumulate(&mut self, exposure_time: f64) {
        self.exposure_time += exposure_time;
        self.shutter_speed += exposure_time;
        self.frames += 1;
    }

    /// Total exposure time in seconds.
    pub fn exposure_time(&self) -> f64 {
        self.exposure_time
    }

    pub fn shutter_speed(&self) -> f64 {
        self.shutter_speed
    }

    /// Number of frames accumulated since the last reset.
    pub fn frame_count(&self) -> usize {
        self.frames
    }
}
