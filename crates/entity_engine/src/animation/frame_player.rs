//! Frame-based playback controller
//!
//! Tracks the current (fractional) frame of an animation and advances it by a
//! fixed step per tick.

/// Playback state for one animated object
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlayer {
    frame: f32,
    start: f32,
    end: f32,
    speed: f32,
    playing: bool,
    looping: bool,
    paused: bool,
}

impl Default for FramePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePlayer {
    /// Stopped player at frame zero
    pub fn new() -> Self {
        Self {
            frame: 0.0,
            start: 0.0,
            end: 0.0,
            speed: 1.0,
            playing: false,
            looping: false,
            paused: false,
        }
    }

    /// Jump to a frame without changing playback state
    pub fn set_frame(&mut self, frame: f32) {
        self.frame = frame;
    }

    /// Play once from `start` to `end`
    pub fn play(&mut self, start: f32, end: f32, speed: f32) {
        self.begin(start, end, speed, false);
    }

    /// Play from `start` to `end`, wrapping around
    pub fn play_looped(&mut self, start: f32, end: f32, speed: f32) {
        self.begin(start, end, speed, true);
    }

    fn begin(&mut self, start: f32, end: f32, speed: f32, looping: bool) {
        log::trace!("Frame player: {}..{} at {} (looping {})", start, end, speed, looping);
        self.start = start;
        self.end = end;
        self.speed = speed;
        self.frame = start;
        self.looping = looping;
        self.playing = true;
        self.paused = false;
    }

    /// End playback, keeping the current frame
    pub fn stop(&mut self) {
        self.playing = false;
        self.paused = false;
    }

    /// Hold the current frame; ignored when nothing is playing
    pub fn pause(&mut self) {
        if self.playing {
            self.paused = true;
        }
    }

    /// Continue from the held frame
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance one tick
    pub fn update(&mut self) {
        if !self.playing || self.paused {
            return;
        }

        self.frame += self.speed;

        let (low, high) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        if self.frame >= low && self.frame <= high {
            return;
        }

        if self.looping {
            let span = high - low;
            if span <= 0.0 {
                self.frame = low;
            } else {
                self.frame = low + (self.frame - low).rem_euclid(span);
            }
        } else {
            self.frame = if self.speed >= 0.0 { high } else { low };
            self.playing = false;
        }
    }

    /// Current frame
    pub fn frame(&self) -> f32 {
        self.frame
    }

    /// First frame of the current range
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Last frame of the current range
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Frames advanced per tick
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether playback is running (paused players still count)
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether playback is on hold
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether playback wraps at the end
    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_play_once_clamps_and_stops() {
        let mut player = FramePlayer::new();
        player.play(1.0, 3.0, 1.5);
        player.update();
        assert_relative_eq!(player.frame(), 2.5);
        player.update();
        assert_relative_eq!(player.frame(), 3.0);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_loop_wraps_into_range() {
        let mut player = FramePlayer::new();
        player.play_looped(0.0, 4.0, 3.0);
        player.update();
        player.update();
        assert_relative_eq!(player.frame(), 2.0);
        assert!(player.is_playing());
    }

    #[test]
    fn test_negative_speed_runs_backwards() {
        let mut player = FramePlayer::new();
        player.play(5.0, 2.0, -2.0);
        player.update();
        assert_relative_eq!(player.frame(), 3.0);
        player.update();
        assert_relative_eq!(player.frame(), 2.0);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_pause_holds_and_resume_continues() {
        let mut player = FramePlayer::new();
        player.play(0.0, 10.0, 1.0);
        player.update();
        player.pause();
        player.update();
        assert_relative_eq!(player.frame(), 1.0);
        assert!(player.is_paused());

        player.resume();
        player.update();
        assert_relative_eq!(player.frame(), 2.0);
    }

    #[test]
    fn test_stop_keeps_frame() {
        let mut player = FramePlayer::new();
        player.play(0.0, 10.0, 2.0);
        player.update();
        player.stop();
        player.update();
        assert_relative_eq!(player.frame(), 2.0);
        assert!(!player.is_playing());
    }
}
