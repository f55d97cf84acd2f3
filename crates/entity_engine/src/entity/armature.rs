//! Armature playback and skinning

use super::Entity;

/// Frame change below which cached skinning is reused
const FRAME_EPSILON: f32 = 0.0001;

impl Entity {
    /// Jump the armature player to `frame`
    pub fn set_armature_frame(&mut self, frame: f32) {
        self.armature_player.set_frame(frame);
    }

    /// Play the armature once, deforming immediately at `start`
    pub fn play_armature(&mut self, start: f32, end: f32, speed: f32) {
        self.armature_player.play(start, end, speed);
        if self.armature.is_some() {
            self.deform_with_armature(start);
        }
    }

    /// Loop the armature, deforming immediately at `start`
    pub fn loop_armature(&mut self, start: f32, end: f32, speed: f32) {
        self.armature_player.play_looped(start, end, speed);
        if self.armature.is_some() {
            self.deform_with_armature(start);
        }
    }

    /// End armature playback
    pub fn stop_armature(&mut self) {
        self.armature_player.stop();
    }

    /// Hold the current armature frame
    pub fn pause_armature(&mut self) {
        self.armature_player.pause();
    }

    /// Continue armature playback from the held frame
    pub fn resume_armature(&mut self) {
        self.armature_player.resume();
    }

    /// First frame of the playback range
    pub fn armature_start(&self) -> f32 {
        self.armature_player.start()
    }

    /// Last frame of the playback range
    pub fn armature_end(&self) -> f32 {
        self.armature_player.end()
    }

    /// Playback speed in frames per tick
    pub fn armature_speed(&self) -> f32 {
        self.armature_player.speed()
    }

    /// Current armature frame
    pub fn armature_frame(&self) -> f32 {
        self.armature_player.frame()
    }

    /// Whether armature playback is running
    pub fn is_armature_playing(&self) -> bool {
        self.armature_player.is_playing()
    }

    /// Whether armature playback is on hold
    pub fn is_armature_paused(&self) -> bool {
        self.armature_player.is_paused()
    }

    /// Per-tick update: pick up body movement, then advance the player
    pub fn update(&mut self) {
        self.sync_from_physics();
        self.armature_player.update();
    }

    /// Prepare for drawing: cache the world position and re-skin if the frame moved
    pub fn pre_draw(&mut self) {
        self.position = self.actor.transform().position;

        let Some(armature) = &self.armature else {
            return;
        };
        let frame = self.armature_player.frame();
        let stale = self
            .prev_armature_frame
            .map_or(true, |prev| (frame - prev).abs() > FRAME_EPSILON);
        if stale && frame >= 0.0 && frame <= armature.frame_count() as f32 {
            self.deform_with_armature(frame);
            self.prev_armature_frame = Some(frame);
        }
    }

    /// Skin the model at `frame` into the entity's own vertex buffers
    pub(crate) fn deform_with_armature(&mut self, frame: f32) {
        let (Some(armature), Some(model)) = (&self.armature, &self.model) else {
            return;
        };
        if let Some((vertices, normals)) = armature.deform(model, frame) {
            self.vertices = Some(vertices.into());
            self.normals = Some(normals.into());
        }
    }

    /// Whether skinned buffers are cached
    pub fn has_deformed_vertices(&self) -> bool {
        self.vertices.is_some()
    }
}
