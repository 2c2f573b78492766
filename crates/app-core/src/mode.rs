/// The two endpoint layouts a particle collection can morph between.
///
/// Transitions are instantaneous at the state level; visual smoothing is
/// entirely the morph engine's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationMode {
    Scattered,
    Formed,
}

impl FormationMode {
    /// Damping target for the formation progress scalar.
    #[inline]
    pub fn target_progress(self) -> f32 {
        match self {
            FormationMode::Scattered => 0.0,
            FormationMode::Formed => 1.0,
        }
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            FormationMode::Scattered => FormationMode::Formed,
            FormationMode::Formed => FormationMode::Scattered,
        }
    }
}

/// Holds the current formation mode. Toggled by user interaction events,
/// read once per frame by the animators.
#[derive(Clone, Copy, Debug)]
pub struct ModeSource {
    mode: FormationMode,
}

impl ModeSource {
    pub fn new(mode: FormationMode) -> Self {
        Self { mode }
    }

    #[inline]
    pub fn read(&self) -> FormationMode {
        self.mode
    }

    pub fn toggle(&mut self) {
        self.mode = self.mode.toggled();
    }
}

impl Default for ModeSource {
    /// Starts scattered so the first toggle grows the tree.
    fn default() -> Self {
        Self::new(FormationMode::Scattered)
    }
}
