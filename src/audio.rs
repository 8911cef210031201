//! Background music
//!
//! Audio is optional: a track that fails to load or play is logged and the
//! game carries on silently.

use thiserror::Error;

use crate::presentation::Presenter;
use crate::sim::GamePhase;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio track '{0}' could not be loaded")]
    TrackNotFound(String),
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Playback backend provided by the platform
pub trait AudioBackend {
    /// Load a track and start looping it
    fn load_loop(&mut self, track: &str) -> Result<(), AudioError>;
    fn pause(&mut self) -> Result<(), AudioError>;
    fn resume(&mut self) -> Result<(), AudioError>;
    fn stop(&mut self) -> Result<(), AudioError>;
}

/// Backend that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn load_loop(&mut self, _track: &str) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Playing,
    Paused,
    Stopped,
    /// A backend call failed; no further calls are made
    Degraded,
}

/// Looping background track that follows the game phase
pub struct BackgroundMusic<B: AudioBackend> {
    backend: B,
    state: MusicState,
}

impl<B: AudioBackend> BackgroundMusic<B> {
    /// Start looping `track`; failure degrades to silence
    pub fn start(mut backend: B, track: &str) -> Self {
        let state = match backend.load_loop(track) {
            Ok(()) => {
                log::info!("Background music '{}' started", track);
                MusicState::Playing
            }
            Err(e) => {
                log::warn!("Background music disabled: {}", e);
                MusicState::Degraded
            }
        };
        Self { backend, state }
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn pause(&mut self) {
        if self.state == MusicState::Playing {
            let result = self.backend.pause();
            self.settle(result, MusicState::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state == MusicState::Paused {
            let result = self.backend.resume();
            self.settle(result, MusicState::Playing);
        }
    }

    pub fn stop(&mut self) {
        if matches!(self.state, MusicState::Playing | MusicState::Paused) {
            let result = self.backend.stop();
            self.settle(result, MusicState::Stopped);
        }
    }

    fn settle(&mut self, result: Result<(), AudioError>, next: MusicState) {
        self.state = match result {
            Ok(()) => next,
            Err(e) => {
                log::warn!("Audio error, continuing without music: {}", e);
                MusicState::Degraded
            }
        };
    }
}

impl<B: AudioBackend> Presenter for BackgroundMusic<B> {
    fn on_phase(&mut self, phase: GamePhase) {
        match phase {
            GamePhase::GameOver => self.pause(),
            GamePhase::Playing => self.resume(),
            GamePhase::Restarting => {}
        }
    }
}

/// Browser backend using an `<audio>` element
#[cfg(target_arch = "wasm32")]
pub struct WebAudio {
    element: Option<web_sys::HtmlAudioElement>,
}

#[cfg(target_arch = "wasm32")]
impl WebAudio {
    pub fn new() -> Self {
        Self { element: None }
    }

    fn element(&self) -> Result<&web_sys::HtmlAudioElement, AudioError> {
        self.element
            .as_ref()
            .ok_or_else(|| AudioError::Unavailable("no track loaded".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioBackend for WebAudio {
    fn load_loop(&mut self, track: &str) -> Result<(), AudioError> {
        let element = web_sys::HtmlAudioElement::new_with_src(track)
            .map_err(|_| AudioError::TrackNotFound(track.to_string()))?;
        element.set_loop(true);
        // Autoplay may be blocked until a user gesture; the promise is not awaited
        element
            .play()
            .map_err(|e| AudioError::Playback(format!("{e:?}")))?;
        self.element = Some(element);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.element()?
            .pause()
            .map_err(|e| AudioError::Playback(format!("{e:?}")))
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        self.element()?
            .play()
            .map(|_| ())
            .map_err(|e| AudioError::Playback(format!("{e:?}")))
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        let element = self.element()?;
        element
            .pause()
            .map_err(|e| AudioError::Playback(format!("{e:?}")))?;
        element.set_current_time(0.0);
        Ok(())
    }
}
