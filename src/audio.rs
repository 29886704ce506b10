//! Music channel plus a fixed pool of sound-effect slots.
//!
//! Playback goes through [`AudioBackend`]; [`Mixer`] keeps the state the
//! sound screen shows (current track, paused or not, what each slot holds).

use log::{info, warn};
use std::path::{Path, PathBuf};

pub trait AudioBackend {
    fn play_music(&mut self, path: &Path) -> anyhow::Result<()>;
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn stop_music(&mut self);
    fn play_sound(&mut self, slot: usize, path: &Path) -> anyhow::Result<()>;
    fn stop_sound(&mut self, slot: usize);
}

/// Backend that only logs; used when no output device is available.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play_music(&mut self, path: &Path) -> anyhow::Result<()> {
        info!("[audio] play music {}", path.display());
        Ok(())
    }

    fn pause_music(&mut self) {
        info!("[audio] pause music");
    }

    fn resume_music(&mut self) {
        info!("[audio] resume music");
    }

    fn stop_music(&mut self) {
        info!("[audio] stop music");
    }

    fn play_sound(&mut self, slot: usize, path: &Path) -> anyhow::Result<()> {
        info!("[audio] slot {slot}: play {}", path.display());
        Ok(())
    }

    fn stop_sound(&mut self, slot: usize) {
        info!("[audio] slot {slot}: stop");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundSlot {
    pub path: Option<PathBuf>,
    pub playing: bool,
}

pub struct Mixer {
    backend: Box<dyn AudioBackend>,
    track: Option<PathBuf>,
    music: MusicState,
    slots: Vec<SoundSlot>,
}

impl Mixer {
    pub fn new(backend: Box<dyn AudioBackend>, slot_count: usize) -> Self {
        Self {
            backend,
            track: None,
            music: MusicState::Stopped,
            slots: vec![SoundSlot::default(); slot_count],
        }
    }

    pub fn track(&self) -> Option<&Path> {
        self.track.as_deref()
    }

    pub fn music_state(&self) -> MusicState {
        self.music
    }

    pub fn slots(&self) -> &[SoundSlot] {
        &self.slots
    }

    /// Selects a new track; a playing track is stopped first.
    pub fn set_track(&mut self, path: PathBuf) {
        if self.music != MusicState::Stopped {
            self.backend.stop_music();
            self.music = MusicState::Stopped;
        }
        self.track = Some(path);
    }

    /// Resumes when paused, otherwise starts the selected track.
    pub fn play(&mut self) {
        match (self.music, &self.track) {
            (MusicState::Paused, _) => {
                self.backend.resume_music();
                self.music = MusicState::Playing;
            }
            (MusicState::Stopped, Some(track)) => match self.backend.play_music(track) {
                Ok(()) => self.music = MusicState::Playing,
                Err(e) => warn!("could not play {}: {e:#}", track.display()),
            },
            _ => {}
        }
    }

    pub fn pause(&mut self) {
        if self.music == MusicState::Playing {
            self.backend.pause_music();
            self.music = MusicState::Paused;
        }
    }

    pub fn stop(&mut self) {
        if self.music != MusicState::Stopped {
            self.backend.stop_music();
            self.music = MusicState::Stopped;
        }
    }

    /// Loads a file into `slot`. Out-of-range slots are ignored.
    pub fn load_slot(&mut self, slot: usize, path: PathBuf) {
        if slot >= self.slots.len() {
            return;
        }
        self.stop_slot(slot);
        self.slots[slot].path = Some(path);
    }

    pub fn play_slot(&mut self, slot: usize) {
        let Some(entry) = self.slots.get_mut(slot) else {
            return;
        };
        let Some(path) = entry.path.as_ref() else {
            return;
        };
        match self.backend.play_sound(slot, path) {
            Ok(()) => entry.playing = true,
            Err(e) => warn!("could not play {}: {e:#}", path.display()),
        }
    }

    pub fn stop_slot(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            if entry.playing {
                self.backend.stop_sound(slot);
                entry.playing = false;
            }
        }
    }

    pub fn stop_all(&mut self) {
        self.stop();
        for slot in 0..self.slots.len() {
            self.stop_slot(slot);
        }
    }
}

#[cfg(feature = "rodio-backend")]
pub use rodio_impl::RodioAudio;

#[cfg(feature = "rodio-backend")]
mod rodio_impl {
    use super::AudioBackend;
    use anyhow::Context;
    use log::info;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    pub struct RodioAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        music: Option<Sink>,
        slots: Vec<Option<Sink>>,
    }

    impl RodioAudio {
        pub fn new(slot_count: usize) -> anyhow::Result<Self> {
            let (stream, handle) =
                OutputStream::try_default().context("no audio output device")?;
            Ok(Self {
                _stream: stream,
                handle,
                music: None,
                slots: (0..slot_count).map(|_| None).collect(),
            })
        }

        fn start(&self, path: &Path) -> anyhow::Result<Sink> {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let source = Decoder::new(BufReader::new(file))
                .with_context(|| format!("decoding {}", path.display()))?;
            let sink = Sink::try_new(&self.handle).context("creating audio sink")?;
            sink.append(source);
            sink.play();
            Ok(sink)
        }
    }

    impl AudioBackend for RodioAudio {
        fn play_music(&mut self, path: &Path) -> anyhow::Result<()> {
            self.stop_music();
            self.music = Some(self.start(path)?);
            info!("[audio] playing music {}", path.display());
            Ok(())
        }

        fn pause_music(&mut self) {
            if let Some(sink) = &self.music {
                sink.pause();
            }
        }

        fn resume_music(&mut self) {
            if let Some(sink) = &self.music {
                sink.play();
            }
        }

        fn stop_music(&mut self) {
            if let Some(sink) = self.music.take() {
                sink.stop();
            }
        }

        fn play_sound(&mut self, slot: usize, path: &Path) -> anyhow::Result<()> {
            self.stop_sound(slot);
            let sink = self.start(path)?;
            if let Some(entry) = self.slots.get_mut(slot) {
                *entry = Some(sink);
            }
            Ok(())
        }

        fn stop_sound(&mut self, slot: usize) {
            if let Some(sink) = self.slots.get_mut(slot).and_then(Option::take) {
                sink.stop();
            }
        }
    }
}
