//! Application state
//!
//! Holds what persists across the event loop: configuration, the speech
//! synthesizer and the resource reporter.

pub mod config;

use crate::resources::{ProbeError, Reporter, ResourceAction, SysinfoProbe};
use crate::speech::Synth;
use crate::Result;
use config::Config;
use log::info;

/// Main application state
pub struct State {
    /// Configuration loaded from ~/.resreport.cfg
    pub config: Config,

    /// Speech synthesizer for text-to-speech output
    pub synth: Box<dyn Synth>,

    /// Samples the focused program on demand
    pub reporter: Reporter<SysinfoProbe>,
}

impl State {
    /// Load configuration and bring up speech and the reporter
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        info!("Configuration loaded from {:?}", config.path());

        let synth = crate::speech::create_synth()?;
        info!("Speech synthesizer created");

        Self::with_parts(config, synth)
    }

    /// Assemble state from an already loaded config and synthesizer
    pub fn with_parts(config: Config, mut synth: Box<dyn Synth>) -> Result<Self> {
        if let Some(rate) = config.rate() {
            synth.set_rate(rate)?;
            info!("Speech rate set to {}", rate);
        }
        if let Some(volume) = config.volume() {
            synth.set_volume(volume)?;
            info!("Speech volume set to {}", volume);
        }
        if let Some(voice_idx) = config.voice_idx() {
            synth.set_voice_idx(voice_idx)?;
            info!("Speech voice index set to {}", voice_idx);
        }

        let settings = config.reporter_settings();
        info!(
            "Sampling: cpu interval {:?}, include children {}",
            settings.cpu_interval, settings.include_children
        );
        let reporter = Reporter::new(SysinfoProbe::new(), settings);

        Ok(Self {
            config,
            synth,
            reporter,
        })
    }

    /// Speak text to the user
    pub fn speak(&mut self, text: &str) -> Result<()> {
        self.synth.speak(text)
    }

    /// Cancel any pending speech
    pub fn cancel_speech(&mut self) -> Result<()> {
        self.synth.cancel()
    }

    /// Sample the focused program and speak the result
    pub fn report(
        &mut self,
        action: ResourceAction,
        focused: std::result::Result<Option<u32>, ProbeError>,
    ) -> Result<()> {
        let text = self.reporter.report(action, focused);
        self.speak(&text)
    }
}
