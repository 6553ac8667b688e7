use crate::gfx::anim::{Ease, Motion};
use crate::scroll::Anchor;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Narrowest viewport (px) on which the stepped procedure runs.
    #[serde(default = "default_desktop_min_width")]
    pub desktop_min_width: u32,

    /// Log trigger start/end offsets while scrolling.
    #[serde(default)]
    pub markers: bool,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub step_fade: FadeTiming,

    #[serde(default)]
    pub line_fill: FillTiming,

    #[serde(default)]
    pub reveal: RevealConfig,

    #[serde(default)]
    pub parallax: ParallaxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub start: String,
    pub end: String,
    /// Seconds the provider takes to catch up with the scroll position; 0 disables smoothing.
    pub scrub: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeTiming {
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FillTiming {
    pub complete_duration: f32,
    pub complete_ease: Ease,
    pub partial_duration: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub start: String,
    pub duration: f32,
    pub distance: f32,
    pub stagger: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub default_speed: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            desktop_min_width: default_desktop_min_width(),
            trigger: TriggerConfig::default(),
            step_fade: FadeTiming::default(),
            line_fill: FillTiming::default(),
            reveal: RevealConfig::default(),
            parallax: ParallaxConfig::default(),
            markers: false,
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            start: "top center".to_string(),
            end: "bottom center".to_string(),
            scrub: 0.1,
        }
    }
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            duration: 0.2,
            delay: 0.05,
            ease: Ease::Power1Out,
        }
    }
}

impl Default for FillTiming {
    fn default() -> Self {
        Self {
            complete_duration: 0.3,
            complete_ease: Ease::Power1Out,
            partial_duration: 0.1,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            start: "top 85%".to_string(),
            duration: 1.0,
            distance: 60.0,
            stagger: 0.15,
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self { default_speed: 0.5 }
    }
}

fn default_desktop_min_width() -> u32 {
    992
}

impl TriggerConfig {
    pub fn anchors(&self) -> Result<(Anchor, Anchor)> {
        let start = self
            .start
            .parse::<Anchor>()
            .with_context(|| format!("invalid trigger.start {:?}", self.start))?;
        let end = self
            .end
            .parse::<Anchor>()
            .with_context(|| format!("invalid trigger.end {:?}", self.end))?;
        Ok((start, end))
    }
}

impl FadeTiming {
    pub fn motion(&self) -> Motion {
        Motion::new(self.duration, self.ease).delayed(self.delay)
    }
}

impl RevealConfig {
    pub fn start_anchor(&self) -> Result<Anchor> {
        self.start
            .parse::<Anchor>()
            .with_context(|| format!("invalid reveal.start {:?}", self.start))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        let config_path = config_dir.join("stepscroll").join("config.toml");

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        let config_dir = config_dir.join("stepscroll");
        std::fs::create_dir_all(&config_dir)?;
        self.save_to_path(&config_dir.join("config.toml"))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Rejects anchor strings up front so a bad file fails at load, not mid-scroll.
    pub fn validate(&self) -> Result<()> {
        self.trigger.anchors()?;
        self.reveal.start_anchor()?;
        Ok(())
    }

    pub fn is_desktop(&self, viewport_width: u32) -> bool {
        viewport_width >= self.desktop_min_width
    }
}
