use lazy_static::lazy_static;
use std::env;
use std::path::Path;
use std::sync::RwLock;

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::new());
}

/// Process-wide recording defaults. Individual sessions copy these values at
/// configuration time; changing them later does not affect open sessions.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tick rate of the video presentation time base, in ticks per second.
    pub video_tick_rate: u32,
    /// Frame rate assumed when `VideoOptions` carries no explicit fps.
    pub default_fps: u32,
}

impl Config {
    fn new() -> Self {
        let mut config = Config {
            video_tick_rate: 90_000,
            default_fps: 30,
        };

        if let Ok(rate) = env::var("AVREC_VIDEO_TICK_RATE") {
            if let Ok(rate) = rate.parse() {
                config.video_tick_rate = rate;
            }
        }
        if let Ok(fps) = env::var("AVREC_DEFAULT_FPS") {
            if let Ok(fps) = fps.parse() {
                config.default_fps = fps;
            }
        }

        config
    }

    pub fn reload() {
        let new_config = Config::new();
        if let Ok(mut config) = CONFIG.write() {
            *config = new_config;
        }
    }
}

/// Returns the video time-base tick rate from configuration
pub fn video_tick_rate() -> u32 {
    CONFIG.read().map(|c| c.video_tick_rate).unwrap_or(90_000)
}

/// Returns the default frame rate from configuration
pub fn default_fps() -> u32 {
    CONFIG.read().map(|c| c.default_fps).unwrap_or(30)
}

/// Creates a default config template file if it doesn't exist
pub fn create_default_config_template<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    if !path.as_ref().exists() {
        let template = r#"# AVREC Configuration
# This is a template. Replace the values with your actual configuration.

# Ticks per second of the video presentation time base
video_tick_rate = 90000

# Frame rate assumed when video options carry no explicit fps
default_fps = 30
"#;
        std::fs::write(path, template)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(video_tick_rate(), 90_000);
        assert_eq!(default_fps(), 30);
    }
}
