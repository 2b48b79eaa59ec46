//! Filler settings read through the `config` crate.
//!
//! Settings come from an optional file (format picked by extension) with
//! `PREFILL_`-prefixed environment variables layered on top, e.g.
//! `PREFILL_TAG=env_default` or `PREFILL_MODE=strict`. Overlay entries can
//! only be given in the file:
//!
//! ```toml
//! tag = "default"
//! mode = "lenient"
//!
//! [overlay]
//! EnvType = "production"
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::filler::{DEFAULT_TAG, Filler, Mode};
use crate::source::{self, KeyValueSource, Layered, Overlay, ProcessEnv};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FillerSettings {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub overlay: HashMap<String, String>,
}

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

impl Default for FillerSettings {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            mode: Mode::default(),
            overlay: HashMap::new(),
        }
    }
}

impl FillerSettings {
    /// Reads `path` (when given, it must exist) and the environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(true));
        }
        let settings = builder
            .add_source(Environment::with_prefix("PREFILL"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Overlay entries from the settings are consulted before the global
    /// overlay and the process environment.
    pub fn into_filler(self) -> Filler {
        let lookup: Arc<dyn KeyValueSource> = if self.overlay.is_empty() {
            source::default_lookup()
        } else {
            let seeded = Overlay::new();
            for (key, value) in self.overlay {
                seeded.set(key, value);
            }
            Arc::new(
                Layered::new()
                    .with(Arc::new(seeded))
                    .with(source::global_overlay())
                    .with(Arc::new(ProcessEnv)),
            )
        };
        Filler::builder()
            .tag(self.tag)
            .mode(self.mode)
            .lookup(lookup)
            .build()
    }
}
