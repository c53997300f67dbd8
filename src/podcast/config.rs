use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::common::config::DocumentedConfig;
use crate::common::paths;
use crate::documented_config;

use super::segment::{Marker, Stamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodcastConfig {
    /// Symbol in front of offsets before the show starts
    pub preshow_marker: String,
    /// Symbol in front of offsets during the show and on the first row after it
    pub show_marker: String,
    /// Symbol in front of offsets after the show ended
    pub postshow_marker: String,
    /// Class attribute of the inserted timestamp cell
    pub timestamp_class: String,
    /// Class attribute of the transcript table
    pub table_class: String,
}

impl Default for PodcastConfig {
    fn default() -> Self {
        Self {
            preshow_marker: Self::DEFAULT_PRESHOW_MARKER.to_string(),
            show_marker: Self::DEFAULT_SHOW_MARKER.to_string(),
            postshow_marker: Self::DEFAULT_POSTSHOW_MARKER.to_string(),
            timestamp_class: Self::DEFAULT_TIMESTAMP_CLASS.to_string(),
            table_class: Self::DEFAULT_TABLE_CLASS.to_string(),
        }
    }
}

documented_config!(PodcastConfig {
    fields: [
        preshow_marker, "Symbol in front of preshow offsets",
        show_marker, "Symbol in front of show offsets",
        postshow_marker, "Symbol in front of postshow offsets",
        timestamp_class, "Class of the inserted timestamp cell",
        table_class, "Class of the irclog2html transcript table",
    ],
    config_path: default_config_path,
});

fn default_config_path() -> Result<PathBuf> {
    Ok(paths::podstamp_config_dir()?.join("podstamp.toml"))
}

impl PodcastConfig {
    pub const DEFAULT_PRESHOW_MARKER: &'static str = "-";
    pub const DEFAULT_SHOW_MARKER: &'static str = " ";
    pub const DEFAULT_POSTSHOW_MARKER: &'static str = "+";
    pub const DEFAULT_TIMESTAMP_CLASS: &'static str = "timestamp";
    pub const DEFAULT_TABLE_CLASS: &'static str = "irclog";

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::load_from_path_documented(path.as_ref())?;
        config.normalize();
        Ok(config)
    }

    /// Like `load_from_path`, but falls back to defaults without creating the file.
    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::read_from_path_documented(path.as_ref())?;
        config.normalize();
        Ok(config)
    }

    // Class names are matched and written verbatim, so blanks fall back.
    fn normalize(&mut self) {
        if self.timestamp_class.trim().is_empty() {
            self.timestamp_class = Self::DEFAULT_TIMESTAMP_CLASS.to_string();
        }
        if self.table_class.trim().is_empty() {
            self.table_class = Self::DEFAULT_TABLE_CLASS.to_string();
        }
    }

    pub fn marker_style(&self) -> MarkerStyle {
        MarkerStyle {
            preshow: self.preshow_marker.clone(),
            show: self.show_marker.clone(),
            postshow: self.postshow_marker.clone(),
        }
    }
}

/// Display symbols for each marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle {
    pub preshow: String,
    pub show: String,
    pub postshow: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        PodcastConfig::default().marker_style()
    }
}

impl MarkerStyle {
    pub fn symbol(&self, marker: Marker) -> &str {
        match marker {
            Marker::Preshow => &self.preshow,
            Marker::Show | Marker::PostshowBoundary => &self.show,
            Marker::Postshow => &self.postshow,
        }
    }

    pub fn render(&self, stamp: &Stamp) -> String {
        format!("{}{}", self.symbol(stamp.marker), stamp.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::podcast::clock::Offset;
    use chrono::TimeDelta;
    use std::fs;

    fn stamp(marker: Marker, minutes: i64) -> Stamp {
        Stamp {
            marker,
            offset: Offset::from(TimeDelta::minutes(minutes)),
        }
    }

    #[test]
    fn default_markers_render_like_the_transcript_expects() {
        let style = MarkerStyle::default();
        assert_eq!(style.render(&stamp(Marker::Preshow, 30)), "-00:30");
        assert_eq!(style.render(&stamp(Marker::Show, 15)), " 00:15");
        assert_eq!(style.render(&stamp(Marker::PostshowBoundary, 65)), " 01:05");
        assert_eq!(style.render(&stamp(Marker::Postshow, 130)), "+02:10");
    }

    #[test]
    fn missing_file_is_created_with_documentation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("podstamp.toml");

        let config = PodcastConfig::load_from_path(&path).expect("load config");
        assert_eq!(config, PodcastConfig::default());

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("preshow_marker = \"-\"  # Symbol in front of preshow offsets"));
        assert!(written.contains("table_class = \"irclog\""));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("podstamp.toml");
        fs::write(&path, "postshow_marker = \"~\"\ntable_class = \"\"\n").expect("write config");

        let config = PodcastConfig::load_from_path(&path).expect("load config");
        assert_eq!(config.postshow_marker, "~");
        assert_eq!(config.preshow_marker, "-");
        assert_eq!(config.table_class, "irclog");
        assert_eq!(
            config.marker_style().render(&stamp(Marker::Postshow, 61)),
            "~01:01"
        );
    }

    #[test]
    fn saving_notes_changed_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("podstamp.toml");
        let config = PodcastConfig {
            show_marker: "=".to_string(),
            ..PodcastConfig::default()
        };
        config.save_with_documentation(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("show_marker = \"=\"  # Symbol in front of show offsets (default: \" \")"));
    }

    #[test]
    fn reading_missing_file_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("podstamp.toml");

        let config = PodcastConfig::read_from_path(&path).expect("read config");
        assert_eq!(config, PodcastConfig::default());
        assert!(!path.exists());
        assert!(!path.parent().expect("parent").exists());
    }

    #[test]
    fn reading_existing_file_applies_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("podstamp.toml");
        fs::write(&path, "preshow_marker = \"<\"\ntimestamp_class = \" \"\n").expect("write config");

        let config = PodcastConfig::read_from_path(&path).expect("read config");
        assert_eq!(config.preshow_marker, "<");
        assert_eq!(config.timestamp_class, "timestamp");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("podstamp.toml");
        fs::write(&path, "show_marker = [").expect("write config");
        assert!(PodcastConfig::load_from_path(&path).is_err());
    }
}
