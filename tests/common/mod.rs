use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// irclog2html output for a show scheduled 20:00-21:00.
pub const SHOW_LOG: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">
<html>
<head>
<title>#podcast log for 2011-01-01</title>
</head>
<body>
<table class="irclog">
<tr><td class="servermsg" colspan="2">--- Log opened Sat Jan 01 00:00:00 2011</td><td class="time"></td></tr>
<tr id="t18:40"><th class="nick">alice</th><td class="text">way too early</td><td class="time"><a href="#t18:40" class="time">18:40</a></td></tr>
<tr id="t19:30"><th class="nick">bob</th><td class="text">warming up</td><td class="time"><a href="#t19:30" class="time">19:30</a></td></tr>
<tr id="t20:15"><th class="nick">carol</th><td class="text">we are live</td><td class="time"><a href="#t20:15" class="time">20:15</a></td></tr>
<tr id="t21:05"><th class="nick">bob</th><td class="text">that was fun</td><td class="time"><a href="#t21:05" class="time">21:05</a></td></tr>
<tr id="t21:40"><th class="nick">dave</th><td class="text">still chatting</td><td class="time"><a href="#t21:40" class="time">21:40</a></td></tr>
<tr id="t22:10"><th class="nick">alice</th><td class="text">anyone still here?</td><td class="time"><a href="#t22:10" class="time">22:10</a></td></tr>
</table>
</body>
</html>
"##;

/// A show running over midnight, 23:30-00:30.
pub const LATE_SHOW_LOG: &str = r#"<html><body>
<table class="irclog">
<tr id="t23:58"><th class="nick">eve</th><td class="text">almost midnight</td></tr>
<tr id="t23:59"><th class="nick">eve</th><td class="text">here it comes</td></tr>
<tr id="t00:01"><th class="nick">eve</th><td class="text">happy new year</td></tr>
</table>
</body></html>
"#;

pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Config file handed to every run so the user's own config is never read.
    pub fn config_path(&self) -> PathBuf {
        self.path().join("config").join("podstamp.toml")
    }

    pub fn write_log(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }
}
