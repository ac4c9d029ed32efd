use serde::Deserialize;
use std::fmt;

/// Rule file format, also selects the resolution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Hosts,
    Dnsmasq,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Hosts => "hosts",
            Mode::Dnsmasq => "dnsmasq",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?.to_lowercase();

        match s.as_str() {
            "hosts" => Ok(Mode::Hosts),
            "dnsmasq" => Ok(Mode::Dnsmasq),
            _ => Err(serde::de::Error::unknown_variant(&s, &["hosts", "dnsmasq"])),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loading,
    PendingLoad,
    Loaded,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadStatus::NotLoaded => "not loaded",
            LoadStatus::Loading => "loading",
            LoadStatus::PendingLoad => "pending load",
            LoadStatus::Loaded => "loaded",
        };
        f.write_str(s)
    }
}
