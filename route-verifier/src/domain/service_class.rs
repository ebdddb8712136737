//! Train service classes.

use std::fmt;

/// The two categories of train service the ticketing system sells,
/// each backed by its own trip-query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceClass {
    /// High-speed G/D trains, served by `travelservice`.
    HighSpeed,
    /// Conventional K/T/Z trains, served by `travel2service`.
    Normal,
}

impl ServiceClass {
    /// Both classes, in the order they are probed.
    pub const ALL: [ServiceClass; 2] = [ServiceClass::HighSpeed, ServiceClass::Normal];

    /// Short tag used in logs and configuration.
    pub fn tag(self) -> &'static str {
        match self {
            ServiceClass::HighSpeed => "high_speed",
            ServiceClass::Normal => "normal",
        }
    }

    /// Upstream service that answers trip queries for this class.
    pub fn travel_service(self) -> &'static str {
        match self {
            ServiceClass::HighSpeed => "travelservice",
            ServiceClass::Normal => "travel2service",
        }
    }
}

impl fmt::Display for ServiceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
