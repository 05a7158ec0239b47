//! Domain types for the airline-operations backend.
//!
//! Identifiers are 64-bit integers assigned by the caller (records are saved with
//! insert-or-replace semantics keyed by id). Enumerations are closed and compared
//! by variant, never by their display text.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an aircraft
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AircraftId(i64);

impl AircraftId {
    /// Create an `AircraftId` from its raw value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AircraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a flight
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(i64);

impl FlightId {
    /// Create a `FlightId` from its raw value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(i64);

impl SeatId {
    /// Create a `SeatId` from its raw value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Error returned when stored text does not name a known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Which enumeration was being parsed
    pub kind: &'static str,
    /// The offending text
    pub value: String,
}

/// Fare category of a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatCategory {
    /// Economy cabin
    Economy,
    /// Business cabin
    Business,
}

impl SeatCategory {
    /// Stable text representation (used for storage)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Business => "Business",
        }
    }
}

impl fmt::Display for SeatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Economy" => Ok(Self::Economy),
            "Business" => Ok(Self::Business),
            other => Err(UnknownVariant {
                kind: "seat category",
                value: other.to_string(),
            }),
        }
    }
}

/// Operational status of a flight.
///
/// Transitions are unconstrained: any status may change to any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    /// Planned, not yet boarding
    Scheduled,
    /// Passengers boarding
    Boarding,
    /// Left the gate
    Departed,
    /// Reached the destination
    Arrived,
    /// Running late
    Delayed,
    /// Will not operate
    Cancelled,
}

impl FlightStatus {
    /// Stable text representation (used for storage)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Boarding => "Boarding",
            Self::Departed => "Departed",
            Self::Arrived => "Arrived",
            Self::Delayed => "Delayed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(Self::Scheduled),
            "Boarding" => Ok(Self::Boarding),
            "Departed" => Ok(Self::Departed),
            "Arrived" => Ok(Self::Arrived),
            "Delayed" => Ok(Self::Delayed),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownVariant {
                kind: "flight status",
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A seat on an aircraft.
///
/// Free iff neither registered (checked in) nor sold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Seat identifier
    pub id: SeatId,
    /// Fare category
    pub category: SeatCategory,
    /// Passenger has checked in for this seat
    pub is_registered: bool,
    /// Seat has been ticketed
    pub is_sold: bool,
}

impl Seat {
    /// Create an unregistered, unsold seat.
    #[must_use]
    pub const fn new(id: SeatId, category: SeatCategory) -> Self {
        Self {
            id,
            category,
            is_registered: false,
            is_sold: false,
        }
    }

    /// Whether the seat is neither registered nor sold.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        !self.is_registered && !self.is_sold
    }
}

/// An airframe and the seats it carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Aircraft identifier
    pub id: AircraftId,
    /// Model designation (e.g. "A320")
    pub model: String,
    /// Seat inventory, in cabin order
    #[serde(default)]
    pub seats: Vec<Seat>,
}

/// A single flight instance.
///
/// The aircraft reference is optional only so that a payload omitting it can be
/// compared against the stored record; stored flights normally carry one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Flight identifier
    pub id: FlightId,
    /// Local departure date and time
    pub departure: NaiveDateTime,
    /// Origin airport or city code
    pub origin: String,
    /// Destination airport or city code
    pub destination: String,
    /// Current status
    pub status: FlightStatus,
    /// Assigned airframe
    #[serde(default)]
    pub aircraft_id: Option<AircraftId>,
}
