/*
 * Scenario Module
 *
 * The nine preset flocks, from plain drifting agents up to full flocking.
 * Each preset pairs a FlockConfig with the debug overlays that explain it.
 * Early presets add one overlay at a time around the focal agent, later
 * presets switch on the rules one at a time.
 */

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::FlockConfig;

const AGENT_COUNT: usize = 80;
const SPEED: f64 = 0.002;
const DETECTION_RADIUS: f64 = 0.5;
const MAX_TURN: f64 = PI / 60.0;
const VIEW_ANGLE: f64 = TAU / 3.0; // 120 degrees

/// Which debug overlays a driver should draw around the focal agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayFlags {
    pub highlight_focal: bool,
    pub detection_circle: bool,
    pub view_sector: bool,
    pub neighbor_links: bool,
    pub direction_lines: bool,
    pub local_centroid: bool,
}

impl OverlayFlags {
    pub fn any(&self) -> bool {
        self.highlight_focal
            || self.detection_circle
            || self.view_sector
            || self.neighbor_links
            || self.direction_lines
            || self.local_centroid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// A1: agents drift in straight lines.
    Drift,
    /// A2: one agent is singled out.
    Focal,
    /// A3: its detection radius is shown.
    DetectionRadius,
    /// A4: the radius is narrowed to a field of view.
    FieldOfView,
    /// A5: visible neighbors are linked.
    NeighborLinks,
    /// A6: separation is switched on.
    Separation,
    /// A7: headings of the focal agent and its neighbors are drawn.
    HeadingLines,
    /// A8: alignment and cohesion join separation.
    FullFlocking,
    /// A9: faster, wider-eyed flock without overlays.
    Murmuration,
}

impl Scenario {
    pub const ALL: [Scenario; 9] = [
        Scenario::Drift,
        Scenario::Focal,
        Scenario::DetectionRadius,
        Scenario::FieldOfView,
        Scenario::NeighborLinks,
        Scenario::Separation,
        Scenario::HeadingLines,
        Scenario::FullFlocking,
        Scenario::Murmuration,
    ];

    /// Short tab label, "A1" to "A9".
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Drift => "A1",
            Scenario::Focal => "A2",
            Scenario::DetectionRadius => "A3",
            Scenario::FieldOfView => "A4",
            Scenario::NeighborLinks => "A5",
            Scenario::Separation => "A6",
            Scenario::HeadingLines => "A7",
            Scenario::FullFlocking => "A8",
            Scenario::Murmuration => "A9",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Drift => "drift",
            Scenario::Focal => "focal",
            Scenario::DetectionRadius => "detection-radius",
            Scenario::FieldOfView => "field-of-view",
            Scenario::NeighborLinks => "neighbor-links",
            Scenario::Separation => "separation",
            Scenario::HeadingLines => "heading-lines",
            Scenario::FullFlocking => "full-flocking",
            Scenario::Murmuration => "murmuration",
        }
    }

    pub fn config(&self) -> FlockConfig {
        let base = FlockConfig {
            agent_count: AGENT_COUNT,
            speed: SPEED,
            detection_radius: DETECTION_RADIUS,
            field_of_view: VIEW_ANGLE,
            max_turn_rate: MAX_TURN,
            separation_weight: 0.0,
            alignment_weight: 0.0,
            cohesion_weight: 0.0,
            ..FlockConfig::default()
        };

        match self {
            Scenario::Drift | Scenario::Focal | Scenario::DetectionRadius => FlockConfig {
                field_of_view: TAU,
                ..base
            },
            Scenario::FieldOfView | Scenario::NeighborLinks => base,
            Scenario::Separation | Scenario::HeadingLines => FlockConfig {
                separation_weight: 0.005,
                ..base
            },
            Scenario::FullFlocking => FlockConfig {
                separation_weight: 0.005,
                alignment_weight: 0.005,
                cohesion_weight: 0.005,
                ..base
            },
            Scenario::Murmuration => FlockConfig {
                speed: 0.006,
                field_of_view: TAU / 1.2, // 300 degrees
                separation_weight: 0.003,
                alignment_weight: 0.01,
                cohesion_weight: 0.01,
                ..base
            },
        }
    }

    pub fn overlays(&self) -> OverlayFlags {
        let focal = OverlayFlags {
            highlight_focal: true,
            ..OverlayFlags::default()
        };

        match self {
            Scenario::Drift | Scenario::Murmuration => OverlayFlags::default(),
            Scenario::Focal => focal,
            Scenario::DetectionRadius => OverlayFlags {
                detection_circle: true,
                ..focal
            },
            Scenario::FieldOfView => OverlayFlags {
                view_sector: true,
                ..focal
            },
            Scenario::NeighborLinks | Scenario::Separation => OverlayFlags {
                view_sector: true,
                neighbor_links: true,
                ..focal
            },
            Scenario::HeadingLines => OverlayFlags {
                view_sector: true,
                neighbor_links: true,
                direction_lines: true,
                ..focal
            },
            Scenario::FullFlocking => OverlayFlags {
                view_sector: true,
                neighbor_links: true,
                direction_lines: true,
                local_centroid: true,
                ..focal
            },
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scenario '{0}', expected A1-A9 or a scenario name")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    // Accepts the tab label ("a8") or the name ("full-flocking")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Scenario::ALL
            .into_iter()
            .find(|scenario| {
                scenario.label().eq_ignore_ascii_case(&wanted) || scenario.name() == wanted
            })
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}
