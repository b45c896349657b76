//! Serializable display topology model
//!
//! Mirrors the fixed-layout records the OS display-configuration subsystem
//! works with: one source-to-target path per connected output plus one mode
//! record per path endpoint. The 64-bit adapter handles are split into named
//! high/low halves because only the low half is volatile across reboots;
//! everything else is opaque payload that must round-trip unchanged.

use serde::{Deserialize, Serialize};

use crate::constants::ids::TARGET_ID_STABLE_MASK;

/// Opaque 64-bit adapter handle, split into the halves the OS uses.
/// The low half is reassigned on every boot; the high half is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterId {
    pub low: u32,
    pub high: i32,
}

/// Numerator/denominator pair used for refresh and sync frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub cx: u32,
    pub cy: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Source (rendering origin) endpoint of a display path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSourceInfo {
    pub adapter_id: AdapterId,
    /// Stable logical identifier of the rendering source.
    pub id: u32,
    pub mode_info_idx: u32,
    pub status_flags: u32,
}

/// Target (physical output) endpoint of a display path.
///
/// Only `adapter_id.low` and the high bits of `id` are volatile; the
/// remaining fields are payload carried through capture and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTargetInfo {
    pub adapter_id: AdapterId,
    /// Output identifier. Low 16 bits identify the physical connector and are
    /// stable; high bits change across reboots.
    pub id: u32,
    pub mode_info_idx: u32,
    pub output_technology: i32,
    pub rotation: i32,
    pub scaling: i32,
    pub refresh_rate: Rational,
    pub scan_line_ordering: i32,
    pub target_available: i32,
    pub status_flags: u32,
}

/// One source-to-target display connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPath {
    pub source: PathSourceInfo,
    pub target: PathTargetInfo,
    pub flags: u32,
}

/// Mode payload for a source endpoint: desktop surface size and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMode {
    pub width: u32,
    pub height: u32,
    pub pixel_format: i32,
    pub position: Point,
}

/// Mode payload for a target endpoint: the video signal timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMode {
    pub pixel_rate: u64,
    pub h_sync_freq: Rational,
    pub v_sync_freq: Rational,
    pub active_size: Region,
    pub total_size: Region,
    pub video_standard: u32,
    pub scan_line_ordering: i32,
}

/// Mode payload for a desktop image transform (scaled/cloned desktops).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopImageInfo {
    pub path_source_size: Point,
    pub desktop_image_region: Rect,
    pub desktop_image_clip: Rect,
}

/// Mode payload, tagged by which side of a path it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeDetails {
    Source(SourceMode),
    Target(TargetMode),
    DesktopImage(DesktopImageInfo),
}

/// One mode record, keyed by the id of the path endpoint it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMode {
    /// Matches either a path's source id or target id, per `details`.
    pub id: u32,
    /// Must equal the owning path endpoint's adapter id when applied.
    pub adapter_id: AdapterId,
    pub details: ModeDetails,
}

impl DisplayMode {
    pub fn is_source(&self) -> bool {
        matches!(self.details, ModeDetails::Source(_))
    }

    pub fn is_target(&self) -> bool {
        matches!(self.details, ModeDetails::Target(_))
    }
}

/// Full display arrangement: ordered paths plus ordered modes.
///
/// Order is significant; mode records are referenced by index from path
/// records, so serialization must reproduce both sequences identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub paths: Vec<DisplayPath>,
    pub modes: Vec<DisplayMode>,
}

/// Whether two target ids name the same physical output, comparing only the
/// stable low bits.
pub fn same_output(a: u32, b: u32) -> bool {
    (a & TARGET_ID_STABLE_MASK) == (b & TARGET_ID_STABLE_MASK)
}
