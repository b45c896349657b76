//! Win32 display-configuration adapter
//!
//! Real [`DisplayConfigApi`] backend over the CCD API
//! (`GetDisplayConfigBufferSizes` / `QueryDisplayConfig` / `SetDisplayConfig`)
//! plus the lossless conversions between the OS records and the model types.
//! Unsafe is confined to the FFI calls and the union field reads the CCD
//! structs require.

use windows::Win32::Devices::Display::{
    GetDisplayConfigBufferSizes, QueryDisplayConfig, SetDisplayConfig, DISPLAYCONFIG_2DREGION,
    DISPLAYCONFIG_DESKTOP_IMAGE_INFO, DISPLAYCONFIG_MODE_INFO, DISPLAYCONFIG_MODE_INFO_0,
    DISPLAYCONFIG_MODE_INFO_TYPE_DESKTOP_IMAGE, DISPLAYCONFIG_MODE_INFO_TYPE_SOURCE,
    DISPLAYCONFIG_MODE_INFO_TYPE_TARGET, DISPLAYCONFIG_PATH_INFO, DISPLAYCONFIG_PATH_SOURCE_INFO,
    DISPLAYCONFIG_PATH_SOURCE_INFO_0, DISPLAYCONFIG_PATH_TARGET_INFO,
    DISPLAYCONFIG_PATH_TARGET_INFO_0, DISPLAYCONFIG_PIXELFORMAT, DISPLAYCONFIG_RATIONAL,
    DISPLAYCONFIG_ROTATION, DISPLAYCONFIG_SCALING, DISPLAYCONFIG_SCANLINE_ORDERING,
    DISPLAYCONFIG_SOURCE_MODE, DISPLAYCONFIG_TARGET_MODE, DISPLAYCONFIG_VIDEO_OUTPUT_TECHNOLOGY,
    DISPLAYCONFIG_VIDEO_SIGNAL_INFO, DISPLAYCONFIG_VIDEO_SIGNAL_INFO_0, QDC_ALL_PATHS,
    QDC_ONLY_ACTIVE_PATHS, QUERY_DISPLAY_CONFIG_FLAGS, SDC_ALLOW_CHANGES, SDC_APPLY,
    SDC_SAVE_TO_DATABASE, SDC_USE_SUPPLIED_DISPLAY_CONFIG,
};
use windows::Win32::Foundation::{BOOL, ERROR_SUCCESS, LUID, POINTL, RECTL};

use crate::display::{DisplayConfigApi, QueryScope};
use crate::errors::OsStatus;
use crate::topology::model::{
    AdapterId, DesktopImageInfo, DisplayMode, DisplayPath, ModeDetails, PathSourceInfo,
    PathTargetInfo, Point, Rational, Rect, Region, SourceMode, TargetMode,
};
use crate::topology::Topology;

/// The live Windows display-configuration subsystem.
pub struct Win32DisplayApi;

fn query_flags(scope: QueryScope) -> QUERY_DISPLAY_CONFIG_FLAGS {
    match scope {
        QueryScope::AllPaths => QDC_ALL_PATHS,
        QueryScope::ActiveOnly => QDC_ONLY_ACTIVE_PATHS,
    }
}

impl DisplayConfigApi for Win32DisplayApi {
    fn buffer_sizes(&self, scope: QueryScope) -> Result<(u32, u32), OsStatus> {
        let mut path_count = 0u32;
        let mut mode_count = 0u32;
        let status = unsafe {
            GetDisplayConfigBufferSizes(query_flags(scope), &mut path_count, &mut mode_count)
        };
        if status != ERROR_SUCCESS {
            return Err(status.0 as OsStatus);
        }
        Ok((path_count, mode_count))
    }

    fn query(
        &self,
        scope: QueryScope,
        path_slots: u32,
        mode_slots: u32,
    ) -> Result<Topology, OsStatus> {
        let mut path_count = path_slots;
        let mut mode_count = mode_slots;
        let mut paths = vec![DISPLAYCONFIG_PATH_INFO::default(); path_slots as usize];
        let mut modes = vec![DISPLAYCONFIG_MODE_INFO::default(); mode_slots as usize];

        let status = unsafe {
            QueryDisplayConfig(
                query_flags(scope),
                &mut path_count,
                paths.as_mut_ptr(),
                &mut mode_count,
                modes.as_mut_ptr(),
                None,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(status.0 as OsStatus);
        }

        // The OS may return fewer records than it sized for.
        paths.truncate(path_count as usize);
        modes.truncate(mode_count as usize);

        Ok(Topology {
            paths: paths.iter().map(path_from_os).collect(),
            modes: modes.iter().map(mode_from_os).collect(),
        })
    }

    fn set(&self, topology: &Topology) -> Result<(), OsStatus> {
        let paths: Vec<DISPLAYCONFIG_PATH_INFO> =
            topology.paths.iter().map(path_to_os).collect();
        let modes: Vec<DISPLAYCONFIG_MODE_INFO> =
            topology.modes.iter().map(mode_to_os).collect();

        // Apply exactly the supplied configuration, persist it to the OS
        // configuration database, and allow changes the OS considers unsafe.
        let status = unsafe {
            SetDisplayConfig(
                Some(&paths),
                Some(&modes),
                SDC_APPLY | SDC_USE_SUPPLIED_DISPLAY_CONFIG | SDC_SAVE_TO_DATABASE
                    | SDC_ALLOW_CHANGES,
            )
        };
        if status != 0 {
            return Err(status);
        }
        Ok(())
    }
}

fn adapter_from_os(luid: LUID) -> AdapterId {
    AdapterId {
        low: luid.LowPart,
        high: luid.HighPart,
    }
}

fn adapter_to_os(adapter: AdapterId) -> LUID {
    LUID {
        LowPart: adapter.low,
        HighPart: adapter.high,
    }
}

fn rational_from_os(r: DISPLAYCONFIG_RATIONAL) -> Rational {
    Rational {
        numerator: r.Numerator,
        denominator: r.Denominator,
    }
}

fn rational_to_os(r: Rational) -> DISPLAYCONFIG_RATIONAL {
    DISPLAYCONFIG_RATIONAL {
        Numerator: r.numerator,
        Denominator: r.denominator,
    }
}

fn path_from_os(os: &DISPLAYCONFIG_PATH_INFO) -> DisplayPath {
    DisplayPath {
        source: PathSourceInfo {
            adapter_id: adapter_from_os(os.sourceInfo.adapterId),
            id: os.sourceInfo.id,
            mode_info_idx: unsafe { os.sourceInfo.Anonymous.modeInfoIdx },
            status_flags: os.sourceInfo.statusFlags,
        },
        target: PathTargetInfo {
            adapter_id: adapter_from_os(os.targetInfo.adapterId),
            id: os.targetInfo.id,
            mode_info_idx: unsafe { os.targetInfo.Anonymous.modeInfoIdx },
            output_technology: os.targetInfo.outputTechnology.0,
            rotation: os.targetInfo.rotation.0,
            scaling: os.targetInfo.scaling.0,
            refresh_rate: rational_from_os(os.targetInfo.refreshRate),
            scan_line_ordering: os.targetInfo.scanLineOrdering.0,
            target_available: os.targetInfo.targetAvailable.0,
            status_flags: os.targetInfo.statusFlags,
        },
        flags: os.flags,
    }
}

fn path_to_os(path: &DisplayPath) -> DISPLAYCONFIG_PATH_INFO {
    DISPLAYCONFIG_PATH_INFO {
        sourceInfo: DISPLAYCONFIG_PATH_SOURCE_INFO {
            adapterId: adapter_to_os(path.source.adapter_id),
            id: path.source.id,
            Anonymous: DISPLAYCONFIG_PATH_SOURCE_INFO_0 {
                modeInfoIdx: path.source.mode_info_idx,
            },
            statusFlags: path.source.status_flags,
        },
        targetInfo: DISPLAYCONFIG_PATH_TARGET_INFO {
            adapterId: adapter_to_os(path.target.adapter_id),
            id: path.target.id,
            Anonymous: DISPLAYCONFIG_PATH_TARGET_INFO_0 {
                modeInfoIdx: path.target.mode_info_idx,
            },
            outputTechnology: DISPLAYCONFIG_VIDEO_OUTPUT_TECHNOLOGY(path.target.output_technology),
            rotation: DISPLAYCONFIG_ROTATION(path.target.rotation),
            scaling: DISPLAYCONFIG_SCALING(path.target.scaling),
            refreshRate: rational_to_os(path.target.refresh_rate),
            scanLineOrdering: DISPLAYCONFIG_SCANLINE_ORDERING(path.target.scan_line_ordering),
            targetAvailable: BOOL(path.target.target_available),
            statusFlags: path.target.status_flags,
        },
        flags: path.flags,
    }
}

fn mode_from_os(os: &DISPLAYCONFIG_MODE_INFO) -> DisplayMode {
    let details = if os.infoType == DISPLAYCONFIG_MODE_INFO_TYPE_SOURCE {
        let sm = unsafe { os.Anonymous.sourceMode };
        ModeDetails::Source(SourceMode {
            width: sm.width,
            height: sm.height,
            pixel_format: sm.pixelFormat.0,
            position: Point {
                x: sm.position.x,
                y: sm.position.y,
            },
        })
    } else if os.infoType == DISPLAYCONFIG_MODE_INFO_TYPE_TARGET {
        let signal = unsafe { os.Anonymous.targetMode }.targetVideoSignalInfo;
        ModeDetails::Target(TargetMode {
            pixel_rate: signal.pixelRate,
            h_sync_freq: rational_from_os(signal.hSyncFreq),
            v_sync_freq: rational_from_os(signal.vSyncFreq),
            active_size: Region {
                cx: signal.activeSize.cx,
                cy: signal.activeSize.cy,
            },
            total_size: Region {
                cx: signal.totalSize.cx,
                cy: signal.totalSize.cy,
            },
            video_standard: unsafe { signal.Anonymous.videoStandard },
            scan_line_ordering: signal.scanLineOrdering.0,
        })
    } else {
        let image = unsafe { os.Anonymous.desktopImageInfo };
        ModeDetails::DesktopImage(DesktopImageInfo {
            path_source_size: Point {
                x: image.PathSourceSize.x,
                y: image.PathSourceSize.y,
            },
            desktop_image_region: rect_from_os(image.DesktopImageRegion),
            desktop_image_clip: rect_from_os(image.DesktopImageClip),
        })
    };

    DisplayMode {
        id: os.id,
        adapter_id: adapter_from_os(os.adapterId),
        details,
    }
}

fn mode_to_os(mode: &DisplayMode) -> DISPLAYCONFIG_MODE_INFO {
    let (info_type, payload) = match &mode.details {
        ModeDetails::Source(sm) => (
            DISPLAYCONFIG_MODE_INFO_TYPE_SOURCE,
            DISPLAYCONFIG_MODE_INFO_0 {
                sourceMode: DISPLAYCONFIG_SOURCE_MODE {
                    width: sm.width,
                    height: sm.height,
                    pixelFormat: DISPLAYCONFIG_PIXELFORMAT(sm.pixel_format),
                    position: POINTL {
                        x: sm.position.x,
                        y: sm.position.y,
                    },
                },
            },
        ),
        ModeDetails::Target(tm) => (
            DISPLAYCONFIG_MODE_INFO_TYPE_TARGET,
            DISPLAYCONFIG_MODE_INFO_0 {
                targetMode: DISPLAYCONFIG_TARGET_MODE {
                    targetVideoSignalInfo: DISPLAYCONFIG_VIDEO_SIGNAL_INFO {
                        pixelRate: tm.pixel_rate,
                        hSyncFreq: rational_to_os(tm.h_sync_freq),
                        vSyncFreq: rational_to_os(tm.v_sync_freq),
                        activeSize: DISPLAYCONFIG_2DREGION {
                            cx: tm.active_size.cx,
                            cy: tm.active_size.cy,
                        },
                        totalSize: DISPLAYCONFIG_2DREGION {
                            cx: tm.total_size.cx,
                            cy: tm.total_size.cy,
                        },
                        Anonymous: DISPLAYCONFIG_VIDEO_SIGNAL_INFO_0 {
                            videoStandard: tm.video_standard,
                        },
                        scanLineOrdering: DISPLAYCONFIG_SCANLINE_ORDERING(tm.scan_line_ordering),
                    },
                },
            },
        ),
        ModeDetails::DesktopImage(image) => (
            DISPLAYCONFIG_MODE_INFO_TYPE_DESKTOP_IMAGE,
            DISPLAYCONFIG_MODE_INFO_0 {
                desktopImageInfo: DISPLAYCONFIG_DESKTOP_IMAGE_INFO {
                    PathSourceSize: POINTL {
                        x: image.path_source_size.x,
                        y: image.path_source_size.y,
                    },
                    DesktopImageRegion: rect_to_os(image.desktop_image_region),
                    DesktopImageClip: rect_to_os(image.desktop_image_clip),
                },
            },
        ),
    };

    DISPLAYCONFIG_MODE_INFO {
        infoType: info_type,
        id: mode.id,
        adapterId: adapter_to_os(mode.adapter_id),
        Anonymous: payload,
    }
}

fn rect_from_os(r: RECTL) -> Rect {
    Rect {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

fn rect_to_os(r: Rect) -> RECTL {
    RECTL {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}
