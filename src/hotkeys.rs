//! Global hotkey dispatch
//!
//! Maps configured key chords to profile restores. Chord parsing is pure and
//! platform-independent; registration is a Windows resource with an explicit
//! register/unregister lifecycle (released on drop) and ids drawn from a
//! shared counter. A chord another application already owns is reported and
//! skipped, never fatal: the remaining bindings stay live.

use anyhow::{bail, Result};

/// A parsed key chord: modifier set plus one virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub win: bool,
    pub key: u32,
}

/// Parse a chord like `ctrl+alt+1` or `win+shift+f5`.
///
/// Case-insensitive; exactly one non-modifier key is required.
pub fn parse_chord(text: &str) -> Result<Chord> {
    let mut chord = Chord {
        ctrl: false,
        alt: false,
        shift: false,
        win: false,
        key: 0,
    };
    let mut key_token: Option<String> = None;

    for token in text.split('+') {
        let token = token.trim().to_lowercase();
        match token.as_str() {
            "" => bail!("empty token in chord '{text}'"),
            "ctrl" | "control" => chord.ctrl = true,
            "alt" => chord.alt = true,
            "shift" => chord.shift = true,
            "win" | "super" => chord.win = true,
            _ => {
                if key_token.is_some() {
                    bail!("chord '{text}' has more than one non-modifier key");
                }
                key_token = Some(token);
            }
        }
    }

    let Some(token) = key_token else {
        bail!("chord '{text}' has no non-modifier key");
    };
    let Some(code) = virtual_key_code(&token) else {
        bail!("unknown key '{token}' in chord '{text}'");
    };
    chord.key = code;
    Ok(chord)
}

/// Win32 virtual-key code for a lowercase key token, if we know it.
fn virtual_key_code(token: &str) -> Option<u32> {
    // Single letters and digits map straight to their ASCII uppercase value.
    if token.len() == 1 {
        let c = token.chars().next()?;
        if c.is_ascii_lowercase() {
            return Some(c.to_ascii_uppercase() as u32);
        }
        if c.is_ascii_digit() {
            return Some(c as u32);
        }
        return None;
    }

    // Function keys f1..f24 (VK_F1 = 0x70).
    if let Some(n) = token.strip_prefix('f')
        && let Ok(n) = n.parse::<u32>()
        && (1..=24).contains(&n)
    {
        return Some(0x70 + n - 1);
    }

    match token {
        "space" => Some(0x20),
        "tab" => Some(0x09),
        "enter" | "return" => Some(0x0D),
        "escape" | "esc" => Some(0x1B),
        "backspace" => Some(0x08),
        "insert" => Some(0x2D),
        "delete" => Some(0x2E),
        "home" => Some(0x24),
        "end" => Some(0x23),
        "pageup" => Some(0x21),
        "pagedown" => Some(0x22),
        "left" => Some(0x25),
        "up" => Some(0x26),
        "right" => Some(0x27),
        "down" => Some(0x28),
        "pause" => Some(0x13),
        _ => None,
    }
}

#[cfg(windows)]
pub use self::win::run_dispatcher;

/// Global hotkeys need the Windows input subsystem.
#[cfg(not(windows))]
pub fn run_dispatcher(
    _api: &impl crate::display::DisplayConfigApi,
    _profile_dir: &std::path::Path,
    _bindings: &std::collections::BTreeMap<String, String>,
) -> Result<()> {
    bail!(crate::errors::EngineError::Unsupported)
}

#[cfg(windows)]
mod win {
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicI32, Ordering};

    use anyhow::Result;
    use tracing::{error, info, warn};
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_SHIFT,
        MOD_WIN,
    };
    use windows::Win32::UI::WindowsAndMessaging::{GetMessageW, MSG, WM_HOTKEY};

    use super::{parse_chord, Chord};
    use crate::display::DisplayConfigApi;
    use crate::errors::EngineError;
    use crate::profiles::restore_profile;

    /// Registration ids shared across the process lifetime.
    static NEXT_HOTKEY_ID: AtomicI32 = AtomicI32::new(1);

    /// An owned global hotkey registration, released on drop.
    struct RegisteredHotkey {
        id: i32,
    }

    impl RegisteredHotkey {
        fn register(chord: Chord) -> Result<Self, EngineError> {
            let mut modifiers = HOT_KEY_MODIFIERS(0);
            if chord.ctrl {
                modifiers |= MOD_CONTROL;
            }
            if chord.alt {
                modifiers |= MOD_ALT;
            }
            if chord.shift {
                modifiers |= MOD_SHIFT;
            }
            if chord.win {
                modifiers |= MOD_WIN;
            }

            let id = NEXT_HOTKEY_ID.fetch_add(1, Ordering::Relaxed);
            // No window handle: WM_HOTKEY is posted to this thread's queue.
            unsafe { RegisterHotKey(None, id, modifiers, chord.key) }
                .map_err(|e| EngineError::HotkeyConflict(e.message()))?;
            Ok(Self { id })
        }
    }

    impl Drop for RegisteredHotkey {
        fn drop(&mut self) {
            if let Err(e) = unsafe { UnregisterHotKey(None, self.id) } {
                warn!(id = self.id, error = %e, "Failed to unregister hotkey");
            }
        }
    }

    /// Register every configured binding and block dispatching WM_HOTKEY to
    /// profile restores until the thread's message loop ends.
    pub fn run_dispatcher(
        api: &impl DisplayConfigApi,
        profile_dir: &Path,
        bindings: &BTreeMap<String, String>,
    ) -> Result<()> {
        let mut registered: Vec<(RegisteredHotkey, String)> = Vec::new();

        for (profile, chord_text) in bindings {
            let chord = match parse_chord(chord_text) {
                Ok(chord) => chord,
                Err(e) => {
                    warn!(profile = %profile, chord = %chord_text, error = %e, "Skipping unparsable hotkey binding");
                    continue;
                }
            };
            match RegisteredHotkey::register(chord) {
                Ok(hotkey) => {
                    info!(profile = %profile, chord = %chord_text, id = hotkey.id, "Registered hotkey");
                    registered.push((hotkey, profile.clone()));
                }
                Err(e) => {
                    // Chord held by another application; keep the rest.
                    warn!(profile = %profile, chord = %chord_text, error = %e, "Skipping hotkey binding");
                }
            }
        }

        if registered.is_empty() {
            warn!("No hotkeys registered; nothing to dispatch");
            return Ok(());
        }
        info!(count = registered.len(), "Hotkey dispatcher running");

        let mut msg = MSG::default();
        loop {
            let status = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            if status.0 <= 0 {
                break;
            }
            if msg.message != WM_HOTKEY {
                continue;
            }
            let id = msg.wParam.0 as i32;
            let Some((_, profile)) = registered.iter().find(|(h, _)| h.id == id) else {
                continue;
            };
            info!(profile = %profile, "Hotkey pressed, restoring profile");
            if let Err(e) = restore_profile(api, profile_dir, profile) {
                error!(profile = %profile, error = %e, "Failed to restore profile");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modifiers_and_digit() {
        let chord = parse_chord("ctrl+alt+1").unwrap();
        assert!(chord.ctrl && chord.alt);
        assert!(!chord.shift && !chord.win);
        assert_eq!(chord.key, '1' as u32);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let chord = parse_chord("Ctrl+Shift+D").unwrap();
        assert!(chord.ctrl && chord.shift);
        assert_eq!(chord.key, 'D' as u32);
    }

    #[test]
    fn test_parse_function_and_named_keys() {
        assert_eq!(parse_chord("win+f5").unwrap().key, 0x74);
        assert_eq!(parse_chord("f24").unwrap().key, 0x87);
        assert_eq!(parse_chord("ctrl+space").unwrap().key, 0x20);
        assert_eq!(parse_chord("alt+pagedown").unwrap().key, 0x22);
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        assert!(parse_chord("ctrl+alt").is_err());
        assert!(parse_chord("ctrl++a").is_err());
    }

    #[test]
    fn test_parse_rejects_two_keys() {
        assert!(parse_chord("a+b").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        assert!(parse_chord("ctrl+f25").is_err());
        assert!(parse_chord("ctrl+volumeup").is_err());
    }
}
