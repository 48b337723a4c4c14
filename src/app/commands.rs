//! Inbound commands to the application service.
//!
//! Messages from the pub/sub link are decoded **once**, at the boundary,
//! into an [`AppCommand`].  The core only ever matches on the enum.

/// Wall-button equivalent: any payload triggers a gate command edge.
pub const GATE_SWITCH_TOPIC: &str = "/gate/switch";
/// Light on/off.
pub const LIGHT_TOPIC: &str = "/light";
/// Reboot the controller.
pub const RESTART_TOPIC: &str = "/restart";

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Same effect as pressing the gate button.
    GateSwitch,

    /// Switch the light on or off.
    SetLight(bool),

    /// Hold the photo-cell bypass relay on or off.
    SetBypass(bool),

    /// Reboot.  Handled by the entry point, not the core.
    Restart,
}

impl AppCommand {
    /// Decode an inbound message.  `bypass_suffix` is the configured
    /// photo-bypass topic.  Returns `None` for unknown topics.
    ///
    /// Boolean payloads are permissive: exactly `true` means on,
    /// anything else means off.
    pub fn decode(topic_suffix: &str, payload: &[u8], bypass_suffix: &str) -> Option<Self> {
        let flag = payload == b"true";
        match topic_suffix {
            GATE_SWITCH_TOPIC => Some(Self::GateSwitch),
            LIGHT_TOPIC => Some(Self::SetLight(flag)),
            RESTART_TOPIC => Some(Self::Restart),
            t if t == bypass_suffix => Some(Self::SetBypass(flag)),
            _ => None,
        }
    }
}
