//! Identity constants announced to the meeting platform.

/// Identity the worker joins the session as. Shared by the token payload and
/// the handshake frame.
pub const WORKER_IDENTITY: &str = "ZoomODC_Listener";

/// Device name sent in the handshake frame.
pub const DEVICE_NAME: &str = "ODC_Integration_Node";

/// Prefix of the per-meeting device id (`aws_worker_<meeting_id>`).
pub const DEVICE_ID_PREFIX: &str = "aws_worker_";

/// Device id announced for a meeting.
pub fn device_id(meeting_id: &str) -> String {
    format!("{DEVICE_ID_PREFIX}{meeting_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_embeds_meeting() {
        assert_eq!(device_id("m-42"), "aws_worker_m-42");
    }

    #[test]
    fn device_id_with_empty_meeting_is_prefix() {
        assert_eq!(device_id(""), DEVICE_ID_PREFIX);
    }
}
