/// Device classification, computed once per session
use crate::config::{DragConfig, DragRatio};

/// Every touch/desktop decision reads from this one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    pub touch_primary: bool,
    pub drag_ratio: DragRatio,
}

impl DeviceProfile {
    pub fn desktop(drag: &DragConfig) -> Self {
        Self {
            touch_primary: false,
            drag_ratio: drag.desktop,
        }
    }

    pub fn touch(drag: &DragConfig) -> Self {
        Self {
            touch_primary: true,
            drag_ratio: drag.touch,
        }
    }

    pub fn from_user_agent(user_agent: &str, drag: &DragConfig) -> Self {
        if is_touch_user_agent(user_agent) {
            Self::touch(drag)
        } else {
            Self::desktop(drag)
        }
    }
}

/// Phones only: `iPhone`, or `Android` followed later by `Mobile`.
/// Tablets report Android without Mobile and stay on the desktop profile.
pub fn is_touch_user_agent(user_agent: &str) -> bool {
    if user_agent.contains("iPhone") {
        return true;
    }
    match user_agent.find("Android") {
        Some(at) => user_agent[at + "Android".len()..].contains("Mobile"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_user_agents() {
        assert!(is_touch_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
        ));
        assert!(is_touch_user_agent(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36"
        ));
    }

    #[test]
    fn test_desktop_and_tablet_user_agents() {
        assert!(!is_touch_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36"
        ));
        assert!(!is_touch_user_agent(
            "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 Chrome/120.0 Safari/537.36"
        ));
        // Mobile before Android does not count
        assert!(!is_touch_user_agent("Mobile Android"));
    }

    #[test]
    fn test_profile_picks_ratio() {
        let drag = DragConfig::default();
        let phone = DeviceProfile::from_user_agent("iPhone", &drag);
        assert!(phone.touch_primary);
        assert_eq!(phone.drag_ratio, DragRatio { x: 2.0, z: 0.9 });
        let desk = DeviceProfile::from_user_agent("Firefox", &drag);
        assert!(!desk.touch_primary);
        assert_eq!(desk.drag_ratio, DragRatio { x: 4.0, z: 1.5 });
    }
}
