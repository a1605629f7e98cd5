#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

pub const NAV_ITEMS: [NavItem; 3] = [
    NavItem {
        label: "Dashboard",
        path: "/",
    },
    NavItem {
        label: "Team",
        path: "/team",
    },
    NavItem {
        label: "Account",
        path: "/account",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarEntry {
    pub item: NavItem,
    pub active: bool,
}

impl NavItem {
    /// `/` only matches itself; other entries also match their sub-paths.
    pub fn matches(&self, path: &str) -> bool {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        if self.path == "/" {
            return path == "/";
        }
        path == self.path
            || path
                .strip_prefix(self.path)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

pub fn active_item(path: &str) -> Option<NavItem> {
    NAV_ITEMS.into_iter().find(|item| item.matches(path))
}

pub fn sidebar(path: &str) -> Vec<SidebarEntry> {
    NAV_ITEMS
        .into_iter()
        .map(|item| SidebarEntry {
            item,
            active: item.matches(path),
        })
        .collect()
}
