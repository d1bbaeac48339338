//! Client configuration

use mediboard_api::{Menu, MenuItem, MenuSection};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Base URL of the remote API (also serves file uploads)
    pub api_url: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("mediboard.db"),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Mediboard"))
            .unwrap_or_else(|| PathBuf::from(".mediboard"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

/// Sidebar menu of this build. Login responses may carry a server-driven
/// menu that takes precedence when present.
pub fn default_menu() -> Menu {
    vec![
        MenuSection {
            title: "Main".to_string(),
            icon: "mdi mdi-gauge".to_string(),
            items: vec![
                MenuItem {
                    title: "Dashboard".to_string(),
                    url: "/dashboard".to_string(),
                },
                MenuItem {
                    title: "Progress".to_string(),
                    url: "/progress".to_string(),
                },
                MenuItem {
                    title: "Charts".to_string(),
                    url: "/charts".to_string(),
                },
            ],
        },
        MenuSection {
            title: "Maintenance".to_string(),
            icon: "mdi mdi-folder-lock-open".to_string(),
            items: vec![
                MenuItem {
                    title: "Users".to_string(),
                    url: "/users".to_string(),
                },
                MenuItem {
                    title: "Doctors".to_string(),
                    url: "/doctors".to_string(),
                },
                MenuItem {
                    title: "Hospitals".to_string(),
                    url: "/hospitals".to_string(),
                },
            ],
        },
    ]
}

// Simple dirs implementation for common directories
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
