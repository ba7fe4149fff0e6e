//! The two pieces of client-side state shared by every page: the light/dark
//! theme preference and the navigation sidebar. Pages are rendered in the
//! pre-hydration state described here, and `site.js` applies the same rules
//! in the browser using the constants passed through [`crate::chrome`].
//!
//! Only [`Theme::default`], the constants and [`Sidebar::default`] reach the
//! rendered pages. [`ThemeStore`], [`Storage`] and [`Sidebar::on_resize`] are
//! the reference model of the browser behavior: `site.js` mirrors them, and
//! a change to one must be made in the other.

use std::fmt;
use std::str::FromStr;

/// The local storage key under which the theme preference is kept.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Viewports narrower than this many pixels count as mobile.
pub const MOBILE_BREAKPOINT: u32 = 768;

/// The light/dark color scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Default for Theme {
    /// Pages render dark until the stored or OS preference is known.
    fn default() -> Self {
        Theme::Dark
    }
}

impl Theme {
    /// Resolves the initial theme: a valid stored preference wins, otherwise
    /// the OS color-scheme preference decides.
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Theme {
        match stored.map(str::parse::<Theme>) {
            Some(Ok(theme)) => theme,
            _ => match prefers_dark {
                true => Theme::Dark,
                false => Theme::Light,
            },
        }
    }

    pub fn toggle(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// The class set on the root element (and the value stored).
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(UnknownThemeError(s.to_owned())),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownThemeError(String);

impl fmt::Display for UnknownThemeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown theme `{}`; expected `dark` or `light`", self.0)
    }
}

impl std::error::Error for UnknownThemeError {}

/// Holds the theme and mirrors every change to storage. Last write wins.
pub struct ThemeStore<S: Storage> {
    theme: Theme,
    storage: S,
}

/// Persistent key/value storage, e.g., the browser's local storage.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

impl<S: Storage> ThemeStore<S> {
    /// Hydrates from `storage`, falling back to the OS preference.
    pub fn hydrate(storage: S, prefers_dark: bool) -> ThemeStore<S> {
        let theme = Theme::resolve(storage.get(THEME_STORAGE_KEY).as_deref(), prefers_dark);
        let mut store = ThemeStore { theme, storage };
        store.set(theme);
        store
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        self.storage.set(THEME_STORAGE_KEY, theme.as_str());
    }

    pub fn toggle(&mut self) {
        self.set(self.theme.toggle());
    }
}

/// Open/closed state of the navigation sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sidebar {
    pub open: bool,
    pub mobile: bool,
    pub hydrated: bool,
}

impl Default for Sidebar {
    /// Open, to match the desktop layout before the viewport is known.
    fn default() -> Self {
        Sidebar {
            open: true,
            mobile: false,
            hydrated: false,
        }
    }
}

impl Sidebar {
    /// Records a viewport width. The first observation also picks the
    /// initial open state (closed on mobile); later ones only update
    /// `mobile`.
    pub fn on_resize(&mut self, width: u32) {
        self.mobile = width < MOBILE_BREAKPOINT;
        if !self.hydrated {
            self.open = !self.mobile;
            self.hydrated = true;
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage(HashMap<String, String>);

    impl Storage for MemoryStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) {
            self.0.insert(key.to_owned(), value.to_owned());
        }
    }

    #[test]
    fn test_theme_resolve() {
        assert_eq!(Theme::Light, Theme::resolve(Some("light"), true));
        assert_eq!(Theme::Dark, Theme::resolve(Some("dark"), false));
        assert_eq!(Theme::Light, Theme::resolve(Some("sepia"), false));
        assert_eq!(Theme::Dark, Theme::resolve(None, true));
        assert_eq!(Theme::Light, Theme::resolve(None, false));
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(Ok(Theme::Dark), "dark".parse::<Theme>());
        assert!("Dark".parse::<Theme>().is_err());
        assert_eq!("light", Theme::Dark.toggle().to_string());
    }

    #[test]
    fn test_theme_store_mirrors_storage() {
        let mut store = ThemeStore::hydrate(MemoryStorage::default(), false);
        assert_eq!(Theme::Light, store.theme());
        assert_eq!(Some("light".to_owned()), store.storage.get(THEME_STORAGE_KEY));

        store.toggle();
        assert_eq!(Theme::Dark, store.theme());
        assert_eq!(Some("dark".to_owned()), store.storage.get(THEME_STORAGE_KEY));

        store.set(Theme::Light);
        store.set(Theme::Dark);
        assert_eq!(Some("dark".to_owned()), store.storage.get(THEME_STORAGE_KEY));
    }

    #[test]
    fn test_theme_store_prefers_stored_value() {
        let mut storage = MemoryStorage::default();
        storage.set(THEME_STORAGE_KEY, "light");
        assert_eq!(Theme::Light, ThemeStore::hydrate(storage, true).theme());
    }

    #[test]
    fn test_sidebar_first_resize_hydrates() {
        let mut sidebar = Sidebar::default();
        assert!(sidebar.open);

        sidebar.on_resize(500);
        assert!(sidebar.mobile);
        assert!(sidebar.hydrated);
        assert!(!sidebar.open);

        // Later resizes leave the open state to the user.
        sidebar.on_resize(1024);
        assert!(!sidebar.mobile);
        assert!(!sidebar.open);
    }

    #[test]
    fn test_sidebar_breakpoint() {
        let mut sidebar = Sidebar::default();
        sidebar.on_resize(MOBILE_BREAKPOINT);
        assert!(!sidebar.mobile);
        assert!(sidebar.open);

        let mut sidebar = Sidebar::default();
        sidebar.on_resize(MOBILE_BREAKPOINT - 1);
        assert!(sidebar.mobile);
    }

    #[test]
    fn test_sidebar_toggles() {
        let mut sidebar = Sidebar::default();
        sidebar.toggle();
        assert!(!sidebar.open);
        sidebar.open();
        assert!(sidebar.open);
        sidebar.close();
        assert!(!sidebar.open);
    }

    #[test]
    fn test_site_js_mirrors_model() -> std::io::Result<()> {
        let script = std::fs::read_to_string("./testdata/theme/static/site.js")?;
        assert!(script.contains(&format!("body.dataset.themeKey || '{}'", THEME_STORAGE_KEY)));
        assert!(script.contains(&format!("body.dataset.breakpoint || '{}'", MOBILE_BREAKPOINT)));
        assert!(script.contains("window.innerWidth < breakpoint"));
        assert!(script.contains("sidebar.open = !sidebar.mobile;"));
        assert!(script.contains(&format!(
            "stored === '{}' || stored === '{}'",
            Theme::Dark,
            Theme::Light
        )));
        Ok(())
    }
}
