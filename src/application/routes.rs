use std::fmt;

/// The application's routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// `/`: registration form and registered users.
    #[default]
    Registry,
    /// `/quienes-somos`: remote user list.
    Directory,
    /// `/quienes-somos/:id`: one remote user.
    DirectoryDetail(u64),
    /// `/mensaje`: static message.
    Message,
}

impl Route {
    /// Routes reachable from the navbar, in display order.
    pub const NAV: [Route; 3] = [Route::Registry, Route::Directory, Route::Message];

    pub fn path(&self) -> String {
        match self {
            Route::Registry => "/".to_string(),
            Route::Directory => "/quienes-somos".to_string(),
            Route::DirectoryDetail(id) => format!("/quienes-somos/{}", id),
            Route::Message => "/mensaje".to_string(),
        }
    }

    /// Resolves a path. Unknown paths and non-numeric ids give `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use primera_pagina::application::Route;
    ///
    /// assert_eq!(Route::parse("/quienes-somos/3"), Some(Route::DirectoryDetail(3)));
    /// assert_eq!(Route::parse("/quienes-somos/abc"), None);
    /// ```
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Registry),
            "/quienes-somos" => Some(Route::Directory),
            "/mensaje" => Some(Route::Message),
            _ => trimmed
                .strip_prefix("/quienes-somos/")
                .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|id| id.parse::<u64>().ok())
                .map(Route::DirectoryDetail),
        }
    }

    /// Navbar label.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Registry => "Inicio",
            Route::Directory | Route::DirectoryDetail(_) => "Quiénes somos",
            Route::Message => "Mensaje",
        }
    }

    /// Index of the navbar entry highlighted while this route is shown.
    pub fn nav_index(&self) -> usize {
        match self {
            Route::Registry => 0,
            Route::Directory | Route::DirectoryDetail(_) => 1,
            Route::Message => 2,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
