//! Client-side catalog state and its pure rendering.
//!
//! What gets shown is a function of the movie list, the admin flag and the
//! current genre filter only; the same view drives the server-rendered page
//! and [`super::app::CatalogApp`].

use jiff::civil::{Date, Weekday};

use crate::models::Movie;

pub const ALL_GENRES: &str = "todos";
pub const SYNOPSIS_PREVIEW_CHARS: usize = 120;

const YOUTUBE_ID_LEN: usize = 11;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogViewModel {
    movies: Vec<Movie>,
    is_admin: bool,
    current_filter: String,
}

impl Default for CatalogViewModel {
    fn default() -> Self {
        Self { movies: Vec::new(), is_admin: false, current_filter: ALL_GENRES.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieCard {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub duration: String,
    pub release_date: String,
    pub director: String,
    pub synopsis: String,
    pub poster_url: String,
    pub can_edit: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminRow {
    pub id: i64,
    pub title: String,
    pub release_date: String,
    pub genre: String,
    pub duration: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogView {
    pub filter: String,
    pub is_admin: bool,
    pub cards: Vec<MovieCard>,
    /// Present only for admins; always lists the whole catalog.
    pub admin_rows: Option<Vec<AdminRow>>,
}

impl CatalogView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub release_date: String,
    pub duration: String,
    pub genre: String,
    pub poster_url: String,
    pub synopsis: String,
    pub director: String,
    pub cast: String,
    pub trailer_embed_url: Option<String>,
    pub show_admin_actions: bool,
}

impl CatalogViewModel {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies, ..Self::default() }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn set_movies(&mut self, movies: Vec<Movie>) {
        self.movies = movies;
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn current_filter(&self) -> &str {
        &self.current_filter
    }

    pub fn set_filter(&mut self, genre: &str) {
        let genre = genre.trim();
        self.current_filter =
            if genre.is_empty() { ALL_GENRES.to_string() } else { genre.to_string() };
    }

    pub fn login_succeeded(&mut self) {
        self.is_admin = true;
    }

    pub fn logged_out(&mut self) {
        self.is_admin = false;
    }

    pub fn find(&self, id: i64) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Movies passing the genre filter, in list order.
    pub fn visible(&self) -> impl Iterator<Item = &Movie> {
        let all = is_all(&self.current_filter);
        self.movies
            .iter()
            .filter(move |m| all || m.genre.to_lowercase() == self.current_filter.to_lowercase())
    }

    /// Distinct genres in first-seen order, for the filter bar.
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = Vec::new();
        for movie in &self.movies {
            let genre = movie.genre.to_lowercase();
            if !genres.contains(&genre) {
                genres.push(genre);
            }
        }
        genres
    }

    pub fn render(&self) -> CatalogView {
        let cards = self
            .visible()
            .map(|m| MovieCard {
                id: m.id,
                title: m.title.clone(),
                genre: m.genre.clone(),
                duration: m.duration.clone(),
                release_date: long_date(&m.release_date),
                director: m.director.clone(),
                synopsis: truncate_synopsis(&m.synopsis),
                poster_url: m.poster_url.clone(),
                can_edit: self.is_admin,
            })
            .collect();

        let admin_rows = self.is_admin.then(|| {
            self.movies
                .iter()
                .map(|m| AdminRow {
                    id: m.id,
                    title: m.title.clone(),
                    release_date: short_date(&m.release_date),
                    genre: m.genre.clone(),
                    duration: m.duration.clone(),
                })
                .collect()
        });

        CatalogView {
            filter: self.current_filter.clone(),
            is_admin: self.is_admin,
            cards,
            admin_rows,
        }
    }

    pub fn detail(&self, movie: &Movie) -> MovieDetail {
        MovieDetail {
            id: movie.id,
            title: movie.title.clone(),
            release_date: long_date(&movie.release_date),
            duration: movie.duration.clone(),
            genre: movie.genre.clone(),
            poster_url: movie.poster_url.clone(),
            synopsis: movie.synopsis.clone(),
            director: movie.director.clone(),
            cast: movie.cast.clone(),
            trailer_embed_url: youtube_video_id(&movie.trailer_url)
                .map(|id| format!("https://www.youtube.com/embed/{id}")),
            show_admin_actions: self.is_admin,
        }
    }
}

fn is_all(filter: &str) -> bool {
    filter.eq_ignore_ascii_case(ALL_GENRES) || filter.eq_ignore_ascii_case("all")
}

pub fn truncate_synopsis(synopsis: &str) -> String {
    if synopsis.chars().count() > SYNOPSIS_PREVIEW_CHARS {
        let mut short: String = synopsis.chars().take(SYNOPSIS_PREVIEW_CHARS).collect();
        short.push_str("...");
        short
    } else {
        synopsis.to_string()
    }
}

/// Extracts the 11-character video id from `watch?v=`, `youtu.be/` and
/// `/embed/` links. When several shapes match, the later one in that list wins.
pub fn youtube_video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    let lower = url.to_ascii_lowercase();
    let mut id: Option<&str> = None;

    if let Some(host) = lower.find("youtube.com") {
        let tail = &lower[host..];
        let param = [tail.rfind("?v="), tail.rfind("&v=")].into_iter().flatten().max();
        if let Some(pos) = param {
            let start = host + pos + 3;
            let value = url[start..].split('&').next().unwrap_or_default();
            let value = value.split('?').next().unwrap_or_default();
            if !value.is_empty() {
                id = Some(value);
            }
        }
    }

    if let Some(value) = after_marker(url, &lower, "youtu.be/") {
        id = Some(value);
    }

    if let Some(value) = after_marker(url, &lower, "youtube.com/embed/") {
        id = Some(value);
    }

    id.filter(|v| v.chars().count() == YOUTUBE_ID_LEN).map(str::to_string)
}

/// Text after the first `marker`, up to the next `?`; `None` if empty.
fn after_marker<'a>(url: &'a str, lower: &str, marker: &str) -> Option<&'a str> {
    let start = lower.find(marker)? + marker.len();
    let value = url[start..].split('?').next().unwrap_or_default();
    (!value.is_empty()).then_some(value)
}

const WEEKDAYS: [&str; 7] = ["lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo"];
const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

fn parse_date(raw: &str) -> Option<Date> {
    let date = raw.split_once('T').map_or(raw, |(d, _)| d);
    date.trim().parse().ok()
}

/// `domingo, 15 de octubre de 2023`; unparseable input is shown as is.
pub fn long_date(raw: &str) -> String {
    let Some(date) = parse_date(raw) else {
        return raw.to_string();
    };
    let weekday = weekday_name(date.weekday());
    let month = MONTHS[(date.month() - 1) as usize];
    format!("{weekday}, {} de {month} de {}", date.day(), date.year())
}

/// `15/10/2023`.
pub fn short_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format!("{}/{}/{}", date.day(), date.month(), date.year()),
        None => raw.to_string(),
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAYS[weekday.to_monday_zero_offset() as usize]
}
