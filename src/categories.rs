//! Newznab category codes
//!
//! Parent categories are whole thousands (5000 = TV) and subcategories add
//! tens (5040 = TV/HD). Indexers may define extra codes of their own; those
//! pass through requests untouched and simply have no entry here.

/// A standard Newznab category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub code: i32,
    pub name: &'static str,
    pub parent: Option<i32>,
}

impl Category {
    const fn new(code: i32, name: &'static str, parent: Option<i32>) -> Self {
        Self { code, name, parent }
    }

    pub fn is_parent(&self) -> bool {
        self.parent.is_none()
    }
}

/// Well-known category codes
pub mod cats {
    pub const CONSOLE: i32 = 1000;
    pub const MOVIES: i32 = 2000;
    pub const AUDIO: i32 = 3000;
    pub const PC: i32 = 4000;
    pub const TV: i32 = 5000;
    pub const XXX: i32 = 6000;
    pub const BOOKS: i32 = 7000;
    pub const OTHER: i32 = 8000;

    pub const MOVIES_FOREIGN: i32 = 2010;
    pub const MOVIES_OTHER: i32 = 2020;
    pub const MOVIES_SD: i32 = 2030;
    pub const MOVIES_HD: i32 = 2040;
    pub const MOVIES_UHD: i32 = 2045;
    pub const MOVIES_BLURAY: i32 = 2050;
    pub const MOVIES_3D: i32 = 2060;

    pub const AUDIO_MP3: i32 = 3010;
    pub const AUDIO_VIDEO: i32 = 3020;
    pub const AUDIO_AUDIOBOOK: i32 = 3030;
    pub const AUDIO_LOSSLESS: i32 = 3040;

    pub const TV_FOREIGN: i32 = 5020;
    pub const TV_SD: i32 = 5030;
    pub const TV_HD: i32 = 5040;
    pub const TV_UHD: i32 = 5045;
    pub const TV_OTHER: i32 = 5050;
    pub const TV_SPORT: i32 = 5060;
    pub const TV_ANIME: i32 = 5070;
    pub const TV_DOCUMENTARY: i32 = 5080;

    pub const BOOKS_EBOOK: i32 = 7020;
    pub const BOOKS_COMICS: i32 = 7030;
}

pub static CATEGORIES: &[Category] = &[
    Category::new(1000, "Console", None),
    Category::new(1010, "Console/NDS", Some(1000)),
    Category::new(1020, "Console/PSP", Some(1000)),
    Category::new(1030, "Console/Wii", Some(1000)),
    Category::new(1040, "Console/Xbox", Some(1000)),
    Category::new(1050, "Console/Xbox 360", Some(1000)),
    Category::new(1080, "Console/PS3", Some(1000)),
    Category::new(1090, "Console/Other", Some(1000)),
    Category::new(2000, "Movies", None),
    Category::new(2010, "Movies/Foreign", Some(2000)),
    Category::new(2020, "Movies/Other", Some(2000)),
    Category::new(2030, "Movies/SD", Some(2000)),
    Category::new(2040, "Movies/HD", Some(2000)),
    Category::new(2045, "Movies/UHD", Some(2000)),
    Category::new(2050, "Movies/BluRay", Some(2000)),
    Category::new(2060, "Movies/3D", Some(2000)),
    Category::new(3000, "Audio", None),
    Category::new(3010, "Audio/MP3", Some(3000)),
    Category::new(3020, "Audio/Video", Some(3000)),
    Category::new(3030, "Audio/Audiobook", Some(3000)),
    Category::new(3040, "Audio/Lossless", Some(3000)),
    Category::new(4000, "PC", None),
    Category::new(4010, "PC/0day", Some(4000)),
    Category::new(4020, "PC/ISO", Some(4000)),
    Category::new(4030, "PC/Mac", Some(4000)),
    Category::new(4050, "PC/Games", Some(4000)),
    Category::new(5000, "TV", None),
    Category::new(5020, "TV/Foreign", Some(5000)),
    Category::new(5030, "TV/SD", Some(5000)),
    Category::new(5040, "TV/HD", Some(5000)),
    Category::new(5045, "TV/UHD", Some(5000)),
    Category::new(5050, "TV/Other", Some(5000)),
    Category::new(5060, "TV/Sport", Some(5000)),
    Category::new(5070, "TV/Anime", Some(5000)),
    Category::new(5080, "TV/Documentary", Some(5000)),
    Category::new(6000, "XXX", None),
    Category::new(7000, "Books", None),
    Category::new(7010, "Books/Mags", Some(7000)),
    Category::new(7020, "Books/EBook", Some(7000)),
    Category::new(7030, "Books/Comics", Some(7000)),
    Category::new(8000, "Other", None),
    Category::new(8010, "Other/Misc", Some(8000)),
];

pub fn lookup(code: i32) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.code == code)
}

/// Display name for a category code as carried in a record (`"5040"`)
pub fn name_of(code: &str) -> Option<&'static str> {
    code.trim().parse().ok().and_then(lookup).map(|c| c.name)
}

pub fn subcategories(parent: i32) -> Vec<&'static Category> {
    CATEGORIES
        .iter()
        .filter(|c| c.parent == Some(parent))
        .collect()
}

/// Expand parent codes to include their subcategories, sorted and deduplicated.
/// E.g. `[5000]` -> `[5000, 5020, 5030, ...]`
pub fn expand(codes: &[i32]) -> Vec<i32> {
    let mut expanded: Vec<i32> = codes
        .iter()
        .flat_map(|&code| std::iter::once(code).chain(subcategories(code).into_iter().map(|c| c.code)))
        .collect();
    expanded.sort_unstable();
    expanded.dedup();
    expanded
}

/// Serialize a category filter as a single comma-separated value.
pub fn join_codes(codes: &[i32]) -> String {
    codes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-separated list of codes, skipping anything non-numeric.
pub fn parse_codes(s: &str) -> Vec<i32> {
    s.split(',').filter_map(|c| c.trim().parse().ok()).collect()
}
