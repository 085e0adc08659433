//! Terminal rendering for session events.

use pawmatch_core::search::PaginatedSearch;
use pawmatch_core::{Dog, FavoritesSet, RangeChange, SearchIssue, SessionObserver, TrackGeometry};

const TRACK_CELLS: i64 = 40;

/// Prints session events to stdout (results) and stderr (status lines).
pub struct TerminalObserver {
    json: bool,
}

impl TerminalObserver {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl SessionObserver for TerminalObserver {
    fn on_range(&mut self, change: &RangeChange) {
        if !self.json {
            let sel = change.selection;
            eprintln!("age {:>2} {} {:<2}", sel.min, track_bar(change.track), sel.max);
        }
    }

    fn on_results(&mut self, dogs: &[Dog], total: u64) {
        print_dogs(dogs, total, self.json);
    }

    fn on_search_issue(&mut self, issue: &SearchIssue) {
        eprintln!("Search failed: {}. {}", issue.message, issue.hint);
    }

    fn on_favorites(&mut self, favorites: &FavoritesSet) {
        if !self.json {
            eprintln!("{} favorite(s)", favorites.len());
        }
    }

    fn on_match(&mut self, dog: &Dog) {
        if self.json {
            print_json(dog);
        } else {
            println!("Your match: {} the {} ({} yrs, {})", dog.name, dog.breed, dog.age, dog.zip_code);
            println!("  {}", dog.img);
        }
    }

    fn on_match_message(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Draw the filled slider segment, e.g. `[----########------------]`.
pub fn track_bar(track: TrackGeometry) -> String {
    let start = (track.left * TRACK_CELLS / 100).clamp(0, TRACK_CELLS);
    let end = ((track.left + track.width) * TRACK_CELLS / 100).clamp(start, TRACK_CELLS);
    let cell = |i: i64| if (start..end).contains(&i) { '#' } else { '-' };
    let bar: String = (0..TRACK_CELLS).map(cell).collect();
    format!("[{bar}]")
}

pub fn print_dogs(dogs: &[Dog], total: u64, json: bool) {
    if json {
        print_json(&serde_json::json!({ "total": total, "dogs": dogs }));
        return;
    }
    if dogs.is_empty() {
        eprintln!("No dogs match this search.");
        return;
    }
    for dog in dogs {
        println!("{:<22} {:<16} {:<28} {:>3}  {}", dog.id, dog.name, dog.breed, dog.age, dog.zip_code);
    }
    eprintln!("\n{} shown of {total}", dogs.len());
}

pub fn print_pager(search: &PaginatedSearch) {
    let prev = if search.has_prev() { "prev" } else { "    " };
    let next = if search.has_next() { "next" } else { "    " };
    eprintln!("[{prev}] [{next}]");
}

pub fn print_favorites(favorites: &FavoritesSet, json: bool) {
    if json {
        print_json(&favorites.as_slice());
        return;
    }
    if favorites.is_empty() {
        eprintln!("No favorites yet.");
    }
    for dog in favorites {
        println!("{:<22} {:<16} {}", dog.id, dog.name, dog.breed);
    }
}

pub fn print_breeds(breeds: &[String], json: bool) {
    if json {
        print_json(&breeds);
    } else {
        for breed in breeds {
            println!("{breed}");
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Could not encode JSON: {e}"),
    }
}
