//! Import of the TMDB-style movies and credits CSV files.
//!
//! Both files start with a header row. Rows that cannot be used are logged
//! and skipped; only failures of the stream itself are returned as errors.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::clean::{clean, has_escape};
use crate::error::{CatalogError, Result};
use crate::movie::{Movie, MovieId};

/// Movies file: JSON array of `{"id", "name"}` genre objects.
const MOVIE_GENRES: usize = 1;
/// Movies file: numeric movie id.
const MOVIE_ID: usize = 3;
/// Movies file: `YYYY-MM-DD`.
const MOVIE_RELEASE_DATE: usize = 11;
/// Movies file: display title.
const MOVIE_TITLE: usize = 17;

/// Credits file: numeric movie id.
const CREDIT_MOVIE_ID: usize = 0;
/// Credits file: JSON array of cast objects.
const CREDIT_CAST: usize = 2;
/// Credits file: JSON array of crew objects.
const CREDIT_CREW: usize = 3;

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    job: String,
}

/// Row counts from one import pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Data rows read, header excluded.
    pub rows: usize,
    /// Rows that produced or updated a movie.
    pub accepted: usize,
    /// Rows ignored.
    pub skipped: usize,
    /// Movies dropped from the map because their credits were malformed.
    pub removed: usize,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Pull the next record, skipping malformed rows but surfacing I/O failures.
fn next_record<R: Read>(
    records: &mut csv::StringRecordsIter<'_, R>,
    report: &mut ImportReport,
) -> Result<Option<csv::StringRecord>> {
    loop {
        match records.next() {
            None => return Ok(None),
            Some(Ok(record)) => {
                report.rows += 1;
                return Ok(Some(record));
            }
            Some(Err(err)) if err.is_io_error() => return Err(err.into()),
            Some(Err(err)) => {
                report.rows += 1;
                report.skipped += 1;
                warn!(%err, "skipping malformed CSV row");
            }
        }
    }
}

/// Extract the year from a `YYYY-MM-DD` release date.
fn parse_release_year(date: &str) -> Option<i32> {
    let mut parts = date.trim().splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some(year)
}

/// Names from a JSON array, cleaned, with untypeable ones dropped.
fn typeable_names<I: IntoIterator<Item = String>>(names: I) -> Vec<String> {
    names
        .into_iter()
        .map(|name| clean(&name).into_owned())
        .filter(|name| !has_escape(name))
        .collect()
}

/// Read movies from a movies CSV stream.
///
/// Rows are skipped when the genre JSON is malformed, the cleaned title still
/// has an escape sequence, the release date is missing or malformed, or the id
/// is not a number. A later row with the same id replaces an earlier one.
pub fn import_movies<R: Read>(reader: R) -> Result<(BTreeMap<MovieId, Movie>, ImportReport)> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    debug!(columns = headers.len(), "reading movies");

    let mut movies = BTreeMap::new();
    let mut report = ImportReport::default();
    let mut records = rdr.records();

    while let Some(record) = next_record(&mut records, &mut report)? {
        let row = report.rows;
        let field = |i: usize| record.get(i).unwrap_or("");

        let genres: Vec<Named> = match serde_json::from_str(field(MOVIE_GENRES)) {
            Ok(genres) => genres,
            Err(err) => {
                warn!(row, %err, "skipping movie with invalid genre JSON");
                report.skipped += 1;
                continue;
            }
        };

        let title = clean(field(MOVIE_TITLE)).into_owned();
        if has_escape(&title) {
            debug!(row, %title, "skipping untypeable title");
            report.skipped += 1;
            continue;
        }

        let Some(release_year) = parse_release_year(field(MOVIE_RELEASE_DATE)) else {
            warn!(row, date = field(MOVIE_RELEASE_DATE), "skipping movie without a valid release date");
            report.skipped += 1;
            continue;
        };

        let id: MovieId = match field(MOVIE_ID).parse() {
            Ok(id) => id,
            Err(err) => {
                warn!(row, id = field(MOVIE_ID), %err, "skipping movie with invalid id");
                report.skipped += 1;
                continue;
            }
        };

        let movie = Movie {
            genres: genres
                .into_iter()
                .map(|g| clean(&g.name).into_owned())
                .collect(),
            ..Movie::new(title, release_year)
        };
        movies.insert(id, movie);
        report.accepted += 1;
    }

    info!(
        rows = report.rows,
        movies = movies.len(),
        skipped = report.skipped,
        "imported movies"
    );
    Ok((movies, report))
}

/// Add cast and crew from a credits CSV stream to `movies`.
///
/// Rows naming an unknown or unparsable id are skipped. A movie whose cast or
/// crew JSON is malformed is removed from `movies`. Cast and crew names that
/// stay escaped after cleaning are dropped.
pub fn import_credits<R: Read>(reader: R, movies: &mut BTreeMap<MovieId, Movie>) -> Result<ImportReport> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    debug!(columns = headers.len(), "reading credits");

    let mut report = ImportReport::default();
    let mut records = rdr.records();

    while let Some(record) = next_record(&mut records, &mut report)? {
        let row = report.rows;
        let field = |i: usize| record.get(i).unwrap_or("");

        let id: MovieId = match field(CREDIT_MOVIE_ID).parse() {
            Ok(id) => id,
            Err(err) => {
                warn!(row, id = field(CREDIT_MOVIE_ID), %err, "skipping credits with invalid id");
                report.skipped += 1;
                continue;
            }
        };
        if !movies.contains_key(&id) {
            debug!(row, %id, "skipping credits for unknown movie");
            report.skipped += 1;
            continue;
        }

        let cast: Vec<Named> = match serde_json::from_str(field(CREDIT_CAST)) {
            Ok(cast) => cast,
            Err(err) => {
                warn!(row, %id, %err, "dropping movie with invalid cast JSON");
                movies.remove(&id);
                report.removed += 1;
                continue;
            }
        };
        let crew: Vec<CrewMember> = match serde_json::from_str(field(CREDIT_CREW)) {
            Ok(crew) => crew,
            Err(err) => {
                warn!(row, %id, %err, "dropping movie with invalid crew JSON");
                movies.remove(&id);
                report.removed += 1;
                continue;
            }
        };

        let Some(movie) = movies.get_mut(&id) else {
            continue;
        };
        movie.actors = typeable_names(cast.into_iter().map(|c| c.name));
        movie.director = None;
        movie.writer = None;
        movie.cinematographer = None;
        movie.composer = None;

        for member in crew {
            let name = clean(&member.name).into_owned();
            if has_escape(&name) {
                continue;
            }
            let job = clean(&member.job);
            let slot = match CrewRole::from_job(&job) {
                Some(CrewRole::Director) => &mut movie.director,
                Some(CrewRole::Writer) => &mut movie.writer,
                Some(CrewRole::Cinematographer) => &mut movie.cinematographer,
                Some(CrewRole::Composer) => &mut movie.composer,
                None => continue,
            };
            *slot = Some(name);
        }
        report.accepted += 1;
    }

    info!(
        rows = report.rows,
        updated = report.accepted,
        removed = report.removed,
        skipped = report.skipped,
        "imported credits"
    );
    Ok(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrewRole {
    Director,
    Writer,
    Cinematographer,
    Composer,
}

impl CrewRole {
    fn from_job(job: &str) -> Option<Self> {
        let job = job.trim();
        let is = |name: &str| job.eq_ignore_ascii_case(name);
        if is("director") {
            Some(CrewRole::Director)
        } else if is("writer") {
            Some(CrewRole::Writer)
        } else if is("cinematographer") || is("director of photography") {
            Some(CrewRole::Cinematographer)
        } else if is("composer") || is("original music composer") {
            Some(CrewRole::Composer)
        } else {
            None
        }
    }
}

/// Read the movies file, then merge in the credits file.
pub fn load_dataset(movies_path: &Path, credits_path: &Path) -> Result<BTreeMap<MovieId, Movie>> {
    let (mut movies, _) = import_movies(open(movies_path)?)?;
    import_credits(open(credits_path)?, &mut movies)?;
    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIES_HEADER: &str = "budget,genres,homepage,id,keywords,original_language,original_title,overview,popularity,production_companies,production_countries,release_date,revenue,runtime,spoken_languages,status,tagline,title,vote_average,vote_count";

    fn movie_row(id: &str, genres: &str, date: &str, title: &str) -> String {
        format!(
            "0,\"{}\",,{},[],en,\"{}\",,1.0,[],[],{},0,100,[],Released,,\"{}\",7.0,10",
            genres.replace('"', "\"\""),
            id,
            title,
            date,
            title
        )
    }

    fn movies_csv(rows: &[String]) -> String {
        let mut csv = String::from(MOVIES_HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        csv
    }

    fn credit_row(id: &str, cast: &str, crew: &str) -> String {
        format!(
            "{},Title,\"{}\",\"{}\"",
            id,
            cast.replace('"', "\"\""),
            crew.replace('"', "\"\"")
        )
    }

    fn credits_csv(rows: &[String]) -> String {
        let mut csv = String::from("movie_id,title,cast,crew");
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        csv
    }

    const ACTION: &str = r#"[{"id": 28, "name": "Action"}, {"id": 80, "name": "Crime"}]"#;

    #[test]
    fn test_parse_release_year() {
        assert_eq!(parse_release_year("1995-12-15"), Some(1995));
        assert_eq!(parse_release_year(" 2009-05-28 "), Some(2009));
        assert_eq!(parse_release_year(""), None);
        assert_eq!(parse_release_year("1995"), None);
        assert_eq!(parse_release_year("1995-13-01"), None);
        assert_eq!(parse_release_year("soon"), None);
    }

    #[test]
    fn test_import_movies() {
        let csv = movies_csv(&[
            movie_row("949", ACTION, "1995-12-15", "Heat"),
            movie_row("14160", r#"[{"id": 16, "name": "Animation"}]"#, "2009-05-28", "Up"),
        ]);
        let (movies, report) = import_movies(csv.as_bytes()).unwrap();

        assert_eq!(report, ImportReport { rows: 2, accepted: 2, skipped: 0, removed: 0 });
        let heat = &movies[&MovieId(949)];
        assert_eq!(heat.title, "Heat");
        assert_eq!(heat.release_year, 1995);
        assert_eq!(heat.genres, ["Action", "Crime"]);
        assert!(heat.actors.is_empty());
        assert_eq!(movies[&MovieId(14160)].genres, ["Animation"]);
    }

    #[test]
    fn test_import_movies_skips_bad_rows() {
        let csv = movies_csv(&[
            movie_row("1", "not json", "1995-12-15", "Bad Genres"),
            movie_row("2", ACTION, "", "No Date"),
            movie_row("3", ACTION, "someday", "Bad Date"),
            movie_row("x", ACTION, "1995-12-15", "Bad Id"),
            movie_row("5", ACTION, "2001-01-01", "u0431pu0430u0442"),
            movie_row("6", ACTION, "2001-01-01", "Amu00e9lie"),
            "short,row".to_string(),
        ]);
        let (movies, report) = import_movies(csv.as_bytes()).unwrap();

        assert_eq!(report.rows, 7);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped, 6);
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[&MovieId(6)].title, "Amelie");
    }

    #[test]
    fn test_import_movies_later_id_wins() {
        let csv = movies_csv(&[
            movie_row("7", ACTION, "1990-01-01", "First"),
            movie_row("7", ACTION, "1991-01-01", "Second"),
        ]);
        let (movies, _) = import_movies(csv.as_bytes()).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[&MovieId(7)].title, "Second");
    }

    #[test]
    fn test_import_movies_empty_input() {
        let (movies, report) = import_movies("".as_bytes()).unwrap();
        assert!(movies.is_empty());
        assert_eq!(report, ImportReport::default());
    }

    fn heat_only() -> BTreeMap<MovieId, Movie> {
        let mut movies = BTreeMap::new();
        movies.insert(MovieId(949), Movie::new("Heat", 1995));
        movies.insert(MovieId(14160), Movie::new("Up", 2009));
        movies
    }

    #[test]
    fn test_import_credits() {
        let cast = r#"[{"cast_id": 1, "name": "Al Pacino"}, {"cast_id": 2, "name": "Robert De Niro"}, {"cast_id": 3, "name": "u0431u0430"}]"#;
        let crew = r#"[
            {"job": "Director", "name": "Michael Mann"},
            {"job": "Writer", "name": "Michael Mann"},
            {"job": "Director of Photography", "name": "Dante Spinotti"},
            {"job": "Original Music Composer", "name": "Elliot Goldenthal"},
            {"job": "Editor", "name": "Dov Hoenig"}
        ]"#;
        let mut movies = heat_only();
        let csv = credits_csv(&[credit_row("949", cast, crew)]);
        let report = import_credits(csv.as_bytes(), &mut movies).unwrap();

        assert_eq!(report.accepted, 1);
        let heat = &movies[&MovieId(949)];
        assert_eq!(heat.actors, ["Al Pacino", "Robert De Niro"]);
        assert_eq!(heat.director.as_deref(), Some("Michael Mann"));
        assert_eq!(heat.writer.as_deref(), Some("Michael Mann"));
        assert_eq!(heat.cinematographer.as_deref(), Some("Dante Spinotti"));
        assert_eq!(heat.composer.as_deref(), Some("Elliot Goldenthal"));
        assert_eq!(movies[&MovieId(14160)].director, None);
    }

    #[test]
    fn test_import_credits_last_crew_match_wins() {
        let crew = r#"[{"job": "director", "name": "First"}, {"job": "DIRECTOR", "name": "Second"}]"#;
        let mut movies = heat_only();
        let csv = credits_csv(&[credit_row("949", "[]", crew)]);
        import_credits(csv.as_bytes(), &mut movies).unwrap();
        assert_eq!(movies[&MovieId(949)].director.as_deref(), Some("Second"));
    }

    #[test]
    fn test_import_credits_drops_escaped_crew_names() {
        let crew = r#"[
            {"job": "Director", "name": "Ok"},
            {"job": "Director", "name": "u0431u0430"},
            {"job": "Composer", "name": "u0431u0430"},
            {"job": "Writer", "name": "Pedro Almodu00f3var"}
        ]"#;
        let mut movies = heat_only();
        let csv = credits_csv(&[credit_row("949", "[]", crew)]);
        let report = import_credits(csv.as_bytes(), &mut movies).unwrap();

        assert_eq!(report.accepted, 1);
        let heat = &movies[&MovieId(949)];
        assert_eq!(heat.director.as_deref(), Some("Ok"));
        assert_eq!(heat.composer, None);
        assert_eq!(heat.writer.as_deref(), Some("Pedro Almodovar"));
    }

    #[test]
    fn test_import_credits_removes_malformed() {
        let mut movies = heat_only();
        let csv = credits_csv(&[
            credit_row("949", "not json", "[]"),
            credit_row("14160", "[]", "{broken"),
            credit_row("555", "[]", "[]"),
            credit_row("abc", "[]", "[]"),
        ]);
        let report = import_credits(csv.as_bytes(), &mut movies).unwrap();

        assert!(movies.is_empty());
        assert_eq!(report, ImportReport { rows: 4, accepted: 0, skipped: 2, removed: 2 });
    }

    #[test]
    fn test_load_dataset_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let movies_path = dir.path().join("movies.csv");
        let credits_path = dir.path().join("credits.csv");
        std::fs::write(
            &movies_path,
            movies_csv(&[movie_row("949", ACTION, "1995-12-15", "Heat")]),
        )
        .unwrap();
        std::fs::write(
            &credits_path,
            credits_csv(&[credit_row("949", r#"[{"name": "Val Kilmer"}]"#, "[]")]),
        )
        .unwrap();

        let movies = load_dataset(&movies_path, &credits_path).unwrap();
        assert_eq!(movies[&MovieId(949)].actors, ["Val Kilmer"]);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let err = load_dataset(&missing, &missing).unwrap_err();
        assert!(matches!(err, CatalogError::Io { ref path, .. } if path == &missing));
    }
}
